// ---------------------------------------------------------------------------
// Ranker — stable ordering of the filtered result set
// ---------------------------------------------------------------------------
//
// Stability matters twice over: `Relevance` is defined as the incoming
// filter-pass order, and tie-breaks on rating/fees must keep their relative
// input order so rows do not jump around in the UI. `Vec::sort_by` is a
// stable sort, which gives both for free. The input is never mutated.
// ---------------------------------------------------------------------------

use std::cmp::Ordering;

use crate::types::{CollegeRecord, SortKey};

/// Produce an ordered copy of `results` according to `key`.
pub fn rank(results: &[CollegeRecord], key: SortKey) -> Vec<CollegeRecord> {
	let mut ordered = results.to_vec();
	match key {
		SortKey::Relevance => {}
		SortKey::RatingDesc => ordered.sort_by(|a, b| {
			b.rating
				.partial_cmp(&a.rating)
				.unwrap_or(Ordering::Equal)
		}),
		SortKey::FeesAsc => ordered.sort_by(|a, b| a.fees.cmp(&b.fees)),
		SortKey::FeesDesc => ordered.sort_by(|a, b| b.fees.cmp(&a.fees)),
	}
	ordered
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
