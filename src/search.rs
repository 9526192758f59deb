// ---------------------------------------------------------------------------
// Search Matcher + Filter Evaluator — one linear pass over the catalog
// ---------------------------------------------------------------------------
//
// A record is included in the result set iff it matches the free-text query
// (substring containment against name, location, or any course) AND passes
// every active filter. Filters whose criterion is the "All" sentinel are
// skipped; malformed criteria degrade to "All" instead of failing.
//
// Substring containment is the sole matching strategy: no fuzzy matching,
// no tokenization, no stemming. The dataset is small enough that no index
// structure is warranted.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use crate::normalize::{is_all, normalize_term, parse_fee_range};
use crate::types::{CollegeRecord, FilterCriteria};

/// Maximum number of search-hint suggestions returned.
pub const MAX_HINTS: usize = 5;

/// Minimum normalized query length before hints are produced.
pub const MIN_HINT_QUERY_LEN: usize = 2;

/// True if the record matches a free-text query already passed through
/// [`normalize_term`]. An empty query matches everything.
pub fn matches_query(record: &CollegeRecord, normalized_query: &str) -> bool {
	if normalized_query.is_empty() {
		return true;
	}
	if normalize_term(&record.name).contains(normalized_query) {
		return true;
	}
	if normalize_term(&record.location).contains(normalized_query) {
		return true;
	}
	record
		.courses
		.iter()
		.any(|course| normalize_term(course).contains(normalized_query))
}

/// True only if the record satisfies every active filter in `criteria`.
///
/// Location and course use case-insensitive substring matching; the fee
/// range is inclusive on both ends; the rating criterion is a minimum.
pub fn passes_filters(record: &CollegeRecord, criteria: &FilterCriteria) -> bool {
	if !is_all(&criteria.location) {
		let wanted = normalize_term(&criteria.location);
		if !normalize_term(&record.location).contains(&wanted) {
			return false;
		}
	}

	if !is_all(&criteria.fees) {
		// A malformed range means "All" rather than an error.
		if let Some((min, max)) = parse_fee_range(&criteria.fees) {
			if record.fees < min || record.fees > max {
				return false;
			}
		}
	}

	if !is_all(&criteria.rating) {
		if let Ok(minimum) = criteria.rating.trim().parse::<f64>() {
			if record.rating < minimum {
				return false;
			}
		}
	}

	if !is_all(&criteria.course) {
		let wanted = normalize_term(&criteria.course);
		if !record
			.courses
			.iter()
			.any(|course| normalize_term(course).contains(&wanted))
		{
			return false;
		}
	}

	true
}

/// Run the matcher and evaluator over the whole catalog in one pass,
/// preserving catalog order.
pub fn filter_catalog(records: &[CollegeRecord], criteria: &FilterCriteria) -> Vec<CollegeRecord> {
	let normalized_query = normalize_term(&criteria.query_text);
	records
		.iter()
		.filter(|record| matches_query(record, &normalized_query))
		.filter(|record| passes_filters(record, criteria))
		.cloned()
		.collect()
}

/// De-duplicated name-only suggestions for a partial query.
///
/// Queries shorter than [`MIN_HINT_QUERY_LEN`] characters yield nothing; at
/// most [`MAX_HINTS`] names are returned, in catalog order.
pub fn search_hints(records: &[CollegeRecord], query: &str) -> Vec<String> {
	let normalized_query = normalize_term(query);
	if normalized_query.chars().count() < MIN_HINT_QUERY_LEN {
		return Vec::new();
	}

	let mut seen: HashSet<String> = HashSet::new();
	let mut hints = Vec::new();
	for record in records {
		let normalized_name = normalize_term(&record.name);
		if !normalized_name.contains(&normalized_query) {
			continue;
		}
		if !seen.insert(normalized_name) {
			continue;
		}
		hints.push(record.name.clone());
		if hints.len() == MAX_HINTS {
			break;
		}
	}
	hints
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Placements;

	fn record(name: &str, location: &str, fees: u64, rating: f64, courses: &[&str]) -> CollegeRecord {
		CollegeRecord {
			id: 1,
			slug: name.to_lowercase().replace(' ', "-"),
			name: name.to_string(),
			location: location.to_string(),
			rating,
			fees,
			courses: courses.iter().map(|c| c.to_string()).collect(),
			students: "N/A".to_string(),
			established: 0,
			overview: String::new(),
			image: String::new(),
			placements: Placements::default(),
		}
	}

	#[test]
	fn empty_query_matches_everything() {
		let r = record("Jai Hind College", "Churchgate", 40000, 4.3, &["B.Com"]);
		assert!(matches_query(&r, ""));
	}

	#[test]
	fn query_matches_name_substring() {
		let r = record("Jai Hind College", "Churchgate", 40000, 4.3, &["B.Com"]);
		assert!(matches_query(&r, "hind"));
		assert!(!matches_query(&r, "xyz123"));
	}

	#[test]
	fn query_matches_location_and_courses() {
		let r = record("Jai Hind College", "Churchgate", 40000, 4.3, &["B.Sc IT"]);
		assert!(matches_query(&r, "churchgate"));
		assert!(matches_query(&r, "b.sc"));
	}

	#[test]
	fn all_sentinel_filters_pass_anything() {
		let r = record("Podar", "Matunga", 18000, 4.2, &["B.Com"]);
		assert!(passes_filters(&r, &FilterCriteria::default()));
	}

	#[test]
	fn fee_range_is_inclusive() {
		let criteria = |fees: &str| FilterCriteria {
			fees: fees.to_string(),
			..FilterCriteria::default()
		};
		let r = record("HR College", "Churchgate", 30000, 4.4, &[]);
		assert!(passes_filters(&r, &criteria("30000-60000")));
		assert!(passes_filters(&r, &criteria("0-30000")));

		let just_over = record("HR College", "Churchgate", 30001, 4.4, &[]);
		assert!(!passes_filters(&just_over, &criteria("0-30000")));
	}

	#[test]
	fn malformed_fee_range_behaves_as_all() {
		let criteria = FilterCriteria {
			fees: "cheap-expensive".to_string(),
			..FilterCriteria::default()
		};
		let r = record("Podar", "Matunga", 18000, 4.2, &[]);
		assert!(passes_filters(&r, &criteria));
	}

	#[test]
	fn minimum_rating_filter() {
		let criteria = FilterCriteria {
			rating: "4.5".to_string(),
			..FilterCriteria::default()
		};
		assert!(passes_filters(
			&record("Xavier", "Fort", 20000, 4.6, &[]),
			&criteria
		));
		assert!(!passes_filters(
			&record("Podar", "Matunga", 18000, 4.2, &[]),
			&criteria
		));
	}

	#[test]
	fn malformed_rating_behaves_as_all() {
		let criteria = FilterCriteria {
			rating: "four".to_string(),
			..FilterCriteria::default()
		};
		assert!(passes_filters(
			&record("Podar", "Matunga", 18000, 3.1, &[]),
			&criteria
		));
	}

	#[test]
	fn location_filter_is_substring_case_insensitive() {
		let criteria = FilterCriteria {
			location: "churchgate".to_string(),
			..FilterCriteria::default()
		};
		assert!(passes_filters(
			&record("HR College", "Churchgate, Mumbai", 35000, 4.4, &[]),
			&criteria
		));
		assert!(!passes_filters(
			&record("Podar", "Matunga", 18000, 4.2, &[]),
			&criteria
		));
	}

	#[test]
	fn course_filter_is_substring_case_insensitive() {
		let criteria = FilterCriteria {
			course: "b.com".to_string(),
			..FilterCriteria::default()
		};
		assert!(passes_filters(
			&record("Podar", "Matunga", 18000, 4.2, &["B.Com (Hons)"]),
			&criteria
		));
		assert!(!passes_filters(
			&record("Xavier", "Fort", 20000, 4.6, &["BA"]),
			&criteria
		));
	}

	#[test]
	fn filter_catalog_combines_query_and_filters() {
		let records = vec![
			record("Xavier", "Fort", 20000, 4.6, &["BA"]),
			record("HR College", "Churchgate", 35000, 4.4, &["B.Com"]),
			record("Podar College", "Matunga", 18000, 4.2, &["B.Com"]),
		];
		let criteria = FilterCriteria {
			query_text: "college".to_string(),
			course: "B.Com".to_string(),
			..FilterCriteria::default()
		};
		let results = filter_catalog(&records, &criteria);
		let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
		assert_eq!(names, vec!["HR College", "Podar College"]);
	}

	#[test]
	fn filter_catalog_on_empty_list_is_empty() {
		assert!(filter_catalog(&[], &FilterCriteria::default()).is_empty());
	}

	#[test]
	fn hints_require_two_characters() {
		let records = vec![record("Xavier", "Fort", 20000, 4.6, &[])];
		assert!(search_hints(&records, "x").is_empty());
		assert_eq!(search_hints(&records, "xa"), vec!["Xavier"]);
	}

	#[test]
	fn hints_are_name_only_deduplicated_and_bounded() {
		let mut records = Vec::new();
		for i in 0..8 {
			records.push(record(&format!("College {i}"), "Mumbai", 10000, 4.0, &[]));
		}
		// Location matches must not produce hints.
		let hints = search_hints(&records, "mumbai");
		assert!(hints.is_empty());

		let hints = search_hints(&records, "college");
		assert_eq!(hints.len(), MAX_HINTS);

		// Duplicate names collapse to one hint.
		let records = vec![
			record("Jai Hind College", "Churchgate", 40000, 4.3, &[]),
			record("JAI HIND COLLEGE", "Churchgate", 40000, 4.3, &[]),
		];
		assert_eq!(search_hints(&records, "jai").len(), 1);
	}
}
