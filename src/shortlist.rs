// ---------------------------------------------------------------------------
// Shortlist + admission checklist — per-user convenience state
// ---------------------------------------------------------------------------
//
// Same capability-scoped storage pattern as the recency tracker: a
// de-duplicated shortlist of college slugs under one fixed key, and a fixed
// five-step admission checklist per college. Reads are lenient; a payload
// with the wrong shape resets to the empty/default state.
// ---------------------------------------------------------------------------

use crate::recency::KvStore;

/// Storage key for the shortlist.
pub const SHORTLIST_KEY: &str = "shortlist-colleges";

/// The fixed admission checklist steps.
pub const CHECKLIST_ITEMS: [&str; 5] = [
	"Check eligibility criteria",
	"Keep documents ready",
	"Fill online form",
	"Track merit list",
	"Complete fee payment",
];

fn checklist_key(slug: &str) -> String {
	format!("checklist-{slug}")
}

/// Shortlist and checklist state over an injected [`KvStore`].
pub struct Shortlist<S: KvStore> {
	store: S,
}

impl<S: KvStore> Shortlist<S> {
	pub fn new(store: S) -> Self {
		Self { store }
	}

	/// Read the shortlisted slugs. Corrupt or non-list payloads read as empty.
	pub fn slugs(&self) -> Vec<String> {
		let Some(raw) = self.store.get(SHORTLIST_KEY) else {
			return Vec::new();
		};
		let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
			tracing::warn!("Discarding corrupt shortlist payload");
			return Vec::new();
		};
		let Some(items) = value.as_array() else {
			return Vec::new();
		};
		items
			.iter()
			.filter_map(|item| item.as_str())
			.map(str::to_string)
			.collect()
	}

	pub fn contains(&self, slug: &str) -> bool {
		self.slugs().iter().any(|s| s == slug)
	}

	/// Toggle a slug in or out of the shortlist; returns the new saved state.
	pub fn toggle(&mut self, slug: &str) -> bool {
		let mut slugs = self.slugs();
		let saved = if let Some(pos) = slugs.iter().position(|s| s == slug) {
			slugs.remove(pos);
			false
		} else {
			slugs.push(slug.to_string());
			true
		};
		match serde_json::to_string(&slugs) {
			Ok(json) => self.store.set(SHORTLIST_KEY, &json),
			Err(e) => tracing::warn!("Failed to serialize shortlist: {}", e),
		}
		saved
	}

	/// Read the checklist for a college. Payloads that are not a bool list
	/// of the expected length reset to all-false.
	pub fn checklist(&self, slug: &str) -> Vec<bool> {
		let default = vec![false; CHECKLIST_ITEMS.len()];
		let Some(raw) = self.store.get(&checklist_key(slug)) else {
			return default;
		};
		match serde_json::from_str::<Vec<bool>>(&raw) {
			Ok(steps) if steps.len() == CHECKLIST_ITEMS.len() => steps,
			_ => default,
		}
	}

	/// Flip one checklist step and persist. Out-of-range indexes are a no-op.
	pub fn toggle_step(&mut self, slug: &str, index: usize) -> Vec<bool> {
		let mut steps = self.checklist(slug);
		if index < steps.len() {
			steps[index] = !steps[index];
			match serde_json::to_string(&steps) {
				Ok(json) => self.store.set(&checklist_key(slug), &json),
				Err(e) => tracing::warn!("Failed to serialize checklist: {}", e),
			}
		}
		steps
	}

	/// Checklist completion as a rounded percentage.
	pub fn progress(&self, slug: &str) -> u8 {
		let steps = self.checklist(slug);
		let done = steps.iter().filter(|&&s| s).count();
		((done as f64 / CHECKLIST_ITEMS.len() as f64) * 100.0).round() as u8
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::recency::MemoryKvStore;

	fn shortlist() -> Shortlist<MemoryKvStore> {
		Shortlist::new(MemoryKvStore::new())
	}

	#[test]
	fn toggle_adds_then_removes() {
		let mut s = shortlist();
		assert!(s.toggle("st-xaviers"));
		assert!(s.contains("st-xaviers"));
		assert!(!s.toggle("st-xaviers"));
		assert!(!s.contains("st-xaviers"));
	}

	#[test]
	fn slugs_preserve_insertion_order() {
		let mut s = shortlist();
		s.toggle("podar");
		s.toggle("hr-college");
		assert_eq!(s.slugs(), vec!["podar", "hr-college"]);
	}

	#[test]
	fn corrupt_shortlist_reads_as_empty() {
		let mut store = MemoryKvStore::new();
		store.set(SHORTLIST_KEY, "not json");
		let s = Shortlist::new(store);
		assert!(s.slugs().is_empty());
	}

	#[test]
	fn checklist_defaults_to_all_false() {
		let s = shortlist();
		assert_eq!(s.checklist("podar"), vec![false; 5]);
		assert_eq!(s.progress("podar"), 0);
	}

	#[test]
	fn toggle_step_and_progress() {
		let mut s = shortlist();
		let steps = s.toggle_step("podar", 0);
		assert!(steps[0]);
		s.toggle_step("podar", 3);
		assert_eq!(s.progress("podar"), 40);

		// Out-of-range index is a no-op.
		let steps = s.toggle_step("podar", 99);
		assert_eq!(steps.iter().filter(|&&b| b).count(), 2);
	}

	#[test]
	fn wrong_length_checklist_resets() {
		let mut store = MemoryKvStore::new();
		store.set("checklist-podar", "[true, true]");
		let s = Shortlist::new(store);
		assert_eq!(s.checklist("podar"), vec![false; 5]);
	}

	#[test]
	fn checklists_are_independent_per_slug() {
		let mut s = shortlist();
		s.toggle_step("podar", 0);
		assert_eq!(s.checklist("hr-college"), vec![false; 5]);
	}
}
