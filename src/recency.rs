// ---------------------------------------------------------------------------
// Recency Tracker — bounded recent-search and recently-viewed lists
// ---------------------------------------------------------------------------
//
// Best-effort convenience state over an injected key-value capability, so
// the same logic runs against an in-memory map in tests and a file-backed
// store in the engine. Reads are lenient: an absent, corrupt, or
// wrong-shaped payload falls back to an empty list, and individual entries
// failing the shape check are dropped rather than aborting the read.
// Concurrent writers are not coordinated; last write wins.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::normalize::normalize_term;
use crate::types::ViewedEntry;

/// Storage key for the recent-search list.
pub const RECENT_SEARCHES_KEY: &str = "recent-searches";
/// Storage key for the recently-viewed list.
pub const RECENTLY_VIEWED_KEY: &str = "recently-viewed-colleges";
/// Maximum entries kept per list.
pub const MAX_RECENT: usize = 5;

// ---------------------------------------------------------------------------
// KvStore capability
// ---------------------------------------------------------------------------

/// Minimal key-value capability the trackers are scoped to.
///
/// Writes are best-effort: implementations log failures instead of
/// surfacing them, because loss of this state has no correctness impact.
pub trait KvStore {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&mut self, key: &str, value: &str);
	fn remove(&mut self, key: &str);
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
	fn get(&self, key: &str) -> Option<String> {
		(**self).get(key)
	}

	fn set(&mut self, key: &str, value: &str) {
		(**self).set(key, value)
	}

	fn remove(&mut self, key: &str) {
		(**self).remove(key)
	}
}

/// In-memory store, used by tests and as the engine default when no storage
/// directory is configured.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
	entries: HashMap<String, String>,
}

impl MemoryKvStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl KvStore for MemoryKvStore {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.get(key).cloned()
	}

	fn set(&mut self, key: &str, value: &str) {
		self.entries.insert(key.to_string(), value.to_string());
	}

	fn remove(&mut self, key: &str) {
		self.entries.remove(key);
	}
}

// ---------------------------------------------------------------------------
// RecencyTracker
// ---------------------------------------------------------------------------

/// Maintains the two bounded, de-duplicated, most-recent-first lists.
pub struct RecencyTracker<S: KvStore> {
	store: S,
}

impl<S: KvStore> RecencyTracker<S> {
	pub fn new(store: S) -> Self {
		Self { store }
	}

	/// Read the recent-search list, most recent first.
	pub fn recent_searches(&self) -> Vec<String> {
		let Some(raw) = self.store.get(RECENT_SEARCHES_KEY) else {
			return Vec::new();
		};
		let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
			tracing::warn!("Discarding corrupt recent-search payload");
			return Vec::new();
		};
		let Some(items) = value.as_array() else {
			tracing::warn!("Discarding non-list recent-search payload");
			return Vec::new();
		};
		items
			.iter()
			.filter_map(|item| item.as_str())
			.map(str::trim)
			.filter(|term| !term.is_empty())
			.map(str::to_string)
			.take(MAX_RECENT)
			.collect()
	}

	/// Record a search term: de-duplicate case-insensitively, prepend,
	/// truncate to the bound, persist. Blank terms are a no-op.
	pub fn remember_search(&mut self, term: &str) {
		let term = term.trim();
		if term.is_empty() {
			return;
		}

		let normalized = normalize_term(term);
		let mut searches = self.recent_searches();
		searches.retain(|existing| normalize_term(existing) != normalized);
		searches.insert(0, term.to_string());
		searches.truncate(MAX_RECENT);

		self.persist(RECENT_SEARCHES_KEY, &searches);
	}

	/// Reset the search list and remove its persisted key.
	pub fn clear_searches(&mut self) {
		self.store.remove(RECENT_SEARCHES_KEY);
	}

	/// Read the recently-viewed list, most recent first. Entries that fail
	/// the shape check are filtered out.
	pub fn recently_viewed(&self) -> Vec<ViewedEntry> {
		let Some(raw) = self.store.get(RECENTLY_VIEWED_KEY) else {
			return Vec::new();
		};
		let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
			tracing::warn!("Discarding corrupt recently-viewed payload");
			return Vec::new();
		};
		let Some(items) = value.as_array() else {
			tracing::warn!("Discarding non-list recently-viewed payload");
			return Vec::new();
		};
		items
			.iter()
			.filter_map(|item| serde_json::from_value::<ViewedEntry>(item.clone()).ok())
			.take(MAX_RECENT)
			.collect()
	}

	/// Record a viewed college: de-duplicate by id, prepend, truncate,
	/// persist.
	pub fn remember_viewed(&mut self, entry: ViewedEntry) {
		let mut viewed = self.recently_viewed();
		viewed.retain(|existing| existing.id != entry.id);
		viewed.insert(0, entry);
		viewed.truncate(MAX_RECENT);

		self.persist(RECENTLY_VIEWED_KEY, &viewed);
	}

	fn persist<T: serde::Serialize>(&mut self, key: &str, list: &[T]) {
		match serde_json::to_string(list) {
			Ok(json) => self.store.set(key, &json),
			Err(e) => tracing::warn!("Failed to serialize {}: {}", key, e),
		}
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn tracker() -> RecencyTracker<MemoryKvStore> {
		RecencyTracker::new(MemoryKvStore::new())
	}

	#[test]
	fn empty_store_reads_empty_lists() {
		let t = tracker();
		assert!(t.recent_searches().is_empty());
		assert!(t.recently_viewed().is_empty());
	}

	#[test]
	fn remember_search_prepends_most_recent_first() {
		let mut t = tracker();
		t.remember_search("commerce");
		t.remember_search("science");
		assert_eq!(t.recent_searches(), vec!["science", "commerce"]);
	}

	#[test]
	fn remember_search_blank_is_noop() {
		let mut t = tracker();
		t.remember_search("   ");
		t.remember_search("");
		assert!(t.recent_searches().is_empty());
	}

	#[test]
	fn remember_search_bounds_at_five_evicting_oldest() {
		let mut t = tracker();
		for term in ["a1", "a2", "a3", "a4", "a5", "a6"] {
			t.remember_search(term);
		}
		assert_eq!(t.recent_searches(), vec!["a6", "a5", "a4", "a3", "a2"]);
	}

	#[test]
	fn remember_search_dedupes_case_insensitively() {
		let mut t = tracker();
		t.remember_search("Commerce");
		t.remember_search("science");
		t.remember_search("COMMERCE");
		assert_eq!(t.recent_searches(), vec!["COMMERCE", "science"]);
	}

	#[test]
	fn clear_searches_removes_the_key() {
		let mut t = tracker();
		t.remember_search("commerce");
		t.clear_searches();
		assert!(t.recent_searches().is_empty());
		assert!(t.store.get(RECENT_SEARCHES_KEY).is_none());
	}

	#[test]
	fn corrupt_payload_reads_as_empty() {
		let mut store = MemoryKvStore::new();
		store.set(RECENT_SEARCHES_KEY, "not json");
		store.set(RECENTLY_VIEWED_KEY, "{\"also\": \"not a list\"}");
		let t = RecencyTracker::new(store);
		assert!(t.recent_searches().is_empty());
		assert!(t.recently_viewed().is_empty());
	}

	#[test]
	fn wrong_shaped_entries_are_filtered_not_fatal() {
		let mut store = MemoryKvStore::new();
		store.set(
			RECENTLY_VIEWED_KEY,
			r#"[{"wrong":"shape"}, {"id":3,"name":"Podar","slug":"podar"}, 7]"#,
		);
		let t = RecencyTracker::new(store);
		let viewed = t.recently_viewed();
		assert_eq!(viewed.len(), 1);
		assert_eq!(viewed[0].slug, "podar");
	}

	#[test]
	fn remember_viewed_dedupes_by_id_and_bounds() {
		let mut t = tracker();
		for id in 1..=6 {
			t.remember_viewed(ViewedEntry {
				id,
				name: format!("College {id}"),
				slug: format!("college-{id}"),
			});
		}
		let ids: Vec<u64> = t.recently_viewed().iter().map(|v| v.id).collect();
		assert_eq!(ids, vec![6, 5, 4, 3, 2]);

		// Re-viewing an existing entry moves it to the front without growth.
		t.remember_viewed(ViewedEntry {
			id: 4,
			name: "College 4".to_string(),
			slug: "college-4".to_string(),
		});
		let ids: Vec<u64> = t.recently_viewed().iter().map(|v| v.id).collect();
		assert_eq!(ids, vec![4, 6, 5, 3, 2]);
	}

	#[test]
	fn recency_updates_are_idempotent_for_duplicates() {
		let mut t = tracker();
		t.remember_search("commerce");
		t.remember_search("commerce");
		assert_eq!(t.recent_searches(), vec!["commerce"]);
	}
}
