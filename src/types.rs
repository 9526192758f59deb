use serde::{Deserialize, Serialize};

/// Placement summary for one college. Free-text amounts because source data
/// mixes currencies and "N/A" markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placements {
	pub avg: String,
	pub high: String,
	pub recruiters: Vec<String>,
}

impl Default for Placements {
	fn default() -> Self {
		Self {
			avg: "N/A".to_string(),
			high: "N/A".to_string(),
			recruiters: Vec::new(),
		}
	}
}

/// One institution in the catalog. Immutable once loaded: the pipeline only
/// derives read-only views over these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollegeRecord {
	pub id: u64,
	pub slug: String,
	pub name: String,
	pub location: String,
	pub rating: f64,
	pub fees: u64,
	pub courses: Vec<String>,
	pub students: String,
	pub established: u32,
	pub overview: String,
	pub image: String,
	pub placements: Placements,
}

/// User-driven filter state, recreated on every interaction. Every field
/// except the free-text query uses the sentinel `"All"` for "do not filter".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
	#[serde(rename = "queryText")]
	pub query_text: String,
	pub location: String,
	/// A closed interval expressed as `min-max`, or `"All"`.
	pub fees: String,
	/// Minimum rating as a numeric string, or `"All"`.
	pub rating: String,
	pub course: String,
}

impl Default for FilterCriteria {
	fn default() -> Self {
		Self {
			query_text: String::new(),
			location: "All".to_string(),
			fees: "All".to_string(),
			rating: "All".to_string(),
			course: "All".to_string(),
		}
	}
}

/// Sort order for the filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
	/// Pass-through: preserve the order produced by the filter pass.
	#[default]
	#[serde(rename = "relevance")]
	Relevance,
	#[serde(rename = "rating-desc")]
	RatingDesc,
	#[serde(rename = "fees-asc")]
	FeesAsc,
	#[serde(rename = "fees-desc")]
	FeesDesc,
}

/// Summary statistics over a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
	pub average_fee: u64,
	pub average_rating: f64,
	pub top_rating: f64,
}

/// A recently viewed college, held in the recency tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewedEntry {
	pub id: u64,
	pub name: String,
	pub slug: String,
}
