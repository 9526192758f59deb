// ---------------------------------------------------------------------------
// Catalog adapter — parse untrusted records into the canonical model
// ---------------------------------------------------------------------------
//
// The backing store hands over record-shaped JSON that is only partially
// validated: fields may be missing, mistyped, carry mis-encoded currency and
// star glyphs, or use alternate encodings (courses as a comma-joined string,
// placements as a JSON string). This module is the mandatory defensive layer:
// it repairs text, coerces field shapes, clamps numeric ranges, and drops
// records that are corrupt beyond use (blank name or slug, demo/test rows,
// id or slug collisions). Everything downstream assumes sanitized records.
// ---------------------------------------------------------------------------

use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::normalize_courses;
use crate::rank::rank;
use crate::search::filter_catalog;
use crate::types::{CollegeRecord, FilterCriteria, Placements, SortKey};

const DEFAULT_LOCATION: &str = "Mumbai";
const DEFAULT_OVERVIEW: &str = "Overview will be updated soon.";
const DEFAULT_IMAGE: &str = "/colleges/images/default.jpg";
const DEFAULT_LABEL: &str = "N/A";

fn slug_pattern() -> &'static Regex {
	static SLUG_RE: OnceLock<Regex> = OnceLock::new();
	SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("valid slug pattern"))
}

/// Repair the known mojibake sequences for currency and star glyphs that
/// appear in double-encoded source data, then trim.
pub fn sanitize_text(raw: &str) -> String {
	raw.replace("\u{00c3}\u{00a2}\u{00e2}\u{20ac}\u{0161}\u{00c2}\u{00b9}", "Rs. ")
		.replace("\u{00e2}\u{201a}\u{00b9}", "Rs. ")
		.replace("\u{00c3}\u{00a2}\u{00cb}\u{0153}\u{00e2}\u{20ac}\u{00a6}", "\u{2605}")
		.replace("\u{00e2}\u{02dc}\u{2026}", "\u{2605}")
		.replace("\u{00e2}\u{20ac}\u{2122}", "'")
		.trim()
		.to_string()
}

fn coerce_string(value: Option<&serde_json::Value>) -> String {
	match value {
		Some(serde_json::Value::String(s)) => s.clone(),
		Some(serde_json::Value::Number(n)) => n.to_string(),
		_ => String::new(),
	}
}

fn coerce_f64(value: Option<&serde_json::Value>) -> Option<f64> {
	match value {
		Some(serde_json::Value::Number(n)) => n.as_f64(),
		Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
		_ => None,
	}
}

fn coerce_placements(value: Option<&serde_json::Value>) -> Placements {
	let fallback = Placements::default();
	let Some(value) = value else {
		return fallback;
	};

	// Placements sometimes arrive as a JSON string instead of an object.
	let parsed;
	let source = match value {
		serde_json::Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
			Ok(v) => {
				parsed = v;
				&parsed
			}
			Err(_) => return fallback,
		},
		other => other,
	};

	let Some(object) = source.as_object() else {
		return fallback;
	};

	let field = |key: &str| {
		let text = coerce_string(object.get(key));
		let text = sanitize_text(&text);
		if text.is_empty() {
			DEFAULT_LABEL.to_string()
		} else {
			text
		}
	};

	let recruiters = object
		.get("recruiters")
		.and_then(|v| v.as_array())
		.map(|items| {
			items
				.iter()
				.filter_map(|item| item.as_str())
				.map(sanitize_text)
				.filter(|r| !r.is_empty())
				.collect()
		})
		.unwrap_or_default();

	Placements {
		avg: field("avg"),
		high: field("high"),
		recruiters,
	}
}

/// Coerce one untrusted JSON value into a [`CollegeRecord`].
///
/// Returns `None` for records that are corrupt beyond use: non-objects,
/// blank name or slug after normalization, slugs that are not URL-safe, and
/// demo/test/sample rows that leaked out of fixtures.
pub fn normalize_record(value: &serde_json::Value, fallback_id: u64) -> Option<CollegeRecord> {
	let object = value.as_object()?;

	let name = sanitize_text(&coerce_string(object.get("name")));
	let slug = coerce_string(object.get("slug")).trim().to_lowercase();
	if name.is_empty() || slug.is_empty() || !slug_pattern().is_match(&slug) {
		return None;
	}

	let lowered = name.to_lowercase();
	if lowered.contains("demo") || lowered.contains("test") || lowered.contains("sample") {
		return None;
	}

	let location = sanitize_text(&coerce_string(object.get("location")));
	let rating = coerce_f64(object.get("rating"))
		.filter(|r| r.is_finite())
		.map(|r| r.clamp(0.0, 5.0))
		.unwrap_or(0.0);
	let fees = coerce_f64(object.get("fees"))
		.filter(|f| f.is_finite() && *f >= 0.0)
		.map(|f| f.round() as u64)
		.unwrap_or(0);
	let established = coerce_f64(object.get("established"))
		.filter(|e| e.is_finite() && *e >= 0.0)
		.map(|e| e as u32)
		.unwrap_or(0);

	let courses = object
		.get("courses")
		.map(normalize_courses)
		.unwrap_or_default()
		.iter()
		.map(|course| sanitize_text(course))
		.filter(|course| !course.is_empty())
		.collect();

	let students = sanitize_text(&coerce_string(object.get("students")));
	let overview = sanitize_text(&coerce_string(object.get("overview")));
	let image = coerce_string(object.get("image")).trim().to_string();

	Some(CollegeRecord {
		id: coerce_f64(object.get("id"))
			.filter(|id| id.is_finite() && *id > 0.0)
			.map(|id| id as u64)
			.unwrap_or(fallback_id),
		slug,
		name,
		location: if location.is_empty() {
			DEFAULT_LOCATION.to_string()
		} else {
			location
		},
		rating,
		fees,
		courses,
		students: if students.is_empty() {
			DEFAULT_LABEL.to_string()
		} else {
			students
		},
		established,
		overview: if overview.is_empty() {
			DEFAULT_OVERVIEW.to_string()
		} else {
			overview
		},
		image: if image.is_empty() {
			DEFAULT_IMAGE.to_string()
		} else {
			image
		},
		placements: coerce_placements(object.get("placements")),
	})
}

/// Sanitize a whole untrusted list: normalize each record with a positional
/// fallback id and drop id/slug collisions (first occurrence wins).
pub fn sanitize_college_list(values: &[serde_json::Value]) -> Vec<CollegeRecord> {
	let mut used_ids: HashSet<u64> = HashSet::new();
	let mut used_slugs: HashSet<String> = HashSet::new();
	let mut sanitized = Vec::new();

	for (index, value) in values.iter().enumerate() {
		let Some(record) = normalize_record(value, index as u64 + 1) else {
			continue;
		};
		if used_ids.contains(&record.id) || used_slugs.contains(&record.slug) {
			tracing::warn!("Dropping duplicate record: {} ({})", record.slug, record.id);
			continue;
		}
		used_ids.insert(record.id);
		used_slugs.insert(record.slug.clone());
		sanitized.push(record);
	}

	sanitized
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The sanitized, immutable catalog plus the full search pipeline over it.
pub struct Catalog {
	records: Vec<CollegeRecord>,
}

impl Catalog {
	/// Build a catalog from untrusted JSON values.
	pub fn from_values(values: &[serde_json::Value]) -> Self {
		Self {
			records: sanitize_college_list(values),
		}
	}

	pub fn all(&self) -> &[CollegeRecord] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn find_by_slug(&self, slug: &str) -> Option<&CollegeRecord> {
		let slug = slug.trim().to_lowercase();
		self.records.iter().find(|r| r.slug == slug)
	}

	/// Distinct locations, sorted. Feeds the location filter dropdown.
	pub fn locations(&self) -> Vec<String> {
		let set: BTreeSet<String> = self.records.iter().map(|r| r.location.clone()).collect();
		set.into_iter().collect()
	}

	/// Distinct course names, sorted. Feeds the course filter dropdown.
	pub fn courses(&self) -> Vec<String> {
		let set: BTreeSet<String> = self
			.records
			.iter()
			.flat_map(|r| r.courses.iter().cloned())
			.collect();
		set.into_iter().collect()
	}

	/// Run the whole pipeline: match + filter in one linear pass, then rank.
	pub fn query(&self, criteria: &FilterCriteria, sort: SortKey) -> Vec<CollegeRecord> {
		rank(&filter_catalog(&self.records, criteria), sort)
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
