// ---------------------------------------------------------------------------
// Query Normalizer — canonical comparison forms for untrusted input
// ---------------------------------------------------------------------------
//
// Every comparison in the search pipeline goes through these functions so
// matching is case-insensitive and whitespace-tolerant. All functions are
// pure and total: unknown shapes degrade to an empty/neutral result instead
// of failing.
// ---------------------------------------------------------------------------

/// Canonical comparison form of a free-text term: trimmed and lowercased.
/// Idempotent: `normalize_term(normalize_term(x)) == normalize_term(x)`.
pub fn normalize_term(raw: &str) -> String {
	raw.trim().to_lowercase()
}

/// Coerce a `courses` field of unknown shape into a list of trimmed
/// non-empty strings.
///
/// Source data carries courses either as a genuine JSON list or as a single
/// comma-separated string; anything else yields an empty list.
pub fn normalize_courses(value: &serde_json::Value) -> Vec<String> {
	match value {
		serde_json::Value::Array(items) => items
			.iter()
			.filter_map(|item| item.as_str())
			.map(str::trim)
			.filter(|course| !course.is_empty())
			.map(str::to_string)
			.collect(),
		serde_json::Value::String(joined) => joined
			.split(',')
			.map(str::trim)
			.filter(|course| !course.is_empty())
			.map(str::to_string)
			.collect(),
		_ => Vec::new(),
	}
}

/// Parse a fee-range criterion of the form `min-max` (two non-negative
/// integers around a hyphen).
///
/// Returns `None` for anything malformed, which callers treat as the "All"
/// sentinel rather than an error.
pub fn parse_fee_range(raw: &str) -> Option<(u64, u64)> {
	let (min, max) = raw.split_once('-')?;
	let min = min.trim().parse::<u64>().ok()?;
	let max = max.trim().parse::<u64>().ok()?;
	Some((min, max))
}

/// True if a filter criterion is the "do not filter" sentinel: blank or
/// `"All"` in any case.
pub fn is_all(criterion: &str) -> bool {
	let trimmed = criterion.trim();
	trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
