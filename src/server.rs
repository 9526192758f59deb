// ---------------------------------------------------------------------------
// CatalogServer — JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON over stdin) to catalog,
// recency, shortlist, and planner operations: a main `run()` loop, a
// `dispatch()` match, a `with_catalog` helper, and free-standing handler
// functions for each method that takes parameters.
//
// Tracker and shortlist state defaults to in-memory storage; passing a
// `storagePath` to `catalog/load` switches both to the file-backed store.
// ---------------------------------------------------------------------------

use std::fs;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::insights::{affordable_count, aggregate, clamp_budget, monthly_estimate};
use crate::persistence::FileKvStore;
use crate::protocol::*;
use crate::recency::{KvStore, MemoryKvStore, RecencyTracker};
use crate::search::search_hints;
use crate::shortlist::{Shortlist, CHECKLIST_ITEMS};
use crate::transport::NdjsonTransport;
use crate::types::{FilterCriteria, SortKey, ViewedEntry};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// JSON-RPC server over the catalog pipeline and its trackers.
pub struct CatalogServer {
	transport: NdjsonTransport,
	catalog: Option<Catalog>,
	recency: RecencyTracker<Box<dyn KvStore>>,
	shortlist: Shortlist<Box<dyn KvStore>>,
}

impl CatalogServer {
	/// Create a new server with in-memory tracker storage. The catalog is
	/// created when `catalog/load` is called.
	pub fn new(transport: NdjsonTransport) -> Self {
		Self {
			transport,
			catalog: None,
			recency: RecencyTracker::new(Box::new(MemoryKvStore::new())),
			shortlist: Shortlist::new(Box::new(MemoryKvStore::new())),
		}
	}

	/// Main loop: read JSON-RPC messages from stdin, dispatch to handlers.
	pub fn run(&mut self) -> Result<(), CatalogError> {
		use std::io::BufRead;

		let stdin = std::io::stdin();
		let reader = stdin.lock();

		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			match serde_json::from_str::<JsonRpcRequest>(&line) {
				Ok(request) => self.dispatch(request),
				Err(e) => {
					tracing::warn!("Failed to parse request: {}", e);
					self.transport.write_error(
						0,
						INTERNAL_ERROR,
						"Parse error: invalid JSON",
						None,
					);
				}
			}
		}

		Ok(())
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		let result = match req.method.as_str() {
			// -- Catalog -------------------------------------------------
			"catalog/load" => self.handle_load(req.params),
			"catalog/list" => self.with_catalog(|c| {
				Ok(serde_json::json!({ "colleges": c.all(), "count": c.len() }))
			}),
			"catalog/get" => self.with_catalog(|c| handle_get(c, req.params)),
			"catalog/search" => self.with_catalog(|c| handle_search(c, req.params)),
			"catalog/hints" => self.with_catalog(|c| handle_hints(c, req.params)),
			"catalog/facets" => self.with_catalog(|c| {
				Ok(serde_json::json!({
					"locations": c.locations(),
					"courses": c.courses(),
				}))
			}),
			"catalog/affordableCount" => {
				self.with_catalog(|c| handle_affordable_count(c, req.params))
			}

			// -- Planner -------------------------------------------------
			"planner/monthlyEstimate" => handle_monthly_estimate(req.params),

			// -- Recency -------------------------------------------------
			"recency/rememberSearch" => self.handle_remember_search(req.params),
			"recency/recentSearches" => Ok(serde_json::json!({
				"searches": self.recency.recent_searches(),
			})),
			"recency/rememberViewed" => self.handle_remember_viewed(req.params),
			"recency/recentlyViewed" => Ok(serde_json::json!({
				"viewed": self.recency.recently_viewed(),
			})),
			"recency/clearSearches" => {
				self.recency.clear_searches();
				Ok(serde_json::json!({}))
			}

			// -- Shortlist / checklist -----------------------------------
			"shortlist/toggle" => self.handle_shortlist_toggle(req.params),
			"shortlist/list" => Ok(serde_json::json!({ "slugs": self.shortlist.slugs() })),
			"checklist/toggle" => self.handle_checklist_toggle(req.params),
			"checklist/get" => self.handle_checklist_get(req.params),

			// -- Unknown -------------------------------------------------
			_ => {
				self.transport.write_error(
					id,
					METHOD_NOT_FOUND,
					format!("Unknown method: {}", req.method),
					None,
				);
				return;
			}
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => {
				let code = match e {
					CatalogError::Serialization(_) => INVALID_PARAMS,
					_ => CATALOG_ERROR,
				};
				self.transport
					.write_error(id, code, e.to_string(), Some(e.to_json_rpc_error()));
			}
		}
	}

	fn with_catalog<F>(&self, f: F) -> Result<serde_json::Value, CatalogError>
	where
		F: FnOnce(&Catalog) -> Result<serde_json::Value, CatalogError>,
	{
		match &self.catalog {
			Some(c) => f(c),
			None => Err(CatalogError::NotLoaded),
		}
	}

	// ── Load ──────────────────────────────────────────────────────────────

	fn handle_load(&mut self, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
		let p: LoadParams = parse_params(params)?;

		if let Some(dir) = &p.storage_path {
			self.recency = RecencyTracker::new(Box::new(FileKvStore::new(dir)?));
			self.shortlist = Shortlist::new(Box::new(FileKvStore::new(dir)?));
		}

		let values = match (p.records, p.path) {
			(Some(records), _) => records,
			(None, Some(path)) => {
				let raw = fs::read_to_string(&path)?;
				serde_json::from_str(&raw).map_err(|e| {
					CatalogError::Serialization(format!("Invalid catalog file {}: {}", path, e))
				})?
			}
			(None, None) => Vec::new(),
		};

		let total = values.len();
		let catalog = Catalog::from_values(&values);
		let loaded = catalog.len();
		tracing::info!("Catalog loaded: {} kept, {} dropped", loaded, total - loaded);
		self.catalog = Some(catalog);

		Ok(serde_json::json!({ "loaded": loaded, "dropped": total - loaded }))
	}

	// ── Stateful handlers ─────────────────────────────────────────────────

	fn handle_remember_search(
		&mut self,
		params: serde_json::Value,
	) -> Result<serde_json::Value, CatalogError> {
		let p: TermParams = parse_params(params)?;
		self.recency.remember_search(&p.term);
		Ok(serde_json::json!({ "searches": self.recency.recent_searches() }))
	}

	fn handle_remember_viewed(
		&mut self,
		params: serde_json::Value,
	) -> Result<serde_json::Value, CatalogError> {
		let p: SlugParams = parse_params(params)?;
		let entry = {
			let catalog = self.catalog.as_ref().ok_or(CatalogError::NotLoaded)?;
			let record = catalog
				.find_by_slug(&p.slug)
				.ok_or_else(|| CatalogError::NotFound(p.slug.clone()))?;
			ViewedEntry {
				id: record.id,
				name: record.name.clone(),
				slug: record.slug.clone(),
			}
		};
		self.recency.remember_viewed(entry);
		Ok(serde_json::json!({ "viewed": self.recency.recently_viewed() }))
	}

	fn handle_shortlist_toggle(
		&mut self,
		params: serde_json::Value,
	) -> Result<serde_json::Value, CatalogError> {
		let p: SlugParams = parse_params(params)?;
		let saved = self.shortlist.toggle(&p.slug);
		Ok(serde_json::json!({ "saved": saved, "slugs": self.shortlist.slugs() }))
	}

	fn handle_checklist_toggle(
		&mut self,
		params: serde_json::Value,
	) -> Result<serde_json::Value, CatalogError> {
		let p: ChecklistToggleParams = parse_params(params)?;
		let steps = self.shortlist.toggle_step(&p.slug, p.index);
		Ok(serde_json::json!({
			"items": CHECKLIST_ITEMS,
			"steps": steps,
			"progress": self.shortlist.progress(&p.slug),
		}))
	}

	fn handle_checklist_get(
		&mut self,
		params: serde_json::Value,
	) -> Result<serde_json::Value, CatalogError> {
		let p: SlugParams = parse_params(params)?;
		Ok(serde_json::json!({
			"items": CHECKLIST_ITEMS,
			"steps": self.shortlist.checklist(&p.slug),
			"progress": self.shortlist.progress(&p.slug),
		}))
	}
}

// ---------------------------------------------------------------------------
// Catalog handlers
// ---------------------------------------------------------------------------

fn handle_get(catalog: &Catalog, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
	let p: SlugParams = parse_params(params)?;
	let record = catalog
		.find_by_slug(&p.slug)
		.ok_or_else(|| CatalogError::NotFound(p.slug.clone()))?;
	Ok(serde_json::json!({ "college": record }))
}

fn handle_search(
	catalog: &Catalog,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: SearchParams = parse_params(params)?;
	let results = catalog.query(&p.criteria, p.sort_by);
	let insights = aggregate(&results);
	let count = results.len();
	Ok(serde_json::json!({
		"colleges": results,
		"count": count,
		"insights": insights,
	}))
}

fn handle_hints(
	catalog: &Catalog,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: QueryParams = parse_params(params)?;
	Ok(serde_json::json!({ "hints": search_hints(catalog.all(), &p.query) }))
}

fn handle_affordable_count(
	catalog: &Catalog,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: BudgetParams = parse_params(params)?;
	Ok(serde_json::json!({
		"count": affordable_count(catalog.all(), p.budget),
		"budget": clamp_budget(p.budget),
	}))
}

fn handle_monthly_estimate(params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
	let p: MonthlyEstimateParams = parse_params(params)?;
	Ok(serde_json::json!({ "monthly": monthly_estimate(p.fees, p.months) }))
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, CatalogError> {
	let params = if params.is_null() {
		serde_json::json!({})
	} else {
		params
	};
	serde_json::from_value(params)
		.map_err(|e| CatalogError::Serialization(format!("Invalid params: {}", e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadParams {
	records: Option<Vec<serde_json::Value>>,
	path: Option<String>,
	storage_path: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
	#[serde(flatten)]
	criteria: FilterCriteria,
	#[serde(default)]
	sort_by: SortKey,
}

#[derive(Deserialize)]
struct SlugParams {
	slug: String,
}

#[derive(Deserialize)]
struct TermParams {
	term: String,
}

#[derive(Deserialize)]
struct QueryParams {
	query: String,
}

#[derive(Deserialize)]
struct BudgetParams {
	budget: f64,
}

#[derive(Deserialize)]
struct MonthlyEstimateParams {
	fees: u64,
	months: u32,
}

#[derive(Deserialize)]
struct ChecklistToggleParams {
	slug: String,
	index: usize,
}
