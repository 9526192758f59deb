// ---------------------------------------------------------------------------
// Insights Aggregator — summary statistics over a result set
// ---------------------------------------------------------------------------
//
// All aggregates short-circuit to zero values on an empty list; nothing here
// can divide by zero or produce NaN/Infinity. The affordable count runs over
// the FULL unfiltered catalog against a budget-planner slider, not over the
// filtered result set.
// ---------------------------------------------------------------------------

use crate::types::{CollegeRecord, Insights};

/// Lower bound of the budget-planner slider.
pub const BUDGET_MIN: u64 = 15_000;
/// Upper bound of the budget-planner slider.
pub const BUDGET_MAX: u64 = 90_000;
/// Slider step size.
pub const BUDGET_STEP: u64 = 500;

/// Compute summary statistics over the final ranked/filtered result list.
pub fn aggregate(results: &[CollegeRecord]) -> Insights {
	if results.is_empty() {
		return Insights {
			average_fee: 0,
			average_rating: 0.0,
			top_rating: 0.0,
		};
	}

	let count = results.len() as f64;
	let fee_sum: u64 = results.iter().map(|r| r.fees).sum();
	let rating_sum: f64 = results.iter().map(|r| r.rating).sum();
	let top_rating = results
		.iter()
		.map(|r| r.rating)
		.fold(0.0_f64, f64::max);

	Insights {
		average_fee: (fee_sum as f64 / count).round() as u64,
		average_rating: (rating_sum / count * 100.0).round() / 100.0,
		top_rating,
	}
}

/// Clamp a raw slider value into the planner range and snap it to the step.
pub fn clamp_budget(raw: f64) -> u64 {
	if !raw.is_finite() {
		return BUDGET_MIN;
	}
	let clamped = raw.clamp(BUDGET_MIN as f64, BUDGET_MAX as f64);
	let steps = ((clamped - BUDGET_MIN as f64) / BUDGET_STEP as f64).round() as u64;
	BUDGET_MIN + steps * BUDGET_STEP
}

/// Count the records in the full catalog whose fees fit under the budget.
pub fn affordable_count(catalog: &[CollegeRecord], budget: f64) -> usize {
	let budget = clamp_budget(budget);
	catalog.iter().filter(|r| r.fees <= budget).count()
}

/// Ceiling-division monthly estimate for the fee planner. Zero months yields
/// zero rather than a division error.
pub fn monthly_estimate(annual_fees: u64, months: u32) -> u64 {
	if months == 0 {
		return 0;
	}
	annual_fees.div_ceil(months as u64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Placements;

	fn record(fees: u64, rating: f64) -> CollegeRecord {
		CollegeRecord {
			id: fees,
			slug: format!("c-{fees}"),
			name: format!("C {fees}"),
			location: "Mumbai".to_string(),
			rating,
			fees,
			courses: Vec::new(),
			students: "N/A".to_string(),
			established: 0,
			overview: String::new(),
			image: String::new(),
			placements: Placements::default(),
		}
	}

	#[test]
	fn aggregate_empty_is_all_zero() {
		let insights = aggregate(&[]);
		assert_eq!(insights.average_fee, 0);
		assert_eq!(insights.average_rating, 0.0);
		assert_eq!(insights.top_rating, 0.0);
	}

	#[test]
	fn aggregate_means_and_top() {
		let results = vec![record(40000, 4.0), record(60000, 4.5)];
		let insights = aggregate(&results);
		assert_eq!(insights.average_fee, 50000);
		assert_eq!(insights.average_rating, 4.25);
		assert_eq!(insights.top_rating, 4.5);
	}

	#[test]
	fn aggregate_rounds_average_rating_to_two_places() {
		let results = vec![record(0, 4.0), record(0, 4.0), record(0, 4.5)];
		let insights = aggregate(&results);
		// 12.5 / 3 = 4.1666... -> 4.17
		assert_eq!(insights.average_rating, 4.17);
	}

	#[test]
	fn aggregate_rounds_average_fee_to_nearest_integer() {
		let results = vec![record(10000, 4.0), record(10001, 4.0)];
		// 20001 / 2 = 10000.5 -> 10001
		assert_eq!(aggregate(&results).average_fee, 10001);
	}

	#[test]
	fn clamp_budget_bounds_and_step() {
		assert_eq!(clamp_budget(1000.0), BUDGET_MIN);
		assert_eq!(clamp_budget(1_000_000.0), BUDGET_MAX);
		assert_eq!(clamp_budget(30_000.0), 30_000);
		// Snaps to the nearest 500 step.
		assert_eq!(clamp_budget(30_249.0), 30_000);
		assert_eq!(clamp_budget(30_251.0), 30_500);
		assert_eq!(clamp_budget(f64::NAN), BUDGET_MIN);
	}

	#[test]
	fn affordable_count_runs_over_full_catalog() {
		let catalog = vec![record(18000, 4.2), record(35000, 4.4), record(90000, 4.8)];
		assert_eq!(affordable_count(&catalog, 30_000.0), 1);
		assert_eq!(affordable_count(&catalog, 40_000.0), 2);
		assert_eq!(affordable_count(&catalog, 90_000.0), 3);
		// Below the slider minimum the budget clamps up to 15,000.
		assert_eq!(affordable_count(&catalog, 0.0), 0);
	}

	#[test]
	fn monthly_estimate_rounds_up() {
		assert_eq!(monthly_estimate(36000, 12), 3000);
		assert_eq!(monthly_estimate(35999, 12), 3000);
		assert_eq!(monthly_estimate(36001, 12), 3001);
		assert_eq!(monthly_estimate(36000, 0), 0);
	}
}
