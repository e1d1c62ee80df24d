//! Linear token cost model.

use di_protocol::analytics_models::UsageRecord;
use di_protocol::config_models::ModelPricing;

/// Estimated cost in USD, rounded to six decimal places.
///
/// A pure function of the two token counters and the rates, so a value
/// recomputed from stored counters matches the stored one exactly.
pub fn estimate_cost(usage: &UsageRecord, pricing: ModelPricing) -> f64 {
    let cost = usage.prompt_tokens as f64 / 1000.0 * pricing.prompt_per_1k
        + usage.completion_tokens as f64 / 1000.0 * pricing.completion_per_1k;
    (cost * 1_000_000.0).round() / 1_000_000.0
}
