//! Per-operation parameter normalization.
//!
//! Each supported command maps to a fixed set of application parameters.
//! Merged with the per-request protocol parameters, these form the canonical
//! set the signature is computed over.

use nutrigate_model::ProxyCommand;
use nutrigate_oauth::ProtocolParams;

/// Fixed page size requested from `foods.search`.
pub const SEARCH_MAX_RESULTS: &str = "10";

/// The method-specific application parameters for a command.
#[must_use]
pub fn application_params(command: &ProxyCommand) -> Vec<(&'static str, String)> {
    match command {
        ProxyCommand::FoodsSearch { search_expression } => vec![
            ("method", command.operation().as_str().to_owned()),
            ("search_expression", search_expression.clone()),
            ("max_results", SEARCH_MAX_RESULTS.to_owned()),
        ],
        ProxyCommand::FoodGet { food_id } => vec![
            ("method", command.operation().as_str().to_owned()),
            ("food_id", food_id.clone()),
        ],
    }
}

/// The full unsigned parameter set for one request attempt: protocol
/// parameters plus application parameters, `oauth_signature` excluded.
#[must_use]
pub fn request_params(
    protocol: &ProtocolParams,
    command: &ProxyCommand,
) -> Vec<(&'static str, String)> {
    let mut params = protocol.pairs();
    params.extend(application_params(command));
    params
}
