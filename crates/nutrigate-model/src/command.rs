//! Inbound proxy command parsing and validation.

use serde::Deserialize;

use crate::error::ProxyError;
use crate::operations::FoodApiOperation;

/// The raw inbound body shape, before validation.
///
/// Every field is optional at this stage so that validation (not serde) owns
/// the error messages the caller sees.
#[derive(Debug, Deserialize)]
struct RawCommand {
    method: Option<String>,
    search_expression: Option<String>,
    food_id: Option<String>,
}

/// A validated proxy command, ready for parameter normalization.
///
/// Constructed per inbound call from the JSON body; each variant carries
/// exactly the method-specific fields its upstream operation requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyCommand {
    /// Free-text food search.
    FoodsSearch {
        /// The search text forwarded as `search_expression`.
        search_expression: String,
    },
    /// Fetch one food record.
    FoodGet {
        /// The food ID forwarded as `food_id`.
        food_id: String,
    },
}

impl ProxyCommand {
    /// Parse and validate a JSON request body.
    ///
    /// Fails with a client input error — before any network I/O — on
    /// malformed JSON, a missing or unsupported `method`, or a missing
    /// method-specific field.
    pub fn from_json(body: &[u8]) -> Result<Self, ProxyError> {
        let raw: RawCommand = serde_json::from_slice(body)
            .map_err(|e| ProxyError::invalid_request(format!("invalid JSON body: {e}")))?;

        let method = raw
            .method
            .ok_or_else(|| ProxyError::invalid_request("missing required field: method"))?;

        let operation = FoodApiOperation::from_name(&method)
            .ok_or_else(|| ProxyError::unsupported_method(&method))?;

        match operation {
            FoodApiOperation::FoodsSearch => {
                let search_expression = raw.search_expression.ok_or_else(|| {
                    ProxyError::missing_parameter("foods.search requires search_expression")
                })?;
                Ok(Self::FoodsSearch { search_expression })
            }
            FoodApiOperation::FoodGet => {
                let food_id = raw
                    .food_id
                    .ok_or_else(|| ProxyError::missing_parameter("food.get requires food_id"))?;
                Ok(Self::FoodGet { food_id })
            }
        }
    }

    /// The upstream operation this command maps to.
    #[must_use]
    pub fn operation(&self) -> FoodApiOperation {
        match self {
            Self::FoodsSearch { .. } => FoodApiOperation::FoodsSearch,
            Self::FoodGet { .. } => FoodApiOperation::FoodGet,
        }
    }
}
