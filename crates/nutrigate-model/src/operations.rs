//! FatSecret application method enum.

use std::fmt;

/// The upstream application methods this proxy supports.
///
/// The upstream API multiplexes every operation through a single endpoint
/// with a `method` parameter; this enum is the closed set of values the
/// proxy will sign and forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodApiOperation {
    /// Free-text food search (`foods.search`).
    FoodsSearch,
    /// Fetch one food record by ID (`food.get`).
    FoodGet,
}

impl FoodApiOperation {
    /// Returns the upstream `method` parameter value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodsSearch => "foods.search",
            Self::FoodGet => "food.get",
        }
    }

    /// Parse a `method` value into a `FoodApiOperation`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "foods.search" => Some(Self::FoodsSearch),
            "food.get" => Some(Self::FoodGet),
            _ => None,
        }
    }
}

impl fmt::Display for FoodApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
