// src/sweets/sweets_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::error::ApiError;

/// Structure representing a sweet in the catalog.
/// Derives FromRow for direct mapping from query results. `quantity` stays
/// non-negative: the purchase handler checks it under a row lock and the
/// schema backs it with a CHECK constraint.
#[derive(Debug, Serialize, FromRow)]
pub struct Sweet {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Structure receiving the data for creating or replacing a sweet.
#[derive(Deserialize)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl NewSweet {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("name is required".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(ApiError::InvalidInput("category is required".to_string()));
        }
        if self.price <= BigDecimal::from(0) {
            return Err(ApiError::InvalidInput("price must be positive".to_string()));
        }
        if self.quantity < 0 {
            return Err(ApiError::InvalidInput(
                "quantity must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filters accepted by the catalog search route. The renames mirror the
/// public query-parameter names.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<BigDecimal>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<BigDecimal>,
}

impl SearchQuery {
    /// Empty query-string values mean "no filter".
    pub fn normalized(mut self) -> SearchQuery {
        self.name = self.name.filter(|s| !s.trim().is_empty());
        self.category = self.category.filter(|s| !s.trim().is_empty());
        self
    }
}
