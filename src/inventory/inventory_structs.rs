// src/inventory/inventory_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::sweets::sweets_structs::Sweet;

/// Structure representing a completed purchase. Immutable once written;
/// inserted only inside the transaction that also decrements the sweet's
/// stock.
#[derive(Debug, Serialize, FromRow)]
pub struct Purchase {
    pub id: i32,
    pub user_id: i32,
    pub sweet_id: i32,
    pub quantity: i32,
    pub total_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// Body of the purchase route.
#[derive(Deserialize)]
pub struct PurchaseRequest {
    pub quantity: i32,
}

/// Body of the restock route.
#[derive(Deserialize)]
pub struct RestockRequest {
    pub quantity: i32,
}

/// Purchase confirmation: the recorded purchase plus the sweet as it stands
/// after the decrement.
#[derive(Serialize)]
pub struct PurchaseResponse {
    pub purchase: Purchase,
    pub sweet: Sweet,
}
