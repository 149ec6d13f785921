// src/inventory/inventory_router.rs

use actix_web::{post, web, HttpResponse};
use bigdecimal::BigDecimal;
use sqlx::query_as;
use tracing::info;

use super::inventory_structs::{Purchase, PurchaseRequest, PurchaseResponse, RestockRequest};
use crate::shared::error::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::sweets::sweets_structs::Sweet;
use crate::users::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Total owed for `quantity` units at `unit_price`. The price is the one read
/// under the row lock; it is never re-read between check and commit.
fn total_price(unit_price: &BigDecimal, quantity: i32) -> BigDecimal {
    unit_price * &BigDecimal::from(quantity)
}

/// Stock precondition for a purchase. Evaluated with the row locked, so a
/// pass here cannot be invalidated before the decrement commits.
fn ensure_in_stock(available: i32, requested: i32) -> Result<(), ApiError> {
    if available < requested {
        Err(ApiError::InsufficientStock(
            "insufficient stock available".to_string(),
        ))
    } else {
        Ok(())
    }
}

fn ensure_positive_quantity(quantity: i32) -> Result<(), ApiError> {
    if quantity < 1 {
        Err(ApiError::InvalidInput(
            "quantity must be a positive integer".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Stock level after a restock. The counter is an i32 column; an increment
/// that would wrap is refused.
fn apply_restock(current: i32, increment: i32) -> Result<i32, ApiError> {
    current.checked_add(increment).ok_or_else(|| {
        ApiError::InvalidInput("restock would overflow the stock counter".to_string())
    })
}

/// Route to purchase a quantity of one sweet.
///
/// The whole read-check-decrement sequence runs on a single transaction with
/// the sweet row locked (`FOR UPDATE`):
/// 1. Fetch the sweet and take the lock; unknown id is a 404.
/// 2. Check the stock precondition; an early return drops the transaction,
///    which rolls back.
/// 3. Compute the total from the locked read of the price.
/// 4. Decrement the stock and insert the purchase row, then commit. Both
///    effects land together or not at all.
///
/// Two concurrent purchases of the same sweet therefore can never jointly
/// oversell: the second locker waits and then sees the decremented quantity.
#[post("/sweets/{id}/purchase")]
pub async fn purchase_sweet(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<PurchaseRequest>,
) -> Result<HttpResponse, ApiError> {
    let sweet_id = path.into_inner();
    ensure_positive_quantity(payload.quantity)?;

    let mut transaction = data.db_pool.begin().await?;

    // 1. Fetch the sweet and lock its row for the rest of the transaction
    let sweet = query_as::<_, Sweet>(
        "SELECT id, name, category, price, quantity, description, image_url, created_at \
         FROM sweets WHERE id = $1 FOR UPDATE",
    )
    .bind(sweet_id)
    .fetch_optional(&mut *transaction)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("sweet with id {sweet_id} not found")))?;

    // 2. Verify there is enough stock
    ensure_in_stock(sweet.quantity, payload.quantity)?;

    // 3. Total from the price read in step 1
    let total = total_price(&sweet.price, payload.quantity);

    // 4. Decrement the stock and record the purchase on the same transaction
    let new_quantity = sweet.quantity - payload.quantity;
    let updated_sweet = query_as::<_, Sweet>(
        "UPDATE sweets SET quantity = $1 WHERE id = $2 \
         RETURNING id, name, category, price, quantity, description, image_url, created_at",
    )
    .bind(new_quantity)
    .bind(sweet_id)
    .fetch_one(&mut *transaction)
    .await?;

    let purchase = query_as::<_, Purchase>(
        "INSERT INTO purchases (user_id, sweet_id, quantity, total_price) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, user_id, sweet_id, quantity, total_price, created_at",
    )
    .bind(user.user_id)
    .bind(sweet_id)
    .bind(payload.quantity)
    .bind(&total)
    .fetch_one(&mut *transaction)
    .await?;

    transaction.commit().await?;

    info!(
        user_id = user.user_id,
        sweet_id,
        quantity = payload.quantity,
        "purchase completed"
    );

    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "purchase completed successfully",
        PurchaseResponse {
            purchase,
            sweet: updated_sweet,
        },
    )))
}

/// Route to increase the stock of one sweet. Admin only; there is no upper
/// bound on the resulting quantity beyond the column type.
#[post("/sweets/{id}/restock")]
pub async fn restock_sweet(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<RestockRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let sweet_id = path.into_inner();
    ensure_positive_quantity(payload.quantity)?;

    let mut transaction = data.db_pool.begin().await?;

    // Lock the row so the increment applies to the current quantity, not a
    // stale read racing a concurrent purchase
    let sweet = query_as::<_, Sweet>(
        "SELECT id, name, category, price, quantity, description, image_url, created_at \
         FROM sweets WHERE id = $1 FOR UPDATE",
    )
    .bind(sweet_id)
    .fetch_optional(&mut *transaction)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("sweet with id {sweet_id} not found")))?;

    let new_quantity = apply_restock(sweet.quantity, payload.quantity)?;
    let updated_sweet = query_as::<_, Sweet>(
        "UPDATE sweets SET quantity = $1 WHERE id = $2 \
         RETURNING id, name, category, price, quantity, description, image_url, created_at",
    )
    .bind(new_quantity)
    .bind(sweet_id)
    .fetch_one(&mut *transaction)
    .await?;

    transaction.commit().await?;

    info!(sweet_id, quantity = payload.quantity, "restock applied");

    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "sweet restocked successfully",
        updated_sweet,
    )))
}
