// src/sweets/sweets_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as};
use tracing::info;

use super::sweets_structs::{NewSweet, SearchQuery, Sweet};
use crate::shared::error::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::users::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// The unique index on name is the only constraint a validated payload can
/// still trip over.
fn duplicate_name_error(e: sqlx::Error) -> ApiError {
    if e.to_string().contains("duplicate key") {
        ApiError::InvalidInput("a sweet with this name already exists".to_string())
    } else {
        ApiError::Database(e)
    }
}

fn sweet_not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("sweet with id {id} not found"))
}

/// Route to list the whole catalog, newest first.
#[get("/sweets")]
pub async fn list_sweets(
    data: web::Data<AppState>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let sweets = query_as::<_, Sweet>(
        "SELECT id, name, category, price, quantity, description, image_url, created_at \
         FROM sweets ORDER BY created_at DESC",
    )
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::ok("sweets listed successfully", sweets)))
}

/// Route to search the catalog.
///
/// Name and category match as case-insensitive substrings; the price range is
/// inclusive on both ends. Absent or empty parameters apply no filter, so an
/// unconstrained search is equivalent to listing.
#[get("/sweets/search")]
pub async fn search_sweets(
    data: web::Data<AppState>,
    _user: AuthenticatedUser,
    query_params: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let filters = query_params.into_inner().normalized();

    let sweets = query_as::<_, Sweet>(
        "SELECT id, name, category, price, quantity, description, image_url, created_at \
         FROM sweets \
         WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
           AND ($2::text IS NULL OR category ILIKE '%' || $2 || '%') \
           AND ($3::numeric IS NULL OR price >= $3) \
           AND ($4::numeric IS NULL OR price <= $4) \
         ORDER BY created_at DESC",
    )
    .bind(filters.name)
    .bind(filters.category)
    .bind(filters.min_price)
    .bind(filters.max_price)
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::ok("search completed", sweets)))
}

/// Route to fetch a single sweet by id.
#[get("/sweets/{id}")]
pub async fn get_sweet_by_id(
    data: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let sweet = query_as::<_, Sweet>(
        "SELECT id, name, category, price, quantity, description, image_url, created_at \
         FROM sweets WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| sweet_not_found(id))?;

    Ok(HttpResponse::Ok().json(GenericResponse::ok("sweet found", sweet)))
}

/// Route to add a sweet to the catalog. Admin only.
#[post("/sweets")]
pub async fn create_sweet(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<NewSweet>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    payload.validate()?;

    let sweet = query_as::<_, Sweet>(
        "INSERT INTO sweets (name, category, price, quantity, description, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, name, category, price, quantity, description, image_url, created_at",
    )
    .bind(payload.name.trim())
    .bind(payload.category.trim())
    .bind(&payload.price)
    .bind(payload.quantity)
    .bind(&payload.description)
    .bind(&payload.image_url)
    .fetch_one(&data.db_pool)
    .await
    .map_err(duplicate_name_error)?;

    info!(sweet_id = sweet.id, "sweet created");

    Ok(HttpResponse::Ok().json(GenericResponse::ok("sweet created successfully", sweet)))
}

/// Route to replace a sweet's fields. Admin only.
#[put("/sweets/{id}")]
pub async fn update_sweet(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<NewSweet>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    payload.validate()?;
    let id = path.into_inner();

    let sweet = query_as::<_, Sweet>(
        "UPDATE sweets SET name = $1, category = $2, price = $3, quantity = $4, \
         description = $5, image_url = $6 WHERE id = $7 \
         RETURNING id, name, category, price, quantity, description, image_url, created_at",
    )
    .bind(payload.name.trim())
    .bind(payload.category.trim())
    .bind(&payload.price)
    .bind(payload.quantity)
    .bind(&payload.description)
    .bind(&payload.image_url)
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await
    .map_err(duplicate_name_error)?
    .ok_or_else(|| sweet_not_found(id))?;

    info!(sweet_id = id, "sweet updated");

    Ok(HttpResponse::Ok().json(GenericResponse::ok("sweet updated successfully", sweet)))
}

/// Route to remove a sweet from the catalog. Admin only.
#[delete("/sweets/{id}")]
pub async fn delete_sweet(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let id = path.into_inner();

    let result = query("DELETE FROM sweets WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| {
            // Purchases keep a permanent reference to the sweet they bought
            if e.to_string().contains("foreign key constraint") {
                ApiError::InvalidInput(
                    "cannot delete a sweet that has recorded purchases".to_string(),
                )
            } else {
                ApiError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(sweet_not_found(id));
    }

    info!(sweet_id = id, "sweet deleted");

    Ok(HttpResponse::Ok().json(GenericResponse::success("sweet deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::user_structs::{Claims, Role, User};
    use actix_web::{test, App};
    use sqlx::{Pool, Postgres};

    fn test_state() -> web::Data<AppState> {
        let db_pool = Pool::<Postgres>::connect_lazy("postgres://sweetshop@localhost/sweetshop")
            .expect("lazy pool");
        web::Data::new(AppState {
            db_pool,
            jwt_secret: "test-secret".to_string(),
        })
    }

    fn bearer(role: Role) -> (&'static str, String) {
        let user = User {
            id: 1,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: String::new(),
            role: role.as_str().to_string(),
        };
        let token = Claims::new(&user, role).encode("test-secret").expect("token");
        ("Authorization", format!("Bearer {token}"))
    }

    async fn app() -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(test_state())
                .app_data(web::QueryConfig::default().error_handler(|err, _| {
                    ApiError::InvalidInput(format!("invalid query parameters: {err}")).into()
                }))
                .service(search_sweets)
                .service(list_sweets)
                .service(create_sweet)
                .service(delete_sweet),
        )
        .await
    }

    #[actix_web::test]
    async fn listing_without_a_token_is_unauthorized() {
        let app = app().await;
        let request = test::TestRequest::get().uri("/sweets").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 401);
    }

    #[actix_web::test]
    async fn creating_as_a_regular_user_is_forbidden() {
        let app = app().await;
        let request = test::TestRequest::post()
            .uri("/sweets")
            .insert_header(bearer(Role::User))
            .set_json(serde_json::json!({
                "name": "Lemon Drops",
                "category": "Hard Candy",
                "price": 1.25,
                "quantity": 10
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 403);
    }

    #[actix_web::test]
    async fn creating_with_a_non_positive_price_is_rejected() {
        let app = app().await;
        let request = test::TestRequest::post()
            .uri("/sweets")
            .insert_header(bearer(Role::Admin))
            .set_json(serde_json::json!({
                "name": "Lemon Drops",
                "category": "Hard Candy",
                "price": 0,
                "quantity": 10
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 400);
    }

    #[actix_web::test]
    async fn search_rejects_a_malformed_price_bound() {
        let app = app().await;
        let request = test::TestRequest::get()
            .uri("/sweets/search?minPrice=abc")
            .insert_header(bearer(Role::User))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 400);
    }

    #[actix_web::test]
    async fn deleting_as_a_regular_user_is_forbidden() {
        let app = app().await;
        let request = test::TestRequest::delete()
            .uri("/sweets/3")
            .insert_header(bearer(Role::User))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 403);
    }
}
