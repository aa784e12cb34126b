use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateFoodRequest, FoodAvailabilityRequest, FoodList, UpdateFoodRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::FoodItem,
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_food))
        .route("/restaurant/{restaurant_id}", get(list_foods))
        // GET takes a restaurant id here, PUT and DELETE a food id.
        .route("/{id}", get(list_foods_short).put(update_food).delete(delete_food))
        .route("/{id}/availability", put(set_food_availability))
}

#[utoipa::path(
    get,
    path = "/api/foods/restaurant/{restaurant_id}",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Menu of a restaurant", body = ApiResponse<FoodList>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Catalog"
)]
pub async fn list_foods(
    State(state): State<AppState>,
    ApiPath(restaurant_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<FoodList>>> {
    let resp = catalog_service::list_foods(&state, restaurant_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/foods/{id}",
    params(
        ("id" = Uuid, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Menu of a restaurant, short form of /api/foods/restaurant/{id}", body = ApiResponse<FoodList>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Catalog"
)]
pub async fn list_foods_short(
    State(state): State<AppState>,
    ApiPath(restaurant_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<FoodList>>> {
    let resp = catalog_service::list_foods(&state, restaurant_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/foods",
    request_body = CreateFoodRequest,
    responses(
        (status = 201, description = "Create food item", body = ApiResponse<FoodItem>),
        (status = 400, description = "Invalid price or name"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Restaurant not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_food(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CreateFoodRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<FoodItem>>)> {
    let resp = catalog_service::create_food(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/foods/{id}",
    params(
        ("id" = Uuid, Path, description = "Food item ID")
    ),
    request_body = UpdateFoodRequest,
    responses(
        (status = 200, description = "Updated food item", body = ApiResponse<FoodItem>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Food item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn update_food(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateFoodRequest>,
) -> AppResult<Json<ApiResponse<FoodItem>>> {
    let resp = catalog_service::update_food(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/foods/{id}/availability",
    params(
        ("id" = Uuid, Path, description = "Food item ID")
    ),
    request_body = FoodAvailabilityRequest,
    responses(
        (status = 200, description = "Mark a food item available or sold out", body = ApiResponse<FoodItem>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Food item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn set_food_availability(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<FoodAvailabilityRequest>,
) -> AppResult<Json<ApiResponse<FoodItem>>> {
    let resp = catalog_service::set_food_availability(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/foods/{id}",
    params(
        ("id" = Uuid, Path, description = "Food item ID")
    ),
    responses(
        (status = 200, description = "Deleted food item", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Food item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_food(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_food(&state, &user, id).await?;
    Ok(Json(resp))
}
