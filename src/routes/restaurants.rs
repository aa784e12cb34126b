use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateRestaurantRequest, RestaurantList, RestaurantStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Restaurant,
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath, ApiQuery},
    routes::params::Pagination,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_restaurants).post(create_restaurant))
        .route("/{id}", get(get_restaurant))
        .route("/{id}/status", put(set_restaurant_status))
}

#[utoipa::path(
    get,
    path = "/api/restaurants",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Active restaurants", body = ApiResponse<RestaurantList>)
    ),
    tag = "Catalog"
)]
pub async fn list_restaurants(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<ApiResponse<RestaurantList>>> {
    let resp = catalog_service::list_restaurants(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    params(
        ("id" = Uuid, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Restaurant", body = ApiResponse<Restaurant>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let resp = catalog_service::get_restaurant(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Create restaurant", body = ApiResponse<Restaurant>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CreateRestaurantRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Restaurant>>)> {
    let resp = catalog_service::create_restaurant(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/restaurants/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Restaurant ID")
    ),
    request_body = RestaurantStatusRequest,
    responses(
        (status = 200, description = "Open or close a restaurant", body = ApiResponse<Restaurant>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Restaurant not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn set_restaurant_status(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RestaurantStatusRequest>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let resp = catalog_service::set_restaurant_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
