use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::{
        CreateFoodRequest, CreateRestaurantRequest, FoodAvailabilityRequest, FoodList, RestaurantList,
        RestaurantStatusRequest, UpdateFoodRequest,
    },
    entity::{
        food_items::{ActiveModel as FoodActive, Column as FoodCol, Entity as FoodItems},
        restaurants::{
            ActiveModel as RestaurantActive, Column as RestaurantCol, Entity as Restaurants,
            Model as RestaurantModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{FoodItem, Restaurant},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_restaurants(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<RestaurantList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Restaurants::find()
        .filter(RestaurantCol::IsActive.eq(true))
        .order_by_asc(RestaurantCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Restaurant::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Restaurants",
        RestaurantList { items },
        Some(meta),
    ))
}

pub async fn get_restaurant(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Restaurant>> {
    let restaurant = find_restaurant(state, id).await?;
    Ok(ApiResponse::success("Restaurant", restaurant.into(), None))
}

pub async fn create_restaurant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    ensure_admin(user)?;
    let name = required("name", &payload.name)?;
    let now = Utc::now();

    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        image: Set(payload.image),
        description: Set(payload.description),
        address: Set(payload.address),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        user.user_id,
        "restaurant_create",
        "restaurants",
        serde_json::json!({ "restaurant_id": restaurant.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Restaurant created",
        restaurant.into(),
        Some(Meta::empty()),
    ))
}

pub async fn set_restaurant_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RestaurantStatusRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    ensure_admin(user)?;
    let existing = find_restaurant(state, id).await?;

    let mut active: RestaurantActive = existing.into();
    active.is_active = Set(payload.is_active);
    active.updated_at = Set(Utc::now().into());
    let restaurant = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        user.user_id,
        "restaurant_status",
        "restaurants",
        serde_json::json!({ "restaurant_id": id, "is_active": payload.is_active }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        restaurant.into(),
        Some(Meta::empty()),
    ))
}

/// Full menu of a restaurant, unavailable items included.
pub async fn list_foods(state: &AppState, restaurant_id: Uuid) -> AppResult<ApiResponse<FoodList>> {
    find_restaurant(state, restaurant_id).await?;

    let items = FoodItems::find()
        .filter(FoodCol::RestaurantId.eq(restaurant_id))
        .order_by_asc(FoodCol::Category)
        .order_by_asc(FoodCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(FoodItem::from)
        .collect();

    Ok(ApiResponse::success("Menu", FoodList { items }, None))
}

pub async fn create_food(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFoodRequest,
) -> AppResult<ApiResponse<FoodItem>> {
    ensure_admin(user)?;
    find_restaurant(state, payload.restaurant_id).await?;
    let name = required("name", &payload.name)?;
    let price = positive_price(payload.price)?;
    let now = Utc::now();

    let food = FoodActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(payload.restaurant_id),
        name: Set(name),
        image: Set(payload.image),
        price: Set(price),
        category: Set(payload.category),
        is_available: Set(payload.is_available),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        user.user_id,
        "food_create",
        "food_items",
        serde_json::json!({ "food_id": food.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Food item created",
        food.into(),
        Some(Meta::empty()),
    ))
}

/// Partial update. Blank strings leave the field as it was.
pub async fn update_food(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateFoodRequest,
) -> AppResult<ApiResponse<FoodItem>> {
    ensure_admin(user)?;
    let existing = FoodItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Food item not found"))?;

    let mut active: FoodActive = existing.into();
    if let Some(name) = non_blank(payload.name) {
        active.name = Set(name);
    }
    if let Some(image) = non_blank(payload.image) {
        active.image = Set(image);
    }
    if let Some(category) = non_blank(payload.category) {
        active.category = Set(category);
    }
    if let Some(price) = payload.price {
        active.price = Set(positive_price(price)?);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    active.updated_at = Set(Utc::now().into());
    let food = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        user.user_id,
        "food_update",
        "food_items",
        serde_json::json!({ "food_id": food.id, "price": food.price, "is_available": food.is_available }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        food.into(),
        Some(Meta::empty()),
    ))
}

pub async fn set_food_availability(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: FoodAvailabilityRequest,
) -> AppResult<ApiResponse<FoodItem>> {
    let change = UpdateFoodRequest {
        is_available: Some(payload.is_available),
        ..Default::default()
    };
    update_food(state, user, id, change).await
}

pub async fn delete_food(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = FoodItems::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Food item not found"));
    }

    audit::record(
        &state.orm,
        user.user_id,
        "food_delete",
        "food_items",
        serde_json::json!({ "food_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Food item removed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn find_restaurant(state: &AppState, id: Uuid) -> AppResult<RestaurantModel> {
    Restaurants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn positive_price(price: i64) -> AppResult<i64> {
    if price <= 0 {
        return Err(AppError::bad_request("price must be greater than 0"));
    }
    Ok(price)
}
