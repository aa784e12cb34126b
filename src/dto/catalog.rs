use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{FoodItem, Restaurant};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub image: String,
    pub description: String,
    pub address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RestaurantStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantList {
    pub items: Vec<Restaurant>,
}

fn available_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFoodRequest {
    #[serde(alias = "restaurantId")]
    pub restaurant_id: Uuid,
    pub name: String,
    pub image: String,
    pub price: i64,
    pub category: String,
    #[serde(default = "available_by_default", alias = "isAvailable")]
    pub is_available: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateFoodRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    #[serde(alias = "isAvailable")]
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FoodAvailabilityRequest {
    #[serde(alias = "isAvailable")]
    pub is_available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodList {
    pub items: Vec<FoodItem>,
}
