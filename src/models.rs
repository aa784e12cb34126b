use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{OrderStatus, PaymentMethod},
    entity::{
        food_items::Model as FoodItemModel, order_items::Model as OrderItemModel,
        restaurants::Model as RestaurantModel, users::Model as UserModel,
    },
};

/// Requester identity shown to administrators.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<UserModel> for Customer {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub description: String,
    pub address: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RestaurantModel> for Restaurant {
    fn from(model: RestaurantModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image: model.image,
            description: model.description,
            address: model.address,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FoodItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub image: String,
    pub price: i64,
    pub category: String,
    pub is_available: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<FoodItemModel> for FoodItem {
    fn from(model: FoodItemModel) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            name: model.name,
            image: model.image,
            price: model.price,
            category: model.category,
            is_available: model.is_available,
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// A cart line rendered with the food's current catalog data.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CartLine {
    pub food: FoodItem,
    pub quantity: i32,
    pub line_total: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartLine>,
    pub total_amount: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: i64,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line of a placed order, frozen at checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct OrderItem {
    pub food_id: Uuid,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
}

impl From<OrderItemModel> for OrderItem {
    fn from(model: OrderItemModel) -> Self {
        Self {
            food_id: model.food_id,
            name: model.name,
            price: model.price,
            quantity: model.quantity,
        }
    }
}
