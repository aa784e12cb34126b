use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    #[serde(alias = "foodId")]
    pub food_id: Uuid,
    /// Negative values decrement the line.
    pub quantity: i32,
}
