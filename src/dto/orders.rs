use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::PaymentMethod,
    models::{Customer, Order, OrderItem},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    /// Missing and blank are both rejected by the checkout itself.
    #[serde(default, alias = "deliveryAddress")]
    pub delivery_address: String,
    /// Missing or unrecognized labels mean cash on delivery.
    #[serde(default, alias = "paymentMethod")]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// Absent keeps the current status.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderWithItems>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// `None` when the requester is not known to this service.
    pub customer: Option<Customer>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderList {
    pub items: Vec<AdminOrder>,
}
