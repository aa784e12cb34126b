use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{OrderStatus, PaymentMethod},
    dto::{
        cart::AddToCartRequest,
        catalog::{
            CreateFoodRequest, CreateRestaurantRequest, FoodAvailabilityRequest, FoodList, RestaurantList,
            RestaurantStatusRequest, UpdateFoodRequest,
        },
        orders::{
            AdminOrder, AdminOrderList, OrderList, OrderWithItems, PlaceOrderRequest,
            UpdateOrderStatusRequest,
        },
    },
    models::{Cart, CartLine, Customer, FoodItem, Order, OrderItem, Restaurant},
    response::{ApiResponse, ErrorData, Meta},
    routes::{cart, foods, health, orders, params, restaurants},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::get_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::place_order,
        orders::list_user_orders,
        orders::get_order,
        orders::list_all_orders,
        orders::update_order_status,
        restaurants::list_restaurants,
        restaurants::get_restaurant,
        restaurants::create_restaurant,
        restaurants::set_restaurant_status,
        foods::list_foods,
        foods::list_foods_short,
        foods::set_food_availability,
        foods::create_food,
        foods::update_food,
        foods::delete_food
    ),
    components(
        schemas(
            Cart,
            CartLine,
            Customer,
            FoodItem,
            Order,
            OrderItem,
            OrderStatus,
            PaymentMethod,
            Restaurant,
            AddToCartRequest,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            CreateRestaurantRequest,
            RestaurantStatusRequest,
            CreateFoodRequest,
            UpdateFoodRequest,
            FoodAvailabilityRequest,
            OrderList,
            OrderWithItems,
            AdminOrder,
            AdminOrderList,
            RestaurantList,
            FoodList,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ErrorData,
            ApiResponse<ErrorData>,
            ApiResponse<Cart>,
            ApiResponse<Order>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<AdminOrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Cart", description = "Cart of the signed-in user"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Admin", description = "Order management for administrators"),
        (name = "Catalog", description = "Restaurants and their menus"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
