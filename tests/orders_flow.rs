mod common;

use std::time::Duration;

use quickbite_api::{
    domain::{OrderStatus, PaymentMethod, StatusPolicy},
    dto::{
        cart::AddToCartRequest,
        catalog::UpdateFoodRequest,
        orders::{PlaceOrderRequest, UpdateOrderStatusRequest},
    },
    error::AppError,
    middleware::auth::{AuthUser, Role},
    routes::params::OrderListQuery,
    services::{admin_service, cart_service, catalog_service, order_service},
    state::AppState,
};
use uuid::Uuid;

fn checkout(address: &str) -> PlaceOrderRequest {
    PlaceOrderRequest {
        delivery_address: address.into(),
        payment_method: PaymentMethod::default(),
    }
}

fn status(label: &str) -> UpdateOrderStatusRequest {
    UpdateOrderStatusRequest {
        status: Some(label.into()),
    }
}

async fn fill_cart(state: &AppState, user: &AuthUser, food_id: Uuid, quantity: i32) -> anyhow::Result<()> {
    cart_service::add_to_cart(state, user, AddToCartRequest { food_id, quantity }).await?;
    Ok(())
}

#[tokio::test]
async fn checkout_freezes_lines_and_empties_cart() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;
    let admin = AuthUser::admin(Uuid::new_v4());
    let restaurant = common::create_restaurant(&state, "Pizza Palace").await?;
    let pizza = common::create_food(&state, restaurant.id, "Margherita", 100).await?;
    let user = AuthUser::user(Uuid::new_v4());

    fill_cart(&state, &user, pizza.id, 2).await?;
    let resp = order_service::place_order(&state, &user, checkout("  42 Main Street  ")).await?;
    assert_eq!(resp.message, "Order placed");

    let placed = resp.data.expect("order");
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.order.total_amount, 200);
    assert_eq!(placed.order.delivery_address, "42 Main Street");
    assert_eq!(placed.order.payment_method, PaymentMethod::CashOnDelivery);
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].name, "Margherita");
    assert_eq!(placed.items[0].price, 100);
    assert_eq!(placed.items[0].quantity, 2);

    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    assert_eq!(cart.total_amount, 0);

    catalog_service::update_food(
        &state,
        &admin,
        pizza.id,
        UpdateFoodRequest {
            name: Some("Margherita Deluxe".into()),
            price: Some(150),
            ..Default::default()
        },
    )
    .await?;

    let stored = order_service::get_order(&state, &user, placed.order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(stored.items, placed.items);
    assert_eq!(stored.order.total_amount, 200);
    Ok(())
}

#[tokio::test]
async fn snapshots_survive_food_deletion() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;
    let admin = AuthUser::admin(Uuid::new_v4());
    let restaurant = common::create_restaurant(&state, "Burger Barn").await?;
    let burger = common::create_food(&state, restaurant.id, "Classic Smash", 900).await?;
    let user = AuthUser::user(Uuid::new_v4());

    fill_cart(&state, &user, burger.id, 1).await?;
    let placed = order_service::place_order(&state, &user, checkout("3 Grill Lane"))
        .await?
        .data
        .expect("order");
    catalog_service::delete_food(&state, &admin, burger.id).await?;

    let stored = order_service::get_order(&state, &user, placed.order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(stored.items[0].food_id, burger.id);
    assert_eq!(stored.items[0].name, "Classic Smash");
    Ok(())
}

#[tokio::test]
async fn empty_or_missing_cart_cannot_be_ordered() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;
    let user = AuthUser::user(Uuid::new_v4());

    let no_cart = order_service::place_order(&state, &user, checkout("1 Nowhere")).await;
    assert!(matches!(no_cart, Err(AppError::BadRequest(msg)) if msg == "Your cart is empty"));

    cart_service::get_cart(&state, &user).await?;
    let empty = order_service::place_order(&state, &user, checkout("1 Nowhere")).await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    let orders = order_service::list_user_orders(&state, &user, OrderListQuery::default())
        .await?
        .data
        .expect("orders");
    assert!(orders.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_checkout_leaves_cart_untouched() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;
    let admin = AuthUser::admin(Uuid::new_v4());
    let restaurant = common::create_restaurant(&state, "Pizza Palace").await?;
    let pizza = common::create_food(&state, restaurant.id, "Margherita", 300).await?;
    let calzone = common::create_food(&state, restaurant.id, "Calzone", 700).await?;
    let user = AuthUser::user(Uuid::new_v4());

    fill_cart(&state, &user, pizza.id, 1).await?;
    fill_cart(&state, &user, calzone.id, 2).await?;

    let blank = order_service::place_order(&state, &user, checkout("   ")).await;
    assert!(matches!(blank, Err(AppError::BadRequest(msg)) if msg == "Delivery address is required"));

    catalog_service::update_food(
        &state,
        &admin,
        calzone.id,
        UpdateFoodRequest {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await?;
    let unavailable = order_service::place_order(&state, &user, checkout("9 Side Street")).await;
    assert!(matches!(unavailable, Err(AppError::BadRequest(_))));

    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total_amount, 300 + 2 * 700);

    let orders = order_service::list_user_orders(&state, &user, OrderListQuery::default())
        .await?
        .data
        .expect("orders");
    assert!(orders.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn order_history_is_newest_first_and_private() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;
    let restaurant = common::create_restaurant(&state, "Burger Barn").await?;
    let fries = common::create_food(&state, restaurant.id, "Loaded Fries", 500).await?;
    let user = AuthUser::user(Uuid::new_v4());
    let other = AuthUser::user(Uuid::new_v4());

    let mut placed = Vec::new();
    for quantity in 1..=3 {
        fill_cart(&state, &user, fries.id, quantity).await?;
        let order = order_service::place_order(&state, &user, checkout("5 Home Street"))
            .await?
            .data
            .expect("order");
        placed.push(order.order.id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let resp = order_service::list_user_orders(&state, &user, OrderListQuery::default()).await?;
    let meta = resp.meta.expect("meta");
    assert_eq!(meta.total, Some(3));

    let listed: Vec<Uuid> = resp
        .data
        .expect("orders")
        .items
        .iter()
        .map(|entry| entry.order.id)
        .collect();
    placed.reverse();
    assert_eq!(listed, placed);

    let theirs = order_service::list_user_orders(&state, &other, OrderListQuery::default())
        .await?
        .data
        .expect("orders");
    assert!(theirs.items.is_empty());

    let foreign = order_service::get_order(&state, &other, placed[0]).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn strict_policy_refuses_moves_out_of_delivered() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;
    let admin = AuthUser::admin(Uuid::new_v4());
    let restaurant = common::create_restaurant(&state, "Pizza Palace").await?;
    let pizza = common::create_food(&state, restaurant.id, "Pepperoni", 1100).await?;
    let user = AuthUser::user(Uuid::new_v4());

    fill_cart(&state, &user, pizza.id, 1).await?;
    let order = order_service::place_order(&state, &user, checkout("7 Elm Street"))
        .await?
        .data
        .expect("order")
        .order;

    let delivered = admin_service::update_order_status(&state, &admin, order.id, status("Delivered"))
        .await?
        .data
        .expect("order");
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.total_amount, order.total_amount);
    assert_eq!(delivered.delivery_address, order.delivery_address);

    let back = admin_service::update_order_status(&state, &admin, order.id, status("Pending")).await;
    assert!(matches!(
        back,
        Err(AppError::BadRequest(msg)) if msg == "Cannot change order status from Delivered to Pending"
    ));

    let same = admin_service::update_order_status(&state, &admin, order.id, status("Delivered")).await?;
    assert_eq!(same.message, "Order unchanged");

    let omitted = admin_service::update_order_status(
        &state,
        &admin,
        order.id,
        UpdateOrderStatusRequest { status: None },
    )
    .await?;
    assert_eq!(omitted.message, "Order unchanged");
    assert_eq!(omitted.data.expect("order").status, OrderStatus::Delivered);

    let stored = order_service::get_order(&state, &user, order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(stored.order.status, OrderStatus::Delivered);
    Ok(())
}

#[tokio::test]
async fn permissive_policy_accepts_any_known_status() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Permissive).await?;
    let admin = AuthUser::admin(Uuid::new_v4());
    let restaurant = common::create_restaurant(&state, "Pizza Palace").await?;
    let pizza = common::create_food(&state, restaurant.id, "Pepperoni", 1100).await?;
    let user = AuthUser::user(Uuid::new_v4());

    fill_cart(&state, &user, pizza.id, 1).await?;
    let order_id = order_service::place_order(&state, &user, checkout("7 Elm Street"))
        .await?
        .data
        .expect("order")
        .order
        .id;

    admin_service::update_order_status(&state, &admin, order_id, status("Delivered")).await?;
    let reopened = admin_service::update_order_status(&state, &admin, order_id, status("Pending"))
        .await?
        .data
        .expect("order");
    assert_eq!(reopened.status, OrderStatus::Pending);

    let unknown = admin_service::update_order_status(&state, &admin, order_id, status("Shipped")).await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn status_updates_need_admin_and_an_existing_order() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;
    let admin = AuthUser::admin(Uuid::new_v4());
    let user = AuthUser::user(Uuid::new_v4());

    let missing = admin_service::update_order_status(&state, &admin, Uuid::new_v4(), status("Preparing")).await;
    assert!(matches!(missing, Err(AppError::NotFound(msg)) if msg == "Order not found"));

    let forbidden = admin_service::update_order_status(&state, &user, Uuid::new_v4(), status("Preparing")).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let listing = admin_service::list_all_orders(&state, &user, OrderListQuery::default()).await;
    assert!(matches!(listing, Err(AppError::Forbidden)));
    Ok(())
}

#[tokio::test]
async fn admin_listing_resolves_the_customer() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;
    let admin = AuthUser::admin(Uuid::new_v4());
    let restaurant = common::create_restaurant(&state, "Burger Barn").await?;
    let burger = common::create_food(&state, restaurant.id, "Double Bacon", 1300).await?;

    let known_id = common::create_user(&state, "Ada", "ada@example.com", Role::User).await?;
    let known = AuthUser::user(known_id);
    let anonymous = AuthUser::user(Uuid::new_v4());

    fill_cart(&state, &known, burger.id, 1).await?;
    let known_order = order_service::place_order(&state, &known, checkout("1 Known Road"))
        .await?
        .data
        .expect("order")
        .order
        .id;
    tokio::time::sleep(Duration::from_millis(5)).await;
    fill_cart(&state, &anonymous, burger.id, 2).await?;
    order_service::place_order(&state, &anonymous, checkout("2 Unknown Road")).await?;

    let all = admin_service::list_all_orders(&state, &admin, OrderListQuery::default())
        .await?
        .data
        .expect("orders");
    assert_eq!(all.items.len(), 2);

    let entry = all
        .items
        .iter()
        .find(|entry| entry.order.id == known_order)
        .expect("known order listed");
    let customer = entry.customer.as_ref().expect("customer resolved");
    assert_eq!(customer.email, "ada@example.com");
    assert_eq!(entry.items.len(), 1);

    assert!(all.items[0].customer.is_none());

    let delivered_only = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            status: Some("Delivered".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("orders");
    assert!(delivered_only.items.is_empty());
    Ok(())
}
