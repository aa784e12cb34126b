use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{OrderStatus, PaymentMethod},
    dto::orders::{OrderList, OrderWithItems, PlaceOrderRequest},
    entity::{
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::cart_service,
    state::AppState,
};

/// Turn the caller's cart into an order and empty the cart, all in one
/// transaction. Any failure leaves the cart as it was.
pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let delivery_address = payload.delivery_address.trim();
    if delivery_address.is_empty() {
        return Err(AppError::bad_request("Delivery address is required"));
    }

    let txn = state.orm.begin().await?;

    let record = cart_service::lock_cart(&txn, user.user_id)
        .await?
        .ok_or_else(|| AppError::bad_request("Your cart is empty"))?;
    let cart = cart_service::load_cart(&txn, record).await?;
    if cart.lines.is_empty() {
        return Err(AppError::bad_request("Your cart is empty"));
    }

    let lines = cart.priced_lines();
    if let Some((_, food)) = lines.iter().find(|(_, food)| !food.is_available) {
        return Err(AppError::bad_request(format!(
            "{} is currently unavailable",
            food.name
        )));
    }

    let items: Vec<OrderItem> = lines
        .iter()
        .map(|(line, food)| OrderItem {
            food_id: food.id,
            name: food.name.clone(),
            price: food.price,
            quantity: line.quantity,
        })
        .collect();
    let total_amount = cart.total()?;

    let now = Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        total_amount: Set(total_amount),
        delivery_address: Set(delivery_address.to_string()),
        payment_method: Set(payload.payment_method.as_str().to_string()),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    for (position, item) in items.iter().enumerate() {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            food_id: Set(item.food_id),
            name: Set(item.name.clone()),
            price: Set(item.price),
            quantity: Set(item.quantity),
            position: Set(position as i32),
        }
        .insert(&txn)
        .await?;
    }

    cart_service::empty_cart(&txn, cart.record).await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        total = order.total_amount,
        lines = items.len(),
        "order placed"
    );
    audit::record(
        &state.orm,
        user.user_id,
        "order_place",
        "orders",
        serde_json::json!({ "order_id": order.id, "total_amount": order.total_amount }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

/// The caller's orders, newest first unless asked otherwise.
pub async fn list_user_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let finder = filtered_orders(
        Condition::all().add(OrderCol::UserId.eq(user.user_id)),
        &query,
    )?;

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = orders.iter().map(|order| order.id).collect();
    let mut items = items_by_order(&state.orm, ids).await?;

    let orders = orders
        .into_iter()
        .map(|model| {
            let items = items.remove(&model.id).unwrap_or_default();
            Ok(OrderWithItems {
                order: order_from_entity(model)?,
                items,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    let items = items_by_order(&state.orm, vec![order.id])
        .await?
        .remove(&order.id)
        .unwrap_or_default();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Orders matching `condition` plus the optional status filter, sorted by
/// creation time.
pub(crate) fn filtered_orders(
    mut condition: Condition,
    query: &OrderListQuery,
) -> AppResult<Select<Orders>> {
    if let Some(status) = query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        let status: OrderStatus = status
            .parse()
            .map_err(|_| AppError::bad_request("Invalid order status"))?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let finder = Orders::find().filter(condition);
    let finder = match query.sort_order.as_ref().unwrap_or(&SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };
    Ok(finder)
}

/// Frozen line items of the given orders, grouped by order id.
pub(crate) async fn items_by_order<C: ConnectionTrait>(
    db: &C,
    order_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, Vec<OrderItem>>> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::Position)
        .all(db)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row.into());
    }
    Ok(grouped)
}

pub(crate) fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let status: OrderStatus = model
        .status
        .parse()
        .map_err(|err| AppError::Internal(anyhow::anyhow!("order {}: {err}", model.id)))?;

    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        total_amount: model.total_amount,
        delivery_address: model.delivery_address,
        payment_method: PaymentMethod::from_label(Some(&model.payment_method)),
        status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
