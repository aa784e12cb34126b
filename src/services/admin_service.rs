use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, Condition, EntityTrait, PaginatorTrait, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::OrderStatus,
    dto::orders::{AdminOrder, AdminOrderList, UpdateOrderStatusRequest},
    entity::{
        orders::{ActiveModel as OrderActive, Entity as Orders},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service::{filtered_orders, items_by_order, order_from_entity},
    state::AppState,
};

/// Every order, newest first, with the requester resolved where known.
pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<AdminOrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let finder = filtered_orders(Condition::all(), &query)?;
    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .find_also_related(Users)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|(order, _)| order.id).collect();
    let mut items = items_by_order(&state.orm, ids).await?;

    let orders = rows
        .into_iter()
        .map(|(order, customer)| {
            let items = items.remove(&order.id).unwrap_or_default();
            Ok(AdminOrder {
                order: order_from_entity(order)?,
                items,
                customer: customer.map(Into::into),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        AdminOrderList { items: orders },
        Some(meta),
    ))
}

/// Move an order to a new status. Only the status (and `updated_at`) ever
/// changes after an order is placed.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let requested: Option<OrderStatus> = payload
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|_| AppError::bad_request("Invalid order status"))?;

    let txn = state.orm.begin().await?;

    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    let current = order_from_entity(existing.clone())?.status;
    let next = requested.unwrap_or(current);

    if !state.config.status_policy.allows(current, next) {
        return Err(AppError::bad_request(format!(
            "Cannot change order status from {current} to {next}"
        )));
    }
    if current == next {
        return Ok(ApiResponse::success(
            "Order unchanged",
            order_from_entity(existing)?,
            Some(Meta::empty()),
        ));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(next.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, from = %current, to = %next, "order status changed");
    audit::record(
        &state.orm,
        user.user_id,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": current.as_str(), "to": next.as_str() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}
