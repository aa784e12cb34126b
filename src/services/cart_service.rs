use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{Cart, CartLine, LineChange},
    dto::cart::AddToCartRequest,
    entity::{
        cart_items::{ActiveModel as CartItemActive, Column as CartItemCol, Entity as CartItems},
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        food_items::{Entity as FoodItems, Model as FoodItemModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// A cart row together with its lines and the catalog rows they point at.
pub(crate) struct LoadedCart {
    pub(crate) record: CartModel,
    pub(crate) lines: Cart,
    pub(crate) foods: HashMap<Uuid, FoodItemModel>,
}

impl LoadedCart {
    /// Total at current catalog prices.
    pub(crate) fn total(&self) -> AppResult<i64> {
        let total = self
            .lines
            .total(|food_id| self.foods.get(&food_id).map(|food| food.price))?;
        Ok(total)
    }

    /// Lines paired with their food, in display order.
    pub(crate) fn priced_lines(&self) -> Vec<(CartLine, &FoodItemModel)> {
        self.lines
            .lines()
            .into_iter()
            .filter_map(|line| self.foods.get(&line.food_id).map(|food| (line, food)))
            .collect()
    }

    fn to_view(&self) -> models::Cart {
        let items = self
            .priced_lines()
            .into_iter()
            .map(|(line, food)| models::CartLine {
                food: food.clone().into(),
                quantity: line.quantity,
                line_total: food.price.saturating_mul(i64::from(line.quantity)),
            })
            .collect();

        models::Cart {
            id: self.record.id,
            user_id: self.record.user_id,
            items,
            total_amount: self.record.total_amount,
            updated_at: self.record.updated_at.with_timezone(&Utc),
        }
    }
}

/// Fetch and row-lock the user's cart, if there is one.
pub(crate) async fn lock_cart<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<Option<CartModel>> {
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .lock(LockType::Update)
        .one(db)
        .await?;
    Ok(cart)
}

/// Like [`lock_cart`], creating an empty cart first when the user has none.
pub(crate) async fn lock_or_create_cart<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<CartModel> {
    let now = Utc::now();
    let empty = CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        total_amount: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    Carts::insert(empty)
        .on_conflict(OnConflict::column(CartCol::UserId).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;

    lock_cart(db, user_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("cart for {user_id} vanished")))
}

/// Load the lines of a cart. Lines whose food no longer exists are deleted.
pub(crate) async fn load_cart<C: ConnectionTrait>(
    db: &C,
    record: CartModel,
) -> AppResult<LoadedCart> {
    let rows = CartItems::find()
        .filter(CartItemCol::CartId.eq(record.id))
        .order_by_asc(CartItemCol::Position)
        .find_also_related(FoodItems)
        .all(db)
        .await?;

    let mut lines = Vec::with_capacity(rows.len());
    let mut foods = HashMap::with_capacity(rows.len());
    let mut stale = Vec::new();
    for (item, food) in rows {
        match food {
            Some(food) => {
                lines.push(CartLine {
                    food_id: item.food_id,
                    quantity: item.quantity,
                    position: item.position,
                });
                foods.insert(food.id, food);
            }
            None => stale.push(item.id),
        }
    }

    if !stale.is_empty() {
        tracing::debug!(cart_id = %record.id, count = stale.len(), "dropping stale cart lines");
        CartItems::delete_many()
            .filter(CartItemCol::Id.is_in(stale))
            .exec(db)
            .await?;
    }

    Ok(LoadedCart {
        record,
        lines: Cart::from_lines(lines),
        foods,
    })
}

/// Recompute the total and write it back. With `touch` the row is written
/// even if the total did not move.
async fn save_total<C: ConnectionTrait>(
    db: &C,
    cart: &mut LoadedCart,
    touch: bool,
) -> AppResult<()> {
    let total = cart.total()?;
    if !touch && total == cart.record.total_amount {
        return Ok(());
    }

    let mut active: CartActive = cart.record.clone().into();
    active.total_amount = Set(total);
    active.updated_at = Set(Utc::now().into());
    cart.record = active.update(db).await?;
    Ok(())
}

/// Delete every line and reset the total to zero.
pub(crate) async fn empty_cart<C: ConnectionTrait>(db: &C, record: CartModel) -> AppResult<()> {
    CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(record.id))
        .exec(db)
        .await?;

    let mut active: CartActive = record.into();
    active.total_amount = Set(0);
    active.updated_at = Set(Utc::now().into());
    active.update(db).await?;
    Ok(())
}

async fn persist_change<C: ConnectionTrait>(
    db: &C,
    cart_id: Uuid,
    change: LineChange,
) -> AppResult<()> {
    match change {
        LineChange::Inserted(line) => {
            CartItemActive {
                id: Set(Uuid::new_v4()),
                cart_id: Set(cart_id),
                food_id: Set(line.food_id),
                quantity: Set(line.quantity),
                position: Set(line.position),
                created_at: Set(Utc::now().into()),
            }
            .insert(db)
            .await?;
        }
        LineChange::Updated(line) => {
            CartItems::update_many()
                .col_expr(CartItemCol::Quantity, Expr::value(line.quantity))
                .filter(CartItemCol::CartId.eq(cart_id))
                .filter(CartItemCol::FoodId.eq(line.food_id))
                .exec(db)
                .await?;
        }
        LineChange::Removed(line) => delete_line(db, cart_id, line.food_id).await?,
    }
    Ok(())
}

async fn delete_line<C: ConnectionTrait>(db: &C, cart_id: Uuid, food_id: Uuid) -> AppResult<()> {
    CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(cart_id))
        .filter(CartItemCol::FoodId.eq(food_id))
        .exec(db)
        .await?;
    Ok(())
}

/// The caller's cart, created empty on first access.
pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<models::Cart>> {
    let txn = state.orm.begin().await?;

    let record = lock_or_create_cart(&txn, user.user_id).await?;
    let mut cart = load_cart(&txn, record).await?;
    save_total(&txn, &mut cart, false).await?;

    txn.commit().await?;

    Ok(ApiResponse::success("OK", cart.to_view(), Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<models::Cart>> {
    let txn = state.orm.begin().await?;

    let food = FoodItems::find_by_id(payload.food_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Food item not found"))?;
    if payload.quantity > 0 && !food.is_available {
        return Err(AppError::bad_request(format!(
            "{} is currently unavailable",
            food.name
        )));
    }

    let record = lock_or_create_cart(&txn, user.user_id).await?;
    let mut cart = load_cart(&txn, record).await?;
    let change = cart.lines.add(food.id, payload.quantity)?;
    cart.foods.insert(food.id, food);

    persist_change(&txn, cart.record.id, change).await?;
    save_total(&txn, &mut cart, true).await?;

    txn.commit().await?;

    tracing::debug!(
        user_id = %user.user_id,
        food_id = %payload.food_id,
        quantity = payload.quantity,
        total = cart.record.total_amount,
        "cart updated"
    );
    audit::record(
        &state.orm,
        user.user_id,
        "cart_add",
        "carts",
        serde_json::json!({ "food_id": payload.food_id, "quantity": payload.quantity }),
    )
    .await;

    Ok(ApiResponse::success(
        "Cart updated",
        cart.to_view(),
        Some(Meta::empty()),
    ))
}

/// Remove the whole line for a food, whatever its quantity.
pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    food_id: Uuid,
) -> AppResult<ApiResponse<models::Cart>> {
    let txn = state.orm.begin().await?;

    let record = lock_cart(&txn, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart not found"))?;
    let mut cart = load_cart(&txn, record).await?;
    cart.lines.remove(food_id)?;

    delete_line(&txn, cart.record.id, food_id).await?;
    save_total(&txn, &mut cart, true).await?;

    txn.commit().await?;

    tracing::debug!(user_id = %user.user_id, %food_id, "cart line removed");
    audit::record(
        &state.orm,
        user.user_id,
        "cart_remove",
        "carts",
        serde_json::json!({ "food_id": food_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from cart",
        cart.to_view(),
        Some(Meta::empty()),
    ))
}

/// Empty the cart. Succeeds whether or not the user has one.
pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let cleared = match lock_cart(&txn, user.user_id).await? {
        Some(record) => {
            empty_cart(&txn, record).await?;
            true
        }
        None => false,
    };

    txn.commit().await?;

    if cleared {
        tracing::debug!(user_id = %user.user_id, "cart cleared");
        audit::record(
            &state.orm,
            user.user_id,
            "cart_clear",
            "carts",
            serde_json::json!({}),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
