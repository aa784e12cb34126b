use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

/// Upper bound for the quantity of a single line.
pub const MAX_LINE_QUANTITY: i32 = 99;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must not be 0")]
    ZeroQuantity,

    #[error("cannot decrement an item that is not in the cart")]
    DecrementMissing,

    #[error("quantity per item cannot exceed {MAX_LINE_QUANTITY}")]
    QuantityTooLarge,

    #[error("Item not found in cart")]
    NotInCart,

    #[error("cart total is out of range")]
    TotalOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub food_id: Uuid,
    pub quantity: i32,
    /// Insertion order, used when the cart is rendered as a list.
    pub position: i32,
}

/// What a single `add` did to the line for that food.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    Inserted(CartLine),
    Updated(CartLine),
    Removed(CartLine),
}

/// The line items of one user's cart, keyed by food id so a food can only
/// ever occupy one line.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: HashMap<Uuid, CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines. Duplicate food ids are merged into
    /// the earliest line.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.lines
                .entry(line.food_id)
                .and_modify(|existing| {
                    existing.quantity += line.quantity;
                    existing.position = existing.position.min(line.position);
                })
                .or_insert(line);
        }
        cart
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, food_id: Uuid) -> Option<&CartLine> {
        self.lines.get(&food_id)
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = self.lines.values().copied().collect();
        lines.sort_by_key(|line| line.position);
        lines
    }

    /// Add `delta` units of a food. A negative delta decrements; a line that
    /// drops to zero or below is removed.
    pub fn add(&mut self, food_id: Uuid, delta: i32) -> Result<LineChange, CartError> {
        if delta == 0 {
            return Err(CartError::ZeroQuantity);
        }

        match self.lines.get_mut(&food_id) {
            Some(line) => {
                let quantity = line.quantity.saturating_add(delta);
                if quantity <= 0 {
                    let removed = *line;
                    self.lines.remove(&food_id);
                    return Ok(LineChange::Removed(removed));
                }
                if quantity > MAX_LINE_QUANTITY {
                    return Err(CartError::QuantityTooLarge);
                }
                line.quantity = quantity;
                Ok(LineChange::Updated(*line))
            }
            None => {
                if delta < 0 {
                    return Err(CartError::DecrementMissing);
                }
                if delta > MAX_LINE_QUANTITY {
                    return Err(CartError::QuantityTooLarge);
                }
                let line = CartLine {
                    food_id,
                    quantity: delta,
                    position: self.next_position(),
                };
                self.lines.insert(food_id, line);
                Ok(LineChange::Inserted(line))
            }
        }
    }

    /// Drop the whole line for a food, whatever its quantity.
    pub fn remove(&mut self, food_id: Uuid) -> Result<CartLine, CartError> {
        self.lines.remove(&food_id).ok_or(CartError::NotInCart)
    }

    /// Empty the cart, returning what was in it.
    pub fn clear(&mut self) -> Vec<CartLine> {
        let lines = self.lines();
        self.lines.clear();
        lines
    }

    /// `Σ quantity × price` over every line `price_of` knows a price for.
    pub fn total<F>(&self, price_of: F) -> Result<i64, CartError>
    where
        F: Fn(Uuid) -> Option<i64>,
    {
        self.lines.values().try_fold(0_i64, |total, line| {
            let Some(price) = price_of(line.food_id) else {
                return Ok(total);
            };
            price
                .checked_mul(i64::from(line.quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
                .ok_or(CartError::TotalOverflow)
        })
    }

    fn next_position(&self) -> i32 {
        self.lines
            .values()
            .map(|line| line.position + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(table: &[(Uuid, i64)]) -> impl Fn(Uuid) -> Option<i64> + '_ {
        move |id| table.iter().find(|(food, _)| *food == id).map(|(_, p)| *p)
    }

    #[test]
    fn repeated_adds_accumulate_into_one_line() {
        let food = Uuid::new_v4();
        let mut cart = Cart::new();

        assert!(matches!(cart.add(food, 2), Ok(LineChange::Inserted(_))));
        assert!(matches!(cart.add(food, 3), Ok(LineChange::Updated(_))));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(food).map(|l| l.quantity), Some(5));
        assert_eq!(cart.total(prices(&[(food, 100)])), Ok(500));
    }

    #[test]
    fn decrement_to_zero_removes_the_line() {
        let food = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(food, 1).unwrap();

        let change = cart.add(food, -1).unwrap();

        assert!(matches!(change, LineChange::Removed(line) if line.quantity == 1));
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_of_missing_food_is_rejected() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(Uuid::new_v4(), -1),
            Err(CartError::DecrementMissing)
        );
        assert_eq!(cart.add(Uuid::new_v4(), 0), Err(CartError::ZeroQuantity));
    }

    #[test]
    fn quantity_cap_is_enforced() {
        let food = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(food, MAX_LINE_QUANTITY).unwrap();

        assert_eq!(cart.add(food, 1), Err(CartError::QuantityTooLarge));
        assert_eq!(
            cart.add(Uuid::new_v4(), MAX_LINE_QUANTITY + 1),
            Err(CartError::QuantityTooLarge)
        );
        assert_eq!(cart.get(food).map(|l| l.quantity), Some(MAX_LINE_QUANTITY));
    }

    #[test]
    fn remove_drops_exactly_one_line() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new();
        cart.add(a, 2).unwrap();
        cart.add(b, 1).unwrap();

        let removed = cart.remove(a).unwrap();

        assert_eq!(removed.quantity, 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(prices(&[(a, 100), (b, 40)])), Ok(40));
        assert_eq!(cart.remove(a), Err(CartError::NotInCart));
    }

    #[test]
    fn lines_keep_insertion_order() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut cart = Cart::new();
        for id in &ids {
            cart.add(*id, 1).unwrap();
        }
        cart.add(ids[0], 1).unwrap();

        let order: Vec<Uuid> = cart.lines().iter().map(|l| l.food_id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn from_lines_merges_duplicates() {
        let food = Uuid::new_v4();
        let cart = Cart::from_lines([
            CartLine { food_id: food, quantity: 1, position: 3 },
            CartLine { food_id: food, quantity: 2, position: 1 },
        ]);

        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].position, 1);
    }

    #[test]
    fn total_skips_lines_without_a_price() {
        let (known, gone) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new();
        cart.add(known, 2).unwrap();
        cart.add(gone, 5).unwrap();

        assert_eq!(cart.total(prices(&[(known, 250)])), Ok(500));
    }

    #[test]
    fn total_overflow_is_reported() {
        let food = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(food, 2).unwrap();

        assert_eq!(
            cart.total(prices(&[(food, i64::MAX)])),
            Err(CartError::TotalOverflow)
        );
    }

    #[test]
    fn clear_empties_and_returns_lines() {
        let mut cart = Cart::new();
        cart.add(Uuid::new_v4(), 1).unwrap();
        cart.add(Uuid::new_v4(), 2).unwrap();

        assert_eq!(cart.clear().len(), 2);
        assert!(cart.is_empty());
        assert!(cart.clear().is_empty());
    }
}
