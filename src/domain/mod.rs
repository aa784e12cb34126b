//! Pure cart and order rules. Nothing in here touches the database; services
//! load rows, run these rules, and persist whatever changed.

pub mod cart;
pub mod order;

pub use cart::{Cart, CartError, CartLine, LineChange, MAX_LINE_QUANTITY};
pub use order::{OrderStatus, PaymentMethod, StatusPolicy};
