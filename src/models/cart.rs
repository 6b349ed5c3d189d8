// src/models/cart.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A line in a customer's cart. Owned by exactly one [`Cart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CartItem {
  pub product_id: i32,
  pub quantity: i32,
}

/// A customer's shopping cart. One cart exists per customer at a time.
///
/// `id` is assigned by the store; submissions may omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
  #[serde(default)]
  pub id: i32,
  pub customer_id: i32,
  #[serde(default)]
  pub items: Vec<CartItem>,
}

impl Cart {
  /// Total item count (sum of quantities).
  pub fn item_count(&self) -> i64 {
    self.items.iter().map(|i| i.quantity as i64).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}
