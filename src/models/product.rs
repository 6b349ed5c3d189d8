// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Canonical catalog record, admin-owned. Prices are integer cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: i32,
  pub name: String,
  pub price_cents: i32,
  pub stock_quantity: i32,
  pub discount_percentage: f64,
  pub gst_percentage: f64,
  #[serde(default = "Utc::now")]
  pub created_at: DateTime<Utc>,
  #[serde(default = "Utc::now")]
  pub updated_at: DateTime<Utc>,
}

/// Read-only projection of [`Product`] for the customer surface.
///
/// Must never expose stock, discount or tax fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductForCustomer {
  pub id: i32,
  pub name: String,
  pub price_cents: i32,
}

impl From<&Product> for ProductForCustomer {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id,
      name: product.name.clone(),
      price_cents: product.price_cents,
    }
  }
}
