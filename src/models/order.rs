// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

// Matches the `order_status_enum` type in sql/schema.sql.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Cancelled,
}

/// A completed checkout, produced by bill generation.
///
/// Carries the bill breakdown: subtotal, discount taken off it, GST charged
/// on the discounted amount, and the grand total, all in integer cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub customer_id: i32,
  pub status: OrderStatus,
  pub subtotal_cents: i64,
  pub discount_cents: i64,
  pub gst_cents: i64,
  pub total_cents: i64,
  pub created_at: DateTime<Utc>,
}
