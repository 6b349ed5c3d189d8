// src/repository/mod.rs

//! Data-access capability interface and its implementations.
//!
//! Handlers depend only on the [`Repository`] trait; the concrete store is
//! chosen at startup ([`PgRepository`]) or in tests ([`MemoryRepository`]).

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::models::{Cart, Order, Product, ProductForCustomer};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

#[async_trait]
pub trait Repository: Send + Sync {
  /// Full catalog, admin view.
  async fn list_products(&self) -> Result<Vec<Product>, AppError>;

  /// Single product; `None` when the id is unknown.
  async fn product_by_id(&self, id: i32) -> Result<Option<Product>, AppError>;

  /// Additive restock. The returned record reflects the updated quantity.
  async fn refill_stock(&self, id: i32, quantity: i32) -> Result<Product, AppError>;

  /// Persists a new product and echoes the stored record.
  async fn create_product(&self, product: Product) -> Result<Product, AppError>;

  /// Catalog projection for the customer surface.
  async fn list_products_for_customer(&self) -> Result<Vec<ProductForCustomer>, AppError>;

  /// Upserts a line item in the customer's cart. Quantities for an already
  /// present product accumulate.
  async fn add_to_cart(&self, customer_id: i32, product_id: i32, quantity: i32) -> Result<Cart, AppError>;

  /// Every cart in the store, unscoped.
  async fn list_carts(&self) -> Result<Vec<Cart>, AppError>;

  /// Prices the customer's cart, decrements stock, records the order and
  /// clears the cart.
  async fn generate_bill(&self, customer_id: i32) -> Result<Order, AppError>;
}

/// Small demo catalog used when seeding a fresh store.
pub fn demo_catalog() -> Vec<Product> {
  let now = Utc::now();
  [
    (1, "Basmati Rice 5kg", 5000, 100, 2.0, 3.0),
    (2, "Toor Dal 1kg", 1800, 40, 0.0, 0.0),
    (3, "Ghee 500ml", 32000, 20, 5.0, 12.0),
    (4, "Whole Wheat Atta 10kg", 4200, 60, 4.0, 5.0),
  ]
  .into_iter()
  .map(
    |(id, name, price_cents, stock_quantity, discount_percentage, gst_percentage)| Product {
      id,
      name: name.to_string(),
      price_cents,
      stock_quantity,
      discount_percentage,
      gst_percentage,
      created_at: now,
      updated_at: now,
    },
  )
  .collect()
}

/// Running totals of a bill, in integer cents.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BillTotals {
  pub subtotal_cents: i64,
  pub discount_cents: i64,
  pub gst_cents: i64,
  pub total_cents: i64,
}

impl BillTotals {
  pub fn add(&mut self, other: BillTotals) {
    self.subtotal_cents += other.subtotal_cents;
    self.discount_cents += other.discount_cents;
    self.gst_cents += other.gst_cents;
    self.total_cents += other.total_cents;
  }
}

/// Prices a single cart line. Discount comes off the line subtotal; GST is
/// charged on the discounted amount. Rounded to whole cents per line.
pub(crate) fn bill_line(
  price_cents: i32,
  quantity: i32,
  discount_percentage: f64,
  gst_percentage: f64,
) -> BillTotals {
  let subtotal_cents = price_cents as i64 * quantity as i64;
  let discount_cents = (subtotal_cents as f64 * discount_percentage / 100.0).round() as i64;
  let taxable_cents = subtotal_cents - discount_cents;
  let gst_cents = (taxable_cents as f64 * gst_percentage / 100.0).round() as i64;
  BillTotals {
    subtotal_cents,
    discount_cents,
    gst_cents,
    total_cents: taxable_cents + gst_cents,
  }
}
