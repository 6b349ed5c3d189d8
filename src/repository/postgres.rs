// src/repository/postgres.rs

//! PostgreSQL [`Repository`] implementation backed by sqlx runtime queries.
//! Schema lives in `sql/schema.sql`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::{bill_line, demo_catalog, BillTotals, Repository};
use crate::errors::AppError;
use crate::models::{Cart, CartItem, Order, OrderStatus, Product, ProductForCustomer};

const PRODUCT_COLUMNS: &str =
  "id, name, price_cents, stock_quantity, discount_percentage, gst_percentage, created_at, updated_at";

pub struct PgRepository {
  pool: PgPool,
}

impl PgRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Inserts a small demo catalog. Existing ids are left untouched.
  #[instrument(name = "repository::seed_demo_data", skip(self))]
  pub async fn seed_demo_data(&self) -> Result<(), AppError> {
    let demo = demo_catalog();
    for product in &demo {
      sqlx::query(
        "INSERT INTO products (id, name, price_cents, stock_quantity, discount_percentage, gst_percentage) \
         VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (id) DO NOTHING",
      )
      .bind(product.id)
      .bind(&product.name)
      .bind(product.price_cents)
      .bind(product.stock_quantity)
      .bind(product.discount_percentage)
      .bind(product.gst_percentage)
      .execute(&self.pool)
      .await?;
    }
    info!("Demo catalog ensured ({} products).", demo.len());
    Ok(())
  }
}

#[async_trait]
impl Repository for PgRepository {
  async fn list_products(&self) -> Result<Vec<Product>, AppError> {
    let products: Vec<Product> = sqlx::query_as(&format!(
      "SELECT {} FROM products ORDER BY id ASC",
      PRODUCT_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      error!("Failed to fetch products from database: {}", e);
      AppError::Sqlx(e)
    })?;
    Ok(products)
  }

  async fn product_by_id(&self, id: i32) -> Result<Option<Product>, AppError> {
    let product: Option<Product> = sqlx::query_as(&format!(
      "SELECT {} FROM products WHERE id = $1",
      PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      error!("Database error while fetching product {}: {}", id, e);
      AppError::Sqlx(e)
    })?;
    Ok(product)
  }

  async fn refill_stock(&self, id: i32, quantity: i32) -> Result<Product, AppError> {
    if quantity <= 0 {
      return Err(AppError::Validation(format!(
        "Refill quantity must be positive, got {}.",
        quantity
      )));
    }
    let product: Option<Product> = sqlx::query_as(&format!(
      "UPDATE products SET stock_quantity = stock_quantity + $1, updated_at = NOW() \
       WHERE id = $2 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(quantity)
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    product.ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", id)))
  }

  async fn create_product(&self, product: Product) -> Result<Product, AppError> {
    if product.price_cents < 0 {
      return Err(AppError::Validation(format!(
        "Product price must not be negative, got {}.",
        product.price_cents
      )));
    }
    if product.stock_quantity < 0 {
      return Err(AppError::Validation(format!(
        "Product stock must not be negative, got {}.",
        product.stock_quantity
      )));
    }
    let stored: Product = sqlx::query_as(&format!(
      "INSERT INTO products (id, name, price_cents, stock_quantity, discount_percentage, gst_percentage) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product.id)
    .bind(&product.name)
    .bind(product.price_cents)
    .bind(product.stock_quantity)
    .bind(product.discount_percentage)
    .bind(product.gst_percentage)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| match &e {
      sqlx::Error::Database(db) if db.is_unique_violation() => {
        AppError::Validation(format!("Product with ID {} already exists.", product.id))
      }
      _ => AppError::Sqlx(e),
    })?;
    Ok(stored)
  }

  async fn list_products_for_customer(&self) -> Result<Vec<ProductForCustomer>, AppError> {
    let products: Vec<ProductForCustomer> =
      sqlx::query_as("SELECT id, name, price_cents FROM products ORDER BY id ASC")
        .fetch_all(&self.pool)
        .await?;
    Ok(products)
  }

  async fn add_to_cart(&self, customer_id: i32, product_id: i32, quantity: i32) -> Result<Cart, AppError> {
    if quantity <= 0 {
      return Err(AppError::Validation(format!(
        "Cart quantity must be positive, got {}.",
        quantity
      )));
    }
    let mut tx = self.pool.begin().await?;

    let product_exists: Option<(i32,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
      .bind(product_id)
      .fetch_optional(&mut *tx)
      .await?;
    if product_exists.is_none() {
      return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
    }

    let (cart_id,): (i32,) = sqlx::query_as(
      "INSERT INTO carts (customer_id) VALUES ($1) \
       ON CONFLICT (customer_id) DO UPDATE SET customer_id = EXCLUDED.customer_id \
       RETURNING id",
    )
    .bind(customer_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
      "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
       ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *tx)
    .await?;

    let items: Vec<CartItem> =
      sqlx::query_as("SELECT product_id, quantity FROM cart_items WHERE cart_id = $1 ORDER BY product_id ASC")
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Cart {
      id: cart_id,
      customer_id,
      items,
    })
  }

  async fn list_carts(&self) -> Result<Vec<Cart>, AppError> {
    let rows: Vec<(i32, i32, Option<i32>, Option<i32>)> = sqlx::query_as(
      "SELECT c.id, c.customer_id, i.product_id, i.quantity \
       FROM carts c LEFT JOIN cart_items i ON i.cart_id = c.id \
       ORDER BY c.id ASC, i.product_id ASC",
    )
    .fetch_all(&self.pool)
    .await?;

    let mut carts: Vec<Cart> = Vec::new();
    for (cart_id, customer_id, product_id, quantity) in rows {
      if carts.last().map(|c: &Cart| c.id) != Some(cart_id) {
        carts.push(Cart {
          id: cart_id,
          customer_id,
          items: Vec::new(),
        });
      }
      if let (Some(product_id), Some(quantity), Some(cart)) = (product_id, quantity, carts.last_mut()) {
        cart.items.push(CartItem { product_id, quantity });
      }
    }
    Ok(carts)
  }

  async fn generate_bill(&self, customer_id: i32) -> Result<Order, AppError> {
    let mut tx = self.pool.begin().await?;

    let cart_id: Option<(i32,)> = sqlx::query_as("SELECT id FROM carts WHERE customer_id = $1")
      .bind(customer_id)
      .fetch_optional(&mut *tx)
      .await?;
    let (cart_id,) = cart_id.ok_or_else(|| {
      AppError::Validation(format!("Cart is empty for customer {}.", customer_id))
    })?;

    // Lock the cart's product rows so concurrent bills cannot oversell.
    let lines: Vec<(i32, i32, i32, f64, f64, i32)> = sqlx::query_as(
      "SELECT i.product_id, i.quantity, p.price_cents, p.discount_percentage, p.gst_percentage, p.stock_quantity \
       FROM cart_items i JOIN products p ON p.id = i.product_id \
       WHERE i.cart_id = $1 ORDER BY i.product_id ASC FOR UPDATE OF p",
    )
    .bind(cart_id)
    .fetch_all(&mut *tx)
    .await?;
    if lines.is_empty() {
      return Err(AppError::Validation(format!(
        "Cart is empty for customer {}.",
        customer_id
      )));
    }

    let mut totals = BillTotals::default();
    for (product_id, quantity, price_cents, discount_percentage, gst_percentage, stock_quantity) in &lines {
      if stock_quantity < quantity {
        return Err(AppError::InsufficientStock {
          product_id: *product_id,
          requested: *quantity,
          available: *stock_quantity,
        });
      }
      totals.add(bill_line(*price_cents, *quantity, *discount_percentage, *gst_percentage));
    }

    for (product_id, quantity, ..) in &lines {
      sqlx::query("UPDATE products SET stock_quantity = stock_quantity - $1, updated_at = NOW() WHERE id = $2")
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&mut *tx)
      .await?;
    sqlx::query("DELETE FROM carts WHERE id = $1")
      .bind(cart_id)
      .execute(&mut *tx)
      .await?;

    let order: Order = sqlx::query_as(
      "INSERT INTO orders (id, customer_id, status, subtotal_cents, discount_cents, gst_cents, total_cents) \
       VALUES ($1, $2, $3, $4, $5, $6, $7) \
       RETURNING id, customer_id, status, subtotal_cents, discount_cents, gst_cents, total_cents, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(customer_id)
    .bind(OrderStatus::Paid)
    .bind(totals.subtotal_cents)
    .bind(totals.discount_cents)
    .bind(totals.gst_cents)
    .bind(totals.total_cents)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(
      "Generated bill for customer {}: order {} totalling {} cents.",
      customer_id, order.id, order.total_cents
    );
    Ok(order)
  }
}
