// src/repository/memory.rs

//! In-memory [`Repository`] implementation.
//!
//! Same semantics as the PostgreSQL store, held in process memory behind an
//! `RwLock`. Used by the test suite and for database-free local runs.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

use super::{bill_line, BillTotals, Repository};
use crate::errors::AppError;
use crate::models::{Cart, CartItem, Order, OrderStatus, Product, ProductForCustomer};

#[derive(Default)]
struct MemoryState {
  products: BTreeMap<i32, Product>,
  // Keyed by customer id; one cart per customer.
  carts: BTreeMap<i32, Cart>,
  orders: Vec<Order>,
  next_cart_id: i32,
}

pub struct MemoryRepository {
  inner: RwLock<MemoryState>,
}

impl MemoryRepository {
  pub fn new() -> Self {
    Self {
      inner: RwLock::new(MemoryState {
        next_cart_id: 1,
        ..MemoryState::default()
      }),
    }
  }

  /// Store pre-populated with a catalog. Convenience for tests and demos.
  pub fn with_products(products: Vec<Product>) -> Self {
    let repository = Self::new();
    {
      let mut state = repository.inner.write();
      for product in products {
        state.products.insert(product.id, product);
      }
    }
    repository
  }
}

impl Default for MemoryRepository {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Repository for MemoryRepository {
  async fn list_products(&self) -> Result<Vec<Product>, AppError> {
    Ok(self.inner.read().products.values().cloned().collect())
  }

  async fn product_by_id(&self, id: i32) -> Result<Option<Product>, AppError> {
    Ok(self.inner.read().products.get(&id).cloned())
  }

  async fn refill_stock(&self, id: i32, quantity: i32) -> Result<Product, AppError> {
    if quantity <= 0 {
      return Err(AppError::Validation(format!(
        "Refill quantity must be positive, got {}.",
        quantity
      )));
    }
    let mut state = self.inner.write();
    let product = state
      .products
      .get_mut(&id)
      .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", id)))?;
    product.stock_quantity += quantity;
    product.updated_at = Utc::now();
    Ok(product.clone())
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
    let mut state = self.inner.write();
    if state.products.contains_key(&product.id) {
      return Err(AppError::Validation(format!(
        "Product with ID {} already exists.",
        product.id
      )));
    }
    state.products.insert(product.id, product.clone());
    debug!("Stored product {} ({}).", product.id, product.name);
    Ok(product)
  }

  async fn list_products_for_customer(&self) -> Result<Vec<ProductForCustomer>, AppError> {
    Ok(
      self
        .inner
        .read()
        .products
        .values()
        .map(ProductForCustomer::from)
        .collect(),
    )
  }

  async fn add_to_cart(&self, customer_id: i32, product_id: i32, quantity: i32) -> Result<Cart, AppError> {
    if quantity <= 0 {
      return Err(AppError::Validation(format!(
        "Cart quantity must be positive, got {}.",
        quantity
      )));
    }
    let mut guard = self.inner.write();
    let state = &mut *guard;
    if !state.products.contains_key(&product_id) {
      return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
    }

    let MemoryState { carts, next_cart_id, .. } = state;
    let cart = carts.entry(customer_id).or_insert_with(|| {
      let id = *next_cart_id;
      *next_cart_id += 1;
      Cart {
        id,
        customer_id,
        items: Vec::new(),
      }
    });
    match cart.items.iter_mut().find(|i| i.product_id == product_id) {
      Some(item) => item.quantity += quantity,
      None => cart.items.push(CartItem { product_id, quantity }),
    }
    Ok(cart.clone())
  }

  async fn list_carts(&self) -> Result<Vec<Cart>, AppError> {
    let mut carts: Vec<Cart> = self.inner.read().carts.values().cloned().collect();
    carts.sort_by_key(|c| c.id);
    Ok(carts)
  }

  async fn generate_bill(&self, customer_id: i32) -> Result<Order, AppError> {
    let mut state = self.inner.write();
    let cart = match state.carts.get(&customer_id) {
      Some(cart) if !cart.is_empty() => cart.clone(),
      _ => {
        return Err(AppError::Validation(format!(
          "Cart is empty for customer {}.",
          customer_id
        )))
      }
    };

    // Price every line and verify stock before mutating anything.
    let mut totals = BillTotals::default();
    for item in &cart.items {
      let product = state
        .products
        .get(&item.product_id)
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", item.product_id)))?;
      if product.stock_quantity < item.quantity {
        return Err(AppError::InsufficientStock {
          product_id: product.id,
          requested: item.quantity,
          available: product.stock_quantity,
        });
      }
      totals.add(bill_line(
        product.price_cents,
        item.quantity,
        product.discount_percentage,
        product.gst_percentage,
      ));
    }

    for item in &cart.items {
      if let Some(product) = state.products.get_mut(&item.product_id) {
        product.stock_quantity -= item.quantity;
        product.updated_at = Utc::now();
      }
    }
    state.carts.remove(&customer_id);

    let order = Order {
      id: Uuid::new_v4(),
      customer_id,
      status: OrderStatus::Paid,
      subtotal_cents: totals.subtotal_cents,
      discount_cents: totals.discount_cents,
      gst_cents: totals.gst_cents,
      total_cents: totals.total_cents,
      created_at: Utc::now(),
    };
    state.orders.push(order.clone());
    Ok(order)
  }
}
