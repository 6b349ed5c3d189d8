// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use uuid::Uuid;

use bigbasket::config::AppConfig;
use bigbasket::errors::AppError;
use bigbasket::models::{Cart, CartItem, Order, OrderStatus, Product, ProductForCustomer};
use bigbasket::repository::Repository;
use bigbasket::state::AppState;

pub fn setup_tracing() {
  static TRACING: OnceCell<()> = OnceCell::new();
  TRACING.get_or_init(|| {
    let _ = tracing_subscriber::fmt()
      .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
      .with_test_writer()
      .try_init();
  });
}

// --- Fixtures ---

pub fn fixed_timestamp() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn product(id: i32, name: &str, price_cents: i32, stock: i32, discount: f64, gst: f64) -> Product {
  Product {
    id,
    name: name.to_string(),
    price_cents,
    stock_quantity: stock,
    discount_percentage: discount,
    gst_percentage: gst,
    created_at: fixed_timestamp(),
    updated_at: fixed_timestamp(),
  }
}

pub fn catalog() -> Vec<Product> {
  vec![
    product(1, "Basmati Rice 5kg", 5000, 100, 2.0, 3.0),
    product(2, "Toor Dal 1kg", 4000, 40, 4.0, 5.0),
    product(3, "Cold-Pressed Oil 1l", 25000, 20, 7.0, 2.0),
  ]
}

pub fn customer_catalog() -> Vec<ProductForCustomer> {
  catalog().iter().map(ProductForCustomer::from).collect()
}

pub fn cart(id: i32, customer_id: i32, items: Vec<(i32, i32)>) -> Cart {
  Cart {
    id,
    customer_id,
    items: items
      .into_iter()
      .map(|(product_id, quantity)| CartItem { product_id, quantity })
      .collect(),
  }
}

pub fn order_for(customer_id: i32) -> Order {
  Order {
    id: Uuid::new_v4(),
    customer_id,
    status: OrderStatus::Paid,
    subtotal_cents: 25_000,
    discount_cents: 500,
    gst_cents: 735,
    total_cents: 25_235,
    created_at: fixed_timestamp(),
  }
}

pub fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 8080,
    database_url: None,
    seed_db: false,
  }
}

pub fn test_state_with(repository: Arc<MockRepository>) -> web::Data<AppState> {
  web::Data::new(AppState {
    repository,
    config: Arc::new(test_config()),
  })
}

pub fn test_state(repository: MockRepository) -> web::Data<AppState> {
  test_state_with(Arc::new(repository))
}

// --- Hand-written mock repository ---
//
// Each field holds the canned result for one repository operation; `calls`
// records every invocation with its arguments so tests can verify what the
// handler asked for (or that it asked for nothing at all).

#[derive(Default)]
pub struct MockRepository {
  pub products: Option<Vec<Product>>,
  pub product: Option<Product>,
  pub refilled: Option<Product>,
  pub created: Option<Product>,
  pub customer_products: Option<Vec<ProductForCustomer>>,
  pub cart: Option<Cart>,
  pub carts: Option<Vec<Cart>>,
  pub order: Option<Order>,
  pub calls: Mutex<Vec<String>>,
}

impl MockRepository {
  fn record(&self, call: String) {
    self.calls.lock().push(call);
  }

  fn unexpected<T>(&self, operation: &str) -> Result<T, AppError> {
    Err(AppError::Internal(format!(
      "MockRepository: unexpected call to {}",
      operation
    )))
  }
}

#[async_trait]
impl Repository for MockRepository {
  async fn list_products(&self) -> Result<Vec<Product>, AppError> {
    self.record("list_products()".to_string());
    match &self.products {
      Some(products) => Ok(products.clone()),
      None => self.unexpected("list_products"),
    }
  }

  async fn product_by_id(&self, id: i32) -> Result<Option<Product>, AppError> {
    self.record(format!("product_by_id({})", id));
    Ok(self.product.clone().filter(|p| p.id == id))
  }

  async fn refill_stock(&self, id: i32, quantity: i32) -> Result<Product, AppError> {
    self.record(format!("refill_stock({}, {})", id, quantity));
    match &self.refilled {
      Some(refilled) => Ok(refilled.clone()),
      None => self.unexpected("refill_stock"),
    }
  }

  async fn create_product(&self, product: Product) -> Result<Product, AppError> {
    self.record(format!("create_product({})", product.id));
    // Echo the submission unless a stored record was configured.
    Ok(self.created.clone().unwrap_or(product))
  }

  async fn list_products_for_customer(&self) -> Result<Vec<ProductForCustomer>, AppError> {
    self.record("list_products_for_customer()".to_string());
    match &self.customer_products {
      Some(products) => Ok(products.clone()),
      None => self.unexpected("list_products_for_customer"),
    }
  }

  async fn add_to_cart(&self, customer_id: i32, product_id: i32, quantity: i32) -> Result<Cart, AppError> {
    self.record(format!("add_to_cart({}, {}, {})", customer_id, product_id, quantity));
    match &self.cart {
      Some(cart) => Ok(cart.clone()),
      None => self.unexpected("add_to_cart"),
    }
  }

  async fn list_carts(&self) -> Result<Vec<Cart>, AppError> {
    self.record("list_carts()".to_string());
    match &self.carts {
      Some(carts) => Ok(carts.clone()),
      None => self.unexpected("list_carts"),
    }
  }

  async fn generate_bill(&self, customer_id: i32) -> Result<Order, AppError> {
    self.record(format!("generate_bill({})", customer_id));
    match &self.order {
      Some(order) => Ok(order.clone()),
      None => self.unexpected("generate_bill"),
    }
  }
}
