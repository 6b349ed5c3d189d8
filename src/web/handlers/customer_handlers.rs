// src/web/handlers/customer_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::Cart;
use crate::state::AppState;

#[instrument(name = "handler::customer_list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.repository.list_products_for_customer().await?;
  info!("Fetched {} products for customer browsing.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

// The submitted cart is expected to carry exactly one item; the handler
// derives (customer_id, product_id, quantity) from it.
#[instrument(name = "handler::add_to_cart", skip(app_state, payload), fields(customer_id = %payload.customer_id))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<Cart>,
) -> Result<HttpResponse, AppError> {
  let cart = payload.into_inner();
  let item = match cart.items.as_slice() {
    [item] => item.clone(),
    [] => {
      warn!("Cart submission for customer {} carried no items.", cart.customer_id);
      return Err(AppError::Validation("Cart submission must contain an item.".to_string()));
    }
    _ => {
      return Err(AppError::Validation(
        "Cart submission must contain exactly one item.".to_string(),
      ))
    }
  };
  if item.quantity <= 0 {
    return Err(AppError::Validation(format!(
      "Cart quantity must be positive, got {}.",
      item.quantity
    )));
  }

  let updated = app_state
    .repository
    .add_to_cart(cart.customer_id, item.product_id, item.quantity)
    .await?;
  info!(
    "Cart {} for customer {} now holds {} items.",
    updated.id,
    updated.customer_id,
    updated.item_count()
  );
  Ok(HttpResponse::Ok().json(updated))
}

#[instrument(name = "handler::generate_bill", skip(app_state, path), fields(customer_id = %path.as_ref()))]
pub async fn generate_bill_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  let customer_id = path.into_inner();
  let order = app_state.repository.generate_bill(customer_id).await?;
  info!(
    "Billed customer {}: order {} totalling {} cents.",
    customer_id, order.id, order.total_cents
  );
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::list_carts", skip(app_state))]
pub async fn list_carts_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let carts = app_state.repository.list_carts().await?;
  info!("Fetched {} carts.", carts.len());
  Ok(HttpResponse::Ok().json(carts))
}
