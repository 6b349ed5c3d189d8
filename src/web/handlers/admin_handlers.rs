// src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::Product;
use crate::state::AppState;

#[instrument(name = "handler::admin_list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.repository.list_products().await?;
  info!("Fetched {} products for admin.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::admin_get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  match app_state.repository.product_by_id(product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(product)),
    None => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}

#[derive(Deserialize, Debug)]
pub struct RefillParams {
  pub quantity: i32,
}

#[instrument(
    name = "handler::admin_refill_stock",
    skip(app_state, path, params),
    fields(product_id = %path.as_ref(), quantity = %params.quantity)
)]
pub async fn refill_stock_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  params: web::Query<RefillParams>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let quantity = params.into_inner().quantity;
  if quantity <= 0 {
    return Err(AppError::Validation(format!(
      "Refill quantity must be positive, got {}.",
      quantity
    )));
  }
  let product = app_state.repository.refill_stock(product_id, quantity).await?;
  info!("Restocked product {}: stock is now {}.", product.id, product.stock_quantity);
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::admin_post_product", skip(app_state, payload), fields(product_id = %payload.id))]
pub async fn post_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<Product>,
) -> Result<HttpResponse, AppError> {
  let product = payload.into_inner();
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
  let created = app_state.repository.create_product(product).await?;
  info!("Created product {} ({}).", created.id, created.name);
  Ok(
    HttpResponse::Created()
      .insert_header(("Location", format!("/api/v1/admin/products/{}", created.id)))
      .json(created),
  )
}
