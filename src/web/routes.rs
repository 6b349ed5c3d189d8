// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{admin_handlers, customer_handlers};

// In a real deployment this might check database connectivity too.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Admin catalog management
      .service(
        web::scope("/admin/products")
          .route("", web::get().to(admin_handlers::list_products_handler))
          .route("", web::post().to(admin_handlers::post_product_handler))
          .route("/{product_id}", web::get().to(admin_handlers::get_product_handler))
          .route(
            "/{product_id}/refill",
            web::put().to(admin_handlers::refill_stock_handler),
          ),
      )
      // Customer browsing, cart and billing
      .route("/products", web::get().to(customer_handlers::list_products_handler))
      .route("/cart", web::post().to(customer_handlers::add_to_cart_handler))
      .route("/carts", web::get().to(customer_handlers::list_carts_handler))
      .route(
        "/customers/{customer_id}/bill",
        web::post().to(customer_handlers::generate_bill_handler),
      ),
  );
}
