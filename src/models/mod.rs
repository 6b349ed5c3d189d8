// src/models/mod.rs

//! Contains data structures representing database entities.

// Declare child modules for each model
pub mod cart;
pub mod order;
pub mod product;

// Re-export the model structs for convenient access
pub use cart::{Cart, CartItem};
pub use order::{Order, OrderStatus};
pub use product::{Product, ProductForCustomer};
