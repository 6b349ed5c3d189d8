// src/state.rs

use crate::config::AppConfig;
use crate::repository::Repository;
use std::sync::Arc;

/// Shared application state. Handlers only see the [`Repository`] trait
/// object, never a concrete storage technology.
#[derive(Clone)]
pub struct AppState {
  pub repository: Arc<dyn Repository>,
  pub config: Arc<AppConfig>,
}
