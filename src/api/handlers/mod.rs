//! REST endpoint handlers organized by resource.

pub mod interactions;
pub mod system;
pub mod trending;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(system::routes())
        .merge(trending::routes())
        .merge(interactions::routes())
}
