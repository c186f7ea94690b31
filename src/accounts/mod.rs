use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
mod pages;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::account_routes())
        .merge(handlers::user_routes())
}
