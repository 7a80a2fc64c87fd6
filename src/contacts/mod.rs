use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
pub mod handlers;
pub(crate) mod repo;
mod repo_types;
pub(crate) mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::contact_routes())
}
