//! Web server adapter.
//!
//! Axum server with an HTMX-aware front end. Every control change on the
//! page re-requests `/` with the full control state, and each request runs
//! one render pass of the [`Dashboard`].

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::domain::dashboard::Dashboard;

pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub static_dir: PathBuf,
}

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/chart.json", get(handlers::chart_json))
        .nest_service("/static", static_files)
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
