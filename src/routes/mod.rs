//! Router assembly.

pub mod common;
pub mod shows;
pub mod users;

pub use common::common_routes;
pub use shows::show_routes;
pub use users::user_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application: common, show and user routes behind tracing and a body size limit.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(show_routes(state.clone()))
        .merge(user_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit_bytes)),
        )
}
