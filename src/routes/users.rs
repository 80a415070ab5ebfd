//! User routes.

use crate::handlers::{get_user, list_users, watch_show, watched_shows};
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id/shows", get(watched_shows))
        .route("/users/:id/shows/:show_id", put(watch_show))
        .with_state(state)
}
