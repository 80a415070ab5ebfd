//! Show routes. Every per-show path names its parameter `id`, including the
//! positional `/watched` route, so the router sees one parameter name per segment.

use crate::handlers::{delete_show, get_show, list_shows, rate_show, shows_by_genre, toggle_status, update_watched};
use crate::state::AppState;
use axum::{
    routing::{delete, get, put},
    Router,
};

pub fn show_routes(state: AppState) -> Router {
    Router::new()
        .route("/shows", get(list_shows))
        .route("/shows/", get(list_shows))
        .route("/shows/genres/:genre", get(shows_by_genre))
        .route("/shows/:id", get(get_show))
        .route("/shows/:id/watched", put(update_watched))
        .route("/shows/:id/rating", put(rate_show))
        .route("/shows/:id/updates", put(toggle_status))
        .route("/shows/:id/delete", delete(delete_show))
        .with_state(state)
}
