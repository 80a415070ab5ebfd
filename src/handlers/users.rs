//! User handlers: list, fetch, watched shows, and marking a show watched.

use super::body_object;
use crate::error::AppError;
use crate::extractors::Resolved;
use crate::model::{Show, ShowPatch, User, STATUS_WATCHED};
use crate::response::with_status;
use crate::state::AppState;
use crate::store::ShowFilter;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = state.store.list_users().await?;
    Ok(with_status(state.status_codes.read(), users))
}

pub async fn get_user(
    State(state): State<AppState>,
    user: Resolved<User>,
) -> Result<impl IntoResponse, AppError> {
    Ok(with_status(state.status_codes.read(), user.found()?))
}

pub async fn watched_shows(
    State(state): State<AppState>,
    user: Resolved<User>,
) -> Result<impl IntoResponse, AppError> {
    let user = user.found()?;
    let shows = state
        .store
        .user_shows(user.id, &ShowFilter::status(STATUS_WATCHED))
        .await?;
    if shows.is_empty() {
        return Err(AppError::not_found(format!("No shows found for {}", user.username)));
    }
    Ok(with_status(state.status_codes.watch(), shows))
}

/// Apply the body to the show and, when it ends up "watched", link it to the user.
///
/// The update and the link are separate store calls; a failed link leaves the
/// update in place.
pub async fn watch_show(
    State(state): State<AppState>,
    Path((user_id, show_id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_object(body)?;
    state.rules.watch.validate(&body)?;
    let patch = ShowPatch::from_body(&body)?;

    let store = state.store.as_ref();
    let user = Resolved::<User>::resolve(store, &user_id).await?.0;
    let show = Resolved::<Show>::resolve(store, &show_id).await?.0;
    let (Some(user), Some(show)) = (user, show) else {
        return Err(AppError::not_found("Not found"));
    };

    let updated = store
        .update_show(show.id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;
    if updated.is_watched() {
        store.link_show(user.id, updated.id).await?;
        tracing::info!(user_id = user.id, show_id = updated.id, "linked watched show");
    }
    Ok(with_status(state.status_codes.watch(), updated))
}
