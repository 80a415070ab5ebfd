//! Show handlers: list, fetch, filter by genre, rate, toggle status, delete.

use super::body_object;
use crate::error::AppError;
use crate::extractors::Resolved;
use crate::model::{Show, ShowPatch, STATUS_WATCHED};
use crate::response::{ok, with_status};
use crate::state::AppState;
use crate::store::ShowFilter;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list_shows(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let shows = state.store.list_shows(&ShowFilter::default()).await?;
    Ok(with_status(state.status_codes.read(), shows))
}

pub async fn get_show(
    State(state): State<AppState>,
    show: Resolved<Show>,
) -> Result<impl IntoResponse, AppError> {
    Ok(with_status(state.status_codes.read(), show.found()?))
}

/// Exact, case-sensitive genre match.
pub async fn shows_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let shows = state.store.list_shows(&ShowFilter::genre(&genre)).await?;
    if shows.is_empty() {
        return Err(AppError::not_found(format!("No shows found for genre: {}", genre)));
    }
    Ok(with_status(state.status_codes.read(), shows))
}

/// Update the show at a 1-based position among the currently watched shows.
///
/// The position is taken against a fresh query on every call, so a concurrent
/// status change can shift which show a given position names.
/// `PUT /shows/:id/rating` addresses a show by id instead.
pub async fn update_watched(
    State(state): State<AppState>,
    Path(list_location): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_object(body)?;
    state.rules.rating.validate(&body)?;
    let patch = ShowPatch::from_body(&body)?;

    let watched = state.store.list_shows(&ShowFilter::status(STATUS_WATCHED)).await?;
    if watched.is_empty() {
        return Err(AppError::not_found("No watched shows"));
    }
    let target = list_location
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| watched.get(i))
        .ok_or_else(|| AppError::not_found("No show found at that location"))?;

    let updated = state
        .store
        .update_show(target.id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("No show found at that location"))?;
    tracing::info!(show_id = updated.id, list_location = %list_location, "updated watched show");
    Ok(ok(updated))
}

pub async fn rate_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_object(body)?;
    state.rules.rating.validate(&body)?;
    let patch = ShowPatch::from_body(&body)?;

    let show = Resolved::<Show>::resolve(state.store.as_ref(), &id).await?.found()?;
    let updated = state
        .store
        .update_show(show.id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Show not found"))?;
    tracing::info!(show_id = updated.id, rating = ?updated.rating, "rated show");
    Ok(ok(updated))
}

/// Flip on-going and cancelled; any other status is returned unchanged.
pub async fn toggle_status(
    State(state): State<AppState>,
    show: Resolved<Show>,
) -> Result<impl IntoResponse, AppError> {
    let show = show.found()?;
    let Some(next) = show.toggled_status() else {
        return Ok(ok(show));
    };
    let updated = state
        .store
        .update_show(show.id, &ShowPatch::status(next))
        .await?
        .ok_or_else(|| AppError::not_found("Show not found"))?;
    tracing::info!(show_id = updated.id, from = %show.status, to = %updated.status, "toggled show status");
    Ok(ok(updated))
}

pub async fn delete_show(
    State(state): State<AppState>,
    show: Resolved<Show>,
) -> Result<impl IntoResponse, AppError> {
    let show = show.found()?;
    state.store.delete_show(show.id).await?;
    tracing::info!(show_id = show.id, "deleted show");
    Ok(StatusCode::NO_CONTENT)
}
