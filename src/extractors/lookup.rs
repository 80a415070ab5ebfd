//! Resolve the `id` path parameter to an optional entity before the handler runs.

use crate::error::AppError;
use crate::model::{Show, User};
use crate::state::AppState;
use crate::store::WatchStore;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;

/// Path parameter holding the primary key.
pub const ID_PARAM: &str = "id";

/// An entity addressable by integer primary key.
#[async_trait]
pub trait Lookup: Sized + Send + 'static {
    /// Literal 404 body when the entity is absent.
    const NOT_FOUND: &'static str;

    async fn find(store: &dyn WatchStore, id: i64) -> Result<Option<Self>, AppError>;
}

#[async_trait]
impl Lookup for User {
    const NOT_FOUND: &'static str = "User not found";

    async fn find(store: &dyn WatchStore, id: i64) -> Result<Option<Self>, AppError> {
        store.find_user(id).await
    }
}

#[async_trait]
impl Lookup for Show {
    const NOT_FOUND: &'static str = "Show not found";

    async fn find(store: &dyn WatchStore, id: i64) -> Result<Option<Self>, AppError> {
        store.find_show(id).await
    }
}

/// Outcome of a lookup. Absence is not rejected here; the handler decides.
#[derive(Clone, Debug)]
pub struct Resolved<T>(pub Option<T>);

impl<T: Lookup> Resolved<T> {
    /// A raw id that is not an integer resolves to nothing.
    pub async fn resolve(store: &dyn WatchStore, raw_id: &str) -> Result<Self, AppError> {
        match raw_id.trim().parse::<i64>() {
            Ok(id) => Ok(Resolved(T::find(store, id).await?)),
            Err(_) => Ok(Resolved(None)),
        }
    }

    /// The entity, or the entity's 404.
    pub fn found(self) -> Result<T, AppError> {
        self.0.ok_or_else(|| AppError::not_found(T::NOT_FOUND))
    }
}

#[async_trait]
impl<T: Lookup> FromRequestParts<AppState> for Resolved<T> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let raw_id = params
            .get(ID_PARAM)
            .ok_or_else(|| AppError::BadRequest(format!("missing path parameter '{}'", ID_PARAM)))?;
        Self::resolve(state.store.as_ref(), raw_id).await
    }
}
