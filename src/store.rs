//! Data store seam: per-entity reads, partial show updates, show deletion and the
//! user↔show watched link. `PgStore` is the production backend; `MemoryStore`
//! backs tests and local runs without a database.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::AppError;
use crate::model::{Show, ShowPatch, User};
use async_trait::async_trait;

/// Optional equality filters for listing shows. Unset fields match everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShowFilter {
    pub genre: Option<String>,
    pub status: Option<String>,
}

impl ShowFilter {
    pub fn genre(genre: &str) -> Self {
        ShowFilter {
            genre: Some(genre.to_string()),
            ..Default::default()
        }
    }

    pub fn status(status: &str) -> Self {
        ShowFilter {
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    pub fn matches(&self, show: &Show) -> bool {
        self.genre.as_deref().map_or(true, |g| show.genre == g)
            && self.status.as_deref().map_or(true, |s| show.status == s)
    }
}

/// All listing methods return rows ordered by id.
#[async_trait]
pub trait WatchStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn list_shows(&self, filter: &ShowFilter) -> Result<Vec<Show>, AppError>;

    async fn find_show(&self, id: i64) -> Result<Option<Show>, AppError>;

    /// Returns the updated row, or None if no show has this id.
    async fn update_show(&self, id: i64, patch: &ShowPatch) -> Result<Option<Show>, AppError>;

    /// Removes the show and any watched links to it. Returns whether a row was deleted.
    async fn delete_show(&self, id: i64) -> Result<bool, AppError>;

    /// Shows linked to the user, restricted to those matching `filter`.
    async fn user_shows(&self, user_id: i64, filter: &ShowFilter) -> Result<Vec<Show>, AppError>;

    /// Idempotent: linking an already linked pair is a no-op. Errors when the
    /// user or the show does not exist.
    async fn link_show(&self, user_id: i64, show_id: i64) -> Result<(), AppError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}
