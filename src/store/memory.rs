//! In-process backend. Same contract as `PgStore`, held behind one async lock.

use super::{ShowFilter, WatchStore};
use crate::error::AppError;
use crate::model::{Show, ShowPatch, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    shows: BTreeMap<i64, Show>,
    /// (user_id, show_id)
    watched: BTreeSet<(i64, i64)>,
    next_user_id: i64,
    next_show_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, username: &str, password: &str) -> User {
        let mut t = self.tables.write().await;
        t.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: t.next_user_id,
            username: username.to_string(),
            password: password.to_string(),
            created_at: now,
            updated_at: now,
        };
        t.users.insert(user.id, user.clone());
        user
    }

    pub async fn insert_show(&self, title: &str, genre: &str, status: &str, rating: Option<f64>) -> Show {
        let mut t = self.tables.write().await;
        t.next_show_id += 1;
        let now = Utc::now();
        let show = Show {
            id: t.next_show_id,
            title: title.to_string(),
            genre: genre.to_string(),
            rating,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        };
        t.shows.insert(show.id, show.clone());
        show
    }

    pub async fn link_count(&self) -> usize {
        self.tables.read().await.watched.len()
    }
}

#[async_trait]
impl WatchStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn list_shows(&self, filter: &ShowFilter) -> Result<Vec<Show>, AppError> {
        let t = self.tables.read().await;
        Ok(t.shows.values().filter(|s| filter.matches(s)).cloned().collect())
    }

    async fn find_show(&self, id: i64) -> Result<Option<Show>, AppError> {
        Ok(self.tables.read().await.shows.get(&id).cloned())
    }

    async fn update_show(&self, id: i64, patch: &ShowPatch) -> Result<Option<Show>, AppError> {
        let mut t = self.tables.write().await;
        Ok(t.shows.get_mut(&id).map(|show| {
            patch.apply(show, Utc::now());
            show.clone()
        }))
    }

    async fn delete_show(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.write().await;
        let removed = t.shows.remove(&id).is_some();
        t.watched.retain(|&(_, show_id)| show_id != id);
        Ok(removed)
    }

    async fn user_shows(&self, user_id: i64, filter: &ShowFilter) -> Result<Vec<Show>, AppError> {
        let t = self.tables.read().await;
        Ok(t.watched
            .range((user_id, i64::MIN)..=(user_id, i64::MAX))
            .filter_map(|(_, show_id)| t.shows.get(show_id))
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn link_show(&self, user_id: i64, show_id: i64) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&user_id) || !t.shows.contains_key(&show_id) {
            return Err(AppError::Db(sqlx::Error::RowNotFound));
        }
        t.watched.insert((user_id, show_id));
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
