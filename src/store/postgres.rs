//! PostgreSQL backend. Tables live in the schema named by `Settings::schema`.

use super::{ShowFilter, WatchStore};
use crate::config::Settings;
use crate::error::{AppError, ConfigError};
use crate::model::{Show, ShowPatch, User};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const USER_COLUMNS: &str = "id, username, password, created_at, updated_at";
const SHOW_COLUMNS: &str = "id, title, genre, rating, status, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgStore {
            pool,
            schema: schema.into(),
        }
    }

    /// Create the database if needed, open the pool and make sure the tables exist.
    pub async fn connect(settings: &Settings) -> Result<Self, AppError> {
        ensure_database_exists(&settings.database_url).await?;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.database_url)
            .await?;
        let store = PgStore::new(pool, settings.schema.clone());
        store.ensure_tables().await?;
        Ok(store)
    }

    fn table(&self, name: &str) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(name))
    }

    /// Create schema, users, shows and watched_shows if missing. Links cascade
    /// away with either side so a deleted show leaves no orphans.
    pub async fn ensure_tables(&self) -> Result<(), AppError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&self.schema)))
            .execute(&self.pool)
            .await?;

        let users = self.table("users");
        let shows = self.table("shows");
        let watched = self.table("watched_shows");
        let ddl = [
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    username TEXT NOT NULL,
                    password TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                users
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    title TEXT NOT NULL,
                    genre TEXT NOT NULL,
                    rating DOUBLE PRECISION,
                    status TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                shows
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    user_id BIGINT NOT NULL REFERENCES {}(id) ON DELETE CASCADE,
                    show_id BIGINT NOT NULL REFERENCES {}(id) ON DELETE CASCADE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    PRIMARY KEY (user_id, show_id)
                )
                "#,
                watched, users, shows
            ),
        ];
        for sql in &ddl {
            sqlx::query(sql).execute(&self.pool).await?;
        }
        tracing::info!(schema = %self.schema, "tables ready");
        Ok(())
    }
}

#[async_trait]
impl WatchStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", USER_COLUMNS, self.table("users"));
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", USER_COLUMNS, self.table("users"));
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_shows(&self, filter: &ShowFilter) -> Result<Vec<Show>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE ($1::text IS NULL OR genre = $1) AND ($2::text IS NULL OR status = $2) ORDER BY id",
            SHOW_COLUMNS,
            self.table("shows")
        );
        tracing::debug!(sql = %sql, filter = ?filter, "query");
        Ok(sqlx::query_as::<_, Show>(&sql)
            .bind(filter.genre.as_deref())
            .bind(filter.status.as_deref())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_show(&self, id: i64) -> Result<Option<Show>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", SHOW_COLUMNS, self.table("shows"));
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Show>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_show(&self, id: i64, patch: &ShowPatch) -> Result<Option<Show>, AppError> {
        let sql = format!(
            r#"
            UPDATE {} SET
                title = COALESCE($2, title),
                genre = COALESCE($3, genre),
                rating = COALESCE($4, rating),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            self.table("shows"),
            SHOW_COLUMNS
        );
        tracing::debug!(sql = %sql, id, patch = ?patch, "query");
        Ok(sqlx::query_as::<_, Show>(&sql)
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.genre.as_deref())
            .bind(patch.rating)
            .bind(patch.status.as_deref())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_show(&self, id: i64) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table("shows"));
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn user_shows(&self, user_id: i64, filter: &ShowFilter) -> Result<Vec<Show>, AppError> {
        let columns = SHOW_COLUMNS
            .split(", ")
            .map(|c| format!("s.{}", c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r#"
            SELECT {} FROM {} s
            JOIN {} w ON w.show_id = s.id
            WHERE w.user_id = $1
              AND ($2::text IS NULL OR s.genre = $2)
              AND ($3::text IS NULL OR s.status = $3)
            ORDER BY s.id
            "#,
            columns,
            self.table("shows"),
            self.table("watched_shows")
        );
        tracing::debug!(sql = %sql, user_id, filter = ?filter, "query");
        Ok(sqlx::query_as::<_, Show>(&sql)
            .bind(user_id)
            .bind(filter.genre.as_deref())
            .bind(filter.status.as_deref())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn link_show(&self, user_id: i64, show_id: i64) -> Result<(), AppError> {
        let sql = format!(
            "INSERT INTO {} (user_id, show_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            self.table("watched_shows")
        );
        tracing::debug!(sql = %sql, user_id, show_id, "query");
        sqlx::query(&sql)
            .bind(user_id)
            .bind(show_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url).map_err(|_| invalid_database_url(database_url))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn invalid_database_url(url: &str) -> ConfigError {
    ConfigError::InvalidVar {
        var: "DATABASE_URL",
        value: url.to_string(),
    }
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let path_start = url.rfind('/').ok_or_else(|| invalid_database_url(url))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
