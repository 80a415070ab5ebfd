//! Row types for users and shows, plus the partial update applied to a show.

use crate::error::{AppError, FieldError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

pub const STATUS_WATCHED: &str = "watched";
pub const STATUS_ON_GOING: &str = "on-going";
pub const STATUS_CANCELLED: &str = "cancelled";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Stored as given; never part of a response body.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub rating: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Show {
    /// Status after an on-going/cancelled flip, or None when the status is neither.
    pub fn toggled_status(&self) -> Option<&'static str> {
        match self.status.as_str() {
            STATUS_CANCELLED => Some(STATUS_ON_GOING),
            STATUS_ON_GOING => Some(STATUS_CANCELLED),
            _ => None,
        }
    }

    pub fn is_watched(&self) -> bool {
        self.status == STATUS_WATCHED
    }
}

/// Columns a request body may overwrite on a show. Unset fields keep their stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShowPatch {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub status: Option<String>,
}

impl ShowPatch {
    pub fn status(status: &str) -> Self {
        ShowPatch {
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    /// Build a patch from a JSON object body. Keys other than the show's editable
    /// columns are ignored; null leaves a column unchanged.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, AppError> {
        Ok(ShowPatch {
            title: text_field(body, "title")?,
            genre: text_field(body, "genre")?,
            rating: rating_field(body)?,
            status: text_field(body, "status")?,
        })
    }

    /// Apply onto an in-memory row; the Postgres store does the same with COALESCE.
    pub fn apply(&self, show: &mut Show, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            show.title = title.clone();
        }
        if let Some(genre) = &self.genre {
            show.genre = genre.clone();
        }
        if let Some(rating) = self.rating {
            show.rating = Some(rating);
        }
        if let Some(status) = &self.status {
            show.status = status.clone();
        }
        show.updated_at = now;
    }
}

fn text_field(body: &Map<String, Value>, key: &str) -> Result<Option<String>, AppError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(AppError::BadRequest(format!("{} must be a string", key))),
    }
}

fn rating_field(body: &Map<String, Value>) -> Result<Option<f64>, AppError> {
    let value = match body.get("rating") {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| {
        AppError::Validation(vec![FieldError::body(
            "rating",
            Some(value.clone()),
            "Rating must be a number",
        )])
    })
}
