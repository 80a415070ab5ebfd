//! HTTP handlers for users and shows.

pub mod shows;
pub mod users;
pub use shows::*;
pub use users::*;

use crate::error::AppError;
use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{Map, Value};

/// A missing or unparseable body reads as `{}`; any other non-object is rejected.
/// A body that could not be read (too large, aborted) keeps its own rejection status.
fn body_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match body {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(Json(Value::Null)) => Ok(Map::new()),
        Ok(_) => Err(AppError::BadRequest("body must be a JSON object".into())),
        Err(rejection @ JsonRejection::BytesRejection(_)) => Err(AppError::Body(rejection)),
        Err(_) => Ok(Map::new()),
    }
}
