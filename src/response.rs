//! Success responses. Bodies are the bare row or array; only the status varies
//! with the configured `StatusCodes`.

use crate::config::StatusCodes;
use axum::{http::StatusCode, Json};
use serde::Serialize;

impl StatusCodes {
    /// Plain reads: list and fetch by id.
    pub fn read(self) -> StatusCode {
        match self {
            StatusCodes::Uniform => StatusCode::OK,
            StatusCodes::Legacy => StatusCode::FOUND,
        }
    }

    /// A user's watched shows and the watch action.
    pub fn watch(self) -> StatusCode {
        match self {
            StatusCodes::Uniform => StatusCode::OK,
            StatusCodes::Legacy => StatusCode::ACCEPTED,
        }
    }
}

pub fn with_status<T: Serialize>(status: StatusCode, data: T) -> (StatusCode, Json<T>) {
    (status, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    with_status(StatusCode::OK, data)
}
