//! Watchlist: REST backend for users and the TV shows they watch.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Settings, StatusCodes};
pub use error::{AppError, ConfigError, FieldError};
pub use model::{Show, ShowPatch, User};
pub use routes::{app, common_routes, show_routes, user_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, ShowFilter, WatchStore};
