//! Request extractors shared by handlers.

pub mod lookup;
pub use lookup::{Lookup, Resolved, ID_PARAM};
