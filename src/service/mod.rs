//! Request validation rules.

mod validation;
pub use validation::{Check, FieldRule, RuleSet, Rules};
