//! Declarative body rules checked before a handler touches the store.

use crate::error::{AppError, ConfigError, FieldError};
use regex::Regex;
use serde_json::{Map, Value};

#[derive(Debug)]
pub enum Check {
    /// Value must contain a match for the pattern somewhere.
    Matches(Regex),
    /// Character count, inclusive on both ends.
    Length { min: usize, max: usize },
}

#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

impl FieldRule {
    pub fn matches(field: &'static str, pattern: &str, message: &'static str) -> Result<Self, ConfigError> {
        Ok(FieldRule {
            field,
            check: Check::Matches(Regex::new(pattern)?),
            message,
        })
    }

    pub fn length(field: &'static str, min: usize, max: usize, message: &'static str) -> Self {
        FieldRule {
            field,
            check: Check::Length { min, max },
            message,
        }
    }

    fn passes(&self, text: &str) -> bool {
        match &self.check {
            Check::Matches(re) => re.is_match(text),
            Check::Length { min, max } => (*min..=*max).contains(&text.chars().count()),
        }
    }
}

/// Ordered rule list; every rule runs, failures keep declaration order.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        RuleSet { rules }
    }

    pub fn check(&self, body: &Map<String, Value>) -> Vec<FieldError> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let value = body.get(rule.field);
                if rule.passes(&field_text(value)) {
                    None
                } else {
                    Some(FieldError::body(rule.field, value.cloned(), rule.message))
                }
            })
            .collect()
    }

    pub fn validate(&self, body: &Map<String, Value>) -> Result<(), AppError> {
        let errors = self.check(body);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Rules for the two write surfaces: rating only, and rating plus status.
#[derive(Debug)]
pub struct Rules {
    pub rating: RuleSet,
    pub watch: RuleSet,
}

impl Rules {
    pub fn new() -> Result<Self, ConfigError> {
        let rating = || FieldRule::matches("rating", r"\d", "Rating must be a number");
        Ok(Rules {
            rating: RuleSet::new(vec![rating()?]),
            watch: RuleSet::new(vec![
                rating()?,
                FieldRule::length("status", 5, 25, "Status must be between 5 and 25 characters"),
                FieldRule::matches("status", r"^[a-zA-Z-]+$", "Status can only contain letters")?,
            ]),
        })
    }
}

/// Text a rule sees for a body value. Missing and null read as empty.
fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
