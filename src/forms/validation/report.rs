use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::schema::ModelPath;

/// Constraint names reported back to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Constraint {
    Required,
    MinLength,
    Email,
    Number,
    Options,
    Accept,
    Type,
}

impl Constraint {
    pub const fn name(self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::MinLength => "minLength",
            Constraint::Email => "email",
            Constraint::Number => "number",
            Constraint::Options => "options",
            Constraint::Accept => "accept",
            Constraint::Type => "type",
        }
    }
}

/// A single failed constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub model: ModelPath,
    pub constraint: Constraint,
    pub message: String,
}

impl Violation {
    pub fn new(model: ModelPath, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            model,
            constraint,
            message: message.into(),
        }
    }
}

/// Outcome of validating a set of values; violations appear in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations_for<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.model.to_string() == model)
    }

    pub fn has(&self, model: &str, constraint: Constraint) -> bool {
        self.violations_for(model)
            .any(|violation| violation.constraint == constraint)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "all fields valid");
        }

        let parts = self
            .violations
            .iter()
            .map(|violation| format!("{} ({})", violation.model, violation.constraint.name()))
            .collect::<Vec<_>>();
        write!(f, "{} violation(s): {}", parts.len(), parts.join(", "))
    }
}
