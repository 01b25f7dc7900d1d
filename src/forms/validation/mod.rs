mod report;
mod rules;

pub use report::{Constraint, ValidationReport, Violation};

use super::schema::Form;
use super::values::FormValues;
use super::visibility::resolve;

/// Checks every shown field of a form. Hidden fields are skipped entirely.
pub fn validate(form: &Form, values: &FormValues) -> ValidationReport {
    let violations = resolve(form, values)
        .into_iter()
        .filter(|entry| entry.visible)
        .flat_map(|entry| rules::check_field(&entry.path, entry.field, entry.value))
        .collect();

    ValidationReport { violations }
}
