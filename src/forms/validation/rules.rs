use std::sync::OnceLock;

use regex::Regex;

use super::super::schema::{Field, FieldKind, ModelPath};
use super::super::values::FieldValue;
use super::report::{Constraint, Violation};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        )
        .expect("email pattern compiles")
    })
}

pub(crate) fn is_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && email_pattern().is_match(value)
}

pub(crate) fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

pub(crate) fn meets_min_length(value: &str, min_length: usize) -> bool {
    value.trim().chars().count() >= min_length
}

/// Checks one shown leaf field. Groups are checked through their children.
pub(crate) fn check_field(
    path: &ModelPath,
    field: &Field,
    value: Option<&FieldValue>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let shape_fits = match (&field.kind, value) {
        (_, None) => true,
        (FieldKind::Checkbox, Some(FieldValue::Flag(_))) => true,
        (FieldKind::File { .. }, Some(FieldValue::File(_))) => true,
        (FieldKind::Group { .. }, Some(FieldValue::Group(_))) => true,
        (kind, Some(FieldValue::Text(_))) => kind.holds_text(),
        _ => false,
    };
    if let (false, Some(value)) = (shape_fits, value) {
        violations.push(Violation::new(
            path.clone(),
            Constraint::Type,
            format!(
                "{} field cannot hold a {} value",
                field.kind.type_name(),
                value.shape()
            ),
        ));
        return violations;
    }

    if field.is_group() {
        return violations;
    }

    let empty = value.map(FieldValue::is_empty).unwrap_or(true);
    if empty {
        if field.required {
            violations.push(Violation::new(
                path.clone(),
                Constraint::Required,
                format!("{} is required", field.label),
            ));
        }
        return violations;
    }

    match value {
        Some(FieldValue::Text(text)) => check_text(path, field, text, &mut violations),
        Some(FieldValue::File(file)) => {
            let accepted = field.accepted_extensions();
            if !accepted.is_empty() {
                let allowed = file
                    .extension()
                    .map(|extension| accepted.contains(&extension))
                    .unwrap_or(false);
                if !allowed {
                    violations.push(Violation::new(
                        path.clone(),
                        Constraint::Accept,
                        format!(
                            "{} must be one of {}",
                            file.file_name,
                            accepted.join(", ")
                        ),
                    ));
                }
            }
        }
        _ => {}
    }

    violations
}

fn check_text(path: &ModelPath, field: &Field, text: &str, violations: &mut Vec<Violation>) {
    let rules = &field.validation;

    if let Some(min_length) = rules.min_length {
        if !meets_min_length(text, min_length) {
            violations.push(Violation::new(
                path.clone(),
                Constraint::MinLength,
                format!(
                    "{} must be at least {min_length} characters",
                    field.label
                ),
            ));
        }
    }

    if rules.email && !is_email(text) {
        violations.push(Violation::new(
            path.clone(),
            Constraint::Email,
            format!("{} must be a valid email address", field.label),
        ));
    }

    if rules.number && !is_numeric(text) {
        violations.push(Violation::new(
            path.clone(),
            Constraint::Number,
            format!("{} must contain digits only", field.label),
        ));
    }

    if let Some(options) = field.options() {
        if !options.iter().any(|option| option.value == text) {
            violations.push(Violation::new(
                path.clone(),
                Constraint::Options,
                format!("{text:?} is not an option of {}", field.label),
            ));
        }
    }
}
