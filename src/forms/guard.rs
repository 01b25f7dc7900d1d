use std::collections::BTreeSet;

use super::schema::{ExpectedValue, Field, FieldKind, Form, ModelPath};
use super::values::FILE_REFERENCE_KEYS;

/// Malformations detected when a form definition is loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("{path}: model key is empty")]
    EmptyModel { path: ModelPath },
    #[error("{path}: model key repeats an earlier field in the same scope")]
    DuplicateModel { path: ModelPath },
    #[error("{path}: select field declares no options")]
    MissingOptions { path: ModelPath },
    #[error("{path}: option value {value:?} is empty or repeated")]
    InvalidOption { path: ModelPath, value: String },
    #[error("{path}: accept list names no file extensions")]
    EmptyAcceptList { path: ModelPath },
    #[error("{path}: group declares no fields")]
    EmptyGroup { path: ModelPath },
    #[error("{path}: {key:?} does not apply to {kind} fields")]
    MisplacedAttribute {
        path: ModelPath,
        key: String,
        kind: &'static str,
    },
    #[error("{path}: group children \"fileName\" and \"storageKey\" would read as a file reference")]
    ReservedGroupShape { path: ModelPath },
    #[error("{path}: groups nest deeper than {max} level(s)")]
    NestingTooDeep { path: ModelPath, max: usize },
    #[error("{path}: visibleIf references unknown model {reference:?}")]
    UnknownReference { path: ModelPath, reference: String },
    #[error("{path}: visibleIf references {reference:?} before it is defined")]
    ForwardReference { path: ModelPath, reference: String },
    #[error("{path}: visibleIf compares {reference:?} ({kind}) with incompatible value {expected}")]
    IncompatibleCondition {
        path: ModelPath,
        reference: String,
        kind: &'static str,
        expected: ExpectedValue,
    },
}

/// Every violation found in a rejected form definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("form schema is malformed: {}", summarize(.violations))]
pub struct SchemaError {
    pub violations: Vec<SchemaViolation>,
}

fn summarize(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Load-time check that a form honors the structural invariants renderers rely on.
#[derive(Debug, Clone, Default)]
pub struct SchemaGuard {
    max_group_depth: Option<usize>,
}

impl SchemaGuard {
    /// Reject groups nested deeper than `max` levels.
    pub fn with_max_group_depth(max: usize) -> Self {
        Self {
            max_group_depth: Some(max),
        }
    }

    pub fn check(&self, form: &Form) -> Result<(), SchemaError> {
        let violations = self.inspect(form);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError { violations })
        }
    }

    /// All violations in document order; empty when the form is well formed.
    pub fn inspect(&self, form: &Form) -> Vec<SchemaViolation> {
        let mut inspection = Inspection {
            max_group_depth: self.max_group_depth,
            scopes: Vec::new(),
            violations: Vec::new(),
        };
        inspection.scope(&form.fields, &ModelPath::root());
        inspection.violations
    }
}

struct ScopeFrame<'a> {
    declared: &'a [Field],
    seen: Vec<&'a Field>,
}

struct Inspection<'a> {
    max_group_depth: Option<usize>,
    scopes: Vec<ScopeFrame<'a>>,
    violations: Vec<SchemaViolation>,
}

impl<'a> Inspection<'a> {
    fn scope(&mut self, fields: &'a [Field], prefix: &ModelPath) {
        self.scopes.push(ScopeFrame {
            declared: fields,
            seen: Vec::new(),
        });

        for field in fields {
            let path = prefix.child(&field.model);
            self.field(field, &path);

            // registered after the checks so a field cannot be made visible by itself
            if let Some(frame) = self.scopes.last_mut() {
                frame.seen.push(field);
            }

            if let FieldKind::Group { fields: children } = &field.kind {
                if let Some(max) = self.max_group_depth {
                    if path.depth() > max {
                        self.violations.push(SchemaViolation::NestingTooDeep {
                            path: path.clone(),
                            max,
                        });
                    }
                }
                self.scope(children, &path);
            }
        }

        self.scopes.pop();
    }

    fn field(&mut self, field: &'a Field, path: &ModelPath) {
        if field.model.trim().is_empty() {
            self.violations.push(SchemaViolation::EmptyModel { path: path.clone() });
        } else if self
            .scopes
            .last()
            .map(|frame| frame.seen.iter().any(|seen| seen.model == field.model))
            .unwrap_or(false)
        {
            self.violations
                .push(SchemaViolation::DuplicateModel { path: path.clone() });
        }

        match &field.kind {
            FieldKind::Select { options } => {
                if options.is_empty() {
                    self.violations
                        .push(SchemaViolation::MissingOptions { path: path.clone() });
                }
                let mut values = BTreeSet::new();
                for option in options {
                    if option.value.is_empty() || !values.insert(option.value.as_str()) {
                        self.violations.push(SchemaViolation::InvalidOption {
                            path: path.clone(),
                            value: option.value.clone(),
                        });
                    }
                }
            }
            FieldKind::File { accept: Some(_) } if field.accepted_extensions().is_empty() => {
                self.violations
                    .push(SchemaViolation::EmptyAcceptList { path: path.clone() });
            }
            FieldKind::Group { fields } if fields.is_empty() => {
                self.violations
                    .push(SchemaViolation::EmptyGroup { path: path.clone() });
            }
            FieldKind::Group { fields } => {
                let declares = |model: &str| fields.iter().any(|child| child.model == model);
                if FILE_REFERENCE_KEYS.iter().all(|&key| declares(key)) {
                    self.violations
                        .push(SchemaViolation::ReservedGroupShape { path: path.clone() });
                }
            }
            _ => {}
        }

        for key in field.misplaced_attributes() {
            self.violations.push(SchemaViolation::MisplacedAttribute {
                path: path.clone(),
                key: key.clone(),
                kind: field.kind.type_name(),
            });
        }

        if let Some(rule) = &field.visible_if {
            for (reference, expected) in rule.conditions() {
                self.condition(path, reference, expected);
            }
        }
    }

    fn condition(&mut self, path: &ModelPath, reference: &str, expected: &ExpectedValue) {
        match self.resolve(reference) {
            Reference::Earlier(target) => {
                if !condition_compatible(target, expected) {
                    self.violations.push(SchemaViolation::IncompatibleCondition {
                        path: path.clone(),
                        reference: reference.to_string(),
                        kind: target.kind.type_name(),
                        expected: expected.clone(),
                    });
                }
            }
            Reference::Later => {
                self.violations.push(SchemaViolation::ForwardReference {
                    path: path.clone(),
                    reference: reference.to_string(),
                });
            }
            Reference::Unknown => {
                self.violations.push(SchemaViolation::UnknownReference {
                    path: path.clone(),
                    reference: reference.to_string(),
                });
            }
        }
    }

    /// Binds a reference the way values are resolved at runtime: the innermost scope that
    /// declares the model wins, whether or not that declaration comes before the field.
    fn resolve(&self, reference: &str) -> Reference<'a> {
        for frame in self.scopes.iter().rev() {
            let Some(declared) = frame.declared.iter().find(|field| field.model == reference)
            else {
                continue;
            };
            let seen = frame
                .seen
                .iter()
                .any(|field| std::ptr::eq(*field, declared));
            return if seen {
                Reference::Earlier(declared)
            } else {
                Reference::Later
            };
        }
        Reference::Unknown
    }
}

enum Reference<'a> {
    Earlier(&'a Field),
    Later,
    Unknown,
}

fn condition_compatible(target: &Field, expected: &ExpectedValue) -> bool {
    match (&target.kind, expected) {
        (FieldKind::Checkbox, ExpectedValue::Flag(_)) => true,
        (FieldKind::Select { options }, ExpectedValue::Text(value)) => {
            options.iter().any(|option| &option.value == value)
        }
        (kind, ExpectedValue::Text(_)) => kind.holds_text(),
        _ => false,
    }
}
