use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::{FieldKind, Form};
use super::values::{FieldValue, FormValues};
use super::visibility::resolve;

/// Whether values entered into fields that are currently hidden still reach the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPolicy {
    pub include_hidden_values: bool,
}

/// Flat submission payload keyed by fully qualified model path (e.g. `address.street`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    entries: BTreeMap<String, FieldValue>,
}

impl Submission {
    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(path, value)| (path.as_str(), value))
    }
}

/// Collect leaf values into the payload. Checkboxes always report their state; other fields
/// appear only when something was entered. Groups contribute their leaves, never themselves.
pub fn assemble(form: &Form, values: &FormValues, policy: SubmissionPolicy) -> Submission {
    let mut entries = BTreeMap::new();

    for entry in resolve(form, values) {
        if entry.field.is_group() || !(entry.visible || policy.include_hidden_values) {
            continue;
        }

        let value = match (entry.value, &entry.field.kind) {
            (Some(value), _) => value.clone(),
            (None, FieldKind::Checkbox) => FieldValue::Flag(false),
            (None, _) => continue,
        };
        entries.insert(entry.path.to_string(), value);
    }

    Submission { entries }
}
