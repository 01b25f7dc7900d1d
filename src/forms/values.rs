use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::{ExpectedValue, FieldKind, ModelPath};

/// Caller-owned values entered into a form, keyed by model. Groups nest their own values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues {
    entries: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn with(mut self, model: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(model, value);
        self
    }

    pub fn insert(&mut self, model: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.insert(model.into(), value.into());
    }

    pub fn remove(&mut self, model: &str) -> Option<FieldValue> {
        self.entries.remove(model)
    }

    pub fn get(&self, model: &str) -> Option<&FieldValue> {
        self.entries.get(model)
    }

    /// Follows a dotted path through nested group values.
    pub fn get_path(&self, path: &ModelPath) -> Option<&FieldValue> {
        let (last, parents) = path.segments().split_last()?;
        let mut scope = self;
        for segment in parents {
            scope = scope.group(segment)?;
        }
        scope.get(last)
    }

    pub fn group(&self, model: &str) -> Option<&FormValues> {
        match self.entries.get(model) {
            Some(FieldValue::Group(values)) => Some(values),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(model, value)| (model.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keys of a file reference object. A group declaring both as children is rejected at load
/// time, since its values would read as a file reference.
pub const FILE_REFERENCE_KEYS: [&str; 2] = ["fileName", "storageKey"];

/// One entered value. The JSON shape decides the variant: booleans are flags, strings are
/// text, objects holding exactly [`FILE_REFERENCE_KEYS`] are file references, other objects
/// are groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    File(FileReference),
    Group(FormValues),
}

impl FieldValue {
    /// Value a field reads as when nothing was entered.
    pub fn blank_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Checkbox => FieldValue::Flag(false),
            FieldKind::Group { .. } => FieldValue::Group(FormValues::default()),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// Unchecked boxes, blank strings, unnamed files and groups without content count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Flag(flag) => !flag,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::File(file) => file.file_name.trim().is_empty(),
            FieldValue::Group(values) => values.iter().all(|(_, value)| value.is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileReference> {
        match self {
            FieldValue::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn matches(&self, expected: &ExpectedValue) -> bool {
        match (self, expected) {
            (FieldValue::Flag(actual), ExpectedValue::Flag(wanted)) => actual == wanted,
            (FieldValue::Text(actual), ExpectedValue::Text(wanted)) => actual == wanted,
            _ => false,
        }
    }

    pub const fn shape(&self) -> &'static str {
        match self {
            FieldValue::Flag(_) => "flag",
            FieldValue::Text(_) => "text",
            FieldValue::File(_) => "file",
            FieldValue::Group(_) => "group",
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<FileReference> for FieldValue {
    fn from(value: FileReference) -> Self {
        Self::File(value)
    }
}

impl From<FormValues> for FieldValue {
    fn from(value: FormValues) -> Self {
        Self::Group(value)
    }
}

/// Handle to an uploaded file. Content never travels with the form values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileReference {
    pub file_name: String,
    pub storage_key: String,
}

impl FileReference {
    pub fn new(file_name: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            storage_key: storage_key.into(),
        }
    }

    /// Lower-cased extension including the leading dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.trim();
        let (stem, extension) = name.rsplit_once('.')?;
        if stem.is_empty() || extension.is_empty() {
            return None;
        }
        Some(format!(".{}", extension.to_ascii_lowercase()))
    }
}
