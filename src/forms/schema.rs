use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Root of a declarative form: a title, a description, and the ordered top-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub title: String,
    pub description: String,
    pub fields: Vec<Field>,
}

impl Form {
    pub fn new(title: impl Into<String>, description: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Depth-first listing of every field, groups included, with its fully qualified path.
    pub fn walk(&self) -> Vec<(ModelPath, &Field)> {
        let mut entries = Vec::new();
        walk_into(&self.fields, &ModelPath::root(), &mut entries);
        entries
    }

    /// Finds a field by its dotted model path (e.g. `address.postalCode`).
    pub fn field(&self, path: &str) -> Option<&Field> {
        let mut fields = self.fields.as_slice();
        let mut found = None;
        for segment in path.split('.') {
            let field = fields.iter().find(|field| field.model == segment)?;
            fields = field.children();
            found = Some(field);
        }
        found
    }
}

fn walk_into<'a>(fields: &'a [Field], prefix: &ModelPath, out: &mut Vec<(ModelPath, &'a Field)>) {
    for field in fields {
        let path = prefix.child(&field.model);
        out.push((path.clone(), field));
        walk_into(field.children(), &path, out);
    }
}

/// A single input descriptor. Kind-specific attributes live in [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawField")]
pub struct Field {
    pub label: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "ValidationRules::is_empty")]
    pub validation: ValidationRules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<VisibilityRule>,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Kind-specific keys a definition set on a field of another kind.
    #[serde(skip)]
    misplaced: Vec<String>,
}

impl Field {
    pub fn new(kind: FieldKind, label: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            model: model.into(),
            required: false,
            placeholder: None,
            validation: ValidationRules::default(),
            visible_if: None,
            kind,
            misplaced: Vec::new(),
        }
    }

    pub fn text(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(FieldKind::Text, label, model)
    }

    pub fn email(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(FieldKind::Email, label, model)
    }

    pub fn tel(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(FieldKind::Tel, label, model)
    }

    pub fn textarea(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(FieldKind::Textarea, label, model)
    }

    pub fn checkbox(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(FieldKind::Checkbox, label, model)
    }

    pub fn select(
        label: impl Into<String>,
        model: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(FieldKind::Select { options }, label, model)
    }

    pub fn file(
        label: impl Into<String>,
        model: impl Into<String>,
        accept: impl Into<String>,
    ) -> Self {
        Self::new(
            FieldKind::File {
                accept: Some(accept.into()),
            },
            label,
            model,
        )
    }

    pub fn group(label: impl Into<String>, model: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(FieldKind::Group { fields }, label, model)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.validation.min_length = Some(min_length);
        self
    }

    pub fn must_be_email(mut self) -> Self {
        self.validation.email = true;
        self
    }

    pub fn must_be_number(mut self) -> Self {
        self.validation.number = true;
        self
    }

    pub fn visible_if(mut self, model: impl Into<String>, expected: impl Into<ExpectedValue>) -> Self {
        self.visible_if
            .get_or_insert_with(VisibilityRule::default)
            .insert(model, expected);
        self
    }

    /// `options`, `accept` or `fields` keys that were given to a field of the wrong kind.
    pub fn misplaced_attributes(&self) -> &[String] {
        &self.misplaced
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, FieldKind::Group { .. })
    }

    /// Nested fields of a group; empty for every other kind.
    pub fn children(&self) -> &[Field] {
        match &self.kind {
            FieldKind::Group { fields } => fields,
            _ => &[],
        }
    }

    pub fn options(&self) -> Option<&[SelectOption]> {
        match &self.kind {
            FieldKind::Select { options } => Some(options),
            _ => None,
        }
    }

    /// Normalized extension allow-list of a file field, lower-cased with leading dots.
    pub fn accepted_extensions(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::File {
                accept: Some(accept),
            } => parse_accept_list(accept),
            _ => Vec::new(),
        }
    }
}

/// Wire shape of a field before its `type` decides which attributes belong to it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    #[serde(rename = "type")]
    kind: String,
    label: String,
    model: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    validation: ValidationRules,
    #[serde(default)]
    visible_if: Option<VisibilityRule>,
    #[serde(default)]
    options: Option<Vec<SelectOption>>,
    #[serde(default)]
    accept: Option<String>,
    #[serde(default)]
    fields: Option<Vec<Field>>,
}

impl TryFrom<RawField> for Field {
    type Error = String;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let RawField {
            kind,
            label,
            model,
            required,
            placeholder,
            validation,
            visible_if,
            mut options,
            mut accept,
            mut fields,
        } = raw;

        let kind = match kind.as_str() {
            "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "tel" => FieldKind::Tel,
            "textarea" => FieldKind::Textarea,
            "checkbox" => FieldKind::Checkbox,
            "select" => FieldKind::Select {
                options: options.take().unwrap_or_default(),
            },
            "file" => FieldKind::File {
                accept: accept.take(),
            },
            "group" => FieldKind::Group {
                fields: fields.take().unwrap_or_default(),
            },
            other => {
                return Err(format!(
                    "unknown field type `{other}`, expected one of text, email, tel, select, textarea, file, checkbox, group"
                ))
            }
        };

        let misplaced = [
            ("options", options.is_some()),
            ("accept", accept.is_some()),
            ("fields", fields.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(key, _)| key.to_string())
        .collect();

        Ok(Self {
            label,
            model,
            required,
            placeholder,
            validation,
            visible_if,
            kind,
            misplaced,
        })
    }
}

pub(crate) fn parse_accept_list(accept: &str) -> Vec<String> {
    accept
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let lowered = entry.to_ascii_lowercase();
            if lowered.starts_with('.') {
                lowered
            } else {
                format!(".{lowered}")
            }
        })
        .collect()
}

/// Input kind of a field. Groups are the recursive variant holding nested fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Select {
        options: Vec<SelectOption>,
    },
    Textarea,
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accept: Option<String>,
    },
    Checkbox,
    Group {
        fields: Vec<Field>,
    },
}

impl FieldKind {
    pub const fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
            FieldKind::Select { .. } => "select",
            FieldKind::Textarea => "textarea",
            FieldKind::File { .. } => "file",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Group { .. } => "group",
        }
    }

    /// Kinds whose entered value is a plain string.
    pub const fn holds_text(&self) -> bool {
        matches!(
            self,
            FieldKind::Text
                | FieldKind::Email
                | FieldKind::Tel
                | FieldKind::Select { .. }
                | FieldKind::Textarea
        )
    }
}

/// One `(label, value)` entry of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Per-field constraints; an unset constraint is never checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub email: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub number: bool,
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none() && !self.email && !self.number
    }
}

/// Conditional visibility: every referenced model must currently hold its expected value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityRule {
    conditions: BTreeMap<String, ExpectedValue>,
}

impl VisibilityRule {
    pub fn insert(&mut self, model: impl Into<String>, expected: impl Into<ExpectedValue>) {
        self.conditions.insert(model.into(), expected.into());
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &ExpectedValue)> {
        self.conditions
            .iter()
            .map(|(model, expected)| (model.as_str(), expected))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Value a referenced field must hold for a visibility rule to pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedValue {
    Flag(bool),
    Text(String),
}

impl From<bool> for ExpectedValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for ExpectedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ExpectedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for ExpectedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedValue::Flag(flag) => write!(f, "{flag}"),
            ExpectedValue::Text(text) => write!(f, "\"{text}\""),
        }
    }
}

/// Fully qualified location of a field's value, e.g. `address.street`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelPath(Vec<String>);

impl ModelPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, model: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(model.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for ModelPath {
    fn from(value: &str) -> Self {
        Self(
            value
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl Serialize for ModelPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModelPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ModelPath::from(raw.as_str()))
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
