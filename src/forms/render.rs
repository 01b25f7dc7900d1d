use std::fmt::Write as _;

use serde::Serialize;

use super::schema::{FieldKind, Form, ModelPath, SelectOption};
use super::values::FormValues;
use super::visibility::resolve;

/// Input widget a renderer should draw for a field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    TextInput,
    EmailInput,
    PhoneInput,
    Dropdown,
    TextArea,
    FilePicker,
    Checkbox,
    Fieldset,
}

impl Widget {
    pub const fn for_kind(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Text => Widget::TextInput,
            FieldKind::Email => Widget::EmailInput,
            FieldKind::Tel => Widget::PhoneInput,
            FieldKind::Select { .. } => Widget::Dropdown,
            FieldKind::Textarea => Widget::TextArea,
            FieldKind::File { .. } => Widget::FilePicker,
            FieldKind::Checkbox => Widget::Checkbox,
            FieldKind::Group { .. } => Widget::Fieldset,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Widget::TextInput => "text input",
            Widget::EmailInput => "email input",
            Widget::PhoneInput => "phone input",
            Widget::Dropdown => "dropdown",
            Widget::TextArea => "text area",
            Widget::FilePicker => "file picker",
            Widget::Checkbox => "checkbox",
            Widget::Fieldset => "fieldset",
        }
    }
}

/// One control in render order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedControl {
    pub model: ModelPath,
    pub widget: Widget,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,
    pub visible: bool,
    pub depth: usize,
}

/// Controls for a form in sequence order, groups followed by their nested controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub title: String,
    pub description: String,
    pub controls: Vec<RenderedControl>,
}

impl RenderPlan {
    pub fn build(form: &Form, values: &FormValues) -> Self {
        let controls = resolve(form, values)
            .into_iter()
            .map(|entry| RenderedControl {
                depth: entry.depth(),
                model: entry.path,
                widget: Widget::for_kind(&entry.field.kind),
                label: entry.field.label.clone(),
                required: entry.field.required,
                placeholder: entry.field.placeholder.clone(),
                options: entry.field.options().map(<[_]>::to_vec).unwrap_or_default(),
                accept: entry.field.accepted_extensions(),
                visible: entry.visible,
            })
            .collect();

        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            controls,
        }
    }

    pub fn visible_controls(&self) -> impl Iterator<Item = &RenderedControl> {
        self.controls.iter().filter(|control| control.visible)
    }

    /// Plain-text outline of the shown controls, indented by group depth.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", self.description);

        for control in self.visible_controls() {
            let indent = "  ".repeat(control.depth);
            let marker = if control.required { " *" } else { "" };
            let _ = write!(
                out,
                "\n{indent}- {}{marker} [{}] ({})",
                control.label,
                control.widget.label(),
                control.model
            );
            if let Some(placeholder) = &control.placeholder {
                let _ = write!(out, " e.g. {placeholder}");
            }
            if !control.options.is_empty() {
                let values = control
                    .options
                    .iter()
                    .map(|option| option.value.as_str())
                    .collect::<Vec<_>>();
                let _ = write!(out, " options: {}", values.join(" | "));
            }
            if !control.accept.is_empty() {
                let _ = write!(out, " accepts: {}", control.accept.join(" "));
            }
        }

        out.push('\n');
        out
    }
}
