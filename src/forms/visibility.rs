//! Visibility is recomputed from the current values every time it is asked for; no field
//! carries a stored "shown" flag.

use super::schema::{Field, FieldKind, Form, ModelPath};
use super::values::{FieldValue, FormValues};

#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    model: Option<&'a str>,
    fields: &'a [Field],
    values: Option<&'a FormValues>,
}

/// Chain of field lists from the form root down to the group currently being read.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> Scope<'a> {
    pub fn root(form: &'a Form, values: &'a FormValues) -> Self {
        Self {
            frames: vec![Frame {
                model: None,
                fields: &form.fields,
                values: Some(values),
            }],
        }
    }

    /// Scope of a group's nested fields, keeping the enclosing scopes for lookups.
    pub fn enter(&self, group: &'a Field) -> Self {
        let values = self
            .innermost()
            .values
            .and_then(|values| values.group(&group.model));

        let mut frames = self.frames.clone();
        frames.push(Frame {
            model: Some(group.model.as_str()),
            fields: group.children(),
            values,
        });
        Self { frames }
    }

    pub fn fields(&self) -> &'a [Field] {
        self.innermost().fields
    }

    pub fn value_of(&self, model: &str) -> Option<&'a FieldValue> {
        self.innermost()
            .values
            .and_then(|values| values.get(model))
    }

    pub fn path_of(&self, model: &str) -> ModelPath {
        self.frames
            .iter()
            .filter_map(|frame| frame.model)
            .fold(ModelPath::root(), |path, segment| path.child(segment))
            .child(model)
    }

    /// Resolve a referenced model in this scope first, then in each enclosing scope.
    pub fn lookup(&self, model: &str) -> Option<(&'a Field, Option<&'a FieldValue>)> {
        self.frames.iter().rev().find_map(|frame| {
            frame
                .fields
                .iter()
                .find(|field| field.model == model)
                .map(|field| (field, frame.values.and_then(|values| values.get(model))))
        })
    }

    fn innermost(&self) -> Frame<'a> {
        // root() always seeds one frame
        self.frames[self.frames.len() - 1]
    }
}

/// Evaluate a field's own `visibleIf` rule against the values visible from `scope`.
///
/// A reference that cannot be resolved hides the field. A referenced field without an entered
/// value reads as its blank value, so `{ employed: false }` holds for an untouched checkbox.
pub fn is_visible(field: &Field, scope: &Scope<'_>) -> bool {
    let Some(rule) = &field.visible_if else {
        return true;
    };

    rule.conditions()
        .all(|(reference, expected)| match scope.lookup(reference) {
            Some((_, Some(value))) => value.matches(expected),
            Some((target, None)) => FieldValue::blank_for(&target.kind).matches(expected),
            None => false,
        })
}

/// A field paired with its path, its entered value, and whether it is currently shown.
#[derive(Debug, Clone)]
pub struct ResolvedField<'a> {
    pub path: ModelPath,
    pub field: &'a Field,
    pub value: Option<&'a FieldValue>,
    pub visible: bool,
}

impl ResolvedField<'_> {
    pub fn depth(&self) -> usize {
        self.path.depth().saturating_sub(1)
    }
}

/// Every field in document order with its visibility; fields inside a hidden group are hidden.
pub fn resolve<'a>(form: &'a Form, values: &'a FormValues) -> Vec<ResolvedField<'a>> {
    let mut resolved = Vec::new();
    collect(&Scope::root(form, values), true, &mut resolved);
    resolved
}

fn collect<'a>(scope: &Scope<'a>, enclosing_visible: bool, out: &mut Vec<ResolvedField<'a>>) {
    for field in scope.fields() {
        let visible = enclosing_visible && is_visible(field, scope);
        out.push(ResolvedField {
            path: scope.path_of(&field.model),
            field,
            value: scope.value_of(&field.model),
            visible,
        });

        if let FieldKind::Group { .. } = field.kind {
            collect(&scope.enter(field), visible, out);
        }
    }
}

/// Paths of the fields currently shown, groups included.
pub fn visible_models(form: &Form, values: &FormValues) -> Vec<ModelPath> {
    resolve(form, values)
        .into_iter()
        .filter(|entry| entry.visible)
        .map(|entry| entry.path)
        .collect()
}
