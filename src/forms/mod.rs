//! Declarative form schema plus the contract renderers follow to consume it: render order,
//! visibility evaluation, per-field validation, and submission payload assembly.
//!
//! The schema is immutable once built. Entered values, visibility, and validation results are
//! always computed from caller-owned [`FormValues`].

pub mod catalog;
pub mod guard;
pub mod render;
pub mod router;
pub mod schema;
pub mod service;
pub mod submission;
pub mod validation;
pub mod values;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use catalog::{job_application_form, load_form, SchemaLoadError};
pub use guard::{SchemaError, SchemaGuard, SchemaViolation};
pub use render::{RenderPlan, RenderedControl, Widget};
pub use router::{form_router, AcceptedSubmission};
pub use schema::{
    ExpectedValue, Field, FieldKind, Form, ModelPath, SelectOption, ValidationRules,
    VisibilityRule,
};
pub use service::{FormService, FormServiceError};
pub use submission::{assemble, Submission, SubmissionPolicy};
pub use validation::{validate, Constraint, ValidationReport, Violation};
pub use values::{FieldValue, FileReference, FormValues};
pub use visibility::{is_visible, resolve, visible_models, ResolvedField, Scope};
