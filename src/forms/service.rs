use std::sync::Arc;

use tracing::{debug, info, warn};

use super::catalog::job_application_form;
use super::guard::{SchemaError, SchemaGuard};
use super::render::RenderPlan;
use super::schema::{Form, ModelPath};
use super::submission::{assemble, Submission, SubmissionPolicy};
use super::validation::{validate, ValidationReport};
use super::values::FormValues;
use super::visibility::visible_models;

/// Facade pairing a guarded form definition with the submission policy.
#[derive(Debug, Clone)]
pub struct FormService {
    form: Arc<Form>,
    policy: SubmissionPolicy,
}

impl FormService {
    /// Accept a form only if it passes the schema guard.
    pub fn new(form: Arc<Form>, policy: SubmissionPolicy) -> Result<Self, SchemaError> {
        SchemaGuard::default().check(&form)?;
        info!(
            title = %form.title,
            fields = form.fields.len(),
            include_hidden_values = policy.include_hidden_values,
            "form service ready"
        );
        Ok(Self { form, policy })
    }

    pub fn job_application(policy: SubmissionPolicy) -> Result<Self, SchemaError> {
        Self::new(Arc::new(job_application_form().clone()), policy)
    }

    pub fn schema(&self) -> &Form {
        &self.form
    }

    pub fn policy(&self) -> SubmissionPolicy {
        self.policy
    }

    pub fn render(&self, values: &FormValues) -> RenderPlan {
        RenderPlan::build(&self.form, values)
    }

    pub fn visible_models(&self, values: &FormValues) -> Vec<ModelPath> {
        visible_models(&self.form, values)
    }

    pub fn validate(&self, values: &FormValues) -> ValidationReport {
        let report = validate(&self.form, values);
        debug!(
            form = %self.form.title,
            violations = report.violations.len(),
            "validated form values"
        );
        report
    }

    /// Validate and, when every shown field passes, assemble the submission payload.
    pub fn submit(&self, values: &FormValues) -> Result<Submission, FormServiceError> {
        let report = self.validate(values);
        if !report.is_valid() {
            warn!(form = %self.form.title, %report, "submission rejected");
            return Err(FormServiceError::Invalid(report));
        }

        let submission = assemble(&self.form, values, self.policy);
        info!(
            form = %self.form.title,
            entries = submission.len(),
            "submission assembled"
        );
        Ok(submission)
    }
}

/// Error raised by the form service.
#[derive(Debug, thiserror::Error)]
pub enum FormServiceError {
    #[error("submission failed validation: {0}")]
    Invalid(ValidationReport),
}

impl FormServiceError {
    pub fn report(&self) -> &ValidationReport {
        match self {
            FormServiceError::Invalid(report) => report,
        }
    }
}
