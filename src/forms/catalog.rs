use std::path::Path;
use std::sync::OnceLock;

use tracing::{debug, info};

use super::guard::{SchemaError, SchemaGuard};
use super::schema::{Field, Form, SelectOption};

/// The job application form shared by every consumer of this crate.
pub fn job_application_form() -> &'static Form {
    static FORM: OnceLock<Form> = OnceLock::new();
    FORM.get_or_init(standard_job_application)
}

fn standard_job_application() -> Form {
    Form::new(
        "Job Application Form",
        "Please fill in your details and upload your resume.",
        vec![
            Field::text("Full Name", "fullName")
                .required()
                .placeholder("John Doe")
                .min_length(3),
            Field::email("Email Address", "email")
                .required()
                .placeholder("john@example.com")
                .must_be_email(),
            Field::tel("Phone Number", "phone")
                .required()
                .placeholder("+1 555-1234")
                .must_be_number(),
            Field::select(
                "Position Applying For",
                "position",
                vec![
                    SelectOption::new("Frontend Developer", "frontend"),
                    SelectOption::new("Backend Developer", "backend"),
                    SelectOption::new("Full Stack Developer", "fullstack"),
                ],
            )
            .required(),
            Field::textarea("Cover Letter", "coverLetter")
                .placeholder("Write something about yourself..."),
            Field::file("Upload Resume", "resume", ".pdf,.doc,.docx").required(),
            Field::checkbox("Are you currently employed?", "employed"),
            Field::text("Current Employer", "employer")
                .required()
                .visible_if("employed", true),
            Field::group(
                "Address Details",
                "address",
                vec![
                    Field::text("Street", "street")
                        .placeholder("Street")
                        .required(),
                    Field::text("City", "city").placeholder("City").required(),
                    Field::text("Postal Code", "postalCode")
                        .placeholder("Postal Code")
                        .required()
                        .must_be_number(),
                ],
            ),
            Field::checkbox("I agree to the terms and conditions", "agree").required(),
        ],
    )
}

/// Failure to load a form definition from disk.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("unable to read form schema {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("form schema {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] SchemaError),
}

/// Read a JSON form definition and reject it unless it passes the schema guard.
pub fn load_form(path: impl AsRef<Path>) -> Result<Form, SchemaLoadError> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let raw = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
        path: shown.clone(),
        source,
    })?;
    let form = Form::from_json(&raw).map_err(|source| SchemaLoadError::Parse {
        path: shown.clone(),
        source,
    })?;

    SchemaGuard::default().check(&form)?;
    debug!(path = %shown, fields = form.fields.len(), "form schema passed guard");
    info!(title = %form.title, path = %shown, "loaded form schema");

    Ok(form)
}
