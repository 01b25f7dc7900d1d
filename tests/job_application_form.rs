use std::path::PathBuf;
use std::sync::Arc;

use job_application_form::forms::{
    job_application_form, load_form, Constraint, FieldValue, FileReference, Form, FormService,
    FormValues, SchemaLoadError, SchemaViolation, SubmissionPolicy, Widget,
};

fn applicant() -> FormValues {
    FormValues::new()
        .with("fullName", "Jane Doe")
        .with("email", "jane@example.com")
        .with("phone", "5551234")
        .with("position", "fullstack")
        .with(
            "resume",
            FileReference::new("resume.pdf", "uploads/app-981/resume.pdf"),
        )
        .with(
            "address",
            FormValues::new()
                .with("street", "400 Locust Street")
                .with("city", "Des Moines")
                .with("postalCode", "50309"),
        )
        .with("agree", true)
}

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "job-application-form-{}-{name}",
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("write scratch file");
    path
}

#[test]
fn applicant_walks_through_the_form() {
    let service = FormService::job_application(SubmissionPolicy::default())
        .expect("catalog passes guard");

    let plan = service.render(&FormValues::new());
    let shown = plan
        .visible_controls()
        .map(|control| control.model.to_string())
        .collect::<Vec<_>>();
    assert!(!shown.contains(&"employer".to_string()));
    assert_eq!(plan.controls[5].widget, Widget::FilePicker);

    let values = applicant().with("employed", true);
    assert!(service
        .visible_models(&values)
        .iter()
        .any(|path| path.to_string() == "employer"));

    let report = service.validate(&values);
    assert!(report.has("employer", Constraint::Required));
    assert_eq!(report.violations.len(), 1);

    let values = values.with("employer", "Principal Financial");
    let submission = service.submit(&values).expect("complete values submit");
    assert_eq!(
        submission.get("employer"),
        Some(&FieldValue::from("Principal Financial"))
    );
    assert_eq!(
        submission.get("address.city"),
        Some(&FieldValue::from("Des Moines"))
    );
    assert_eq!(submission.get("employed"), Some(&FieldValue::Flag(true)));
}

#[test]
fn plain_text_outline_indents_group_members() {
    let plan = FormService::job_application(SubmissionPolicy::default())
        .expect("catalog passes guard")
        .render(&FormValues::new());

    let text = plan.to_text();

    assert!(text.starts_with("Job Application Form\n"));
    assert!(text.contains("- Full Name * [text input] (fullName) e.g. John Doe"));
    assert!(text.contains("\n  - Postal Code * [text input] (address.postalCode)"));
    assert!(text.contains("accepts: .pdf .doc .docx"));
    assert!(!text.contains("Current Employer"));
}

#[test]
fn exported_definition_loads_back() {
    let exported = job_application_form().to_json().expect("form serializes");
    let path = scratch_file("exported.json", &exported);

    let loaded = load_form(&path).expect("exported form loads");
    std::fs::remove_file(&path).ok();

    assert_eq!(&loaded, job_application_form());
}

#[test]
fn malformed_definitions_are_refused_on_load() {
    let raw = r#"{
        "title": "Broken",
        "description": "Refers to a later field",
        "fields": [
            { "type": "text", "label": "Employer", "model": "employer",
              "visibleIf": { "employed": true } },
            { "type": "checkbox", "label": "Employed", "model": "employed" }
        ]
    }"#;
    let path = scratch_file("broken.json", raw);

    let result = load_form(&path);
    std::fs::remove_file(&path).ok();

    match result {
        Err(SchemaLoadError::Invalid(err)) => {
            assert!(matches!(
                err.violations.as_slice(),
                [SchemaViolation::ForwardReference { reference, .. }] if reference == "employed"
            ));
        }
        other => panic!("expected invalid schema, got {other:?}"),
    }
}

#[test]
fn unreadable_definitions_report_the_path() {
    let path = std::env::temp_dir().join("job-application-form-missing.json");

    match load_form(&path) {
        Err(SchemaLoadError::Io { path: reported, .. }) => {
            assert_eq!(reported, path.display().to_string())
        }
        other => panic!("expected io error, got {other:?}"),
    }

    let path = scratch_file("garbage.json", "{ not json");
    let result = load_form(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(SchemaLoadError::Parse { .. })));
}

#[test]
fn custom_forms_share_the_same_contract() {
    let raw = r#"{
        "title": "Volunteer Sign-up",
        "description": "Tell us how to reach you.",
        "fields": [
            { "type": "checkbox", "label": "Can drive", "model": "driver" },
            { "type": "text", "label": "Licence number", "model": "licence",
              "required": true, "visibleIf": { "driver": true },
              "validation": { "number": true } }
        ]
    }"#;
    let form = Form::from_json(raw).expect("definition parses");
    let service = FormService::new(Arc::new(form), SubmissionPolicy::default())
        .expect("definition passes guard");

    assert!(service.validate(&FormValues::new()).is_valid());

    let report = service.validate(&FormValues::new().with("driver", true).with("licence", "X1"));
    assert!(report.has("licence", Constraint::Number));
}
