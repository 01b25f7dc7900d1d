use std::sync::Arc;

use super::common::*;
use crate::forms::service::{FormService, FormServiceError};
use crate::forms::submission::{assemble, SubmissionPolicy};
use crate::forms::validation::Constraint;
use crate::forms::values::FieldValue;

#[test]
fn payload_uses_qualified_paths() {
    let submission = assemble(form(), &complete_values(), SubmissionPolicy::default());

    assert_eq!(
        submission.get("address.street"),
        Some(&FieldValue::from("12 Harbor Road"))
    );
    assert_eq!(
        submission.get("address.postalCode"),
        Some(&FieldValue::from("50309"))
    );
    assert!(!submission.contains("address"));
    assert!(!submission.contains("street"));
}

#[test]
fn files_contribute_references() {
    let submission = assemble(form(), &complete_values(), SubmissionPolicy::default());

    let file = submission
        .get("resume")
        .and_then(FieldValue::as_file)
        .expect("resume reference submitted");
    assert_eq!(file, &resume());
}

#[test]
fn hidden_values_are_excluded_by_default() {
    let values = complete_values()
        .with("employed", false)
        .with("employer", "Riverfront Lofts");

    let submission = assemble(form(), &values, SubmissionPolicy::default());
    assert!(!submission.contains("employer"));
    assert_eq!(submission.get("employed"), Some(&FieldValue::Flag(false)));

    let policy = SubmissionPolicy {
        include_hidden_values: true,
    };
    let submission = assemble(form(), &values, policy);
    assert_eq!(
        submission.get("employer"),
        Some(&FieldValue::from("Riverfront Lofts"))
    );
}

#[test]
fn unentered_fields_are_left_out() {
    let mut values = complete_values();
    values.remove("employed");

    let submission = assemble(form(), &values, SubmissionPolicy::default());

    assert!(!submission.contains("coverLetter"));
    assert_eq!(submission.get("employed"), Some(&FieldValue::Flag(false)));
    assert_eq!(submission.len(), 10);
}

#[test]
fn service_submits_only_valid_values() {
    let service = service();

    let submission = service
        .submit(&employed_values())
        .expect("valid values submit");
    assert_eq!(
        submission.get("employer"),
        Some(&FieldValue::from("Riverfront Lofts"))
    );

    match service.submit(&complete_values().with("email", "not-an-email")) {
        Err(FormServiceError::Invalid(report)) => {
            assert!(report.has("email", Constraint::Email));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn service_refuses_malformed_forms() {
    let mut broken = form().clone();
    broken.fields.push(crate::forms::schema::Field::select(
        "Team",
        "team",
        Vec::new(),
    ));

    let result = FormService::new(Arc::new(broken), SubmissionPolicy::default());

    let error = result.expect_err("guard rejects the form");
    assert_eq!(error.violations.len(), 1);
}

#[test]
fn submission_serializes_as_flat_object() {
    let submission = assemble(form(), &complete_values(), SubmissionPolicy::default());
    let json = serde_json::to_value(&submission).expect("submission serializes");

    assert_eq!(json["address.city"], "Des Moines");
    assert_eq!(json["agree"], true);
    assert_eq!(json["resume"]["fileName"], "jane-doe-resume.pdf");
    assert_eq!(json["resume"]["storageKey"], "uploads/app-123/resume.pdf");
}
