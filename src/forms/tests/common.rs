use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;

use crate::forms::{
    form_router, job_application_form, FileReference, Form, FormService, FormValues,
    SubmissionPolicy,
};

pub(super) fn form() -> &'static Form {
    job_application_form()
}

pub(super) fn resume() -> FileReference {
    FileReference::new("jane-doe-resume.pdf", "uploads/app-123/resume.pdf")
}

pub(super) fn address() -> FormValues {
    FormValues::new()
        .with("street", "12 Harbor Road")
        .with("city", "Des Moines")
        .with("postalCode", "50309")
}

/// Values that satisfy every shown field while the applicant is not employed.
pub(super) fn complete_values() -> FormValues {
    FormValues::new()
        .with("fullName", "Jane Doe")
        .with("email", "jane@example.com")
        .with("phone", "5551234")
        .with("position", "backend")
        .with("resume", resume())
        .with("employed", false)
        .with("address", address())
        .with("agree", true)
}

pub(super) fn employed_values() -> FormValues {
    complete_values()
        .with("employed", true)
        .with("employer", "Riverfront Lofts")
}

pub(super) fn service() -> FormService {
    FormService::job_application(SubmissionPolicy::default()).expect("catalog passes guard")
}

pub(super) fn router() -> axum::Router {
    form_router(Arc::new(service()))
}

pub(super) fn json_request(method: &str, uri: &str, body: &impl Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
