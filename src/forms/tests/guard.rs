use super::common::*;
use crate::forms::guard::{SchemaGuard, SchemaViolation};
use crate::forms::schema::{Field, Form, ModelPath, SelectOption};

fn form_with(fields: Vec<Field>) -> Form {
    Form::new("Test", "Guard fixtures", fields)
}

#[test]
fn catalog_passes_the_guard() {
    assert!(SchemaGuard::default().check(form()).is_ok());
    assert!(SchemaGuard::with_max_group_depth(1).check(form()).is_ok());
}

#[test]
fn select_without_options_is_rejected() {
    let form = form_with(vec![Field::select("Position", "position", Vec::new())]);

    let violations = SchemaGuard::default().inspect(&form);

    assert_eq!(
        violations,
        vec![SchemaViolation::MissingOptions {
            path: ModelPath::from("position")
        }]
    );
}

#[test]
fn repeated_option_values_are_rejected() {
    let form = form_with(vec![Field::select(
        "Position",
        "position",
        vec![
            SelectOption::new("Frontend", "frontend"),
            SelectOption::new("Front end", "frontend"),
        ],
    )]);

    match SchemaGuard::default().inspect(&form).as_slice() {
        [SchemaViolation::InvalidOption { value, .. }] => assert_eq!(value, "frontend"),
        other => panic!("expected invalid option, got {other:?}"),
    }
}

#[test]
fn duplicate_models_are_scoped() {
    let form = form_with(vec![
        Field::email("Email", "email"),
        Field::group(
            "Referee",
            "referee",
            vec![Field::email("Email", "email"), Field::text("Name", "name")],
        ),
        Field::text("Work email", "email"),
    ]);

    let violations = SchemaGuard::default().inspect(&form);

    assert_eq!(
        violations,
        vec![SchemaViolation::DuplicateModel {
            path: ModelPath::from("email")
        }]
    );
}

#[test]
fn visibility_must_reference_earlier_fields() {
    let form = form_with(vec![
        Field::text("Employer", "employer").visible_if("employed", true),
        Field::checkbox("Employed", "employed"),
        Field::text("Manager", "manager").visible_if("supervisor", true),
        Field::checkbox("Remote", "remote").visible_if("remote", true),
    ]);

    let violations = SchemaGuard::default().inspect(&form);

    assert_eq!(
        violations,
        vec![
            SchemaViolation::ForwardReference {
                path: ModelPath::from("employer"),
                reference: "employed".to_string(),
            },
            SchemaViolation::UnknownReference {
                path: ModelPath::from("manager"),
                reference: "supervisor".to_string(),
            },
            SchemaViolation::ForwardReference {
                path: ModelPath::from("remote"),
                reference: "remote".to_string(),
            },
        ]
    );
}

#[test]
fn nested_fields_may_reference_enclosing_scope() {
    let form = form_with(vec![
        Field::checkbox("Relocating", "relocating"),
        Field::group(
            "Address",
            "address",
            vec![Field::text("Moving date", "movingDate").visible_if("relocating", true)],
        ),
    ]);

    assert!(SchemaGuard::default().check(&form).is_ok());
}

#[test]
fn conditions_must_fit_the_referenced_kind() {
    let form = form_with(vec![
        Field::checkbox("Employed", "employed"),
        Field::text("Employer", "employer").visible_if("employed", "yes"),
        Field::select(
            "Position",
            "position",
            vec![SelectOption::new("Backend Developer", "backend")],
        ),
        Field::text("Stack", "stack").visible_if("position", "design"),
        Field::text("Languages", "languages").visible_if("position", "backend"),
    ]);

    let violations = SchemaGuard::default().inspect(&form);

    assert_eq!(violations.len(), 2);
    assert!(matches!(
        &violations[0],
        SchemaViolation::IncompatibleCondition { kind: "checkbox", reference, .. } if reference == "employed"
    ));
    assert!(matches!(
        &violations[1],
        SchemaViolation::IncompatibleCondition { kind: "select", reference, .. } if reference == "position"
    ));
}

#[test]
fn depth_limit_applies_to_nested_groups() {
    let form = form_with(vec![Field::group(
        "Employment",
        "employment",
        vec![Field::group(
            "Previous employer",
            "previous",
            vec![Field::text("Name", "name")],
        )],
    )]);

    assert!(SchemaGuard::default().check(&form).is_ok());
    assert_eq!(
        SchemaGuard::with_max_group_depth(1).inspect(&form),
        vec![SchemaViolation::NestingTooDeep {
            path: ModelPath::from("employment.previous"),
            max: 1,
        }]
    );
}

#[test]
fn empty_groups_and_accept_lists_are_rejected() {
    let form = form_with(vec![
        Field::group("Address", "address", Vec::new()),
        Field::file("Resume", "resume", " , "),
        Field::text("", " "),
    ]);

    let violations = SchemaGuard::default().inspect(&form);

    assert_eq!(violations.len(), 3);
    assert!(matches!(violations[0], SchemaViolation::EmptyGroup { .. }));
    assert!(matches!(violations[1], SchemaViolation::EmptyAcceptList { .. }));
    assert!(matches!(violations[2], SchemaViolation::EmptyModel { .. }));
}

#[test]
fn schema_error_lists_every_violation() {
    let form = form_with(vec![
        Field::select("Position", "position", Vec::new()),
        Field::text("Employer", "employer").visible_if("employed", true),
    ]);

    let error = SchemaGuard::default()
        .check(&form)
        .expect_err("malformed form rejected");
    let message = error.to_string();

    assert_eq!(error.violations.len(), 2);
    assert!(message.contains("position: select field declares no options"));
    assert!(message.contains("employer: visibleIf references unknown model \"employed\""));
}

#[test]
fn kind_specific_keys_on_other_kinds_are_reported() {
    let raw = r#"{ "title": "t", "description": "d", "fields": [
        { "type": "text", "label": "Nickname", "model": "nickname",
          "options": [{ "label": "A", "value": "a" }], "accept": ".pdf", "fields": [] },
        { "type": "file", "label": "Resume", "model": "resume", "accept": ".pdf" }
    ] }"#;
    let form = Form::from_json(raw).expect("definition parses");

    let violations = SchemaGuard::default().inspect(&form);

    let keys = violations
        .iter()
        .map(|violation| match violation {
            SchemaViolation::MisplacedAttribute { path, key, kind } => {
                assert_eq!(path, &ModelPath::from("nickname"));
                assert_eq!(*kind, "text");
                key.as_str()
            }
            other => panic!("unexpected violation {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(keys, vec!["options", "accept", "fields"]);
}

#[test]
fn select_and_group_attributes_may_be_omitted_in_json() {
    let raw = r#"{ "title": "t", "description": "d", "fields": [
        { "type": "select", "label": "Team", "model": "team" },
        { "type": "group", "label": "Address", "model": "address" }
    ] }"#;
    let form = Form::from_json(raw).expect("definition parses");

    assert_eq!(
        SchemaGuard::default().inspect(&form),
        vec![
            SchemaViolation::MissingOptions {
                path: ModelPath::from("team")
            },
            SchemaViolation::EmptyGroup {
                path: ModelPath::from("address")
            },
        ]
    );
}

#[test]
fn later_sibling_shadows_an_earlier_outer_field() {
    let form = form_with(vec![
        Field::checkbox("Employed", "employed"),
        Field::group(
            "Address",
            "address",
            vec![
                Field::text("Street", "street").visible_if("employed", true),
                Field::checkbox("Employed here", "employed"),
            ],
        ),
    ]);

    assert_eq!(
        SchemaGuard::default().inspect(&form),
        vec![SchemaViolation::ForwardReference {
            path: ModelPath::from("address.street"),
            reference: "employed".to_string(),
        }]
    );
}

#[test]
fn groups_shaped_like_file_references_are_rejected() {
    let form = form_with(vec![Field::group(
        "Storage",
        "storage",
        vec![
            Field::text("File name", "fileName"),
            Field::text("Storage key", "storageKey"),
        ],
    )]);

    assert_eq!(
        SchemaGuard::default().inspect(&form),
        vec![SchemaViolation::ReservedGroupShape {
            path: ModelPath::from("storage")
        }]
    );
}
