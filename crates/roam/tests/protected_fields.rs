mod common;

use roam::{Cdr, Evse, PatchErrorKind, PatchOptions, Resource, ResourceHandle, Session, Tariff, Token};
use roam_core::ProtectedFields;
use serde_json::{json, Map, Value};

/// `a/b` becomes `{"a": {"b": value}}`.
fn patch_for(path: &str, value: Value) -> Value {
    path.rsplit('/').fold(value, |inner, segment| {
        let mut map = Map::new();
        map.insert(segment.to_owned(), inner);
        Value::Object(map)
    })
}

fn assert_every_path_rejected<R: Resource>(doc: Value) {
    let handle = ResourceHandle::new(common::parse::<R>(&doc));
    let original = handle.current();
    let protected = ProtectedFields::of::<R>();

    for path in protected.iter() {
        for value in [json!("changed"), json!(42), json!({"x": 1}), json!(null)] {
            let patch = patch_for(path, value.clone());
            let err = handle
                .patch(&patch, &PatchOptions::new("protected"))
                .expect_err(&format!("{} accepted a patch of {path} to {value}", R::KIND));
            assert_eq!(err.kind, PatchErrorKind::ProtectedField(path.to_owned()), "{}: {patch}", R::KIND);
            assert!(handle.current().ptr_eq(&original));
        }
    }
}

#[test]
fn evse_protected_paths() {
    assert_every_path_rejected::<Evse>(common::evse());
}

#[test]
fn tariff_protected_paths() {
    assert_every_path_rejected::<Tariff>(common::tariff());
}

#[test]
fn token_protected_paths() {
    assert_every_path_rejected::<Token>(common::token());
}

#[test]
fn session_protected_paths() {
    assert_every_path_rejected::<Session>(common::session());
}

#[test]
fn cdr_protected_paths() {
    assert_every_path_rejected::<Cdr>(common::cdr());
}

#[test]
fn protected_sets_include_identity() {
    let paths: Vec<&str> = ProtectedFields::of::<Session>().iter().collect();
    assert_eq!(
        paths,
        ["country_code", "party_id", "id", "version", "cdr_token/uid", "start_date_time"]
    );
    let paths: Vec<&str> = ProtectedFields::of::<Cdr>().iter().collect();
    assert_eq!(
        paths,
        ["country_code", "party_id", "id", "version", "charging_periods", "total_cost"]
    );
}

#[test]
fn siblings_of_nested_protected_path_are_patchable() {
    let session = common::parse::<Session>(&common::session());
    let next = roam_core::apply(
        &session,
        &json!({"cdr_token": {"contract_id": "NL8ACC99E46L89"}}),
        &PatchOptions::new("nested"),
    )
    .unwrap();
    assert_eq!(next.cdr_token().contract_id, "NL8ACC99E46L89");
    assert_eq!(next.cdr_token().uid, session.cdr_token().uid);
}

#[test]
fn first_protected_member_in_document_order_is_reported() {
    let evse = common::parse::<Evse>(&common::evse());
    let err = roam_core::apply(
        &evse,
        &json!({"floor_level": "2", "party_id": "XXX", "id": "E9"}),
        &PatchOptions::new("order"),
    )
    .unwrap_err();
    assert_eq!(err.kind, PatchErrorKind::ProtectedField("party_id".into()));
}
