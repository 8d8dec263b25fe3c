mod common;

use roam::{Evse, SerializeFlags, SerializeOptions};

#[test]
fn flags_load_from_toml_with_defaults() {
    let flags: SerializeFlags = toml::from_str(
        r#"
        include_ownership_info = false
        include_vendor_extensions = false
        "#,
    )
    .unwrap();
    assert!(!flags.include_ownership_info);
    assert!(!flags.include_vendor_extensions);
    assert!(flags.include_version_info);
    assert!(flags.include_created);

    let empty: SerializeFlags = toml::from_str("").unwrap();
    assert_eq!(empty, SerializeFlags::FULL);
}

#[test]
fn flags_from_config_drive_serialization() {
    let flags: SerializeFlags = toml::from_str("include_ownership_info = false\ninclude_created = false").unwrap();
    let evse = common::parse::<Evse>(&common::evse());
    let tree = evse.serialize(&SerializeOptions::new(flags));
    let map = tree.as_object().unwrap();
    assert!(!map.contains_key("country_code"));
    assert!(!map.contains_key("party_id"));
    assert!(!map.contains_key("created"));
    assert!(map.contains_key("extensions"));
    assert!(map.contains_key("version"));
}

#[test]
fn flags_render_back_to_toml() {
    let text = toml::to_string(&SerializeFlags::MINIMAL).unwrap();
    let back: SerializeFlags = toml::from_str(&text).unwrap();
    assert_eq!(back, SerializeFlags::MINIMAL);
}
