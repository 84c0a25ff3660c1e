use cellbind_core::{to_xml, ObjectRegistry, RegistryError};
use parking_lot::Mutex;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

#[derive(Debug, Serialize)]
struct Quote {
    symbol: String,
    price: f64,
    tags: Vec<String>,
}

fn quote() -> Quote {
    Quote {
        symbol: "MSFT".to_string(),
        price: 42.5,
        tags: vec!["tech".to_string()],
    }
}

struct Opaque;

impl Serialize for Opaque {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("opaque handle has no public state"))
    }
}

#[derive(Serialize)]
struct Holder {
    name: String,
    inner: Opaque,
}

#[test]
fn serializes_fields_as_child_elements_in_order() {
    let xml = to_xml(&quote()).expect("serialize quote");

    assert!(xml.starts_with("<Quote>"), "unexpected xml: {xml}");
    assert!(xml.ends_with("</Quote>"), "unexpected xml: {xml}");
    let symbol = xml.find("<symbol>MSFT</symbol>").expect("symbol element");
    let price = xml.find("<price>42.5</price>").expect("price element");
    let tags = xml.find("<tags>tech</tags>").expect("tags element");
    assert!(symbol < price && price < tags);
    assert!(!xml.contains("xmlns"));
}

#[test]
fn unsupported_field_value_is_reported() {
    let err = to_xml(&Holder {
        name: "h".to_string(),
        inner: Opaque,
    })
    .expect_err("opaque field must fail");

    match err {
        RegistryError::UnserializableFieldType { type_name, reason } => {
            assert_eq!(type_name, "Holder");
            assert!(reason.contains("no public state"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn serialize_handle_supports_plain_and_locked_entries() {
    let mut registry = ObjectRegistry::new();
    let plain = registry.register("quote", quote()).expect("register plain");
    let locked = registry
        .register("quote", Mutex::new(quote()))
        .expect("register locked");

    let plain_xml = registry
        .serialize_handle::<Quote>(&plain)
        .expect("plain serialize");
    let locked_xml = registry
        .serialize_handle::<Quote>(&locked)
        .expect("locked serialize");
    assert_eq!(plain_xml, locked_xml);

    assert!(matches!(
        registry.serialize_handle::<Quote>("never-registered"),
        Err(RegistryError::ObjectMissing(_))
    ));
    let other = registry.register("n", 5_u8).expect("register u8");
    assert!(matches!(
        registry.serialize_handle::<Quote>(&other),
        Err(RegistryError::TypeMismatch { .. })
    ));
}
