//! XML rendering of registered objects.
//!
//! The document root is named after the object's type and every field
//! becomes one child element, in declaration order. No namespace is
//! declared.

use crate::object::handle::short_type_name;
use crate::object::RegistryError;
use serde::Serialize;
use std::any::type_name;

/// Serializes `object` to an XML document.
///
/// # Errors
/// - `UnserializableFieldType` when a field value has no XML representation
///   (for example a map keyed by a non-scalar) or its `Serialize` impl fails.
pub fn to_xml<V>(object: &V) -> Result<String, RegistryError>
where
    V: Serialize + ?Sized,
{
    quick_xml::se::to_string(object).map_err(|err| RegistryError::UnserializableFieldType {
        type_name: short_type_name(type_name::<V>()),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::to_xml;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Trade {
        symbol: String,
        qty: i64,
        settled: bool,
    }

    #[test]
    fn root_is_type_name_and_fields_keep_order() {
        let xml = to_xml(&Trade {
            symbol: "MSFT".to_string(),
            qty: 10,
            settled: false,
        })
        .expect("trade should serialize");
        assert_eq!(
            xml,
            "<Trade><symbol>MSFT</symbol><qty>10</qty><settled>false</settled></Trade>"
        );
        assert!(!xml.contains("xmlns"));
    }
}
