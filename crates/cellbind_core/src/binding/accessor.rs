//! Statically typed property accessors.
//!
//! An accessor names one settable property `P` of a target type `T` and
//! carries the setter that writes it. Callers normally build one with the
//! [`property!`](crate::property) macro, which only accepts a direct field
//! reference.

use crate::binding::BindingError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

static PROPERTY_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid property name regex"));

pub(crate) type Setter<T, P> = Arc<dyn Fn(&mut T, P) + Send + Sync>;

/// Named setter for one property of `T`.
pub struct PropertyAccessor<T, P> {
    property: String,
    setter: Setter<T, P>,
}

impl<T, P> PropertyAccessor<T, P> {
    /// Creates an accessor from a property name and an explicit setter.
    ///
    /// # Errors
    /// - `InvalidAccessor` when `property` is not a plain identifier
    ///   (for example an expression such as `price * 2`).
    pub fn new<F>(property: &str, setter: F) -> Result<Self, BindingError>
    where
        F: Fn(&mut T, P) + Send + Sync + 'static,
    {
        let normalized = property.trim();
        if !PROPERTY_NAME_RE.is_match(normalized) {
            return Err(BindingError::InvalidAccessor(property.to_string()));
        }
        Ok(Self {
            property: normalized.to_string(),
            setter: Arc::new(setter),
        })
    }

    /// Field-reference constructor used by [`property!`](crate::property).
    ///
    /// `stringify!` of an identifier is always a valid name, so no check runs.
    #[doc(hidden)]
    pub fn from_field<F>(property: &'static str, setter: F) -> Self
    where
        F: Fn(&mut T, P) + Send + Sync + 'static,
    {
        Self {
            property: property.to_string(),
            setter: Arc::new(setter),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Writes `value` into `target`.
    pub fn apply(&self, target: &mut T, value: P) {
        (self.setter)(target, value)
    }

    pub(crate) fn into_parts(self) -> (String, Setter<T, P>) {
        (self.property, self.setter)
    }
}

impl<T, P> Clone for PropertyAccessor<T, P> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            setter: Arc::clone(&self.setter),
        }
    }
}

impl<T, P> Debug for PropertyAccessor<T, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("property", &self.property)
            .field("value_type", &std::any::type_name::<P>())
            .finish()
    }
}

/// Builds a [`PropertyAccessor`] for a direct field of a type.
///
/// ```
/// use cellbind_core::property;
///
/// struct Quote {
///     price: f64,
/// }
///
/// let accessor = property!(Quote, price);
/// let mut quote = Quote { price: 0.0 };
/// accessor.apply(&mut quote, 42.5);
/// assert_eq!(quote.price, 42.5);
/// assert_eq!(accessor.property(), "price");
/// ```
#[macro_export]
macro_rules! property {
    ($target:ty, $field:ident) => {
        $crate::PropertyAccessor::<$target, _>::from_field(
            stringify!($field),
            |target: &mut $target, value| target.$field = value,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::PropertyAccessor;
    use crate::binding::BindingError;

    #[derive(Default)]
    struct Position {
        qty: i64,
        symbol: String,
    }

    #[test]
    fn new_accepts_identifiers_and_trims() {
        let accessor = PropertyAccessor::<Position, i64>::new(" qty ", |t, v| t.qty = v)
            .expect("identifier should be accepted");
        assert_eq!(accessor.property(), "qty");

        let mut position = Position::default();
        accessor.apply(&mut position, 12);
        assert_eq!(position.qty, 12);
    }

    #[test]
    fn new_rejects_computed_expressions() {
        for bad in ["", "   ", "qty * 2", "inner.qty", "1qty", "qty()"] {
            let err = PropertyAccessor::<Position, i64>::new(bad, |t, v| t.qty = v)
                .expect_err("non-identifier accessor must fail");
            assert_eq!(err, BindingError::InvalidAccessor(bad.to_string()));
        }
    }

    #[test]
    fn macro_infers_value_type_from_field() {
        let accessor = crate::property!(Position, symbol);
        let mut position = Position::default();
        accessor.apply(&mut position, "MSFT".to_string());
        assert_eq!(position.symbol, "MSFT");
        assert!(format!("{accessor:?}").contains("String"));
    }
}
