//! Validity-tracking nullable values.
//!
//! [`Nullable<T>`] wraps a value together with a validity flag, the classic
//! database-driver convention where "holds zero" and "holds nothing" are
//! different states. Unlike `Option<T>`, an invalid `Nullable` still carries
//! a (zero) value, and a valid `Nullable` holding zero is non-null.
//!
//! The wrapper plugs into `fm_marshal` through the custom-conversion hook:
//! a valid value marshals as its inner value's representation, an invalid
//! one as null — and the `omitNil`/`omitZero` tag options observe the
//! wrapper's own notion of nil and zero.
//!
//! # Examples
//!
//! ```
//! use fm_nullable::NullI64;
//!
//! let set = NullI64::new(42);
//! assert_eq!(set.get(), Some(&42));
//!
//! let unset = NullI64::null();
//! assert_eq!(unset.get(), None);
//! assert_eq!(unset.value_or_zero(), 0);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

use fm_marshal::{MarshalError, Marshaler, ToMap, Value, ValueRef, to_value};
use serde_core::de::{Deserialize, Deserializer};
use serde_core::ser::{Serialize, Serializer};

// -----------------------------------------------------------------------------
// Nullable

/// A value of type `T` that may be null.
///
/// A valid `Nullable` holding the zero value is considered non-null and
/// zero; an invalid one is both null and zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Nullable<T> {
    value: T,
    valid: bool,
}

/// A nullable boolean.
pub type NullBool = Nullable<bool>;
/// A nullable signed integer.
pub type NullI64 = Nullable<i64>;
/// A nullable unsigned integer.
pub type NullU64 = Nullable<u64>;
/// A nullable float.
pub type NullF64 = Nullable<f64>;
/// A nullable text value.
pub type NullString = Nullable<String>;

impl<T> Nullable<T> {
    /// Creates a valid `Nullable` from `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self { value, valid: true }
    }

    /// Returns the value if valid.
    #[inline]
    pub const fn get(&self) -> Option<&T> {
        if self.valid { Some(&self.value) } else { None }
    }

    /// Returns `true` if a meaningful value is present.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Stores `value`, marking this `Nullable` valid.
    #[inline]
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.valid = true;
    }

    /// Consumes this `Nullable`, returning the value if valid.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        if self.valid { Some(self.value) } else { None }
    }
}

impl<T: Default> Nullable<T> {
    /// Creates a null `Nullable` with no meaningful value.
    #[inline]
    pub fn null() -> Self {
        Self {
            value: T::default(),
            valid: false,
        }
    }

    /// Creates a `Nullable` from an `Option`: `None` becomes null.
    #[inline]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::new(value),
            None => Self::null(),
        }
    }

    /// Marks this `Nullable` null, resetting the value to zero.
    #[inline]
    pub fn clear(&mut self) {
        self.value = T::default();
        self.valid = false;
    }
}

impl<T: Default + Clone> Nullable<T> {
    /// Returns the value if valid, or the type's zero value otherwise.
    #[inline]
    pub fn value_or_zero(&self) -> T {
        if self.valid {
            self.value.clone()
        } else {
            T::default()
        }
    }
}

impl<T: Default> Default for Nullable<T> {
    /// See [`Nullable::null`].
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<T> for Nullable<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Default> From<Option<T>> for Nullable<T> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

// -----------------------------------------------------------------------------
// Marshalling

impl<T: ToMap> ToMap for Nullable<T> {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Ref(self.get().map(|value| value as &dyn ToMap))
    }

    // Null, or the inner value's own zero.
    #[inline]
    fn is_zero(&self) -> bool {
        !self.valid || self.value.is_zero()
    }

    #[inline]
    fn is_nil(&self) -> bool {
        !self.valid
    }

    #[inline]
    fn as_marshaler(&self) -> Option<&dyn Marshaler> {
        Some(self)
    }
}

impl<T: ToMap> Marshaler for Nullable<T> {
    fn marshal_map_value(&self) -> Result<Value, MarshalError> {
        match self.get() {
            Some(value) => to_value(value),
            None => Ok(Value::Null),
        }
    }
}

// -----------------------------------------------------------------------------
// Serde

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.get() {
            Some(value) => serializer.serialize_some(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from_option)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use fm_marshal::{ToMap, Value, to_value};

    use super::{NullF64, NullI64, NullString, Nullable};

    #[test]
    fn constructors() {
        assert_eq!(NullI64::new(42).get(), Some(&42));
        assert_eq!(NullI64::null().get(), None);
        assert_eq!(NullI64::from_option(Some(42)), NullI64::new(42));
        assert_eq!(NullI64::from_option(None), NullI64::null());
        assert_eq!(NullI64::from(42), NullI64::new(42));
    }

    #[test]
    fn value_or_zero() {
        assert_eq!(NullI64::new(42).value_or_zero(), 42);
        assert_eq!(NullI64::null().value_or_zero(), 0);
        assert_eq!(NullString::null().value_or_zero(), "");
    }

    #[test]
    fn set_and_clear() {
        let mut value = NullI64::null();
        value.set(7);
        assert!(value.is_valid());
        value.clear();
        assert_eq!(value, NullI64::null());
    }

    #[test]
    fn nil_and_zero_track_validity() {
        // A valid zero is non-nil but zero.
        let zero = NullI64::new(0);
        assert!(!zero.is_nil());
        assert!(zero.is_zero());

        let set = NullF64::new(1.5);
        assert!(!set.is_nil());
        assert!(!set.is_zero());

        let unset = NullF64::null();
        assert!(unset.is_nil());
        assert!(unset.is_zero());
    }

    #[test]
    fn hook_emits_the_inner_value_or_null() {
        assert_eq!(to_value(&NullI64::new(42)).unwrap(), Value::Int(42));
        assert_eq!(to_value(&NullI64::null()).unwrap(), Value::Null);
        assert_eq!(
            to_value(&NullString::new("text".into())).unwrap(),
            Value::String("text".into())
        );
    }

    #[test]
    fn nested_nullables_unwrap_through_the_hook() {
        let nested: Nullable<NullI64> = Nullable::new(NullI64::new(3));
        assert_eq!(to_value(&nested).unwrap(), Value::Int(3));
    }

    #[test]
    fn marshalling_a_wrapper_struct_goes_through_the_hook() {
        use fm_marshal::derive::ToMap;
        use fm_marshal::marshal;

        #[derive(ToMap)]
        struct Wrapper {
            pub score: NullI64,
            #[map(",omitNil")]
            pub bonus: NullI64,
            #[map(",omitZero")]
            pub penalty: NullI64,
        }

        let doc = marshal(&Wrapper {
            score: NullI64::new(42),
            bonus: NullI64::null(),
            penalty: NullI64::new(0),
        })
        .unwrap();

        // The hook emits the inner value; null and zero wrappers obey the
        // omit options through the wrapper's own `is_nil`/`is_zero`.
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["score"]);
        assert_eq!(doc.get("score"), Some(&Value::Int(42)));

        let doc = marshal(&Wrapper {
            score: NullI64::null(),
            bonus: NullI64::new(7),
            penalty: NullI64::new(-1),
        })
        .unwrap();
        assert_eq!(doc.get("score"), Some(&Value::Null));
        assert_eq!(doc.get("bonus"), Some(&Value::Int(7)));
        assert_eq!(doc.get("penalty"), Some(&Value::Int(-1)));
    }

    #[test]
    fn serde_round_trips_null_and_values() {
        assert_eq!(serde_json::to_string(&NullI64::new(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&NullI64::null()).unwrap(), "null");

        let parsed: NullI64 = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, NullI64::new(42));
        let parsed: NullI64 = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, NullI64::null());
    }
}
