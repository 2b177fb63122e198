use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::Document;

// -----------------------------------------------------------------------------
// Value

/// A generic output value produced by marshalling.
///
/// `Value` is the in-memory hand-off format: scalars pass through unchanged
/// (widened to the canonical variant), structs become ordered [`Document`]s,
/// sequences convert element-wise, and values that must be emitted as-is are
/// carried type-erased in [`Value::Opaque`].
///
/// # Examples
///
/// ```
/// use fm_marshal::Value;
///
/// let value = Value::from(42);
/// assert_eq!(value.as_i64(), Some(42));
/// assert!(!value.is_zero());
/// assert!(Value::from("").is_zero());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An absent or nil reference.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer; every signed width widens to `i64`.
    Int(i64),
    /// An unsigned integer; every unsigned width widens to `u64`.
    UInt(u64),
    /// A floating-point number; `f32` widens to `f64`.
    Float(f64),
    /// A text value.
    String(String),
    /// A converted sequence, element order preserved.
    Seq(Vec<Value>),
    /// A converted struct: an ordered field-name → value mapping.
    Map(Document),
    /// A pass-through value emitted as-is, without conversion.
    ///
    /// Raw maps and `value`-tagged fields land here.
    Opaque(OpaqueValue),
}

impl Value {
    /// Wraps an arbitrary value for as-is emission.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use fm_marshal::Value;
    ///
    /// let raw: BTreeMap<i32, i32> = [(1, 2)].into();
    /// let value = Value::opaque(raw.clone());
    /// assert_eq!(value.downcast_opaque::<BTreeMap<i32, i32>>(), Some(&raw));
    /// ```
    #[inline]
    pub fn opaque<T: Opaque>(value: T) -> Self {
        Self::Opaque(OpaqueValue::new(value))
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns whether this value equals its variant's zero value.
    ///
    /// Opaque values are never zero; their payload is not inspectable.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(value) => !value,
            Self::Int(value) => *value == 0,
            Self::UInt(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
            Self::String(value) => value.is_empty(),
            Self::Seq(value) => value.is_empty(),
            Self::Map(value) => value.is_empty(),
            Self::Opaque(_) => false,
        }
    }

    /// Returns the boolean payload, if this is a [`Value::Bool`].
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the signed integer payload, if this is a [`Value::Int`].
    #[inline]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the unsigned integer payload, if this is a [`Value::UInt`].
    #[inline]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a [`Value::Float`].
    #[inline]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a [`Value::String`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements, if this is a [`Value::Seq`].
    #[inline]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the document, if this is a [`Value::Map`].
    #[inline]
    pub const fn as_doc(&self) -> Option<&Document> {
        match self {
            Self::Map(value) => Some(value),
            _ => None,
        }
    }

    /// Downcasts an opaque payload to a concrete type.
    ///
    /// Returns `None` if this is not [`Value::Opaque`] or the payload is of a
    /// different type.
    #[inline]
    pub fn downcast_opaque<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(value) => value.downcast_ref(),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value as $conv)
            }
        }
    )*};
}

impl_value_from! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    isize => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    usize => UInt as u64,
    f32 => Float as f64,
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::Seq(value)
    }
}

impl From<Document> for Value {
    #[inline]
    fn from(value: Document) -> Self {
        Self::Map(value)
    }
}

// -----------------------------------------------------------------------------
// Opaque

/// The capability bundle required of pass-through payloads.
///
/// Implemented for every `T` that is `Any + Send + Sync + PartialEq + Debug`
/// and serde-serializable, so any such value can be carried through a
/// [`Value::Opaque`] while keeping equality, debug formatting, serialization,
/// and downcasting.
pub trait Opaque: Any + Send + Sync {
    /// Upcasts to [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to an erased serde serializer.
    fn as_serialize(&self) -> &dyn erased_serde::Serialize;

    /// Compares against another opaque payload of (possibly) another type.
    fn opaque_eq(&self, other: &dyn Opaque) -> bool;

    /// Formats the payload with its own [`fmt::Debug`] implementation.
    fn opaque_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> Opaque for T
where
    T: Any + Send + Sync + PartialEq + fmt::Debug + serde_core::Serialize,
{
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_serialize(&self) -> &dyn erased_serde::Serialize {
        self
    }

    fn opaque_eq(&self, other: &dyn Opaque) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => self == other,
            None => false,
        }
    }

    fn opaque_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// OpaqueValue

/// A cheaply-clonable, type-erased pass-through payload.
///
/// Equality compares the underlying values when the types match, and is
/// `false` across different payload types.
pub struct OpaqueValue(Arc<dyn Opaque>);

impl OpaqueValue {
    /// Wraps a payload.
    #[inline]
    pub fn new<T: Opaque>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Downcasts the payload to a concrete type.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref()
    }

    #[inline]
    pub(crate) fn as_serialize(&self) -> &dyn erased_serde::Serialize {
        self.0.as_serialize()
    }
}

impl Clone for OpaqueValue {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl PartialEq for OpaqueValue {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.opaque_eq(&*other.0)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque(")?;
        self.0.opaque_debug(f)?;
        write!(f, ")")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::Value;

    #[test]
    fn zero_values_per_variant() {
        assert!(Value::Null.is_zero());
        assert!(Value::from(false).is_zero());
        assert!(Value::from(0).is_zero());
        assert!(Value::from(0_u32).is_zero());
        assert!(Value::from(0.0).is_zero());
        assert!(Value::from("").is_zero());
        assert!(Value::Seq(Vec::new()).is_zero());

        assert!(!Value::from(true).is_zero());
        assert!(!Value::from(-3).is_zero());
        assert!(!Value::from("x").is_zero());
    }

    #[test]
    fn opaque_equality_is_type_and_value_sensitive() {
        let map: BTreeMap<i32, i32> = [(1, 2), (3, 4)].into();

        assert_eq!(Value::opaque(map.clone()), Value::opaque(map.clone()));
        assert_ne!(
            Value::opaque(map.clone()),
            Value::opaque(BTreeMap::<i32, i32>::new())
        );
        // Same debug shape, different payload type.
        assert_ne!(Value::opaque(map), Value::opaque(7_i32));
    }

    #[test]
    fn opaque_downcast_recovers_the_payload() {
        let value = Value::opaque(7_i32);
        assert_eq!(value.downcast_opaque::<i32>(), Some(&7));
        assert_eq!(value.downcast_opaque::<u32>(), None);
        assert_eq!(Value::Null.downcast_opaque::<i32>(), None);
    }

    #[test]
    fn integer_widths_widen_to_canonical_variants() {
        assert_eq!(Value::from(-5_i8), Value::Int(-5));
        assert_eq!(Value::from(5_u16), Value::UInt(5));
        assert_eq!(Value::from(1.5_f32), Value::Float(1.5));
    }
}
