use crate::reflect::{ToMap, ValueRef};
use crate::value::Value;

// Scalars are terminal: they convert to their canonical `Value` variant and
// pass through otherwise unchanged.
macro_rules! impl_scalar_to_map {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {$(
        impl ToMap for $ty {
            #[inline]
            fn value_ref(&self) -> ValueRef<'_> {
                ValueRef::Value(Value::$variant(*self as $conv))
            }
        }
    )*};
}

impl_scalar_to_map! {
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

impl ToMap for i64 {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::Int(*self))
    }
}

impl ToMap for u64 {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::UInt(*self))
    }
}

impl ToMap for f64 {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::Float(*self))
    }
}

impl ToMap for bool {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::Bool(*self))
    }
}

impl ToMap for char {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::String(self.to_string()))
    }
}

impl ToMap for String {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::String(self.clone()))
    }
}

impl ToMap for &'static str {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::String((*self).to_owned()))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::{ToMap, Value, ValueRef};

    fn terminal(value: &dyn ToMap) -> Value {
        match value.value_ref() {
            ValueRef::Value(value) => value,
            _ => panic!("scalar is not terminal"),
        }
    }

    #[test]
    fn scalars_convert_to_canonical_variants() {
        assert_eq!(terminal(&42_i16), Value::Int(42));
        assert_eq!(terminal(&42_usize), Value::UInt(42));
        assert_eq!(terminal(&2.5_f32), Value::Float(2.5));
        assert_eq!(terminal(&true), Value::Bool(true));
        assert_eq!(terminal(&'x'), Value::String("x".into()));
        assert_eq!(terminal(&"text"), Value::String("text".into()));
    }

    #[test]
    fn scalar_zero_checks() {
        assert!(0_i32.is_zero());
        assert!(!1_i32.is_zero());
        assert!(String::new().is_zero());
        assert!(!0_i32.is_nil());
    }
}
