use std::sync::Arc;

use crate::reflect::{ToMap, ValueRef};

// References and smart pointers report `ValueRef::Ref`; the converter unwraps
// them to a fixed point, and a nil `Option` short-circuits to `Value::Null`.

impl<T: ToMap> ToMap for Option<T> {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Ref(self.as_ref().map(|referent| referent as &dyn ToMap))
    }
}

impl<T: ToMap> ToMap for Box<T> {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Ref(Some(&**self))
    }
}

impl<T: ToMap> ToMap for Arc<T> {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Ref(Some(&**self))
    }
}

/// The dynamically-typed wrapper: a boxed value of erased type enters the
/// walk like any reference and unwraps to its concrete referent.
impl ToMap for Box<dyn ToMap> {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Ref(Some(&**self))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::{ToMap, ValueRef};

    #[test]
    fn nil_and_populated_options() {
        let absent: Option<i32> = None;
        assert!(absent.is_nil());
        assert!(absent.is_zero());

        let present = Some(0_i32);
        assert!(!present.is_nil());
        // A populated reference is not zero, whatever it points at.
        assert!(!present.is_zero());
    }

    #[test]
    fn boxed_values_unwrap_to_their_referent() {
        let boxed: Box<dyn ToMap> = Box::new(7_i32);
        let ValueRef::Ref(Some(referent)) = boxed.value_ref() else {
            panic!("box is not a reference");
        };
        assert_eq!(referent.downcast_ref::<i32>(), Some(&7));
    }
}
