use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::reflect::{Seq, SeqIter, ToMap, ValueRef};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Sequences

impl<T: ToMap> ToMap for Vec<T> {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Seq(self)
    }
}

impl<T: ToMap> Seq for Vec<T> {
    #[inline]
    fn seq_len(&self) -> usize {
        self.len()
    }

    #[inline]
    fn element(&self, index: usize) -> Option<&dyn ToMap> {
        self.get(index).map(|element| element as &dyn ToMap)
    }

    #[inline]
    fn iter_elements(&self) -> SeqIter<'_> {
        SeqIter::new(self)
    }
}

impl<T: ToMap, const N: usize> ToMap for [T; N] {
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Seq(self)
    }
}

impl<T: ToMap, const N: usize> Seq for [T; N] {
    #[inline]
    fn seq_len(&self) -> usize {
        N
    }

    #[inline]
    fn element(&self, index: usize) -> Option<&dyn ToMap> {
        self.get(index).map(|element| element as &dyn ToMap)
    }

    #[inline]
    fn iter_elements(&self) -> SeqIter<'_> {
        SeqIter::new(self)
    }
}

// -----------------------------------------------------------------------------
// Raw maps

// Values already expressed as key → value mappings pass through as-is; they
// are never re-keyed into a `Document`. Emptiness is their zero value.

impl<K, V, S> ToMap for HashMap<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug + serde_core::Serialize + Send + Sync + 'static,
    V: Clone + PartialEq + fmt::Debug + serde_core::Serialize + Send + Sync + 'static,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::opaque(self.clone()))
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> ToMap for BTreeMap<K, V>
where
    K: Ord + Clone + fmt::Debug + serde_core::Serialize + Send + Sync + 'static,
    V: Clone + PartialEq + fmt::Debug + serde_core::Serialize + Send + Sync + 'static,
{
    #[inline]
    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Value(Value::opaque(self.clone()))
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::{ToMap, ValueRef};

    #[test]
    fn sequences_expose_their_elements_in_order() {
        let items = vec![10_i32, 20, 30];
        let ValueRef::Seq(seq) = items.value_ref() else {
            panic!("vec is not a sequence");
        };
        let collected: Vec<i32> = seq
            .iter_elements()
            .map(|element| *element.downcast_ref::<i32>().unwrap())
            .collect();
        assert_eq!(collected, [10, 20, 30]);
        assert_eq!(seq.seq_len(), 3);
        assert!(seq.element(3).is_none());
    }

    #[test]
    fn arrays_behave_like_sequences() {
        let items = [1_u8, 2];
        assert!(!items.is_zero());
        let empty: [u8; 0] = [];
        assert!(empty.is_zero());
    }

    #[test]
    fn raw_maps_pass_through_unchanged() {
        let mut raw: HashMap<i32, i32> = HashMap::new();
        raw.insert(1, 2);

        let ValueRef::Value(value) = raw.value_ref() else {
            panic!("map is not terminal");
        };
        assert_eq!(value.downcast_opaque::<HashMap<i32, i32>>(), Some(&raw));

        assert!(!raw.is_zero());
        assert!(HashMap::<i32, i32>::new().is_zero());
    }
}
