use std::any::{Any, TypeId};
use std::borrow::Cow;

use crate::error::MarshalError;
use crate::info::StructInfo;
use crate::value::Value;

// -----------------------------------------------------------------------------
// ToMap

/// The foundational trait for values that can be marshalled into the generic
/// map representation.
///
/// `ToMap` powers the converter's kind dispatch: every value reports what it
/// is through [`value_ref`], and the converter walks the result. It is
/// strongly recommended to use [the derive macro](crate::derive::ToMap) for
/// structs; scalars, sequences, references, and raw maps are covered by the
/// built-in implementations.
///
/// # Manual implementation
///
/// Wrapper types usually implement `ToMap` by delegating:
///
/// ```rust, ignore
/// fn value_ref(&self) -> ValueRef<'_> {
///     ValueRef::Ref(self.inner.as_ref().map(|v| v as &dyn ToMap))
/// }
/// ```
///
/// Types that carry their own output representation additionally implement
/// [`Marshaler`] and override [`as_marshaler`] to advertise it.
///
/// [`value_ref`]: ToMap::value_ref
/// [`as_marshaler`]: ToMap::as_marshaler
pub trait ToMap: Any + Send + Sync {
    /// Returns an enumeration of the ["kinds"](ValueRef) of this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use fm_marshal::{ToMap, ValueRef};
    ///
    /// let value = 10_i32;
    /// assert!(matches!(value.value_ref(), ValueRef::Value(_)));
    ///
    /// let items = vec![1, 2, 3];
    /// assert!(matches!(items.value_ref(), ValueRef::Seq(_)));
    /// ```
    fn value_ref(&self) -> ValueRef<'_>;

    /// Returns the [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns the type's name, for diagnostics.
    #[inline]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns whether this value equals its type's zero value.
    ///
    /// The default is structural: scalar zero, nil reference, empty sequence,
    /// or a struct whose members are all zero. Types with their own notion of
    /// emptiness (raw maps, nullable wrappers) override this; `omitZero`
    /// honors the override.
    fn is_zero(&self) -> bool {
        match self.value_ref() {
            ValueRef::Value(value) => value.is_zero(),
            ValueRef::Ref(reference) => reference.is_none(),
            ValueRef::Struct(value) => value.iter_members().all(|member| member.is_zero()),
            ValueRef::Seq(value) => value.seq_len() == 0,
        }
    }

    /// Returns whether this value is a nilable reference that is currently
    /// nil.
    ///
    /// Non-nilable values are never nil, whatever they hold; `omitNil` honors
    /// the override of types that track their own validity.
    fn is_nil(&self) -> bool {
        matches!(self.value_ref(), ValueRef::Ref(None))
    }

    /// Emits this value as-is, without conversion or hook invocation.
    ///
    /// Terminal kinds (scalars, raw maps) succeed by default. Derived structs
    /// opt in with the `#[map(clone)]` flag; everything else fails with
    /// [`MarshalError::LiteralUnsupported`].
    fn to_literal(&self) -> Result<Value, MarshalError> {
        match self.value_ref() {
            ValueRef::Value(value) => Ok(value),
            _ => Err(MarshalError::LiteralUnsupported {
                type_name: Cow::Borrowed(self.type_name()),
            }),
        }
    }

    /// Returns this value's custom-conversion hook, if its type provides one.
    ///
    /// The converter checks this capability before structural recursion and
    /// uses the hook's result in place of it.
    #[inline]
    fn as_marshaler(&self) -> Option<&dyn Marshaler> {
        None
    }
}

impl dyn ToMap {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use fm_marshal::ToMap;
    ///
    /// let value = 10_i32;
    /// let erased: &dyn ToMap = &value;
    ///
    /// assert_eq!(erased.downcast_ref::<i32>(), Some(&10));
    /// assert_eq!(erased.downcast_ref::<u32>(), None);
    /// ```
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }
}

// -----------------------------------------------------------------------------
// ValueRef

/// An immutable enumeration of the "kinds" of a [`ToMap`] value.
///
/// This is what the converter dispatches on: structured values recurse
/// through field resolution, sequences convert element-wise, references
/// unwrap (or short-circuit to null), and terminal values carry their own
/// output representation.
pub enum ValueRef<'a> {
    /// A structured value with named members.
    Struct(&'a dyn Struct),
    /// An ordered sequence of values.
    Seq(&'a dyn Seq),
    /// A nilable reference: `None` converts to [`Value::Null`], `Some`
    /// unwraps to the referent.
    Ref(Option<&'a dyn ToMap>),
    /// A terminal value, emitted without further recursion.
    Value(Value),
}

// -----------------------------------------------------------------------------
// Marshaler

/// The custom-conversion hook.
///
/// A type that implements `Marshaler` (and advertises it through
/// [`ToMap::as_marshaler`]) supplies its own output representation; the
/// converter uses the hook's result instead of recursing structurally. A hook
/// error aborts the whole conversion, attributed to the field it occurred in.
///
/// Derived structs advertise an existing `Marshaler` implementation with the
/// `#[map(marshaler)]` flag.
pub trait Marshaler {
    /// Produces this value's output representation.
    fn marshal_map_value(&self) -> Result<Value, MarshalError>;
}

// -----------------------------------------------------------------------------
// Struct

/// A trait for type-erased access to a struct's members.
///
/// Implemented by [`#[derive(ToMap)]`](crate::derive::ToMap). Member indexes
/// follow declaration order and include every member, even those never
/// emitted (non-`pub` leaves, ignored fields); which members appear in the
/// output is decided by field resolution, not by this trait.
pub trait Struct: ToMap {
    /// Returns the static member descriptors of this struct's type.
    fn info(&self) -> &'static StructInfo;

    /// Returns the member value at `index` in declaration order.
    ///
    /// Returns `None` if `index` is out of bounds.
    fn member_at(&self, index: usize) -> Option<&dyn ToMap>;

    /// Returns the number of members.
    #[inline]
    fn member_len(&self) -> usize {
        self.info().member_len()
    }

    /// Returns an iterator over the member values in declaration order.
    fn iter_members(&self) -> MemberIter<'_>;
}

/// An iterator over the member values of a [`Struct`].
pub struct MemberIter<'a> {
    value: &'a dyn Struct,
    index: usize,
}

impl<'a> MemberIter<'a> {
    /// Creates a new iterator for the given struct.
    #[inline(always)]
    pub const fn new(value: &'a dyn Struct) -> Self {
        Self { value, index: 0 }
    }
}

impl<'a> Iterator for MemberIter<'a> {
    type Item = &'a dyn ToMap;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let member = self.value.member_at(self.index);
        self.index += member.is_some() as usize;
        member
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.value.member_len();
        (len - self.index, Some(len))
    }
}

impl ExactSizeIterator for MemberIter<'_> {}

// -----------------------------------------------------------------------------
// Seq

/// A trait for type-erased access to an ordered sequence.
///
/// Covers `Vec<T>` and arrays out of the box. Conversion preserves length and
/// order, recursing through each element.
pub trait Seq: ToMap {
    /// Returns the number of elements.
    fn seq_len(&self) -> usize;

    /// Returns the element at `index`, or `None` if out of bounds.
    fn element(&self, index: usize) -> Option<&dyn ToMap>;

    /// Returns an iterator over the elements in order.
    fn iter_elements(&self) -> SeqIter<'_>;
}

/// An iterator over the elements of a [`Seq`].
pub struct SeqIter<'a> {
    value: &'a dyn Seq,
    index: usize,
}

impl<'a> SeqIter<'a> {
    /// Creates a new iterator for the given sequence.
    #[inline(always)]
    pub const fn new(value: &'a dyn Seq) -> Self {
        Self { value, index: 0 }
    }
}

impl<'a> Iterator for SeqIter<'a> {
    type Item = &'a dyn ToMap;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let element = self.value.element(self.index);
        self.index += element.is_some() as usize;
        element
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.value.seq_len();
        (len - self.index, Some(len))
    }
}

impl ExactSizeIterator for SeqIter<'_> {}
