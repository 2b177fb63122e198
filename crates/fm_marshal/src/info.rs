use std::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock};

use crate::hash::{FIXED_STATE, FixedHashMap};

// -----------------------------------------------------------------------------
// MemberInfo

/// Compile-time information for one declared member of a struct.
///
/// Produced by [`#[derive(ToMap)]`](crate::derive::ToMap), one entry per
/// declared field in declaration order. The raw tag strings are kept
/// per-keyword so field resolution can serve any configured tag keyword at
/// runtime.
#[derive(Clone, Debug)]
pub struct MemberInfo {
    name: &'static str,
    public: bool,
    // `StructInfo` is created on first access; a function pointer delays it.
    embedded: Option<fn() -> &'static StructInfo>,
    tags: &'static [(&'static str, &'static str)],
}

impl MemberInfo {
    /// Creates the descriptor for an ordinary member.
    #[inline]
    pub const fn new(name: &'static str, public: bool) -> Self {
        Self {
            name,
            public,
            embedded: None,
            tags: &[],
        }
    }

    /// Creates the descriptor for an embedded member of struct type `T`.
    ///
    /// Embedded members promote their own fields into the parent's field set
    /// during resolution.
    #[inline]
    pub const fn embedded<T: TypedStruct>(name: &'static str, public: bool) -> Self {
        Self {
            name,
            public,
            embedded: Some(T::struct_info),
            tags: &[],
        }
    }

    /// Attaches the raw `(keyword, spec)` tag strings.
    #[inline]
    pub const fn with_tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    /// Returns the declared field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether the member is `pub`.
    ///
    /// Non-`pub` leaf members are never emitted; non-`pub` embedded members
    /// are still traversed for promotion.
    #[inline]
    pub const fn is_public(&self) -> bool {
        self.public
    }

    /// Returns whether the member is embedded.
    #[inline]
    pub const fn is_embedded(&self) -> bool {
        self.embedded.is_some()
    }

    /// Returns the embedded member's own descriptors, if embedded.
    #[inline]
    pub fn embedded_info(&self) -> Option<&'static StructInfo> {
        self.embedded.map(|info| info())
    }

    /// Returns the raw tag spec recorded under the given keyword.
    pub fn tag(&self, keyword: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(tag_keyword, _)| *tag_keyword == keyword)
            .map(|(_, spec)| *spec)
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Compile-time information for a struct type: its declared members in
/// declaration order.
///
/// # Examples
///
/// ```
/// use fm_marshal::{TypedStruct, derive::ToMap};
///
/// #[derive(ToMap)]
/// struct Account {
///     pub id: u64,
///     pub name: String,
/// }
///
/// let info = Account::struct_info();
/// assert_eq!(info.name(), "Account");
/// assert_eq!(info.member_len(), 2);
/// assert_eq!(info.members()[1].name(), "name");
/// ```
#[derive(Clone, Debug)]
pub struct StructInfo {
    ty_id: TypeId,
    name: &'static str,
    members: &'static [MemberInfo],
}

impl StructInfo {
    /// Creates a new `StructInfo` for type `T`.
    ///
    /// The member order is fixed and must match declaration order.
    #[inline]
    pub const fn new<T: 'static>(name: &'static str, members: &'static [MemberInfo]) -> Self {
        Self {
            ty_id: TypeId::of::<T>(),
            name,
            members,
        }
    }

    /// Returns the described type's [`TypeId`].
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Check if the given type matches the described one.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// Returns the struct's name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the member descriptors in declaration order.
    #[inline]
    pub const fn members(&self) -> &'static [MemberInfo] {
        self.members
    }

    /// Returns the number of declared members.
    #[inline]
    pub const fn member_len(&self) -> usize {
        self.members.len()
    }
}

// -----------------------------------------------------------------------------
// TypedStruct

/// Static access to a struct type's [`StructInfo`].
///
/// Implemented by [`#[derive(ToMap)]`](crate::derive::ToMap); required of
/// embedded member types so resolution can traverse them without a value.
pub trait TypedStruct {
    /// Returns the type's member descriptors.
    fn struct_info() -> &'static StructInfo;
}

// -----------------------------------------------------------------------------
// GenericStructInfoCell

/// Static storage of [`StructInfo`] for generic struct types.
///
/// For a non-generic type the derive macro stores its `StructInfo` in a plain
/// `static`. Inside a generic impl the `static` would be shared by every
/// instantiation, so this cell keys the entries by [`TypeId`] instead.
///
/// ```rust, ignore
/// impl<T: ToMap> TypedStruct for Pair<T> {
///     fn struct_info() -> &'static StructInfo {
///         static CELL: GenericStructInfoCell = GenericStructInfoCell::new();
///         CELL.get_or_insert::<Self>(|| /* build members */)
///     }
/// }
/// ```
pub struct GenericStructInfoCell(RwLock<FixedHashMap<TypeId, &'static StructInfo>>);

impl GenericStructInfoCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(FixedHashMap::with_hasher(FIXED_STATE)))
    }

    /// Returns the `StructInfo` stored for type `G`, building it with `f` on
    /// first access.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> StructInfo) -> &StructInfo {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> StructInfo,
    ) -> &'static StructInfo {
        if let Some(info) = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
        {
            return info;
        }
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(f())))
    }
}

// -----------------------------------------------------------------------------
// Tests
