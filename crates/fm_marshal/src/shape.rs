//! Field resolution: from declared members to the output field set.
//!
//! Resolution walks a struct's member descriptors, follows embedded members
//! to collect promotion candidates, and settles name collisions: the
//! shallowest candidate wins; at equal minimum depth exactly one tag-named
//! candidate wins, otherwise the whole group is dropped. The result depends
//! only on the type and the active tag keyword, so it is cached process-wide
//! under that pair.

use std::any::TypeId;
use std::borrow::Cow;
use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::Equivalent;

use crate::error::MarshalError;
use crate::hash::{FIXED_STATE, FixedHashMap, FixedHashSet};
use crate::info::StructInfo;
use crate::tag::parse_tag;

/// The maximum depth embedded members may nest.
///
/// Deeper nesting fails fast with [`MarshalError::EmbedDepthExceeded`]
/// instead of recursing unbounded.
pub(crate) const MAX_EMBED_DEPTH: usize = 16;

// -----------------------------------------------------------------------------
// FieldSpec

/// One resolved output field.
#[derive(Clone, Debug)]
pub(crate) struct FieldSpec {
    name: &'static str,
    // Member indexes from the root struct through embedded members.
    path: Box<[usize]>,
    omit_zero: bool,
    omit_nil: bool,
    literal: bool,
}

impl FieldSpec {
    /// The output name the field is emitted under.
    #[inline]
    pub(crate) const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub(crate) fn path(&self) -> &[usize] {
        &self.path
    }

    #[inline]
    pub(crate) const fn omit_zero(&self) -> bool {
        self.omit_zero
    }

    #[inline]
    pub(crate) const fn omit_nil(&self) -> bool {
        self.omit_nil
    }

    #[inline]
    pub(crate) const fn literal(&self) -> bool {
        self.literal
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// The resolved, ordered output field set of one struct type under one tag
/// keyword.
#[derive(Clone, Debug)]
pub(crate) struct TypeShape {
    fields: Box<[FieldSpec]>,
}

impl TypeShape {
    #[inline]
    pub(crate) fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[inline]
    pub(crate) fn field_len(&self) -> usize {
        self.fields.len()
    }
}

// -----------------------------------------------------------------------------
// Shape cache

// Keyed by (type identity, tag keyword): two keywords may legitimately give
// the same type two different shapes.
#[derive(PartialEq, Eq, Hash)]
struct ShapeKey {
    ty: TypeId,
    keyword: Box<str>,
}

// Allocation-free lookup key. Must hash exactly like `ShapeKey`.
#[derive(Hash)]
struct ShapeKeyRef<'a> {
    ty: TypeId,
    keyword: &'a str,
}

impl Equivalent<ShapeKey> for ShapeKeyRef<'_> {
    #[inline]
    fn equivalent(&self, key: &ShapeKey) -> bool {
        self.ty == key.ty && self.keyword == &*key.keyword
    }
}

static SHAPES: RwLock<FixedHashMap<ShapeKey, Arc<TypeShape>>> =
    RwLock::new(FixedHashMap::with_hasher(FIXED_STATE));

/// Resolves (or fetches the cached) shape of `info` under `keyword`.
///
/// Concurrent first-time resolutions of the same key are benign: computation
/// is pure and deterministic, and insertion keeps the first writer's value.
pub(crate) fn resolve_shape(
    info: &'static StructInfo,
    keyword: &str,
) -> Result<Arc<TypeShape>, MarshalError> {
    let key = ShapeKeyRef {
        ty: info.ty_id(),
        keyword,
    };
    if let Some(shape) = SHAPES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(Arc::clone(shape));
    }

    let shape = Arc::new(compute_shape(info, keyword)?);
    let mut shapes = SHAPES.write().unwrap_or_else(PoisonError::into_inner);
    let entry = shapes
        .entry(ShapeKey {
            ty: info.ty_id(),
            keyword: keyword.into(),
        })
        .or_insert(shape);
    Ok(Arc::clone(entry))
}

// -----------------------------------------------------------------------------
// Resolution

// A promotion candidate: one reachable member, before shadowing is settled.
struct Candidate {
    name: &'static str,
    // The name came from a tag, not from the declaration.
    tagged: bool,
    depth: usize,
    path: Vec<usize>,
    omit_zero: bool,
    omit_nil: bool,
    literal: bool,
}

fn compute_shape(info: &'static StructInfo, keyword: &str) -> Result<TypeShape, MarshalError> {
    let mut candidates = Vec::new();
    let mut path = Vec::new();
    collect_candidates(info, keyword, 0, &mut path, &mut candidates)?;

    // Breadth-first by depth, declaration order within a level. The sort is
    // stable, and collection already yields declaration order per level.
    candidates.sort_by_key(|candidate| candidate.depth);

    let mut fields = Vec::with_capacity(candidates.len());
    let mut grouped: FixedHashSet<&str> = FixedHashSet::with_hasher(FIXED_STATE);
    for candidate in &candidates {
        if !grouped.insert(candidate.name) {
            continue;
        }
        let group: Vec<&Candidate> = candidates
            .iter()
            .filter(|other| other.name == candidate.name)
            .collect();
        if let Some(winner) = dominant(&group) {
            fields.push(FieldSpec {
                name: winner.name,
                path: winner.path.clone().into_boxed_slice(),
                omit_zero: winner.omit_zero,
                omit_nil: winner.omit_nil,
                literal: winner.literal,
            });
        }
    }

    Ok(TypeShape {
        fields: fields.into_boxed_slice(),
    })
}

// Settles one output-name group. `group` is depth-sorted and non-empty.
fn dominant<'a>(group: &[&'a Candidate]) -> Option<&'a Candidate> {
    let min_depth = group[0].depth;
    let at_min = group
        .iter()
        .take_while(|candidate| candidate.depth == min_depth)
        .count();
    if at_min == 1 {
        return Some(group[0]);
    }

    // Several candidates at the minimum depth: exactly one tag-named
    // candidate dominates, anything else is ambiguous and drops the group.
    let mut tagged = group[..at_min].iter().filter(|candidate| candidate.tagged);
    match (tagged.next(), tagged.next()) {
        (Some(winner), None) => Some(winner),
        _ => None,
    }
}

fn collect_candidates(
    info: &'static StructInfo,
    keyword: &str,
    depth: usize,
    path: &mut Vec<usize>,
    out: &mut Vec<Candidate>,
) -> Result<(), MarshalError> {
    if depth > MAX_EMBED_DEPTH {
        return Err(MarshalError::EmbedDepthExceeded {
            type_name: Cow::Borrowed(info.name()),
            limit: MAX_EMBED_DEPTH,
        });
    }

    for (index, member) in info.members().iter().enumerate() {
        let tag = member.tag(keyword).map(parse_tag);
        if tag.is_some_and(|tag| tag.ignored) {
            continue;
        }
        let tag = tag.unwrap_or_default();

        if let Some(child) = member.embedded_info()
            && tag.name.is_none()
        {
            // Promotion. Embedded members are traversed even when non-`pub`;
            // an explicit output name turns them back into ordinary fields.
            path.push(index);
            collect_candidates(child, keyword, depth + 1, path, out)?;
            path.pop();
            continue;
        }

        if !member.is_public() {
            continue;
        }

        path.push(index);
        out.push(Candidate {
            name: tag.name.unwrap_or(member.name()),
            tagged: tag.name.is_some(),
            depth,
            path: path.clone(),
            omit_zero: tag.omit_zero,
            omit_nil: tag.omit_nil,
            literal: tag.literal,
        });
        path.pop();
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{compute_shape, resolve_shape};
    use crate::info::{MemberInfo, StructInfo, TypedStruct};

    // Hand-built descriptors; the derive macro is exercised in `convert`.

    struct Inner;
    impl TypedStruct for Inner {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<Inner>(
                "Inner",
                &[
                    MemberInfo::new("shared", true),
                    MemberInfo::new("inner_only", true),
                    MemberInfo::new("hidden", false),
                ],
            );
            &INFO
        }
    }

    struct Outer;
    impl TypedStruct for Outer {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<Outer>(
                "Outer",
                &[
                    MemberInfo::new("shared", true),
                    MemberInfo::embedded::<Inner>("inner", false),
                ],
            );
            &INFO
        }
    }

    #[test]
    fn direct_fields_shadow_promoted_ones() {
        let shape = compute_shape(Outer::struct_info(), "map").unwrap();
        let names: Vec<_> = shape.fields().iter().map(|f| f.name()).collect();

        // `shared` resolves to the depth-0 member; `hidden` is non-pub.
        assert_eq!(names, ["shared", "inner_only"]);
        assert_eq!(shape.fields()[0].path(), [0]);
        assert_eq!(shape.fields()[1].path(), [1, 1]);
    }

    struct Left;
    impl TypedStruct for Left {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo =
                StructInfo::new::<Left>("Left", &[MemberInfo::new("contended", true)]);
            &INFO
        }
    }

    struct Right;
    impl TypedStruct for Right {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo =
                StructInfo::new::<Right>("Right", &[MemberInfo::new("contended", true)]);
            &INFO
        }
    }

    struct UntaggedTie;
    impl TypedStruct for UntaggedTie {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<UntaggedTie>(
                "UntaggedTie",
                &[
                    MemberInfo::embedded::<Left>("left", true),
                    MemberInfo::embedded::<Right>("right", true),
                ],
            );
            &INFO
        }
    }

    #[test]
    fn equal_depth_untagged_candidates_are_dropped_without_error() {
        let shape = compute_shape(UntaggedTie::struct_info(), "map").unwrap();
        assert_eq!(shape.field_len(), 0);
    }

    struct TaggedRight;
    impl TypedStruct for TaggedRight {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<TaggedRight>(
                "TaggedRight",
                &[MemberInfo::new("contended", true).with_tags(&[("map", "contended")])],
            );
            &INFO
        }
    }

    struct TaggedTie;
    impl TypedStruct for TaggedTie {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<TaggedTie>(
                "TaggedTie",
                &[
                    MemberInfo::embedded::<Left>("left", true),
                    MemberInfo::embedded::<TaggedRight>("right", true),
                ],
            );
            &INFO
        }
    }

    #[test]
    fn a_single_tagged_candidate_wins_an_equal_depth_tie() {
        let shape = compute_shape(TaggedTie::struct_info(), "map").unwrap();

        assert_eq!(shape.field_len(), 1);
        assert_eq!(shape.fields()[0].name(), "contended");
        // The winner is the tagged member inside the second embed.
        assert_eq!(shape.fields()[0].path(), [1, 0]);
    }

    struct Deep;
    impl TypedStruct for Deep {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<Deep>(
                "Deep",
                &[MemberInfo::new("contended", true).with_tags(&[("map", "contended")])],
            );
            &INFO
        }
    }

    struct Mid;
    impl TypedStruct for Mid {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo =
                StructInfo::new::<Mid>("Mid", &[MemberInfo::embedded::<Deep>("deep", true)]);
            &INFO
        }
    }

    struct TagVsShallow;
    impl TypedStruct for TagVsShallow {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<TagVsShallow>(
                "TagVsShallow",
                &[
                    MemberInfo::embedded::<Left>("left", true),
                    MemberInfo::embedded::<Mid>("mid", true),
                ],
            );
            &INFO
        }
    }

    #[test]
    fn a_tag_does_not_protect_a_deeper_field_from_a_shallower_one() {
        let shape = compute_shape(TagVsShallow::struct_info(), "map").unwrap();

        assert_eq!(shape.field_len(), 1);
        // The untagged depth-1 candidate beats the tagged depth-2 one.
        assert_eq!(shape.fields()[0].path(), [0, 0]);
    }

    struct Ordered;
    impl TypedStruct for Ordered {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<Ordered>(
                "Ordered",
                &[
                    MemberInfo::embedded::<Inner>("inner", true),
                    MemberInfo::new("direct", true),
                ],
            );
            &INFO
        }
    }

    #[test]
    fn order_is_breadth_first_then_declaration() {
        let shape = compute_shape(Ordered::struct_info(), "map").unwrap();
        let names: Vec<_> = shape.fields().iter().map(|f| f.name()).collect();

        // The direct field precedes promoted ones despite being declared
        // after the embed.
        assert_eq!(names, ["direct", "shared", "inner_only"]);
    }

    struct Keyed;
    impl TypedStruct for Keyed {
        fn struct_info() -> &'static StructInfo {
            static INFO: StructInfo = StructInfo::new::<Keyed>(
                "Keyed",
                &[
                    MemberInfo::new("plain", true).with_tags(&[("alt", "-")]),
                    MemberInfo::new("named", true).with_tags(&[("alt", "renamed")]),
                ],
            );
            &INFO
        }
    }

    #[test]
    fn shapes_are_cached_per_tag_keyword() {
        let default = resolve_shape(Keyed::struct_info(), "map").unwrap();
        let alt = resolve_shape(Keyed::struct_info(), "alt").unwrap();

        let default_names: Vec<_> = default.fields().iter().map(|f| f.name()).collect();
        let alt_names: Vec<_> = alt.fields().iter().map(|f| f.name()).collect();
        assert_eq!(default_names, ["plain", "named"]);
        assert_eq!(alt_names, ["renamed"]);

        // Hitting the cache returns the same shape.
        let again = resolve_shape(Keyed::struct_info(), "alt").unwrap();
        assert!(std::sync::Arc::ptr_eq(&alt, &again));
    }
}
