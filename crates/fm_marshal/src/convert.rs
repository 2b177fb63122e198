//! The value converter: a depth-first walk from a runtime value to its
//! generic output representation.
//!
//! Each step checks the custom-conversion hook, unwraps one layer of
//! indirection, or dispatches on the value's kind. Struct fields go through
//! the resolved shape, honoring omit rules and literal emission; sequences
//! convert element-wise; terminal values pass through unchanged.

use crate::config::MarshalConfig;
use crate::document::Document;
use crate::error::MarshalError;
use crate::reflect::{Seq, Struct, ToMap, ValueRef};
use crate::shape::resolve_shape;
use crate::value::Value;

/// The maximum number of reference layers unwrapped before giving up.
///
/// Cyclic values are out of scope; this bound turns runaway indirection into
/// [`MarshalError::RefDepthExceeded`] instead of an endless loop.
pub(crate) const MAX_REF_DEPTH: usize = 64;

// -----------------------------------------------------------------------------
// Dispatch

/// Converts one value through full dispatch.
pub(crate) fn convert_value(
    value: &dyn ToMap,
    config: &MarshalConfig,
) -> Result<Value, MarshalError> {
    let mut current = value;
    for _ in 0..MAX_REF_DEPTH {
        // The hook intercepts before unwrapping, so wrapper types that
        // implement it are consulted rather than dismantled.
        if let Some(marshaler) = current.as_marshaler() {
            return marshaler.marshal_map_value();
        }
        match current.value_ref() {
            ValueRef::Ref(None) => return Ok(Value::Null),
            ValueRef::Ref(Some(referent)) => current = referent,
            ValueRef::Struct(value) => return convert_struct(value, config).map(Value::Map),
            ValueRef::Seq(value) => return convert_seq(value, config),
            ValueRef::Value(value) => return Ok(value),
        }
    }
    Err(MarshalError::RefDepthExceeded {
        limit: MAX_REF_DEPTH,
    })
}

/// Unwraps references to a fixed point without consulting the hook.
///
/// Returns `None` for a nil reference. Used by the entry points, which are
/// structural and dispatch on the dereferenced value themselves.
pub(crate) fn unwrap_refs(value: &dyn ToMap) -> Result<Option<&dyn ToMap>, MarshalError> {
    let mut current = value;
    for _ in 0..MAX_REF_DEPTH {
        match current.value_ref() {
            ValueRef::Ref(None) => return Ok(None),
            ValueRef::Ref(Some(referent)) => current = referent,
            _ => return Ok(Some(current)),
        }
    }
    Err(MarshalError::RefDepthExceeded {
        limit: MAX_REF_DEPTH,
    })
}

// -----------------------------------------------------------------------------
// Structs

/// Converts a struct value through its resolved shape.
pub(crate) fn convert_struct(
    value: &dyn Struct,
    config: &MarshalConfig,
) -> Result<Document, MarshalError> {
    let shape = resolve_shape(value.info(), config.tag_keyword())?;
    let mut doc = Document::with_capacity(shape.field_len());
    for field in shape.fields() {
        let member = member_at_path(value, field.path());
        if field.omit_zero() && member.is_zero() {
            continue;
        }
        if field.omit_nil() && member.is_nil() {
            continue;
        }
        let converted = if field.literal() {
            member.to_literal()
        } else {
            convert_value(member, config)
        }
        .map_err(|err| err.into_field(field.name()))?;
        doc.insert(field.name(), converted);
    }
    Ok(doc)
}

// Walks a resolved member path. Resolution guarantees the indexes are in
// range and that every intermediate member is an embedded struct.
fn member_at_path<'a>(root: &'a dyn Struct, path: &[usize]) -> &'a dyn ToMap {
    let (&last, route) = path.split_last().expect("resolved field with empty path");
    let mut current = root;
    for &index in route {
        let member = current
            .member_at(index)
            .expect("resolved member index out of range");
        current = match member.value_ref() {
            ValueRef::Struct(value) => value,
            _ => unreachable!("embedded members always resolve to structs"),
        };
    }
    current
        .member_at(last)
        .expect("resolved member index out of range")
}

// -----------------------------------------------------------------------------
// Sequences

fn convert_seq(value: &dyn Seq, config: &MarshalConfig) -> Result<Value, MarshalError> {
    let mut items = Vec::with_capacity(value.seq_len());
    for (index, element) in value.iter_elements().enumerate() {
        let converted = convert_value(element, config).map_err(|err| err.into_index(index))?;
        items.push(converted);
    }
    Ok(Value::Seq(items))
}

// -----------------------------------------------------------------------------
// Tests
