//! The public entry points.

use std::borrow::Cow;

use crate::config::MarshalConfig;
use crate::convert::{convert_struct, convert_value, unwrap_refs};
use crate::document::Document;
use crate::error::MarshalError;
use crate::reflect::{ToMap, ValueRef};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Single values

/// Marshals a struct value into an ordered [`Document`].
///
/// References and boxed dynamically-typed wrappers are unwrapped first; the
/// dereferenced value must be a struct, anything else is a usage error.
///
/// # Examples
///
/// ```
/// use fm_marshal::{derive::ToMap, marshal};
///
/// #[derive(ToMap)]
/// struct Point {
///     pub x: i64,
///     pub y: i64,
/// }
///
/// let doc = marshal(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(doc.get("x").unwrap().as_i64(), Some(1));
/// assert_eq!(doc.keys().collect::<Vec<_>>(), ["x", "y"]);
/// ```
///
/// # Errors
///
/// - [`MarshalError::NotAStruct`] when the dereferenced value is not a
///   struct, [`MarshalError::NilValue`] when it is a nil reference.
/// - Any conversion error from the walk, attributed to its field path.
#[inline]
pub fn marshal(value: &dyn ToMap) -> Result<Document, MarshalError> {
    marshal_with(value, &MarshalConfig::new())
}

/// [`marshal`] with an explicit [`MarshalConfig`].
pub fn marshal_with(value: &dyn ToMap, config: &MarshalConfig) -> Result<Document, MarshalError> {
    match unwrap_refs(value)? {
        None => Err(MarshalError::NilValue),
        Some(target) => match target.value_ref() {
            ValueRef::Struct(target) => convert_struct(target, config),
            _ => Err(MarshalError::NotAStruct {
                type_name: Cow::Borrowed(target.type_name()),
            }),
        },
    }
}

// -----------------------------------------------------------------------------
// Sequences of values

/// Marshals a sequence of struct values into one [`Document`] per element,
/// order preserved.
///
/// The dereferenced value must be a sequence; each element is dereferenced
/// and marshalled like a top-level struct value.
///
/// # Examples
///
/// ```
/// use fm_marshal::{derive::ToMap, marshal_seq};
///
/// #[derive(ToMap)]
/// struct Point {
///     pub x: i64,
/// }
///
/// let docs = marshal_seq(&vec![Point { x: 1 }, Point { x: 2 }]).unwrap();
/// assert_eq!(docs.len(), 2);
/// assert_eq!(docs[1].get("x").unwrap().as_i64(), Some(2));
/// ```
#[inline]
pub fn marshal_seq(values: &dyn ToMap) -> Result<Vec<Document>, MarshalError> {
    marshal_seq_with(values, &MarshalConfig::new())
}

/// [`marshal_seq`] with an explicit [`MarshalConfig`].
pub fn marshal_seq_with(
    values: &dyn ToMap,
    config: &MarshalConfig,
) -> Result<Vec<Document>, MarshalError> {
    let Some(target) = unwrap_refs(values)? else {
        return Err(MarshalError::NilValue);
    };
    let ValueRef::Seq(seq) = target.value_ref() else {
        return Err(MarshalError::NotASeq {
            type_name: Cow::Borrowed(target.type_name()),
        });
    };

    let mut docs = Vec::with_capacity(seq.seq_len());
    for (index, element) in seq.iter_elements().enumerate() {
        let doc = match unwrap_refs(element)? {
            None => Err(MarshalError::NilValue),
            Some(element) => match element.value_ref() {
                ValueRef::Struct(element) => convert_struct(element, config),
                _ => Err(MarshalError::NotAStruct {
                    type_name: Cow::Borrowed(element.type_name()),
                }),
            },
        }
        .map_err(|err| err.into_index(index))?;
        docs.push(doc);
    }
    Ok(docs)
}

// -----------------------------------------------------------------------------
// Single values, untyped

/// Converts any single value into its output [`Value`] under the default
/// configuration.
///
/// Unlike [`marshal`], the value does not have to be a struct: scalars pass
/// through, sequences convert element-wise, and the custom-conversion hook is
/// honored. This is the building block for [`Marshaler`](crate::Marshaler)
/// implementations that delegate to an inner value.
///
/// # Examples
///
/// ```
/// use fm_marshal::{Value, to_value};
///
/// assert_eq!(to_value(&42_i32).unwrap(), Value::Int(42));
/// assert_eq!(to_value(&None::<i32>).unwrap(), Value::Null);
/// ```
#[inline]
pub fn to_value(value: &dyn ToMap) -> Result<Value, MarshalError> {
    convert_value(value, &MarshalConfig::new())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::derive::ToMap;
    use crate::{
        Document, MarshalConfig, MarshalError, ToMap, Value, marshal, marshal_seq,
        marshal_seq_with, marshal_with, to_value,
    };

    #[derive(ToMap, Clone)]
    struct Point {
        pub x: i64,
        pub y: f64,
    }

    fn point_doc(x: i64, y: f64) -> Document {
        [("x", Value::from(x)), ("y", Value::from(y))]
            .into_iter()
            .collect()
    }

    #[test]
    fn sequences_of_structs_keep_order_and_length() {
        let points = vec![Point { x: 1, y: 1.5 }, Point { x: 2, y: 2.5 }];

        let docs = marshal_seq(&points).unwrap();
        assert_eq!(docs, [point_doc(1, 1.5), point_doc(2, 2.5)]);

        // A reference to the sequence is equivalent.
        let boxed = Box::new(points);
        assert_eq!(marshal_seq(&boxed).unwrap().len(), 2);
    }

    #[test]
    fn sequences_of_dynamic_values_marshal_per_element() {
        let points: Vec<Box<dyn ToMap>> = vec![
            Box::new(Point { x: 1, y: 1.5 }),
            Box::new(Point { x: 2, y: 2.5 }),
        ];

        let docs = marshal_seq(&points).unwrap();
        assert_eq!(docs, [point_doc(1, 1.5), point_doc(2, 2.5)]);
    }

    #[derive(ToMap)]
    struct DifferentTags {
        #[map(map_key = "field_one")]
        pub field_one: i64,
        #[map(map_key = "field_two")]
        pub field_two: f64,
        #[map(map_key = "field_three")]
        pub field_three: String,
    }

    #[test]
    fn an_alternate_tag_keyword_selects_different_tags() {
        let value = DifferentTags {
            field_one: 42,
            field_two: 3.14,
            field_three: "Hello World".into(),
        };

        // Under the default keyword the `map_key` tags are invisible.
        let default_doc = marshal(&value).unwrap();
        assert_eq!(
            default_doc.keys().collect::<Vec<_>>(),
            ["field_one", "field_two", "field_three"]
        );

        let config = MarshalConfig::with_tag_keyword("map_key");
        let keyed = marshal_with(&value, &config).unwrap();
        assert_eq!(keyed.get("field_one"), Some(&Value::Int(42)));
        assert_eq!(keyed.get("field_two"), Some(&Value::Float(3.14)));
        assert_eq!(
            keyed.get("field_three"),
            Some(&Value::String("Hello World".into()))
        );
    }

    #[derive(ToMap)]
    struct MixedTags {
        #[map("default_name")]
        #[map(map_key = "keyed_name,omitZero")]
        pub field: i64,
    }

    #[test]
    fn one_field_may_carry_tags_for_several_keywords() {
        let value = MixedTags { field: 0 };

        let doc = marshal(&value).unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["default_name"]);

        // Under the alternate keyword the rename and `omitZero` both apply.
        let config = MarshalConfig::with_tag_keyword("map_key");
        let keyed = marshal_with(&value, &config).unwrap();
        assert!(keyed.is_empty());
    }

    #[test]
    fn non_struct_values_are_usage_errors() {
        let err = marshal(&42_i64).unwrap_err();
        assert!(matches!(err, MarshalError::NotAStruct { .. }));

        let err = marshal(&vec![Point { x: 1, y: 1.0 }]).unwrap_err();
        assert!(matches!(err, MarshalError::NotAStruct { .. }));

        let absent: Option<Point> = None;
        let err = marshal(&absent).unwrap_err();
        assert!(matches!(err, MarshalError::NilValue));
    }

    #[test]
    fn non_sequence_values_are_seq_usage_errors() {
        let err = marshal_seq(&Point { x: 1, y: 1.0 }).unwrap_err();
        assert!(matches!(err, MarshalError::NotASeq { .. }));

        let absent: Option<Vec<Point>> = None;
        let err = marshal_seq(&absent).unwrap_err();
        assert!(matches!(err, MarshalError::NilValue));
    }

    #[test]
    fn non_struct_elements_fail_with_their_index() {
        let mixed: Vec<Box<dyn ToMap>> =
            vec![Box::new(Point { x: 1, y: 1.0 }), Box::new(7_i64)];

        let err = marshal_seq(&mixed).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Field { ref path, ref source }
                if path == "[1]" && matches!(**source, MarshalError::NotAStruct { .. })
        ));
    }

    #[test]
    fn seq_config_applies_to_every_element() {
        let values = vec![
            DifferentTags {
                field_one: 1,
                field_two: 0.5,
                field_three: "a".into(),
            },
            DifferentTags {
                field_one: 2,
                field_two: 1.5,
                field_three: "b".into(),
            },
        ];

        let config = MarshalConfig::with_tag_keyword("map_key");
        let docs = marshal_seq_with(&values, &config).unwrap();
        assert_eq!(docs[0].get("field_one"), Some(&Value::Int(1)));
        assert_eq!(docs[1].get("field_three"), Some(&Value::String("b".into())));
    }

    #[test]
    fn to_value_converts_arbitrary_values() {
        assert_eq!(to_value(&7_u32).unwrap(), Value::UInt(7));
        assert_eq!(to_value(&None::<i64>).unwrap(), Value::Null);
        assert_eq!(
            to_value(&vec![1_i64, 2]).unwrap(),
            Value::Seq(vec![Value::Int(1), Value::Int(2)])
        );

        let doc = to_value(&Point { x: 3, y: 0.5 }).unwrap();
        assert_eq!(doc.as_doc(), Some(&point_doc(3, 0.5)));
    }
}
