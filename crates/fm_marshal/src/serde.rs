//! Serde serialization of the output model.
//!
//! The hand-off format stays generic: a [`Document`] serializes as a map in
//! insertion order, a [`Value`] as whatever its variant holds, and opaque
//! payloads through their own erased serializer.

use serde_core::ser::{Serialize, SerializeMap, Serializer};

use crate::document::Document;
use crate::value::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::UInt(value) => serializer.serialize_u64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Seq(value) => serializer.collect_seq(value),
            Self::Map(value) => value.serialize(serializer),
            Self::Opaque(value) => erased_serde::serialize(value.as_serialize(), serializer),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// -----------------------------------------------------------------------------
// Tests
