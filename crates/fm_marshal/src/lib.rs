//! Marshal structured values into a generic, ordered key-value
//! representation.
//!
//! `fm_marshal` turns a struct (or a sequence of structs) into a
//! [`Document`]: an ordered mapping from field name to [`Value`], suitable
//! for hand-off to database drivers and other loosely-typed consumers. It is
//! the generic-map analogue of struct-to-document marshalling.
//!
//! # Overview
//!
//! Two layers do the work:
//!
//! - the **field resolver** computes, once per `(type, tag keyword)` pair,
//!   which fields a struct exposes — honoring embedding promotion, name
//!   shadowing, tag renames, visibility, and omit flags;
//! - the **value converter** walks a runtime value depth-first, unwrapping
//!   references, consulting each value's custom-conversion hook
//!   ([`Marshaler`]), and assembling the output.
//!
//! # Example
//!
//! ```
//! use fm_marshal::{derive::ToMap, marshal};
//!
//! #[derive(ToMap)]
//! struct Account {
//!     pub id: u64,
//!     #[map("display_name")]
//!     pub name: String,
//!     #[map(",omitNil")]
//!     pub referrer: Option<u64>,
//!     secret: String,
//! }
//!
//! let doc = marshal(&Account {
//!     id: 7,
//!     name: "Ada".into(),
//!     referrer: None,
//!     secret: "hunter2".into(),
//! })
//! .unwrap();
//!
//! // Non-`pub` fields are never emitted; nil `omitNil` fields are dropped.
//! assert_eq!(doc.keys().collect::<Vec<_>>(), ["id", "display_name"]);
//! ```
//!
//! # Tags
//!
//! Member annotations use the `#[map(...)]` attribute and follow the tag
//! grammar `name[,opt,...]` with the ASCII-case-insensitive options
//! `omitZero`, `omitNil`, and `value`. An alternate tag keyword is written
//! `#[map(keyword = "spec")]` and selected per call with
//! [`MarshalConfig::with_tag_keyword`].
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// We use `crate` in the crate itself, but the derive macro and the tests it
// generates refer to `fm_marshal`; `extern self` makes the name resolve both
// ways.
extern crate self as fm_marshal;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod convert;
mod document;
mod error;
mod hash;
mod impls;
mod info;
mod marshal;
mod reflect;
mod serde;
mod shape;
mod tag;
mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use config::MarshalConfig;
pub use document::Document;
pub use error::MarshalError;
pub use info::{GenericStructInfoCell, MemberInfo, StructInfo, TypedStruct};
pub use marshal::{marshal, marshal_seq, marshal_seq_with, marshal_with, to_value};
pub use reflect::{Marshaler, MemberIter, Seq, SeqIter, Struct, ToMap, ValueRef};
pub use value::{Opaque, OpaqueValue, Value};

pub use fm_marshal_derive as derive;
