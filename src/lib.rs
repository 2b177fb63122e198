//! Facade crate for the `fieldmap` workspace.
//!
//! `fieldmap` converts structured values into a generic ordered key-value
//! representation, suitable for hand-off to database drivers and other
//! loosely-typed consumers.
//!
//! - [`marshal`] holds the engine: the field resolver, the value converter,
//!   the [`Document`](marshal::Document)/[`Value`](marshal::Value) output
//!   model, and the `#[derive(ToMap)]` macro.
//! - [`nullable`] holds validity-tracking nullable scalars that plug into the
//!   engine through its custom-conversion hook.
//!
//! # Example
//!
//! ```
//! use fieldmap::marshal::{self, derive::ToMap};
//!
//! #[derive(ToMap)]
//! #[map(crate = "fieldmap::marshal")]
//! struct Account {
//!     pub id: u64,
//!     #[map("display_name")]
//!     pub name: String,
//! }
//!
//! let doc = marshal::marshal(&Account { id: 7, name: "Ada".into() }).unwrap();
//! assert_eq!(doc.get("display_name").unwrap().as_str(), Some("Ada"));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use fm_marshal as marshal;
pub use fm_nullable as nullable;
