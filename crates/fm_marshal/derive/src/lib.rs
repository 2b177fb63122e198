//! See the [`ToMap`] derive macro.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static MAP_ATTRIBUTE_NAME: &str = "map";

// -----------------------------------------------------------------------------
// Modules

mod codegen;
mod derive_data;

// -----------------------------------------------------------------------------
// Macros

/// Derives the marshalling traits for a struct with named fields:
/// `TypedStruct` (static member descriptors), `Struct` (type-erased member
/// access), and `ToMap` (kind dispatch).
///
/// ```rust, ignore
/// #[derive(ToMap)]
/// struct Account {
///     pub id: u64,
///     #[map("display_name")]
///     pub name: String,
/// }
/// ```
///
/// # Field attributes
///
/// Member annotations live under `#[map(...)]`:
///
/// - `#[map("name,opt,...")]` — the tag spec read under the default tag
///   keyword `"map"`. The grammar is `"-"` (drop the field unconditionally),
///   an output-name override, and/or the ASCII-case-insensitive options
///   `omitZero`, `omitNil`, and `value`. A leading comma omits the name:
///   `#[map(",omitZero")]`.
/// - `#[map(keyword = "name,opt,...")]` — the same spec under an alternate
///   tag keyword, selected per call through `MarshalConfig`. Several
///   keywords may be recorded on one field.
/// - `#[map(embed)]` — an embedded member: its own fields are promoted into
///   this struct's field set under the shadowing rules. The field's type
///   must also derive `ToMap`.
///
/// Non-`pub` fields are never emitted (tagged or not), but a non-`pub`
/// embedded member is still traversed for promotion. Every field's type must
/// implement `ToMap`.
///
/// # Type attributes
///
/// - `#[map(clone)]` — the type implements `Clone` (plus `PartialEq`,
///   `Debug`, and serde's `Serialize`), enabling as-is emission for
///   `value`-tagged fields of this type.
/// - `#[map(marshaler)]` — the type implements the `Marshaler`
///   custom-conversion hook; the generated `ToMap` impl advertises it.
/// - `#[map(crate = "path")]` — the path the generated code uses to reach
///   the `fm_marshal` crate (for re-exports); defaults to `::fm_marshal`.
#[proc_macro_derive(ToMap, attributes(map))]
pub fn derive_to_map(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_data::StructModel::from_input(&input)
        .map(|model| codegen::expand(&model))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
