//! Parsing of the derive input and the `#[map(...)]` attribute grammar.

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Token};

use crate::MAP_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Model

pub(crate) struct StructModel<'a> {
    pub ident: &'a syn::Ident,
    pub generics: &'a syn::Generics,
    /// Path to the `fm_marshal` crate in the expansion context.
    pub crate_path: syn::Path,
    /// `#[map(clone)]`: enable as-is emission through `Clone`.
    pub clone_flag: bool,
    /// `#[map(marshaler)]`: advertise an existing `Marshaler` impl.
    pub marshaler_flag: bool,
    pub members: Vec<MemberModel<'a>>,
}

pub(crate) struct MemberModel<'a> {
    pub ident: &'a syn::Ident,
    pub ty: &'a syn::Type,
    pub public: bool,
    pub embedded: bool,
    /// Raw `(keyword, spec)` tag strings in declaration order.
    pub tags: Vec<(String, String)>,
}

impl MemberModel<'_> {
    pub fn name(&self) -> String {
        let name = self.ident.to_string();
        name.strip_prefix("r#").map(str::to_owned).unwrap_or(name)
    }
}

// -----------------------------------------------------------------------------
// Attribute grammar

// One comma-separated entry inside `#[map(...)]`.
enum MapEntry {
    /// `"name,opts"` — a tag under the default keyword.
    DefaultTag(syn::LitStr),
    /// `keyword = "name,opts"` — a tag under an alternate keyword.
    KeywordTag(syn::Ident, syn::LitStr),
    /// `embed` | `clone` | `marshaler`.
    Flag(syn::Ident),
    /// `crate = "path"`.
    CratePath(syn::LitStr),
}

impl Parse for MapEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(syn::LitStr) {
            return Ok(Self::DefaultTag(input.parse()?));
        }
        if input.peek(Token![crate]) {
            input.parse::<Token![crate]>()?;
            input.parse::<Token![=]>()?;
            return Ok(Self::CratePath(input.parse()?));
        }
        let ident: syn::Ident = input.parse()?;
        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            Ok(Self::KeywordTag(ident, input.parse()?))
        } else {
            Ok(Self::Flag(ident))
        }
    }
}

fn map_entries(attrs: &[syn::Attribute]) -> syn::Result<Vec<MapEntry>> {
    let mut entries = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident(MAP_ATTRIBUTE_NAME) {
            continue;
        }
        let parsed = attr.parse_args_with(Punctuated::<MapEntry, Token![,]>::parse_terminated)?;
        entries.extend(parsed);
    }
    Ok(entries)
}

// -----------------------------------------------------------------------------
// Input parsing

impl<'a> StructModel<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new(
                input.span(),
                "`ToMap` can only be derived for structs",
            ));
        };
        let Fields::Named(fields) = &data.fields else {
            return Err(syn::Error::new(
                input.span(),
                "`ToMap` requires named fields",
            ));
        };
        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "`ToMap` types must own their data; lifetime parameters are not supported",
            ));
        }

        let mut model = Self {
            ident: &input.ident,
            generics: &input.generics,
            crate_path: syn::parse_quote!(::fm_marshal),
            clone_flag: false,
            marshaler_flag: false,
            members: Vec::with_capacity(fields.named.len()),
        };

        for entry in map_entries(&input.attrs)? {
            match entry {
                MapEntry::Flag(flag) if flag == "clone" => model.clone_flag = true,
                MapEntry::Flag(flag) if flag == "marshaler" => model.marshaler_flag = true,
                MapEntry::CratePath(path) => model.crate_path = path.parse()?,
                MapEntry::Flag(flag) => {
                    return Err(syn::Error::new(
                        flag.span(),
                        "unknown type-level `map` flag; expected `clone` or `marshaler`",
                    ));
                }
                MapEntry::DefaultTag(spec) | MapEntry::KeywordTag(_, spec) => {
                    return Err(syn::Error::new(
                        spec.span(),
                        "tag specs belong on fields, not on the type",
                    ));
                }
            }
        }

        for field in &fields.named {
            model.members.push(MemberModel::from_field(field)?);
        }
        Ok(model)
    }
}

impl<'a> MemberModel<'a> {
    fn from_field(field: &'a syn::Field) -> syn::Result<Self> {
        let mut member = Self {
            ident: field.ident.as_ref().expect("named field without an ident"),
            ty: &field.ty,
            public: matches!(field.vis, syn::Visibility::Public(_)),
            embedded: false,
            tags: Vec::new(),
        };

        for entry in map_entries(&field.attrs)? {
            match entry {
                MapEntry::DefaultTag(spec) => {
                    member.tags.push(("map".to_owned(), spec.value()));
                }
                MapEntry::KeywordTag(keyword, spec) => {
                    member.tags.push((keyword.to_string(), spec.value()));
                }
                MapEntry::Flag(flag) if flag == "embed" => member.embedded = true,
                MapEntry::Flag(flag) => {
                    return Err(syn::Error::new(
                        flag.span(),
                        "unknown field-level `map` flag; expected `embed`",
                    ));
                }
                MapEntry::CratePath(path) => {
                    return Err(syn::Error::new(
                        path.span(),
                        "`crate = \"...\"` belongs on the type, not on a field",
                    ));
                }
            }
        }
        Ok(member)
    }
}
