//! Token generation for the derived trait implementations.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{MemberModel, StructModel};

pub(crate) fn expand(model: &StructModel) -> TokenStream {
    let typed_struct_tokens = impl_trait_typed_struct(model);
    let struct_tokens = impl_trait_struct(model);
    let to_map_tokens = impl_trait_to_map(model);

    quote! {
        #typed_struct_tokens

        #struct_tokens

        #to_map_tokens
    }
}

// Generics with every type parameter bound to `ToMap`, so member accessors
// and descriptors are available for any instantiation.
fn bounded_generics(model: &StructModel) -> syn::Generics {
    let fm = &model.crate_path;
    let mut generics = model.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(#fm::ToMap));
    }
    generics
}

// One `MemberInfo` constructor expression per declared field.
fn member_entries(model: &StructModel) -> Vec<TokenStream> {
    let fm = &model.crate_path;
    model
        .members
        .iter()
        .map(|member| {
            let MemberModel { ty, public, .. } = member;
            let name = member.name();
            let base = if member.embedded {
                quote!(#fm::MemberInfo::embedded::<#ty>(#name, #public))
            } else {
                quote!(#fm::MemberInfo::new(#name, #public))
            };
            if member.tags.is_empty() {
                base
            } else {
                let pairs = member.tags.iter().map(|(keyword, spec)| {
                    quote!((#keyword, #spec))
                });
                quote!(#base.with_tags(&[#(#pairs),*]))
            }
        })
        .collect()
}

/// Generate `TypedStruct` trait implementation tokens.
fn impl_trait_typed_struct(model: &StructModel) -> TokenStream {
    let fm = &model.crate_path;
    let ident = model.ident;
    let name = ident.to_string();
    let entries = member_entries(model);

    if model.generics.params.is_empty() {
        return quote! {
            impl #fm::TypedStruct for #ident {
                fn struct_info() -> &'static #fm::StructInfo {
                    static INFO: #fm::StructInfo =
                        #fm::StructInfo::new::<#ident>(#name, &[#(#entries),*]);
                    &INFO
                }
            }
        };
    }

    // Inside a generic impl the `static` would be shared by every
    // instantiation, so the entries go through a TypeId-keyed cell.
    let generics = bounded_generics(model);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let members = if entries.is_empty() {
        quote!(&[])
    } else {
        quote!(::std::boxed::Box::leak(::std::boxed::Box::new([#(#entries),*])))
    };

    quote! {
        impl #impl_generics #fm::TypedStruct for #ident #ty_generics #where_clause {
            fn struct_info() -> &'static #fm::StructInfo {
                static CELL: #fm::GenericStructInfoCell = #fm::GenericStructInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    #fm::StructInfo::new::<Self>(#name, #members)
                })
            }
        }
    }
}

/// Generate `Struct` trait implementation tokens.
fn impl_trait_struct(model: &StructModel) -> TokenStream {
    let fm = &model.crate_path;
    let ident = model.ident;
    let generics = bounded_generics(model);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let indices = (0..model.members.len()).collect::<Vec<usize>>();
    let idents = model
        .members
        .iter()
        .map(|member| member.ident)
        .collect::<Vec<_>>();

    quote! {
        impl #impl_generics #fm::Struct for #ident #ty_generics #where_clause {
            #[inline]
            fn info(&self) -> &'static #fm::StructInfo {
                <Self as #fm::TypedStruct>::struct_info()
            }

            fn member_at(&self, index: usize) -> ::core::option::Option<&dyn #fm::ToMap> {
                match index {
                    #(#indices => ::core::option::Option::Some(&self.#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn iter_members(&self) -> #fm::MemberIter<'_> {
                #fm::MemberIter::new(self)
            }
        }
    }
}

/// Generate `ToMap` trait implementation tokens.
fn impl_trait_to_map(model: &StructModel) -> TokenStream {
    let fm = &model.crate_path;
    let ident = model.ident;
    let generics = bounded_generics(model);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let literal_tokens = model.clone_flag.then(|| {
        quote! {
            fn to_literal(
                &self,
            ) -> ::core::result::Result<#fm::Value, #fm::MarshalError> {
                ::core::result::Result::Ok(#fm::Value::opaque(::core::clone::Clone::clone(self)))
            }
        }
    });

    let marshaler_tokens = model.marshaler_flag.then(|| {
        quote! {
            #[inline]
            fn as_marshaler(&self) -> ::core::option::Option<&dyn #fm::Marshaler> {
                ::core::option::Option::Some(self)
            }
        }
    });

    quote! {
        impl #impl_generics #fm::ToMap for #ident #ty_generics #where_clause {
            #[inline]
            fn value_ref(&self) -> #fm::ValueRef<'_> {
                #fm::ValueRef::Struct(self)
            }

            #literal_tokens

            #marshaler_tokens
        }
    }
}
