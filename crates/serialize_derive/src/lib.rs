//! Derive macro for the `Serializable` marker.
//!
//! `#[derive(Serializable)]` generates the `Composite` descriptor and member
//! accessors of a struct, plus its `Serialize` implementation, for the
//! `binform_serialize` crate. Member discovery and ordering happen here, at
//! expansion time.
//!
//! # Supported Types
//!
//! - Structs with named fields
//! - Tuple structs
//! - Unit structs
//!
//! Enums are accepted only with `#[serialize(self_describing)]`. Unions are
//! rejected.
//!
//! # Field Attributes
//!
//! ## `#[serialize(order = N)]`
//!
//! Marks a field as serialized. `N` is any `i32`; members are written in
//! ascending order, ties keeping declaration order. Unmarked fields are never
//! read or written and keep their `Default` value on decode.
//!
//! ```ignore
//! use binform_serialize::Serializable;
//!
//! #[derive(Default, Serializable)]
//! struct Point {
//!     #[serialize(order = 1)]
//!     y: i32,
//!     #[serialize(order = 0)]
//!     x: i32,
//!     label: String, // skipped
//! }
//! ```
//!
//! # Container Attributes
//!
//! ## `#[serialize(property(order = N, ty = T, get = getter, set = setter))]`
//!
//! Declares a member reached through methods instead of a field. The getter
//! must return `T` or `&T`, the setter must take `T`. A property missing
//! either accessor is ignored on both sides. Repeatable.
//!
//! Properties share one ordering with fields: a property whose `order` is
//! lower than a field's is written before that field. Streams that place
//! every field ahead of every property are not compatible with such types.
//!
//! ## `#[serialize(value_type)]`
//!
//! The type is never absent: no presence byte precedes its members.
//!
//! ## `#[serialize(opaque)]`
//!
//! The type is not marked serializable. Nested occurrences write nothing and
//! decode as `Default::default()`; top-level calls fail.
//!
//! ## `#[serialize(self_describing)]`
//!
//! Forward to the type's `SelfDescribing` implementation. Field markers are
//! ignored.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Error, Ident, Index, LitInt,
    Token, Type, meta::ParseNestedMeta, parse_macro_input,
};

/// How a member is reached on the instance.
enum Access {
    Field(syn::Member),
    Property { ty: Box<Type>, get: Ident, set: Ident },
}

/// A serialized member collected from the input.
struct MemberSpec {
    name: String,
    order: i32,
    access: Access,
}

/// Container-level options.
#[derive(Default)]
struct ContainerOptions {
    value_type: bool,
    opaque: bool,
    self_describing: bool,
    properties: Vec<MemberSpec>,
}

/// Parses an `i32`, accepting a leading minus sign.
fn parse_order(meta: &ParseNestedMeta<'_>) -> syn::Result<i32> {
    let value = meta.value()?;

    let negative = value.peek(Token![-]);
    if negative {
        value.parse::<Token![-]>()?;
    }

    let literal: LitInt = value.parse()?;
    let magnitude = literal.base10_parse::<i64>()?;
    let order = if negative { -magnitude } else { magnitude };

    i32::try_from(order)
        .map_err(|_| Error::new_spanned(&literal, "order must fit in an `i32`"))
}

/// Reads the `order` of a field, or `None` if the field is unmarked.
fn field_order(attrs: &[Attribute]) -> syn::Result<Option<i32>> {
    let mut order = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serialize")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("order") {
                order = Some(parse_order(&meta)?);
                Ok(())
            } else {
                Err(meta.error("unknown serialize field attribute"))
            }
        })?;

        if order.is_none() {
            return Err(Error::new_spanned(attr, "expected `order = N`"));
        }
    }

    Ok(order)
}

fn parse_property(
    meta: &ParseNestedMeta<'_>,
) -> syn::Result<Option<MemberSpec>> {
    let mut order = None;
    let mut ty = None;
    let mut get = None;
    let mut set = None;

    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("order") {
            order = Some(parse_order(&inner)?);
        } else if inner.path.is_ident("ty") {
            ty = Some(inner.value()?.parse::<Type>()?);
        } else if inner.path.is_ident("get") {
            get = Some(inner.value()?.parse::<Ident>()?);
        } else if inner.path.is_ident("set") {
            set = Some(inner.value()?.parse::<Ident>()?);
        } else {
            return Err(inner.error("unknown property attribute"));
        }
        Ok(())
    })?;

    let Some(order) = order else {
        return Err(meta.error("property requires `order = N`"));
    };
    let Some(ty) = ty else {
        return Err(meta.error("property requires `ty = Type`"));
    };

    // Not both readable and writable: never part of the stream.
    let (Some(get), Some(set)) = (get, set) else {
        return Ok(None);
    };

    Ok(Some(MemberSpec {
        name: get.to_string(),
        order,
        access: Access::Property { ty: Box::new(ty), get, set },
    }))
}

fn container_options(attrs: &[Attribute]) -> syn::Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serialize")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("value_type") {
                options.value_type = true;
            } else if meta.path.is_ident("opaque") {
                options.opaque = true;
            } else if meta.path.is_ident("self_describing") {
                options.self_describing = true;
            } else if meta.path.is_ident("property") {
                options.properties.extend(parse_property(&meta)?);
            } else {
                return Err(meta.error("unknown serialize container attribute"));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

/// Collects marked fields, then properties, sorted by order. The sort is
/// stable, so ties keep that sequence.
fn collect_members(
    data_struct: &DataStruct,
    properties: Vec<MemberSpec>,
) -> syn::Result<Vec<MemberSpec>> {
    let mut members = Vec::new();

    for (i, field) in data_struct.fields.iter().enumerate() {
        let Some(order) = field_order(&field.attrs)? else {
            continue;
        };

        let (name, member) = match &field.ident {
            Some(ident) => (ident.to_string(), syn::Member::Named(ident.clone())),
            None => (i.to_string(), syn::Member::Unnamed(Index::from(i))),
        };

        members.push(MemberSpec { name, order, access: Access::Field(member) });
    }

    members.extend(properties);
    members.sort_by_key(|member| member.order);

    Ok(members)
}

/// Derive macro for `Serializable`.
///
/// Implements `Composite` and `Serialize` for structs, or only `Serialize`
/// for `#[serialize(self_describing)]` types.
///
/// # Example
///
/// ```ignore
/// use binform_serialize::Serializable;
///
/// #[derive(Default, Serializable)]
/// #[serialize(property(order = 2, ty = u32, get = age, set = set_age))]
/// struct Person {
///     #[serialize(order = 0)]
///     name: String,
///     #[serialize(order = 1)]
///     friends: Vec<Person>,
///     age: u32,
/// }
///
/// impl Person {
///     fn age(&self) -> u32 { self.age }
///     fn set_age(&mut self, age: u32) { self.age = age; }
/// }
/// ```
#[proc_macro_derive(Serializable, attributes(serialize))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    derive_serializable_impl(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn derive_serializable_impl(
    input: &DeriveInput,
) -> syn::Result<proc_macro2::TokenStream> {
    let options = container_options(&input.attrs)?;

    if options.self_describing {
        return Ok(impl_self_describing(input));
    }

    let data_struct = match &input.data {
        Data::Struct(data_struct) => data_struct,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Serializable can only be derived for structs, or for \
                 enums marked `#[serialize(self_describing)]`",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Serializable cannot be derived for unions due to memory \
                 safety concerns",
            ));
        }
    };

    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) =
        input.generics.split_for_impl();

    // Build where clause for Serialize bounds
    let mut where_clause =
        where_clause.cloned().unwrap_or_else(|| syn::parse_quote!(where));

    // Add Serialize bounds for all generic type parameters
    for param in &input.generics.params {
        if let syn::GenericParam::Type(type_param) = param {
            let ident = &type_param.ident;
            where_clause
                .predicates
                .push(syn::parse_quote!(#ident: ::binform_serialize::Serialize));
        }
    }

    // Decoding starts from `Default::default()`, which a generic struct may
    // only provide for some parameters
    if !input.generics.params.is_empty() {
        where_clause
            .predicates
            .push(syn::parse_quote!(#name #ty_generics: ::std::default::Default));
    }

    let marked = !options.opaque;
    let nullable = !options.value_type;
    let members = collect_members(data_struct, options.properties)?;

    let descriptors = members.iter().map(|member| {
        let name = &member.name;
        let order = member.order;
        let access = match member.access {
            Access::Field(_) => quote!(::binform_serialize::Access::Field),
            Access::Property { .. } => {
                quote!(::binform_serialize::Access::Property)
            }
        };

        quote! {
            ::binform_serialize::Member {
                name: #name,
                order: #order,
                access: #access,
            }
        }
    });

    let encodes = members.iter().map(|member| match &member.access {
        Access::Field(field) => quote! {
            ::binform_serialize::encode_value(&self.#field, encoder, session)?;
        },
        Access::Property { ty, get, .. } => quote! {
            ::binform_serialize::encode_value::<#ty, _>(
                ::std::borrow::Borrow::<#ty>::borrow(&self.#get()),
                encoder,
                session,
            )?;
        },
    });

    let decodes = members.iter().map(|member| match &member.access {
        Access::Field(field) => quote! {
            self.#field = ::binform_serialize::decode_value(decoder, session)?;
        },
        Access::Property { ty, set, .. } => quote! {
            self.#set(
                ::binform_serialize::decode_value::<#ty, _>(decoder, session)?,
            );
        },
    });

    Ok(quote! {
        #[allow(clippy::trait_duplication_in_bounds)]
        impl #impl_generics ::binform_serialize::Composite for #name #ty_generics #where_clause {
            const DESCRIPTOR: ::binform_serialize::Descriptor =
                ::binform_serialize::Descriptor {
                    type_name: #name_str,
                    shape: ::binform_serialize::Shape {
                        marked: #marked,
                        nullable: #nullable,
                    },
                    members: &[#(#descriptors),*],
                };

            fn encode_members<__E: ::binform_serialize::Encoder + ?Sized>(
                &self,
                encoder: &mut __E,
                session: &::binform_serialize::Session<'_>,
            ) -> ::binform_serialize::Result<()> {
                #(#encodes)*
                Ok(())
            }

            fn decode_members<__D: ::binform_serialize::Decoder + ?Sized>(
                &mut self,
                decoder: &mut __D,
                session: &::binform_serialize::Session<'_>,
            ) -> ::binform_serialize::Result<()> {
                #(#decodes)*
                Ok(())
            }
        }

        #[allow(clippy::trait_duplication_in_bounds)]
        impl #impl_generics ::binform_serialize::Serialize for #name #ty_generics #where_clause {
            const KIND: ::binform_serialize::Kind =
                ::binform_serialize::Kind::Composite(
                    <Self as ::binform_serialize::Composite>::DESCRIPTOR.shape,
                );

            fn encode<__E: ::binform_serialize::Encoder + ?Sized>(
                &self,
                encoder: &mut __E,
                session: &::binform_serialize::Session<'_>,
            ) -> ::binform_serialize::Result<()> {
                ::binform_serialize::composite::encode_composite(
                    ::std::option::Option::Some(self),
                    encoder,
                    session,
                    ::binform_serialize::Mode::Permissive,
                )
            }

            fn decode<__D: ::binform_serialize::Decoder + ?Sized>(
                decoder: &mut __D,
                session: &::binform_serialize::Session<'_>,
            ) -> ::binform_serialize::Result<Self> {
                ::binform_serialize::composite::decode_required(
                    decoder,
                    session,
                    ::binform_serialize::Mode::Permissive,
                )
            }

            fn encode_nullable<__E: ::binform_serialize::Encoder + ?Sized>(
                value: ::std::option::Option<&Self>,
                encoder: &mut __E,
                session: &::binform_serialize::Session<'_>,
            ) -> ::binform_serialize::Result<()> {
                ::binform_serialize::composite::encode_nullable(
                    value,
                    encoder,
                    session,
                )
            }

            fn decode_nullable<__D: ::binform_serialize::Decoder + ?Sized>(
                decoder: &mut __D,
                session: &::binform_serialize::Session<'_>,
            ) -> ::binform_serialize::Result<::std::option::Option<Self>> {
                ::binform_serialize::composite::decode_nullable(
                    decoder,
                    session,
                )
            }
        }
    })
}

fn impl_self_describing(input: &DeriveInput) -> proc_macro2::TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) =
        input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::binform_serialize::Serialize for #name #ty_generics #where_clause {
            const KIND: ::binform_serialize::Kind =
                ::binform_serialize::Kind::SelfDescribing;

            fn encode<__E: ::binform_serialize::Encoder + ?Sized>(
                &self,
                encoder: &mut __E,
                _: &::binform_serialize::Session<'_>,
            ) -> ::binform_serialize::Result<()> {
                ::binform_serialize::SelfDescribing::encode_self(self, encoder)
            }

            fn decode<__D: ::binform_serialize::Decoder + ?Sized>(
                decoder: &mut __D,
                _: &::binform_serialize::Session<'_>,
            ) -> ::binform_serialize::Result<Self> {
                <Self as ::binform_serialize::SelfDescribing>::decode_self(
                    decoder,
                )
            }
        }
    }
}
