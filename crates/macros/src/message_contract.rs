//! MessageContract derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{GenericArgument, PathArguments, Type};

use crate::parse::{parse_contract, ContractArgs, ContractFieldArgs};

/// Last path segment of a type, if it is a plain path
fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path.path.segments.last(),
        _ => None,
    }
}

/// First generic argument of a path segment, if it is a type
fn first_type_arg(segment: &syn::PathSegment) -> Option<&Type> {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        if let Some(GenericArgument::Type(inner)) = args.args.first() {
            return Some(inner);
        }
    }
    None
}

/// Extract the inner type from `PhantomData<T>` if present, otherwise return the type as-is
fn extract_inner_type(ty: &Type) -> &Type {
    match last_segment(ty) {
        Some(segment) if segment.ident == "PhantomData" => first_type_arg(segment).unwrap_or(ty),
        _ => ty,
    }
}

/// Check if a type is PhantomData
fn is_phantom_data(ty: &Type) -> bool {
    last_segment(ty)
        .map(|segment| segment.ident == "PhantomData")
        .unwrap_or(false)
}

/// Check if a type is `Option<Record>`
fn is_optional_record(ty: &Type) -> bool {
    last_segment(ty)
        .filter(|segment| segment.ident == "Option")
        .and_then(first_type_arg)
        .and_then(last_segment)
        .map(|inner| inner.ident == "Record")
        .unwrap_or(false)
}

/// Map a member to its declared field kind
fn field_kind(field: &ContractFieldArgs, ty: &Type) -> syn::Result<TokenStream> {
    let kinds = quote!(::dynmsg_engine::schema::FieldType);

    if let Some(target) = &field.record {
        if !is_optional_record(ty) {
            return Err(syn::Error::new_spanned(
                ty,
                "fields with `record = \"...\"` must have type Option<Record>",
            ));
        }
        return Ok(quote!(#kinds::Record(::std::string::String::from(#target))));
    }

    let segment = last_segment(ty).ok_or_else(|| unsupported(ty))?;
    let kind = if segment.ident == "i64" {
        quote!(#kinds::Integer)
    } else if segment.ident == "f64" {
        quote!(#kinds::Float)
    } else if segment.ident == "String" {
        quote!(#kinds::Text)
    } else if segment.ident == "bool" {
        quote!(#kinds::Boolean)
    } else if segment.ident == "Vec"
        && first_type_arg(segment)
            .and_then(last_segment)
            .map(|inner| inner.ident == "u8")
            .unwrap_or(false)
    {
        quote!(#kinds::Bytes)
    } else if is_optional_record(ty) {
        return Err(syn::Error::new_spanned(
            ty,
            "Option<Record> fields need `record = \"TypeName\"`",
        ));
    } else {
        return Err(unsupported(ty));
    };

    Ok(kind)
}

fn unsupported(ty: &Type) -> syn::Error {
    syn::Error::new_spanned(
        ty,
        "unsupported contract field type; expected i64, f64, String, bool, Vec<u8> \
         or Option<Record>",
    )
}

/// Generate the MessageContract implementation
pub fn derive_message_contract(input: syn::DeriveInput) -> TokenStream {
    match parse_contract(&input) {
        Ok(args) => generate_impl(args).unwrap_or_else(syn::Error::into_compile_error),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: ContractArgs) -> syn::Result<TokenStream> {
    let struct_name = &args.ident;
    let contract_name = &args.name;

    let fields = match args.data {
        darling::ast::Data::Struct(fields) => fields.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &args.ident,
                "MessageContract can only be derived for structs",
            ))
        }
    };

    if !fields.iter().any(|f| f.is_record_member()) {
        return Err(syn::Error::new_spanned(
            struct_name,
            "MessageContract structs need a `record: Record` member",
        ));
    }

    let descriptors = fields
        .iter()
        .filter(|f| f.is_contract_field())
        .map(generate_descriptor)
        .collect::<syn::Result<Vec<_>>>()?;

    let accessors: Vec<_> = fields
        .iter()
        .filter(|f| f.is_contract_field())
        .map(|f| generate_accessors(struct_name, f))
        .collect();

    let constants = generate_constants(&fields);
    let contract_impl = generate_contract_impl(struct_name, contract_name, &descriptors, &fields);

    Ok(quote! {
        impl #struct_name {
            #constants
        }

        #(#accessors)*

        #contract_impl
    })
}

fn clean_name(field: &ContractFieldArgs) -> String {
    let ident = field
        .ident
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_default();
    // Strip leading underscore from member name for accessor names
    ident.strip_prefix('_').unwrap_or(&ident).to_string()
}

fn const_field_name(field: &ContractFieldArgs) -> syn::Ident {
    format_ident!("{}_FIELD", clean_name(field).to_uppercase())
}

fn generate_descriptor(field: &ContractFieldArgs) -> syn::Result<TokenStream> {
    let ty = extract_inner_type(&field.ty);
    let kind = field_kind(field, ty)?;
    let const_name = const_field_name(field);

    Ok(quote! {
        ::dynmsg_engine::schema::FieldDescriptor::new(Self::#const_name, #kind)
    })
}

fn generate_accessors(struct_name: &syn::Ident, field: &ContractFieldArgs) -> TokenStream {
    let field_ty = extract_inner_type(&field.ty);
    let field_name = field.field_name.as_deref().unwrap_or_default();
    let clean = clean_name(field);
    let getter_name = format_ident!("{}", clean);
    let setter_name = format_ident!("set_{}", clean);
    let const_name = const_field_name(field);

    let getter_doc = format!("Get the value of `{}`", field_name);
    let setter_doc = format!("Set the value of `{}`", field_name);

    let getter = quote! {
        #[doc = #getter_doc]
        #[inline]
        pub fn #getter_name(&self) -> ::std::result::Result<#field_ty, ::dynmsg_engine::RecordError> {
            self.record.get_as::<#field_ty>(Self::#const_name)
        }
    };

    let setter = if field.readonly {
        quote! {}
    } else {
        quote! {
            #[doc = #setter_doc]
            #[inline]
            pub fn #setter_name(&mut self, value: #field_ty) -> ::std::result::Result<(), ::dynmsg_engine::RecordError> {
                self.record.set(Self::#const_name, value)
            }
        }
    };

    quote! {
        impl #struct_name {
            #getter
            #setter
        }
    }
}

fn generate_constants(fields: &[ContractFieldArgs]) -> TokenStream {
    let field_constants = fields.iter().filter(|f| f.is_contract_field()).map(|f| {
        let field_name = f.field_name.as_deref().unwrap_or_default();
        let const_name = const_field_name(f);
        let field_doc = format!("Record field name for `{}`", clean_name(f));

        quote! {
            #[doc = #field_doc]
            pub const #const_name: &'static str = #field_name;
        }
    });

    quote! {
        #(#field_constants)*
    }
}

fn generate_contract_impl(
    struct_name: &syn::Ident,
    contract_name: &str,
    descriptors: &[TokenStream],
    fields: &[ContractFieldArgs],
) -> TokenStream {
    // Non-record members get placeholder values when wrapping
    let member_inits: Vec<_> = fields
        .iter()
        .filter(|f| !f.is_record_member())
        .filter_map(|f| {
            let ident = f.ident.as_ref()?;
            if is_phantom_data(&f.ty) {
                Some(quote! { #ident: ::std::marker::PhantomData })
            } else {
                Some(quote! { #ident: ::std::default::Default::default() })
            }
        })
        .collect();

    quote! {
        impl ::dynmsg_engine::MessageContract for #struct_name {
            const CONTRACT_NAME: &'static str = #contract_name;

            fn schema() -> ::dynmsg_engine::schema::Schema {
                ::dynmsg_engine::schema::Schema::new(
                    #contract_name,
                    ::std::vec![#(#descriptors),*],
                )
            }

            fn wrap_unchecked(record: ::dynmsg_engine::Record) -> Self {
                Self {
                    record,
                    #(#member_inits),*
                }
            }

            fn record(&self) -> &::dynmsg_engine::Record {
                &self.record
            }

            fn into_record(self) -> ::dynmsg_engine::Record {
                self.record
            }
        }
    }
}
