//! Token generation for runtime descriptors.
//!
//! Every descriptor is rendered as the builder chain that reconstructs it,
//! with fully qualified `swagql_runtime` paths so the emitted module needs
//! no imports.

use std::fmt::Debug;

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};
use swagql_runtime::{
    EnumType, FieldResolver, FieldSpec, InputFieldSpec, InputObjectType, InputShape,
    ObjectType, OperationBinding, OutputShape, ParamBinding, ScalarType, TypeSpec,
};

use crate::tree::{ApiTypeTag, Declaration, DeclarationItem};

/// Generates `pub fn <fn_name>() -> <Descriptor>` for one declaration.
///
/// ## Examples
///
/// For the `Category` definition:
/// ```ignore
/// /// Object type `Category`.
/// ///
/// /// apiType: `/definitions/Category`
/// pub fn category_type() -> swagql_runtime::ObjectType {
///     swagql_runtime::ObjectType::new("Category")
///         .field(swagql_runtime::FieldSpec::raw_key(
///             "id",
///             "id",
///             swagql_runtime::TypeSpec::named("Int"),
///             swagql_runtime::OutputShape::Scalar,
///         ))
/// }
/// ```
pub fn generate_declaration(item: &DeclarationItem, fn_name: &Ident) -> TokenStream {
    let declaration = &item.declaration;
    let summary = format!(
        " {} type `{}`.",
        capitalize(declaration.kind()),
        declaration.name()
    );
    let api_type_doc = item.api_type.as_ref().map(api_type_doc);

    let (return_type, body) = match declaration {
        Declaration::Scalar(ty) => (quote!(swagql_runtime::ScalarType), scalar_tokens(ty)),
        Declaration::Enum(ty) => (quote!(swagql_runtime::EnumType), enum_tokens(ty)),
        Declaration::Object(ty) | Declaration::Query(ty) | Declaration::Mutation(ty) => {
            (quote!(swagql_runtime::ObjectType), object_tokens(ty))
        }
        Declaration::InputObject(ty) => {
            (quote!(swagql_runtime::InputObjectType), input_object_tokens(ty))
        }
    };

    quote! {
        #[doc = #summary]
        #api_type_doc
        pub fn #fn_name() -> #return_type {
            #body
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn api_type_doc(tag: &ApiTypeTag) -> TokenStream {
    let line = format!(" apiType: `{}`", tag.pointer);
    quote! {
        #[doc = ""]
        #[doc = #line]
    }
}

fn description_call(description: &Option<String>) -> TokenStream {
    match description {
        Some(text) => quote!(.description(#text)),
        None => quote!(),
    }
}

fn scalar_tokens(ty: &ScalarType) -> TokenStream {
    let name = &ty.name;
    let description = description_call(&ty.description);
    quote!(swagql_runtime::ScalarType::new(#name) #description)
}

fn enum_tokens(ty: &EnumType) -> TokenStream {
    let name = &ty.name;
    let description = description_call(&ty.description);
    let values = ty.values.iter().map(|(raw, item)| quote!(.value(#raw, #item)));
    quote!(swagql_runtime::EnumType::new(#name) #description #(#values)*)
}

fn object_tokens(ty: &ObjectType) -> TokenStream {
    let name = &ty.name;
    let description = description_call(&ty.description);
    let fields = ty.fields.iter().map(|field| {
        let field = field_tokens(field);
        quote!(.field(#field))
    });
    quote!(swagql_runtime::ObjectType::new(#name) #description #(#fields)*)
}

fn input_object_tokens(ty: &InputObjectType) -> TokenStream {
    let name = &ty.name;
    let description = description_call(&ty.description);
    let fields = ty.fields.iter().map(|field| {
        let field = input_field_tokens(field);
        quote!(.field(#field))
    });
    quote!(swagql_runtime::InputObjectType::new(#name) #description #(#fields)*)
}

fn field_tokens(field: &FieldSpec) -> TokenStream {
    let name = &field.name;
    let ty = type_tokens(&field.ty);
    let constructor = match &field.resolver {
        FieldResolver::RawKey { raw, shape } => {
            let shape = output_shape_tokens(shape);
            quote!(swagql_runtime::FieldSpec::raw_key(#name, #raw, #ty, #shape))
        }
        FieldResolver::ParentValue => quote!(swagql_runtime::FieldSpec::parent_value(#name)),
        FieldResolver::RawInputOptions => quote!(swagql_runtime::FieldSpec::raw_input_options()),
        FieldResolver::Operation(binding) => {
            let binding = binding_tokens(binding);
            quote!(swagql_runtime::FieldSpec::operation(#name, #ty, #binding))
        }
    };
    let description = description_call(&field.description);
    let deprecated = if field.deprecated {
        quote!(.deprecated())
    } else {
        quote!()
    };
    quote!(#constructor #description #deprecated)
}

fn input_field_tokens(field: &InputFieldSpec) -> TokenStream {
    let name = &field.name;
    let raw = &field.raw;
    let ty = type_tokens(&field.ty);
    let shape = input_shape_tokens(&field.shape);
    let description = description_call(&field.description);
    quote!(swagql_runtime::InputFieldSpec::new(#name, #raw, #ty, #shape) #description)
}

fn binding_tokens(binding: &OperationBinding) -> TokenStream {
    let verb = variant_ident(binding.verb);
    let path = &binding.path;
    let operation_id = &binding.operation_id;
    let response = output_shape_tokens(&binding.response);
    let params = binding.params.iter().map(|param| {
        let param = param_tokens(param);
        quote!(.param(#param))
    });
    quote! {
        swagql_runtime::OperationBinding::new(
            swagql_runtime::Verb::#verb,
            #path,
            #operation_id,
            #response,
        )
        #(#params)*
    }
}

/// Ident for a fieldless enum variant, taken from its `Debug` name.
fn variant_ident(value: impl Debug) -> Ident {
    Ident::new(&format!("{value:?}"), Span::call_site())
}

fn param_tokens(param: &ParamBinding) -> TokenStream {
    let raw = &param.raw;
    let name = &param.name;
    let location = variant_ident(param.location);
    let ty = type_tokens(&param.ty);
    let shape = input_shape_tokens(&param.shape);
    let format = variant_ident(param.collection_format);
    let description = description_call(&param.description);
    quote! {
        swagql_runtime::ParamBinding::new(
            #raw,
            #name,
            swagql_runtime::ParameterLocation::#location,
            #ty,
            #shape,
        )
        .collection_format(swagql_runtime::CollectionFormat::#format)
        #description
    }
}

/// `Named` becomes `TypeSpec::named(..)`; wrappers become method calls.
fn type_tokens(ty: &TypeSpec) -> TokenStream {
    match ty {
        TypeSpec::Named(name) => quote!(swagql_runtime::TypeSpec::named(#name)),
        TypeSpec::NonNull(inner) => {
            let inner = type_tokens(inner);
            quote!(#inner.non_null())
        }
        TypeSpec::List(inner) => {
            let inner = type_tokens(inner);
            quote!(#inner.list())
        }
    }
}

fn output_shape_tokens(shape: &OutputShape) -> TokenStream {
    match shape {
        OutputShape::Scalar => quote!(swagql_runtime::OutputShape::Scalar),
        OutputShape::Object => quote!(swagql_runtime::OutputShape::Object),
        OutputShape::Raw => quote!(swagql_runtime::OutputShape::Raw),
        OutputShape::Enum(name) => {
            quote!(swagql_runtime::OutputShape::Enum(::std::string::String::from(#name)))
        }
        OutputShape::List(inner) => {
            let inner = output_shape_tokens(inner);
            quote!(swagql_runtime::OutputShape::List(::std::boxed::Box::new(#inner)))
        }
    }
}

fn input_shape_tokens(shape: &InputShape) -> TokenStream {
    match shape {
        InputShape::Scalar => quote!(swagql_runtime::InputShape::Scalar),
        InputShape::Enum(name) => {
            quote!(swagql_runtime::InputShape::Enum(::std::string::String::from(#name)))
        }
        InputShape::Object(name) => {
            quote!(swagql_runtime::InputShape::Object(::std::string::String::from(#name)))
        }
        InputShape::List(inner) => {
            let inner = input_shape_tokens(inner);
            quote!(swagql_runtime::InputShape::List(::std::boxed::Box::new(#inner)))
        }
    }
}
