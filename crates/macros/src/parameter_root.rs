//! ParameterRoot derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Type};

use crate::parse::{parse_parameter_root, ParamFieldArgs, ParameterRootArgs};

/// Property kind a field type maps to, by the last path segment
fn kind_of(ty: &Type) -> &'static str {
    let Type::Path(type_path) = ty else {
        return "Unsupported";
    };
    let Some(segment) = type_path.path.segments.last() else {
        return "Unsupported";
    };

    match segment.ident.to_string().as_str() {
        "bool" => "Bool",
        "u8" => "Byte",
        "i32" => "Int",
        "f32" => "Float",
        "Vec3" => "Vector",
        "Color" => "Color",
        "LinearColor" => "LinearColor",
        _ => "Unsupported",
    }
}

/// Generate the ParameterRoot implementation
pub fn derive_parameter_root(input: DeriveInput) -> TokenStream {
    match parse_parameter_root(&input) {
        Ok(args) => generate_impl(args),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: ParameterRootArgs) -> TokenStream {
    let struct_name = &args.ident;
    let class_name = args
        .class_name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();

    let fields: Vec<ParamFieldArgs> = match args.data {
        darling::ast::Data::Struct(fields) => {
            fields.fields.into_iter().filter(|f| !f.skip).collect()
        }
        _ => {
            return syn::Error::new_spanned(
                &args.ident,
                "ParameterRoot can only be derived for structs",
            )
            .to_compile_error()
        }
    };

    for field in &fields {
        if field.min.is_some() != field.max.is_some() {
            return syn::Error::new_spanned(&field.ty, "`min` and `max` must be given together")
                .to_compile_error();
        }
    }

    let defs = fields.iter().map(generate_def);
    let getters = fields.iter().enumerate().filter_map(|(i, f)| generate_getter(i, f));
    let setters = fields.iter().enumerate().filter_map(|(i, f)| generate_setter(i, f));

    quote! {
        impl #impl_generics ::rsbridge_core::property::PropertyRoot for #struct_name #ty_generics #where_clause {
            fn class_name(&self) -> &str {
                #class_name
            }

            fn properties(&self) -> &[::rsbridge_core::property::PropertyDef] {
                static PROPERTIES: ::std::sync::OnceLock<
                    ::std::vec::Vec<::rsbridge_core::property::PropertyDef>,
                > = ::std::sync::OnceLock::new();
                PROPERTIES.get_or_init(|| ::std::vec![#(#defs),*])
            }

            fn value(&self, index: usize) -> ::std::option::Option<::rsbridge_core::property::PropertyValue> {
                match index {
                    #(#getters)*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_value(&mut self, index: usize, value: ::rsbridge_core::property::PropertyValue) -> bool {
                match (index, value) {
                    #(#setters)*
                    _ => false,
                }
            }
        }
    }
}

fn generate_def(field: &ParamFieldArgs) -> TokenStream {
    let name = field.property_name();
    let kind = format_ident!("{}", kind_of(&field.ty));
    let ty = &field.ty;
    let type_name = quote!(#ty).to_string().replace(' ', "");

    let edit = if field.readonly {
        quote! {}
    } else {
        quote! { | ::rsbridge_core::property::PropertyFlags::EDIT }
    };
    let locked = if field.instance_locked {
        quote! { | ::rsbridge_core::property::PropertyFlags::DISABLE_EDIT_ON_INSTANCE }
    } else {
        quote! {}
    };

    let category = field.category.as_ref().map(|c| quote! { .with_category(#c) });
    let clamp = match (field.min, field.max) {
        (Some(min), Some(max)) => Some(quote! { .with_clamp(#min, #max) }),
        _ => None,
    };
    let options = (!field.options.is_empty()).then(|| {
        let options = &field.options;
        quote! { .with_options([#(#options),*]) }
    });
    let inherited = field.inherited.then(|| quote! { .inherited() });

    quote! {
        ::rsbridge_core::property::PropertyDef::new(
            #name,
            ::rsbridge_core::property::PropertyKind::#kind,
        )
        .with_flags(::rsbridge_core::property::PropertyFlags::VISIBLE #edit #locked)
        .with_type_name(#type_name)
        #category
        #clamp
        #options
        #inherited
    }
}

fn generate_getter(index: usize, field: &ParamFieldArgs) -> Option<TokenStream> {
    let ident = field.ident.as_ref()?;
    let variant = match kind_of(&field.ty) {
        "Unsupported" => return None,
        kind => format_ident!("{}", kind),
    };

    Some(quote! {
        #index => ::std::option::Option::Some(
            ::rsbridge_core::property::PropertyValue::#variant(self.#ident)
        ),
    })
}

fn generate_setter(index: usize, field: &ParamFieldArgs) -> Option<TokenStream> {
    let ident = field.ident.as_ref()?;
    let variant = match kind_of(&field.ty) {
        "Unsupported" => return None,
        kind => format_ident!("{}", kind),
    };

    Some(quote! {
        (#index, ::rsbridge_core::property::PropertyValue::#variant(v)) => {
            self.#ident = v;
            true
        }
    })
}
