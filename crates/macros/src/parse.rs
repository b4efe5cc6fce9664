//! Attribute parsing for the ParameterRoot derive macro

use darling::{FromDeriveInput, FromField};
use syn::{DeriveInput, Generics, Ident, Type};

/// Parsed #[parameters(...)] attributes on the struct
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(parameters), supports(struct_named))]
pub struct ParameterRootArgs {
    /// Struct identifier
    pub ident: Ident,

    pub generics: Generics,

    /// Struct fields
    pub data: darling::ast::Data<(), ParamFieldArgs>,

    /// Class name used in log output (defaults to the struct name)
    #[darling(default, rename = "class")]
    pub class_name: Option<String>,
}

/// Parsed #[param(...)] attributes on a field
#[derive(Debug, FromField)]
#[darling(attributes(param))]
pub struct ParamFieldArgs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Property name, defaults to the field name in PascalCase
    #[darling(default)]
    pub name: Option<String>,

    /// Editor category
    #[darling(default)]
    pub category: Option<String>,

    /// Leave the field out of the property list entirely
    #[darling(default)]
    pub skip: bool,

    /// Visible but not editable, so never exposed
    #[darling(default)]
    pub readonly: bool,

    /// Editable on the class default only
    #[darling(default)]
    pub instance_locked: bool,

    /// Declared by a parent class
    #[darling(default)]
    pub inherited: bool,

    #[darling(default)]
    pub min: Option<f32>,

    #[darling(default)]
    pub max: Option<f32>,

    /// Enum display names, one attribute per option
    #[darling(multiple, rename = "option")]
    pub options: Vec<String>,
}

impl ParamFieldArgs {
    /// Property name as seen by the walker
    pub fn property_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let ident = self
            .ident
            .as_ref()
            .map(|i| i.to_string())
            .unwrap_or_default();
        pascal_case(ident.strip_prefix("r#").unwrap_or(&ident))
    }
}

/// Convert a snake_case identifier to PascalCase
pub fn pascal_case(ident: &str) -> String {
    ident
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Parse a DeriveInput into ParameterRootArgs
pub fn parse_parameter_root(input: &DeriveInput) -> darling::Result<ParameterRootArgs> {
    ParameterRootArgs::from_derive_input(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("enabled"), "Enabled");
        assert_eq!(pascal_case("light_colour"), "LightColour");
        assert_eq!(pascal_case("_speed"), "Speed");
        assert_eq!(pascal_case("Offset"), "Offset");
    }
}
