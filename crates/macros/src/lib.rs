//! rsbridge Proc Macros
//!
//! - `#[derive(ParameterRoot)]` - Expose a struct's fields to the show controller
//!
//! # Example
//!
//! ```ignore
//! use rsbridge_core::glam::Vec3;
//! use rsbridge_core::ParameterRoot;
//!
//! #[derive(ParameterRoot)]
//! #[parameters(class = "StageScript")]
//! pub struct StageScript {
//!     enabled: bool,
//!
//!     #[param(category = "Motion", min = 0.0, max = 10.0)]
//!     speed: f32,
//!
//!     offset: Vec3,
//!
//!     #[param(option = "Off", option = "Slow", option = "Fast")]
//!     mode: u8,
//!
//!     #[param(skip)]
//!     cache: Vec<u8>,
//! }
//! ```
//!
//! # Attributes
//!
//! ## Struct Attributes
//!
//! - `#[parameters(class = "ClassName")]` - Optional. Class name for logs (default: struct name).
//!
//! ## Field Attributes
//!
//! - `#[param(name = "Name")]` - Property name (default: field name in PascalCase).
//! - `#[param(category = "Group")]` - Editor category, becomes the parameter group.
//! - `#[param(min = 0.0, max = 1.0)]` - Clamp range; both or neither.
//! - `#[param(option = "...")]` - Enum display name, repeatable.
//! - `#[param(readonly)]` - Visible but not editable.
//! - `#[param(instance_locked)]` - Editable on the class default only.
//! - `#[param(inherited)]` - Declared by a parent class.
//! - `#[param(skip)]` - Not a property at all.
//!
//! Fields of type `bool`, `u8`, `i32`, `f32`, `Vec3`, `Color` and
//! `LinearColor` are read and written; any other type is listed as an
//! unsupported property.

mod parameter_root;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for remotely controllable parameter roots
///
/// Generates a `PropertyRoot` implementation listing the struct's fields in
/// declared order, with typed reads and writes by index.
#[proc_macro_derive(ParameterRoot, attributes(parameters, param))]
pub fn derive_parameter_root(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    parameter_root::derive_parameter_root(input).into()
}
