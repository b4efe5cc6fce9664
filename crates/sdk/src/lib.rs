//! RSBridge SDK - Link Protocol Type Definitions
//!
//! This crate contains the `#[repr(C)]` types exchanged with the external
//! link library. It has no dependencies and compiles quickly, allowing
//! parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`types`] - Wire structs and handle aliases
//! - [`status`] - Error codes returned by every link call
//! - [`api`] - Function pointer signatures of the link exports
//! - [`versions`] - Protocol version and exported symbol names

pub mod api;
pub mod status;
pub mod types;
pub mod versions;

pub use api::*;
pub use status::RsError;
pub use types::*;
pub use versions::{LINK_SYMBOLS, RENDER_STREAM_VERSION_MAJOR, RENDER_STREAM_VERSION_MINOR};
