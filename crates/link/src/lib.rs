//! RSBridge Link - External Link Boundary
//!
//! This crate handles:
//! - The [`Link`] contract consumed by frame synchronisation
//! - Resolving the link library's exports into a function table
//! - [`FfiLink`], a link client calling through that table
//!
//! # Architecture
//!
//! The host resolves the library however it likes and hands a symbol
//! resolver to [`load_api`]. The resulting [`LinkApi`] is wrapped in an
//! [`FfiLink`] owned by the composition root and passed by reference to
//! every call site. There is no process-wide link instance.

pub mod client;
pub mod error;
pub mod link;
pub mod loader;

pub use client::FfiLink;
pub use error::{LinkError, LoadError};
pub use link::Link;
pub use loader::{load_api, LinkApi, SymbolResolver};
