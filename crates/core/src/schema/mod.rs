//! Parameter schemas
//!
//! # Architecture
//!
//! ```text
//! PropertyRoot ──walker──> slots ──codec::author──> schema JSON (authoring)
//!                            │
//! schema JSON ──codec::validate──> hash + count ──> SchemaSpec (runtime)
//!                                                       │
//! float buffer ──walker::apply──> PropertyRoot <────────┘ (per frame)
//! ```
//!
//! The fingerprint is a [`StreamingHash`] over the transport keys in walk
//! order, so the controller and the runtime agree on slot layout without
//! exchanging the layout itself.

pub mod codec;
mod error;
pub mod hash;
mod spec;
pub mod walker;

pub use codec::{author, to_json, ParameterDescriptor, SceneSchema, Validated};
pub use error::SchemaError;
pub use hash::{fnv_hash, HashError, StreamingHash};
pub use spec::{SchemaSet, SchemaSpec};
pub use walker::{apply, describe, slot_count, transport_key, ApplyError, ParameterSlot, SlotKind};

/// Scene name of the schema that only carries persistent parameters
pub const PERSISTENT_SCENE_NAME: &str = "Persistent Level";
