//! rsbridge - Remote control of a scene host by a show controller
//!
//! This crate holds the bridge logic: schema authoring and validation,
//! per-frame parameter and camera synchronisation, and the scene host
//! abstraction the bridge drives.
//!
//! # Re-exports
//!
//! - [`sdk`] - Link protocol wire types and version constants
//! - [`link`] - The [`Link`](link::Link) contract and its FFI client
//! - [`glam`] - Vector and rotation types used by camera receivers

// Allow the crate to refer to itself as `rsbridge_core` for proc macro compatibility
extern crate self as rsbridge_core;

pub use glam;
pub use rsbridge_link as link;
pub use rsbridge_sdk as sdk;

pub mod bridge;
pub mod camera;
pub mod config;
pub mod property;
pub mod scene;
pub mod schema;
pub mod sink;
pub mod status;
pub mod sync;
pub mod timecode;

#[cfg(test)]
mod testing;

pub use bridge::{BridgeError, RenderStreamBridge};
pub use camera::{DistanceUnit, LensModel, LensReceiver, LensUpdate, LocationReceiver, RotationReceiver};
pub use config::{BridgeConfig, ConfigError, ConfigResult};
pub use property::{
    Color, DynamicRoot, LinearColor, PropertyDef, PropertyFlags, PropertyKind, PropertyRoot,
    PropertyValue,
};
pub use scene::{ContainerId, LoadCompletion, MemoryScene, RootId, SceneHost};
pub use schema::{SceneSchema, SchemaError, SchemaSpec, StreamingHash};
pub use sink::{CameraReceivers, Sink, SinkKey};
pub use status::{StatusBoard, StatusLevel, StatusLine};
pub use sync::{FrameSync, SyncEvent, SyncState, TickReport};
pub use timecode::{FrameRate, QualifiedFrameTime, Timecode};

// Re-export macros
pub use rsbridge_macros::ParameterRoot;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence; otherwise `debug` selects the level. Safe
/// to call more than once.
pub fn init_logging(debug: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if debug { "debug" } else { "info" })
    });

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_sdk_types_exist() {
        use crate::sdk::FrameData;
        assert_eq!(std::mem::size_of::<FrameData>(), 40);
    }

    #[test]
    fn test_init_logging_twice() {
        crate::init_logging(true);
        crate::init_logging(false);
    }
}
