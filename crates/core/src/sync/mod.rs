//! Per-frame synchronisation with the controller

mod frame_sync;

pub use frame_sync::{FrameSync, SyncEvent, SyncState, TickContext, TickReport};
