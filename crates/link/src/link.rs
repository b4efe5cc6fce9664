//! The link contract consumed by frame synchronisation
//!
//! All calls are synchronous and bounded: only [`Link::poll_frame`] may
//! block, and only for the timeout it is given.

use rsbridge_sdk::{AssetHandle, CameraData, FrameData, StreamHandle};

use crate::error::LinkError;

/// Transport supplying frame, camera and parameter data
///
/// Implemented by [`FfiLink`](crate::FfiLink) for the real library and by
/// scripted fakes in tests.
pub trait Link {
    /// Check whether the link library is loaded and usable
    fn is_available(&self) -> bool;

    /// Protocol version reported by the library as (major, minor)
    fn version(&self) -> (i32, i32);

    /// Initialise the library
    fn init(&self) -> Result<(), LinkError>;

    /// Shut the library down
    fn shutdown(&self) -> Result<(), LinkError>;

    /// Register this process as a named asset
    fn create_asset(&self, name: &str) -> Result<AssetHandle, LinkError>;

    /// Unregister the asset
    fn destroy_asset(&self, asset: AssetHandle) -> Result<(), LinkError>;

    /// Create an output stream for a sink
    fn create_stream(&self, asset: AssetHandle, name: &str) -> Result<StreamHandle, LinkError>;

    /// Destroy an output stream
    fn destroy_stream(&self, asset: AssetHandle, stream: StreamHandle) -> Result<(), LinkError>;

    /// Wait up to `timeout_ms` for the next frame
    ///
    /// Returns the asset the frame is addressed to along with the frame data.
    fn poll_frame(&self, timeout_ms: u32) -> Result<(AssetHandle, FrameData), LinkError>;

    /// Fetch `count` parameter values for the schema with `schema_hash`
    fn fetch_parameters(
        &self,
        asset: AssetHandle,
        schema_hash: u64,
        count: usize,
    ) -> Result<Vec<f32>, LinkError>;

    /// Fetch this frame's camera for a stream
    fn fetch_camera(&self, asset: AssetHandle, stream: StreamHandle)
        -> Result<CameraData, LinkError>;

    /// Publish the JSON schema array for the asset
    fn publish_schema(&self, asset: AssetHandle, json: &str) -> Result<(), LinkError>;
}
