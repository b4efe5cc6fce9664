//! Link protocol wire types
//!
//! These mirror the structs the link library reads and writes. Layouts use
//! 4-byte packing, so 64-bit fields must be copied out before being borrowed
//! (`{ data.id }`), never referenced in place.

/// Handle to an output stream created on the link
pub type StreamHandle = u64;

/// Handle to the asset this process is registered as
pub type AssetHandle = u64;

/// Handle identifying the controller-side camera driving a stream
///
/// Zero means "no camera data this frame".
pub type CameraHandle = u64;

/// No frame flags set
pub const FRAMEDATA_NO_FLAGS: u32 = 0;

/// The controller requested a reset of time-dependent state
pub const FRAMEDATA_RESET: u32 = 1;

/// Camera transform and lens for one stream, one frame
#[repr(C, packed(4))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraData {
    /// Stream the camera belongs to
    pub id: StreamHandle,
    /// Controller camera, zero when absent
    pub camera_handle: CameraHandle,
    /// Position in metres
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Rotation in degrees (pitch, yaw, roll)
    pub rx: f32,
    pub ry: f32,
    pub rz: f32,
    /// Focal length in millimetres
    pub focal_length: f32,
    /// Sensor size in millimetres
    pub sensor_x: f32,
    pub sensor_y: f32,
    /// Principal point offset
    pub cx: f32,
    pub cy: f32,
    /// Clip planes
    pub near_z: f32,
    pub far_z: f32,
}

/// Per-frame synchronisation data delivered by `rs_awaitFrameData`
#[repr(C, packed(4))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameData {
    /// Tracked time of the camera data
    pub t_tracked: f64,
    /// Controller local time in seconds
    pub local_time: f64,
    /// Delta since the previous frame
    pub local_time_delta: f64,
    pub frame_rate_numerator: u32,
    pub frame_rate_denominator: u32,
    /// Bitmask of `FRAMEDATA_*` flags
    pub flags: u32,
    /// Index into the published schema array
    pub scene: u32,
}

impl FrameData {
    /// Check whether the controller requested a reset
    pub fn is_reset(&self) -> bool {
        self.flags & FRAMEDATA_RESET != 0
    }
}

/// Camera response attached to each outgoing frame
#[repr(C, packed(4))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraResponseData {
    pub t_tracked: f64,
    pub camera: CameraData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_sizes() {
        assert_eq!(std::mem::size_of::<CameraData>(), 68);
        assert_eq!(std::mem::size_of::<FrameData>(), 40);
        assert_eq!(std::mem::size_of::<CameraResponseData>(), 76);
    }

    #[test]
    fn test_reset_flag() {
        let frame = FrameData {
            flags: FRAMEDATA_RESET,
            ..Default::default()
        };
        assert!(frame.is_reset());
        assert!(!FrameData::default().is_reset());
    }
}
