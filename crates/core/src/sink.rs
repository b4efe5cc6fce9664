//! Output sinks and the weak registry of active sinks
//!
//! A sink is one output stream plus the scene-graph nodes its camera
//! drives. Sinks never own those nodes, and the registry never owns the
//! sinks: dropping the last strong reference deactivates a sink.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rsbridge_sdk::{CameraData, CameraResponseData, FrameData, StreamHandle};
use slotmap::{new_key_type, SlotMap};

use crate::camera::{
    camera_location, camera_rotation, DistanceUnit, LensReceiver, LensUpdate, LocationReceiver,
    RotationReceiver,
};

new_key_type! {
    /// Key of a registered sink
    pub struct SinkKey;
}

/// Stream name used when no receiver has an owner
pub const DEFAULT_STREAM_NAME: &str = "Default";

/// Optional weak links to the nodes a sink's camera drives
#[derive(Default, Clone)]
pub struct CameraReceivers {
    location: Option<Weak<Mutex<dyn LocationReceiver>>>,
    rotation: Option<Weak<Mutex<dyn RotationReceiver>>>,
    lens: Option<Weak<Mutex<dyn LensReceiver>>>,
}

impl CameraReceivers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location<T: LocationReceiver + 'static>(mut self, receiver: &Arc<Mutex<T>>) -> Self {
        let shared: Arc<Mutex<dyn LocationReceiver>> = receiver.clone();
        self.location = Some(Arc::downgrade(&shared));
        self
    }

    pub fn with_rotation<T: RotationReceiver + 'static>(mut self, receiver: &Arc<Mutex<T>>) -> Self {
        let shared: Arc<Mutex<dyn RotationReceiver>> = receiver.clone();
        self.rotation = Some(Arc::downgrade(&shared));
        self
    }

    pub fn with_lens<T: LensReceiver + 'static>(mut self, receiver: &Arc<Mutex<T>>) -> Self {
        let shared: Arc<Mutex<dyn LensReceiver>> = receiver.clone();
        self.lens = Some(Arc::downgrade(&shared));
        self
    }

    fn location(&self) -> Option<Arc<Mutex<dyn LocationReceiver>>> {
        self.location.as_ref().and_then(Weak::upgrade)
    }

    fn rotation(&self) -> Option<Arc<Mutex<dyn RotationReceiver>>> {
        self.rotation.as_ref().and_then(Weak::upgrade)
    }

    fn lens(&self) -> Option<Arc<Mutex<dyn LensReceiver>>> {
        self.lens.as_ref().and_then(Weak::upgrade)
    }

    /// Name for the output stream: lens owner, then location, then rotation
    pub fn stream_name(&self) -> String {
        self.lens()
            .and_then(|r| r.lock().owner_name())
            .or_else(|| self.location().and_then(|r| r.lock().owner_name()))
            .or_else(|| self.rotation().and_then(|r| r.lock().owner_name()))
            .unwrap_or_else(|| DEFAULT_STREAM_NAME.to_string())
    }
}

/// One output stream and the camera targets it drives
pub struct Sink {
    name: String,
    stream: StreamHandle,
    receivers: CameraReceivers,
    response: CameraResponseData,
}

impl Sink {
    pub fn new(receivers: CameraReceivers) -> Self {
        Self {
            name: receivers.stream_name(),
            stream: 0,
            receivers,
            response: CameraResponseData::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stream handle on the link, zero until a stream is created
    pub fn stream_handle(&self) -> StreamHandle {
        self.stream
    }

    pub fn set_stream_handle(&mut self, stream: StreamHandle) {
        self.stream = stream;
    }

    /// Camera response to attach to this sink's next outgoing frame
    pub fn response(&self) -> CameraResponseData {
        self.response
    }

    /// Record this frame's camera and push it into the receivers
    ///
    /// The response is always recorded. Receivers are left untouched when
    /// the camera handle is zero. Returns whether receivers were updated.
    pub fn apply_camera(&mut self, frame: &FrameData, camera: &CameraData, unit: DistanceUnit) -> bool {
        self.response = CameraResponseData {
            t_tracked: frame.t_tracked,
            camera: *camera,
        };

        let handle = camera.camera_handle;
        if handle == 0 {
            return false;
        }

        if let Some(lens) = self.receivers.lens() {
            let mut lens = lens.lock();
            let update = LensUpdate::for_model(lens.lens_model(), camera);
            lens.set_lens(update);
        }
        if let Some(rotation) = self.receivers.rotation() {
            rotation.lock().set_rotation(camera_rotation(camera));
        }
        if let Some(location) = self.receivers.location() {
            location.lock().set_location(camera_location(camera, unit));
        }
        true
    }
}

/// Weak set of active sinks
#[derive(Default)]
pub struct SinkRegistry {
    sinks: SlotMap<SinkKey, Weak<Mutex<Sink>>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sink: &Arc<Mutex<Sink>>) -> SinkKey {
        self.sinks.insert(Arc::downgrade(sink))
    }

    /// Returns the sink if it was registered and is still alive
    pub fn remove(&mut self, key: SinkKey) -> Option<Arc<Mutex<Sink>>> {
        self.sinks.remove(key).and_then(|weak| weak.upgrade())
    }

    /// Live sinks, pruning any that have been dropped
    pub fn active(&mut self) -> Vec<Arc<Mutex<Sink>>> {
        self.sinks.retain(|_, weak| weak.strong_count() > 0);
        self.sinks.values().filter_map(Weak::upgrade).collect()
    }

    pub fn len(&self) -> usize {
        self.sinks.values().filter(|weak| weak.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
