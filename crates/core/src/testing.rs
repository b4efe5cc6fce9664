//! Scripted link used by frame loop and bridge tests

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use rsbridge_link::{Link, LinkError};
use rsbridge_sdk::{AssetHandle, CameraData, FrameData, StreamHandle};

/// Call recorded by [`ScriptedLink`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init,
    Shutdown,
    CreateAsset(String),
    DestroyAsset(AssetHandle),
    CreateStream(String),
    DestroyStream(StreamHandle),
    Poll(u32),
    Parameters { hash: u64, count: usize },
    Camera(StreamHandle),
    PublishSchema(String),
}

pub struct ScriptedLink {
    pub asset: AssetHandle,
    available: Mutex<bool>,
    version: (i32, i32),
    polls: Mutex<VecDeque<Result<(AssetHandle, FrameData), LinkError>>>,
    parameters: Mutex<HashMap<u64, Vec<f32>>>,
    cameras: Mutex<HashMap<StreamHandle, CameraData>>,
    next_stream: Mutex<StreamHandle>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedLink {
    pub fn new(asset: AssetHandle) -> Self {
        Self {
            asset,
            available: Mutex::new(true),
            version: (
                rsbridge_sdk::RENDER_STREAM_VERSION_MAJOR,
                rsbridge_sdk::RENDER_STREAM_VERSION_MINOR,
            ),
            polls: Mutex::new(VecDeque::new()),
            parameters: Mutex::new(HashMap::new()),
            cameras: Mutex::new(HashMap::new()),
            next_stream: Mutex::new(100),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_version(mut self, major: i32, minor: i32) -> Self {
        self.version = (major, minor);
        self
    }

    pub fn set_available(&self, available: bool) {
        *self.available.lock() = available;
    }

    /// Queue a frame for `scene` addressed to this link's asset
    pub fn push_frame(&self, scene: u32) {
        let frame = FrameData {
            scene,
            local_time: 1.0,
            frame_rate_numerator: 25,
            frame_rate_denominator: 1,
            ..Default::default()
        };
        self.polls.lock().push_back(Ok((self.asset, frame)));
    }

    pub fn push_poll(&self, result: Result<(AssetHandle, FrameData), LinkError>) {
        self.polls.lock().push_back(result);
    }

    pub fn set_parameters(&self, hash: u64, values: Vec<f32>) {
        self.parameters.lock().insert(hash, values);
    }

    pub fn set_camera(&self, stream: StreamHandle, camera: CameraData) {
        self.cameras.lock().insert(stream, camera);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl Link for ScriptedLink {
    fn is_available(&self) -> bool {
        *self.available.lock()
    }

    fn version(&self) -> (i32, i32) {
        self.version
    }

    fn init(&self) -> Result<(), LinkError> {
        self.record(Call::Init);
        Ok(())
    }

    fn shutdown(&self) -> Result<(), LinkError> {
        self.record(Call::Shutdown);
        self.set_available(false);
        Ok(())
    }

    fn create_asset(&self, name: &str) -> Result<AssetHandle, LinkError> {
        self.record(Call::CreateAsset(name.to_string()));
        Ok(self.asset)
    }

    fn destroy_asset(&self, asset: AssetHandle) -> Result<(), LinkError> {
        self.record(Call::DestroyAsset(asset));
        Ok(())
    }

    fn create_stream(&self, _asset: AssetHandle, name: &str) -> Result<StreamHandle, LinkError> {
        self.record(Call::CreateStream(name.to_string()));
        let mut next = self.next_stream.lock();
        *next += 1;
        Ok(*next)
    }

    fn destroy_stream(&self, _asset: AssetHandle, stream: StreamHandle) -> Result<(), LinkError> {
        self.record(Call::DestroyStream(stream));
        Ok(())
    }

    fn poll_frame(&self, timeout_ms: u32) -> Result<(AssetHandle, FrameData), LinkError> {
        self.record(Call::Poll(timeout_ms));
        self.polls
            .lock()
            .pop_front()
            .unwrap_or(Err(LinkError::Timeout))
    }

    fn fetch_parameters(
        &self,
        _asset: AssetHandle,
        schema_hash: u64,
        count: usize,
    ) -> Result<Vec<f32>, LinkError> {
        self.record(Call::Parameters {
            hash: schema_hash,
            count,
        });
        match self.parameters.lock().get(&schema_hash) {
            Some(values) if values.len() == count => Ok(values.clone()),
            Some(_) => Err(LinkError::Unspecified),
            None => Err(LinkError::IncorrectSchema),
        }
    }

    fn fetch_camera(
        &self,
        _asset: AssetHandle,
        stream: StreamHandle,
    ) -> Result<CameraData, LinkError> {
        self.record(Call::Camera(stream));
        self.cameras
            .lock()
            .get(&stream)
            .copied()
            .ok_or(LinkError::NotFound)
    }

    fn publish_schema(&self, _asset: AssetHandle, json: &str) -> Result<(), LinkError> {
        self.record(Call::PublishSchema(json.to_string()));
        Ok(())
    }
}
