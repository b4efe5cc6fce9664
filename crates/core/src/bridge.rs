//! Composition root tying the link, schemas, sinks and frame loop together
//!
//! The host owns its scenes and passes them in per call; the bridge owns
//! the link client and everything derived from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rsbridge_link::{Link, LinkError};
use rsbridge_sdk::{AssetHandle, RENDER_STREAM_VERSION_MAJOR, RENDER_STREAM_VERSION_MINOR};
use serde_json::Value;

use crate::config::{BridgeConfig, ConfigError};
use crate::scene::{LoadQueue, SceneHost};
use crate::schema::{codec, SceneSchema, SchemaError, SchemaSet, SchemaSpec, PERSISTENT_SCENE_NAME};
use crate::sink::{Sink, SinkKey, SinkRegistry};
use crate::status::{StatusBoard, StatusLevel};
use crate::sync::{FrameSync, SyncEvent, SyncState, TickContext, TickReport};
use crate::timecode::{QualifiedFrameTime, TimecodeProvider};

/// Schema text published when no valid schema could be loaded
const EMPTY_SCHEMA: &str = "[]";

/// Bridge lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Link library unavailable")]
    LinkUnavailable,

    #[error("Unsupported link library {found_major}.{found_minor}, expected {expected_major}.{expected_minor}")]
    VersionMismatch {
        expected_major: i32,
        expected_minor: i32,
        found_major: i32,
        found_minor: i32,
    },

    #[error("Unable to initialise link library: {0}")]
    Init(LinkError),

    #[error("Unable to create asset: {0}")]
    CreateAsset(LinkError),

    #[error("Unable to create stream: {0}")]
    CreateStream(LinkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Schema file error: {0}")]
    Io(#[from] std::io::Error),
}

/// The remote-control bridge of one project
pub struct RenderStreamBridge<L: Link> {
    config: BridgeConfig,
    link: L,
    project_name: String,
    content_dir: PathBuf,
    asset: Option<AssetHandle>,
    schemas: SchemaSet,
    schema_text: String,
    sinks: SinkRegistry,
    sync: FrameSync,
    loads: LoadQueue,
    status: StatusBoard,
    timecode: TimecodeProvider,
}

impl<L: Link> RenderStreamBridge<L> {
    pub fn new(
        config: BridgeConfig,
        link: L,
        project_name: impl Into<String>,
        content_dir: impl Into<PathBuf>,
    ) -> Self {
        let schemas = SchemaSet::new();
        schemas.replace(vec![SchemaSpec::empty("Default")]);

        Self {
            config,
            link,
            project_name: project_name.into(),
            content_dir: content_dir.into(),
            asset: None,
            schemas,
            schema_text: EMPTY_SCHEMA.to_string(),
            sinks: SinkRegistry::new(),
            sync: FrameSync::new(),
            loads: LoadQueue::new(),
            status: StatusBoard::new(),
            timecode: TimecodeProvider::new(),
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn asset(&self) -> Option<AssetHandle> {
        self.asset
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    /// Current schema collection
    pub fn schemas(&self) -> Arc<Vec<SchemaSpec>> {
        self.schemas.snapshot()
    }

    /// Schema JSON last published to the controller
    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    pub fn schema_path(&self) -> PathBuf {
        self.config.schema_path(&self.content_dir)
    }

    fn fail(&self, error: BridgeError) -> BridgeError {
        tracing::error!("{}", error);
        let message = match &error {
            BridgeError::LinkUnavailable => "Failed to load link library",
            BridgeError::VersionMismatch { .. } => "Unsupported link library",
            BridgeError::Init(_) => "Unable to initialise link library",
            _ => "Unable to create asset - failure to initialise",
        };
        self.status.set_both("Error", message, StatusLevel::Red);
        error
    }

    /// Check the protocol version, initialise the link and register the asset
    #[tracing::instrument(skip_all, fields(project = %self.project_name))]
    pub fn startup(&mut self) -> Result<AssetHandle, BridgeError> {
        self.status
            .set_both("Initialising stream", "Waiting for data", StatusLevel::Orange);

        if !self.link.is_available() {
            return Err(self.fail(BridgeError::LinkUnavailable));
        }

        let (major, minor) = self.link.version();
        tracing::info!("Link library version {}.{}", major, minor);
        if major != RENDER_STREAM_VERSION_MAJOR || minor != RENDER_STREAM_VERSION_MINOR {
            let _ = self.link.shutdown();
            return Err(self.fail(BridgeError::VersionMismatch {
                expected_major: RENDER_STREAM_VERSION_MAJOR,
                expected_minor: RENDER_STREAM_VERSION_MINOR,
                found_major: major,
                found_minor: minor,
            }));
        }

        if let Err(e) = self.link.init() {
            let _ = self.link.shutdown();
            return Err(self.fail(BridgeError::Init(e)));
        }

        let asset = match self.link.create_asset(&self.project_name) {
            Ok(asset) => asset,
            Err(e) => {
                let _ = self.link.shutdown();
                return Err(self.fail(BridgeError::CreateAsset(e)));
            }
        };

        tracing::info!("Created asset '{}'", self.project_name);
        self.asset = Some(asset);
        Ok(asset)
    }

    /// Destroy the asset and shut the link down
    #[tracing::instrument(skip_all)]
    pub fn shutdown(&mut self) {
        if !self.link.is_available() {
            return;
        }
        tracing::info!("Shutting down bridge");

        if let Some(asset) = self.asset.take() {
            if let Err(e) = self.link.destroy_asset(asset) {
                tracing::warn!("Failed to destroy asset: {}", e);
            }
        }
        if let Err(e) = self.link.shutdown() {
            tracing::warn!("Failed to shut down link library: {}", e);
        }
    }

    /// Reload the schema file, validate it against `host` and publish it
    pub fn load_schemas(&mut self, host: &dyn SceneHost) {
        let path = self.schema_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to read schema {:?}: {}", path, e);
                String::new()
            }
        };
        self.load_schemas_from_str(host, &text);
    }

    /// Validate schema JSON against `host`, replace the collection and publish
    ///
    /// Any invalid scene rejects the whole file; the controller then gets
    /// an empty schema and the bridge a single zero-slot scene.
    #[tracing::instrument(skip_all)]
    pub fn load_schemas_from_str(&mut self, host: &dyn SceneHost, text: &str) {
        let (specs, published) = match resolve_specs(host, text) {
            Ok(specs) => (specs, text.to_string()),
            Err(e) => {
                tracing::error!("Failed to parse schema {:?}: {}", self.schema_path(), e);
                (Vec::new(), EMPTY_SCHEMA.to_string())
            }
        };

        let specs = if specs.is_empty() {
            vec![SchemaSpec::empty("Default")]
        } else {
            specs
        };
        self.schemas.replace(specs);
        self.schema_text = published;

        if let Some(asset) = self.asset {
            if let Err(e) = self.link.publish_schema(asset, &self.schema_text) {
                tracing::error!("Unable to set remote parameter schema: {}", e);
            }
        }
    }

    /// Author the schema of every scene from the live roots
    pub fn generate_schemas(&self, host: &dyn SceneHost) -> Vec<SceneSchema> {
        let persistent = host.persistent_root();
        let mut scenes = vec![codec::author(PERSISTENT_SCENE_NAME, persistent, None)];

        if self.config.generate_scenes_from_levels {
            for container in host.containers() {
                let Some(name) = host.container_name(container) else {
                    continue;
                };
                scenes.push(codec::author(&name, persistent, host.root(container)));
            }
        }

        scenes
    }

    /// Author every scene and write the result to the schema file
    pub fn write_schemas(&self, host: &dyn SceneHost) -> Result<PathBuf, BridgeError> {
        let json = codec::to_json(&self.generate_schemas(host))?;
        let path = self.schema_path();
        write_file(&path, &json)?;
        tracing::info!("Wrote schema to {:?}", path);
        Ok(path)
    }

    /// Create a stream for the sink and start synchronising it
    pub fn add_sink(&mut self, sink: &Arc<Mutex<Sink>>) -> Result<SinkKey, BridgeError> {
        let Some(asset) = self.asset else {
            return Err(BridgeError::LinkUnavailable);
        };

        let mut guard = sink.lock();
        match self.link.create_stream(asset, guard.name()) {
            Ok(stream) => {
                guard.set_stream_handle(stream);
                tracing::info!("Created stream '{}'", guard.name());
                self.status.set_output("Connected to stream", StatusLevel::Green);
            }
            Err(e) => {
                tracing::error!("Unable to create stream '{}': {}", guard.name(), e);
                self.status.set_output("Error: Unable to create stream", StatusLevel::Red);
                return Err(BridgeError::CreateStream(e));
            }
        }
        drop(guard);

        Ok(self.sinks.add(sink))
    }

    /// Stop synchronising a sink and destroy its stream
    pub fn remove_sink(&mut self, key: SinkKey) {
        let Some(sink) = self.sinks.remove(key) else {
            return;
        };
        let mut sink = sink.lock();
        let stream = sink.stream_handle();
        if stream == 0 {
            return;
        }

        if let Some(asset) = self.asset {
            if let Err(e) = self.link.destroy_stream(asset, stream) {
                tracing::warn!("Failed to destroy stream '{}': {}", sink.name(), e);
            }
        }
        sink.set_stream_handle(0);
        self.status.set_output("Disconnected from stream", StatusLevel::Orange);
    }

    /// Number of live sinks
    pub fn active_sinks(&self) -> usize {
        self.sinks.len()
    }

    /// Run one frame: finish pending loads, then synchronise
    #[tracing::instrument(skip_all)]
    pub fn begin_frame(&mut self, host: &mut dyn SceneHost) -> TickReport {
        let completed = self.loads.drain();
        if !completed.is_empty() {
            for event in &completed {
                self.sync.load_completed(event.container);
            }
            tracing::debug!("{} container loads completed, reloading schemas", completed.len());
            self.load_schemas(host);
        }

        let sinks = self.sinks.active();
        let schemas = self.schemas.snapshot();

        let report = self.sync.tick(TickContext {
            link: &self.link,
            host,
            asset: self.asset.unwrap_or(0),
            schemas: &schemas,
            sinks: &sinks,
            loads: &self.loads,
            poll_timeout_ms: self.config.poll_timeout_ms,
            distance_unit: self.config.distance_unit,
        });

        match report.event {
            Some(SyncEvent::Lost) => self
                .status
                .set_input("Stopped receiving data", StatusLevel::Orange),
            Some(SyncEvent::Regained) => self.status.set_input("Receiving data", StatusLevel::Green),
            None => {}
        }

        report
    }

    /// Controller timecode, sticky while data is lost
    pub fn timecode(&mut self) -> Option<QualifiedFrameTime> {
        self.timecode.sample(self.sync.frame())
    }
}

/// Map each scene of the schema file to a container and validate it
fn resolve_specs(host: &dyn SceneHost, text: &str) -> Result<Vec<SchemaSpec>, SchemaError> {
    let document: Value = serde_json::from_str(text)?;
    let Value::Array(entries) = document else {
        return Err(SchemaError::NonObjectSchema);
    };

    let mut specs = Vec::with_capacity(entries.len());
    for entry in &entries {
        let name = codec::scene_name(entry)?;

        let (container, root, uses_persistent) = if name == PERSISTENT_SCENE_NAME {
            (None, None, true)
        } else if let Some(container) = host.find_container(name) {
            let root = host.root(container);
            (Some(container), root, root.is_some())
        } else {
            (None, None, false)
        };

        let persistent = if uses_persistent {
            host.persistent_root()
        } else {
            None
        };
        let validated = codec::validate(entry, persistent, root)?;
        let root_id = container.and_then(|c| host.root_id(c));

        tracing::info!(
            "Loaded schema for {} ({}): {} parameters",
            name,
            if container.is_some() { "mapped" } else { "unmapped" },
            validated.count
        );
        specs.push(SchemaSpec::from_validated(
            name,
            container,
            root_id,
            uses_persistent,
            validated,
        ));
    }

    Ok(specs)
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}
