//! FrameSync state machine
//!
//! Driven once per host frame. The only blocking call is the link poll,
//! bounded by a timeout of zero while no sink is active.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use rsbridge_link::{Link, LinkError};
use rsbridge_sdk::{AssetHandle, FrameData};

use crate::camera::DistanceUnit;
use crate::scene::{ContainerId, LoadQueue, SceneHost};
use crate::schema::{walker, SchemaSpec};
use crate::sink::Sink;

/// Synchronisation state, re-evaluated every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Link library not loaded or shut down
    WaitingForLink,
    /// Link up, no active sinks
    Idle,
    /// Link up, sinks active, last poll accepted
    Synced,
    /// Link up, sinks active, last poll rejected
    Stale,
}

/// Edge-triggered change in data reception
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    Lost,
    Regained,
}

/// Everything a tick reads or writes besides FrameSync's own state
pub struct TickContext<'a> {
    pub link: &'a dyn Link,
    pub host: &'a mut dyn SceneHost,
    /// Asset this process registered as
    pub asset: AssetHandle,
    pub schemas: &'a [SchemaSpec],
    pub sinks: &'a [Arc<Mutex<Sink>>],
    pub loads: &'a LoadQueue,
    /// Poll timeout while at least one sink is active
    pub poll_timeout_ms: u32,
    pub distance_unit: DistanceUnit,
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub state: SyncState,
    pub event: Option<SyncEvent>,
    /// Parameter buffers applied to scene roots
    pub parameters_applied: usize,
    /// Sinks whose camera receivers were updated
    pub cameras_applied: usize,
}

impl TickReport {
    fn new(state: SyncState, event: Option<SyncEvent>) -> Self {
        Self {
            state,
            event,
            parameters_applied: 0,
            cameras_applied: 0,
        }
    }
}

/// Frame synchronisation state
#[derive(Debug)]
pub struct FrameSync {
    state: SyncState,
    frame: FrameData,
    valid: bool,
    pending_loads: HashSet<ContainerId>,
}

impl Default for FrameSync {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSync {
    pub fn new() -> Self {
        Self {
            state: SyncState::WaitingForLink,
            frame: FrameData::default(),
            valid: false,
            pending_loads: HashSet::new(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Whether the last poll was accepted
    pub fn is_receiving(&self) -> bool {
        self.valid
    }

    /// Last accepted frame, `None` while not receiving
    pub fn frame(&self) -> Option<&FrameData> {
        self.valid.then_some(&self.frame)
    }

    /// A container requested by this loop finished loading
    pub fn load_completed(&mut self, container: ContainerId) {
        self.pending_loads.remove(&container);
    }

    fn lose(&mut self) -> Option<SyncEvent> {
        let event = self.valid.then_some(SyncEvent::Lost);
        self.valid = false;
        event
    }

    /// Run one frame of synchronisation
    #[tracing::instrument(skip_all)]
    pub fn tick(&mut self, mut ctx: TickContext<'_>) -> TickReport {
        // No sync events while the link is down; the frame is just forgotten
        if !ctx.link.is_available() {
            self.state = SyncState::WaitingForLink;
            self.valid = false;
            return TickReport::new(self.state, None);
        }

        let active = !ctx.sinks.is_empty();
        let timeout = if active { ctx.poll_timeout_ms } else { 0 };

        let polled = ctx.link.poll_frame(timeout).and_then(|(asset, frame)| {
            if asset != ctx.asset {
                return Err(LinkError::WrongAsset {
                    expected: ctx.asset,
                    received: asset,
                });
            }
            Ok(frame)
        });

        let frame = match polled {
            Ok(frame) if (frame.scene as usize) < ctx.schemas.len() => frame,
            rejected => {
                match rejected {
                    Ok(frame) => tracing::trace!(
                        "Scene {} out of range of {} schemas",
                        { frame.scene },
                        ctx.schemas.len()
                    ),
                    Err(e) => tracing::trace!("Poll rejected: {}", e),
                }
                self.state = if active { SyncState::Stale } else { SyncState::Idle };
                let event = self.lose();
                if event.is_some() {
                    tracing::info!("Stopped receiving data");
                }
                return TickReport::new(self.state, event);
            }
        };

        let event = (!self.valid).then_some(SyncEvent::Regained);
        if event.is_some() {
            tracing::info!("Receiving data");
        }
        self.valid = true;
        self.frame = frame;

        if !active {
            self.state = SyncState::Idle;
            return TickReport::new(self.state, event);
        }
        self.state = SyncState::Synced;

        let mut report = TickReport::new(self.state, event);
        let schemas = ctx.schemas;
        let spec = &schemas[frame.scene as usize];
        report.parameters_applied = self.apply_scene(&mut ctx, spec);
        report.cameras_applied = apply_cameras(&ctx, &frame);
        report
    }

    /// Gate container visibility and loading, then apply parameters
    fn apply_scene(&mut self, ctx: &mut TickContext<'_>, spec: &SchemaSpec) -> usize {
        let mut applied = 0;

        for container in ctx.host.containers() {
            if Some(container) == spec.container {
                if !ctx.host.is_loaded(container) {
                    if self.pending_loads.insert(container) {
                        tracing::info!("Loading container {}", spec.name);
                        ctx.host.request_load(container, ctx.loads.ticket(container));
                    }
                } else {
                    // Loaded, even if its completion never reached us
                    self.pending_loads.remove(&container);
                    if ctx.host.root_id(container) == spec.root {
                        ctx.host.set_visible(container, true);
                        applied += apply_parameters(ctx, spec, Some(container));
                    }
                }
            } else if spec.container.is_some() {
                // Scenes not mapped to a container leave visibility alone
                ctx.host.set_visible(container, false);
            }
        }

        if spec.container.is_none() && spec.uses_persistent {
            applied += apply_parameters(ctx, spec, None);
        }

        applied
    }
}

/// Fetch the scene's parameter buffer and pour it into its roots
///
/// Returns the number of roots written. Failures skip this frame only.
fn apply_parameters(
    ctx: &mut TickContext<'_>,
    spec: &SchemaSpec,
    container: Option<ContainerId>,
) -> usize {
    if spec.count == 0 {
        return 0;
    }

    let values = match ctx.link.fetch_parameters(ctx.asset, spec.hash, spec.count) {
        Ok(values) => values,
        Err(e) => {
            tracing::debug!("No parameters for {} ({:016x}): {}", spec.name, spec.hash, e);
            return 0;
        }
    };
    if values.len() < spec.count {
        tracing::warn!(
            "Parameter buffer for {} holds {} values, expected {}",
            spec.name,
            values.len(),
            spec.count
        );
        return 0;
    }

    let (persistent, level) = values.split_at(spec.persistent_count);
    let mut applied = 0;

    if spec.uses_persistent {
        if let Some(root) = ctx.host.persistent_root_mut() {
            match walker::apply(root, persistent) {
                Ok(_) => applied += 1,
                Err(e) => tracing::warn!("Persistent parameters for {}: {}", spec.name, e),
            }
        }
    }

    if let Some(container) = container {
        if let Some(root) = ctx.host.root_mut(container) {
            match walker::apply(root, level) {
                Ok(_) => applied += 1,
                Err(e) => tracing::warn!("Level parameters for {}: {}", spec.name, e),
            }
        }
    }

    applied
}

/// Push this frame's camera into every sink independently
fn apply_cameras(ctx: &TickContext<'_>, frame: &FrameData) -> usize {
    let mut applied = 0;

    for sink in ctx.sinks {
        let mut sink = sink.lock();
        let stream = sink.stream_handle();
        if stream == 0 {
            tracing::warn!("Sink {} has no stream, skipping camera", sink.name());
            continue;
        }

        match ctx.link.fetch_camera(ctx.asset, stream) {
            Ok(camera) => {
                if sink.apply_camera(frame, &camera, ctx.distance_unit) {
                    applied += 1;
                }
            }
            Err(e) => tracing::trace!("No camera for stream {}: {}", stream, e),
        }
    }

    applied
}
