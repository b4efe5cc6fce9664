//! In-memory scene host

use super::{ContainerId, LoadCompletion, RootId, SceneHost};
use crate::property::PropertyRoot;

struct Container {
    id: ContainerId,
    name: String,
    loaded: bool,
    visible: bool,
    root_id: RootId,
    root: Box<dyn PropertyRoot + Send>,
    load_requests: usize,
}

/// Scene host keeping every container and root in memory
///
/// Loads are deferred until [`finish_loads`](Self::finish_loads), which
/// makes the asynchronous load path observable from a single thread.
#[derive(Default)]
pub struct MemoryScene {
    containers: Vec<Container>,
    persistent: Option<Box<dyn PropertyRoot + Send>>,
    pending: Vec<LoadCompletion>,
    next_root: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root shared by every scene
    pub fn with_persistent(mut self, root: impl PropertyRoot + Send + 'static) -> Self {
        self.persistent = Some(Box::new(root));
        self
    }

    /// Add a container, initially hidden
    pub fn add_container(
        &mut self,
        name: impl Into<String>,
        root: impl PropertyRoot + Send + 'static,
        loaded: bool,
    ) -> ContainerId {
        let id = ContainerId(self.containers.len() as u32);
        let root_id = self.allocate_root();
        self.containers.push(Container {
            id,
            name: name.into(),
            loaded,
            visible: false,
            root_id,
            root: Box::new(root),
            load_requests: 0,
        });
        id
    }

    fn allocate_root(&mut self) -> RootId {
        self.next_root += 1;
        RootId(self.next_root)
    }

    fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.id == id)
    }

    /// Unload a container; its root gets a new identity on the next load
    pub fn unload(&mut self, id: ContainerId) {
        let root_id = self.allocate_root();
        if let Some(container) = self.get_mut(id) {
            container.loaded = false;
            container.visible = false;
            container.root_id = root_id;
        }
    }

    pub fn is_visible(&self, id: ContainerId) -> bool {
        self.get(id).is_some_and(|c| c.visible)
    }

    /// Number of load requests received for a container
    pub fn load_requests(&self, id: ContainerId) -> usize {
        self.get(id).map_or(0, |c| c.load_requests)
    }

    /// Complete every pending load, returning how many finished
    pub fn finish_loads(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for completion in pending {
            if let Some(container) = self.get_mut(completion.container()) {
                container.loaded = true;
                container.visible = true;
            }
            completion.complete();
        }
        count
    }
}

impl SceneHost for MemoryScene {
    fn containers(&self) -> Vec<ContainerId> {
        self.containers.iter().map(|c| c.id).collect()
    }

    fn container_name(&self, id: ContainerId) -> Option<String> {
        self.get(id).map(|c| c.name.clone())
    }

    fn is_loaded(&self, id: ContainerId) -> bool {
        self.get(id).is_some_and(|c| c.loaded)
    }

    fn root_id(&self, id: ContainerId) -> Option<RootId> {
        self.get(id).filter(|c| c.loaded).map(|c| c.root_id)
    }

    fn root(&self, id: ContainerId) -> Option<&dyn PropertyRoot> {
        let container = self.get(id).filter(|c| c.loaded)?;
        Some(container.root.as_ref())
    }

    fn root_mut(&mut self, id: ContainerId) -> Option<&mut dyn PropertyRoot> {
        let container = self.get_mut(id).filter(|c| c.loaded)?;
        Some(container.root.as_mut())
    }

    fn persistent_root(&self) -> Option<&dyn PropertyRoot> {
        self.persistent.as_deref().map(|r| r as &dyn PropertyRoot)
    }

    fn persistent_root_mut(&mut self) -> Option<&mut dyn PropertyRoot> {
        self.persistent
            .as_deref_mut()
            .map(|r| r as &mut dyn PropertyRoot)
    }

    fn set_visible(&mut self, id: ContainerId, visible: bool) {
        if let Some(container) = self.get_mut(id) {
            container.visible = visible;
        }
    }

    fn request_load(&mut self, id: ContainerId, completion: LoadCompletion) {
        if let Some(container) = self.get_mut(id) {
            container.load_requests += 1;
        }
        self.pending.push(completion);
    }
}
