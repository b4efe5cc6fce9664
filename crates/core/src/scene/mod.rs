//! Scene host abstraction
//!
//! The host application owns the loadable containers (levels) and their
//! property roots. Frame synchronisation only talks to it through
//! [`SceneHost`].

mod load;
mod memory;

pub use load::{LoadCompletion, LoadEvent, LoadQueue};
pub use memory::MemoryScene;

use crate::property::PropertyRoot;

/// Identity of a loadable container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u32);

/// Identity of a live property root
///
/// A container that is unloaded and loaded again gets a new root identity,
/// which invalidates schemas validated against the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(pub u64);

/// Host-side view of scenes and their roots
pub trait SceneHost {
    /// All containers, in host order
    fn containers(&self) -> Vec<ContainerId>;

    /// Scene name of a container
    fn container_name(&self, id: ContainerId) -> Option<String>;

    /// Whether the container's content is loaded
    fn is_loaded(&self, id: ContainerId) -> bool;

    /// Identity of the container's live root, `None` while unloaded
    fn root_id(&self, id: ContainerId) -> Option<RootId>;

    fn root(&self, id: ContainerId) -> Option<&dyn PropertyRoot>;

    fn root_mut(&mut self, id: ContainerId) -> Option<&mut dyn PropertyRoot>;

    /// Root shared by every scene, if the host has one
    fn persistent_root(&self) -> Option<&dyn PropertyRoot>;

    fn persistent_root_mut(&mut self) -> Option<&mut dyn PropertyRoot>;

    fn set_visible(&mut self, id: ContainerId, visible: bool);

    /// Start loading a container and make it visible once loaded
    ///
    /// Must not block. The host calls [`LoadCompletion::complete`] when
    /// the container has finished loading.
    fn request_load(&mut self, id: ContainerId, completion: LoadCompletion);

    /// Find a container by scene name
    fn find_container(&self, name: &str) -> Option<ContainerId> {
        self.containers()
            .into_iter()
            .find(|&id| self.container_name(id).as_deref() == Some(name))
    }
}
