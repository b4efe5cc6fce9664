//! Validated per-scene schemas and the collection FrameSync reads

use std::sync::Arc;

use parking_lot::RwLock;

use super::codec::Validated;
use crate::scene::{ContainerId, RootId};

/// Validated parameter contract of one scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSpec {
    /// Scene name from the schema file
    pub name: String,
    /// Container the scene maps to, `None` for unmapped scenes
    pub container: Option<ContainerId>,
    /// Root the scene's level parameters were validated against
    pub root: Option<RootId>,
    /// Whether the leading parameters belong to the persistent root
    pub uses_persistent: bool,
    /// Fingerprint over the transport keys
    pub hash: u64,
    /// Slots owned by the persistent root
    pub persistent_count: usize,
    /// Total slot count
    pub count: usize,
}

impl SchemaSpec {
    /// Zero-slot scene mapped to nothing
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_validated(name, None, None, false, Validated::empty())
    }

    pub fn from_validated(
        name: impl Into<String>,
        container: Option<ContainerId>,
        root: Option<RootId>,
        uses_persistent: bool,
        validated: Validated,
    ) -> Self {
        Self {
            name: name.into(),
            container,
            root,
            uses_persistent,
            hash: validated.hash,
            persistent_count: validated.persistent_count,
            count: validated.count,
        }
    }

    /// Slots owned by the scene's own root
    pub fn level_count(&self) -> usize {
        self.count - self.persistent_count
    }
}

/// Shared collection of scene schemas, replaced wholesale
///
/// Readers take a snapshot and never see a partially rebuilt collection.
#[derive(Debug, Default)]
pub struct SchemaSet {
    specs: RwLock<Arc<Vec<SchemaSpec>>>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current collection
    pub fn snapshot(&self) -> Arc<Vec<SchemaSpec>> {
        Arc::clone(&self.specs.read())
    }

    /// Swap in a new collection
    pub fn replace(&self, specs: Vec<SchemaSpec>) {
        *self.specs.write() = Arc::new(specs);
    }

    pub fn len(&self) -> usize {
        self.specs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.read().is_empty()
    }
}
