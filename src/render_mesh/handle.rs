use super::RenderMesh;
use std::sync::{Arc, PoisonError, RwLock};

/// Holder of the current render mesh snapshot.
///
/// A new mesh is always built off to the side and then swapped in whole, so a
/// reader never observes a partial mesh. Readers keep the `Arc` they loaded for
/// as long as they draw from it; a concurrent swap does not affect them.
#[derive(Debug, Default)]
pub struct RenderMeshCell {
    current: RwLock<Option<Arc<RenderMesh>>>,
}

impl RenderMeshCell {
    pub fn new() -> Self {
        RenderMeshCell::default()
    }

    /// Stable reference to the current snapshot, if one was built.
    pub fn load(&self) -> Option<Arc<RenderMesh>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Install `mesh` as the current snapshot and return the previous one.
    pub fn replace(&self, mesh: RenderMesh) -> Option<Arc<RenderMesh>> {
        let next = Arc::new(mesh);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        guard.replace(next)
    }

    /// Drop the current snapshot, e.g. after the topology changed.
    pub fn invalidate(&self) -> Option<Arc<RenderMesh>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn is_built(&self) -> bool {
        self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

impl Clone for RenderMeshCell {
    /// The clone shares the current snapshot but swaps independently.
    fn clone(&self) -> Self {
        RenderMeshCell { current: RwLock::new(self.load()) }
    }
}
