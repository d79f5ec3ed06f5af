// Artifact lifecycle: exactly one live handle at a time, atomic replace,
// deterministic release on teardown.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;

/// A locally scoped reference to an artifact's bytes. Clones share the
/// underlying payload; the owning [`ArtifactStore`] is the liveness
/// authority, so holders of an old handle can detect revocation through
/// [`ArtifactStore::is_current`].
#[derive(Debug, Clone)]
pub struct ArtifactHandle {
    id: u64,
    bytes: Bytes,
}

impl ArtifactHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Exclusive owner of the currently displayed artifact.
pub struct ArtifactStore {
    current: Mutex<Option<ArtifactHandle>>,
    next_id: AtomicU64,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// Install a new artifact, releasing the previous one as part of the
    /// same replace. The swap happens under one lock: never two live
    /// handles, never a gap where none is live if one existed.
    pub fn set_artifact(&self, bytes: Bytes) -> ArtifactHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = ArtifactHandle { id, bytes };

        let previous = {
            let mut current = self.current.lock();
            current.replace(handle.clone())
        };

        match previous {
            Some(prev) => debug!(
                "artifact replaced prev_id={} new_id={} bytes={}",
                prev.id,
                id,
                handle.len()
            ),
            None => debug!("artifact installed id={} bytes={}", id, handle.len()),
        }

        handle
    }

    /// Current live handle, if any.
    pub fn current(&self) -> Option<ArtifactHandle> {
        self.current.lock().clone()
    }

    /// Whether the given handle is still the live one.
    pub fn is_current(&self, handle: &ArtifactHandle) -> bool {
        self.current
            .lock()
            .as_ref()
            .map(|h| h.id == handle.id)
            .unwrap_or(false)
    }

    /// Number of live handles. Always 0 or 1.
    pub fn live_handles(&self) -> usize {
        usize::from(self.current.lock().is_some())
    }

    /// Release the current handle unconditionally. Idempotent: a no-op when
    /// nothing is live.
    pub fn release_all(&self) {
        let released = self.current.lock().take();
        if let Some(handle) = released {
            debug!("artifact released id={}", handle.id);
        }
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}
