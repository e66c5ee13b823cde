//! Marshaling load results back to the frame thread.
//!
//! Loads finish at arbitrary times. Their results are posted to a
//! [`CompletionQueue`] and consumed only when the frame loop drains it, so
//! every mutation of viewer state happens on the frame thread. A shared
//! liveness flag, cleared on dispose, makes late completions inert.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use halcyon_animation::AnimationClip;
use halcyon_core::AssetError;
use halcyon_scene::CubemapData;

use crate::loader::LoadedMesh;

/// Identifies one load request for the lifetime of a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug)]
pub enum LoadCompletion {
    Mesh {
        request: RequestId,
        result: Result<LoadedMesh, AssetError>,
    },
    Clip {
        request: RequestId,
        result: Result<AnimationClip, AssetError>,
    },
    Cubemap {
        request: RequestId,
        result: Result<CubemapData, AssetError>,
    },
}

impl LoadCompletion {
    #[must_use]
    pub fn request(&self) -> RequestId {
        match self {
            Self::Mesh { request, .. } | Self::Clip { request, .. } | Self::Cubemap { request, .. } => *request,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Mesh { result, .. } => result.is_ok(),
            Self::Clip { result, .. } => result.is_ok(),
            Self::Cubemap { result, .. } => result.is_ok(),
        }
    }
}

/// Posts completions from any thread.
#[derive(Debug, Clone)]
pub struct CompletionSender {
    tx: flume::Sender<LoadCompletion>,
    alive: Arc<AtomicBool>,
}

impl CompletionSender {
    /// Returns `false` when the owning viewer is gone and the completion was
    /// dropped.
    pub fn send(&self, completion: LoadCompletion) -> bool {
        if !self.alive.load(Ordering::Acquire) {
            log::debug!("Dropping completion for {:?}: viewer disposed", completion.request());
            return false;
        }
        self.tx.send(completion).is_ok()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Single-consumer end owned by the viewer.
#[derive(Debug)]
pub struct CompletionQueue {
    tx: flume::Sender<LoadCompletion>,
    rx: flume::Receiver<LoadCompletion>,
    alive: Arc<AtomicBool>,
    next_request: u64,
}

impl Default for CompletionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionQueue {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            tx,
            rx,
            alive: Arc::new(AtomicBool::new(true)),
            next_request: 0,
        }
    }

    #[must_use]
    pub fn sender(&self) -> CompletionSender {
        CompletionSender {
            tx: self.tx.clone(),
            alive: Arc::clone(&self.alive),
        }
    }

    pub fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Takes every pending completion. Empty once closed.
    pub fn drain(&self) -> Vec<LoadCompletion> {
        if !self.is_alive() {
            return Vec::new();
        }
        self.rx.try_iter().collect()
    }

    /// Marks the queue dead and discards anything still pending.
    pub fn close(&self) {
        self.alive.store(false, Ordering::Release);
        let dropped = self.rx.try_iter().count();
        if dropped > 0 {
            log::debug!("Discarded {dropped} pending completion(s) on close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sends_after_close_are_rejected() {
        let mut queue = CompletionQueue::new();
        let sender = queue.sender();
        let request = queue.next_request_id();
        queue.close();

        let accepted = sender.send(LoadCompletion::Clip {
            request,
            result: Err(AssetError::Cancelled("late".into())),
        });
        assert!(!accepted);
        assert!(queue.drain().is_empty());
    }
}
