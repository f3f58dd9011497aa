//! Client-side state containers: slides, outlines and prompt history.
//!
//! Stores are plain owned values mutated through `&mut self`. Every mutation
//! is visible as soon as the call returns and is announced to subscribers
//! before it does. Share a store across tasks with
//! `Arc<parking_lot::RwLock<_>>`.

pub mod outline;
pub mod prompts;
pub mod slides;

pub use outline::{DropSlot, OutlineCard, OutlineScope, OutlineStore};
pub use prompts::{CreatePage, PromptHistory, SavedPrompt};
pub use slides::{SlideStore, SlideStoreSnapshot};

use serde::Serialize;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Published after each store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEvent {
    /// Name of the operation that changed the store, e.g. `"add_slide"`
    pub action: &'static str,
    /// Monotonic per-store mutation counter
    pub revision: u64,
}

/// Broadcast fan-out for store events.
#[derive(Debug)]
pub(crate) struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
    revision: u64,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sender,
            revision: 0,
        }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn publish(&mut self, action: &'static str) {
        self.revision += 1;
        // No subscribers is not an error.
        let _ = self.sender.send(StoreEvent {
            action,
            revision: self.revision,
        });
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
