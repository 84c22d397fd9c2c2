//! Lifecycle events emitted by the update pipeline.
//!
//! The pipeline reports three observable moments: a newer version was
//! detected ([`UpdaterEvent::UpdateAvailable`]), an update run replaced the
//! installed tree ([`UpdaterEvent::UpdateSucceeded`]), and an update run was
//! aborted by the pre-flight check ([`UpdaterEvent::UpdateFailed`]).
//!
//! Events travel through an [`EventBus`] that is constructed by the caller
//! and injected into the pipeline - there is no process-global dispatcher.
//! Subscribers are plain callbacks; the bus clones cheaply (the subscriber
//! list is shared), so the manager, the backends and the executor can all
//! hold the same bus.
//!
//! ```no_run
//! use updraft::events::{EventBus, UpdaterEvent};
//!
//! let bus = EventBus::new();
//! bus.subscribe(|event| {
//!     if let UpdaterEvent::UpdateAvailable { new_version } = event {
//!         println!("new version: {new_version}");
//!     }
//! });
//! ```

use crate::release::Release;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// A lifecycle event emitted during version checks and update runs.
#[derive(Debug, Clone)]
pub enum UpdaterEvent {
    /// A newer version than the installed one was detected. Emitted once per
    /// detection cycle: re-checks while the version cache is populated stay
    /// silent.
    UpdateAvailable {
        /// The newly detected version label
        new_version: String,
    },
    /// An update run finished and the installed tree now matches the release.
    UpdateSucceeded {
        /// The release that was applied
        release: Release,
    },
    /// An update run was aborted before any mutation (pre-flight failure).
    UpdateFailed {
        /// The release that was being applied
        release: Release,
    },
}

impl UpdaterEvent {
    /// Stable name of the event kind, for logs and assertions.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UpdateAvailable {
                ..
            } => "update-available",
            Self::UpdateSucceeded {
                ..
            } => "update-succeeded",
            Self::UpdateFailed {
                ..
            } => "update-failed",
        }
    }
}

type Subscriber = Box<dyn Fn(&UpdaterEvent) + Send + Sync>;

/// A callback-list event sink shared by everything in one pipeline.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked synchronously for every emitted event.
    pub fn subscribe(&self, subscriber: impl Fn(&UpdaterEvent) + Send + Sync + 'static) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(subscriber));
    }

    /// Deliver an event to every subscriber, in registration order.
    pub fn emit(&self, event: &UpdaterEvent) {
        debug!("Emitting {} event", event.name());
        let subscribers = self.subscribers.read().unwrap_or_else(PoisonError::into_inner);
        for subscriber in subscribers.iter() {
            subscriber(event);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").field("subscribers", &self.subscriber_count()).finish()
    }
}
