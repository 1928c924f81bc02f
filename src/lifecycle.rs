//! Application lifecycle events and the update check observer
//!
//! The host publishes lifecycle transitions on [`LifecycleEvents`];
//! [`attach`] runs one check immediately and another on every
//! [`LifecycleEvent::Resumed`].

use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::prompt::UpdatePrompter;

/// Default capacity of the lifecycle event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Application returned to the foreground
    Resumed,
    Inactive,
    Paused,
    Hidden,
    Detached,
}

/// Broadcast source of lifecycle events
#[derive(Debug, Clone)]
pub struct LifecycleEvents {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl Default for LifecycleEvents {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl LifecycleEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Returns the number of observers that received it.
    pub fn emit(&self, event: LifecycleEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Registration of a prompter on a lifecycle source
pub struct Attachment {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Attachment {
    /// Stop reacting to lifecycle events.
    ///
    /// Checks already in flight keep running. The returned handle completes
    /// once the observer has deregistered.
    pub fn detach(self) -> JoinHandle<()> {
        let _ = self.stop.send(());
        self.handle
    }
}

/// Run a check now and on every resume until detached.
pub fn attach(prompter: Arc<UpdatePrompter>, events: &LifecycleEvents) -> Attachment {
    let mut receiver = events.subscribe();
    let (stop, mut stop_rx) = oneshot::channel();

    spawn_check(prompter.clone());

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = &mut stop_rx => {
                    debug!("Update check observer detached");
                    break;
                }
                event = receiver.recv() => {
                    match event {
                        Ok(LifecycleEvent::Resumed) => {
                            info!("Application resumed, checking for required update");
                            spawn_check(prompter.clone());
                        }
                        Ok(event) => debug!("Ignoring lifecycle event {:?}", event),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("Update check observer lagged, {} events skipped", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            debug!("Lifecycle source closed");
                            break;
                        }
                    }
                }
            }
        }
    });

    Attachment { stop, handle }
}

fn spawn_check(prompter: Arc<UpdatePrompter>) {
    tokio::spawn(async move {
        match prompter.check_and_maybe_prompt().await {
            Ok(outcome) => debug!("Update check finished: {:?}", outcome),
            Err(e) => error!("Unhandled update check failure: {}", e),
        }
    });
}
