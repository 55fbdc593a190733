use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
    Arc,
};

pub mod engine;
pub mod session;
pub mod timer;

/// Everything that can wake the rotation engine up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationEvent {
    /// The current game used up its slot
    Tick,
    /// The user did something, the whole rotation ends
    Interrupted,
}

/// Cloneable handle given to whatever watches for user activity
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    cancelled: Arc<AtomicBool>,
    events: Sender<RotationEvent>,
}

impl InterruptHandle {
    pub(crate) fn new(cancelled: Arc<AtomicBool>, events: Sender<RotationEvent>) -> Self {
        Self { cancelled, events }
    }

    pub fn interrupt(&self) {
        // The flag goes first so a tick already queued cannot win
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            tracing::info!("User activity detected, stopping rotation");
        }

        // The engine being gone already is fine
        let _ = self.events.send(RotationEvent::Interrupted);
    }
}
