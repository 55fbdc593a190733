use super::{
    session::{RotationSession, RotationState},
    timer::RotationTimer,
    InterruptHandle, RotationEvent,
};
use crate::{
    error::SaverError,
    game::PlayableGame,
    mame::Emulator,
    process::ProcessLauncher,
    runtime::display::DisplaySurface,
};
use rand::Rng;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, Receiver, RecvTimeoutError},
        Arc,
    },
    time::{Duration, Instant},
};

/// Upper bound on how long a dwell goes without looking at the cancellation flag
const DWELL_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSettings {
    /// How long each game gets before the next one is announced
    pub rotation: Duration,
    /// How long the upcoming game is announced before it launches
    pub dwell: Duration,
}

pub type Session<L> = RotationSession<<L as ProcessLauncher>::Handle>;

/// Drives the announce, launch, advance cycle until the user interrupts it
pub struct RotationEngine<L: ProcessLauncher, D: DisplaySurface, R: Rng> {
    emulator: Emulator,
    launcher: L,
    display: D,
    rng: R,
    dwell: Duration,
    timer: RotationTimer,
    events: Receiver<RotationEvent>,
    interrupt: InterruptHandle,
    cancelled: Arc<AtomicBool>,
}

impl<L: ProcessLauncher, D: DisplaySurface, R: Rng> RotationEngine<L, D, R> {
    pub fn new(emulator: Emulator, launcher: L, display: D, rng: R, settings: RotationSettings) -> Self {
        let (sender, events) = channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        Self {
            emulator,
            launcher,
            display,
            rng,
            dwell: settings.dwell,
            timer: RotationTimer::new(settings.rotation, sender.clone()),
            events,
            interrupt: InterruptHandle::new(cancelled.clone(), sender),
            cancelled,
        }
    }

    /// Hand this to whatever detects user activity
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    #[cfg(test)]
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Rotates through `playable` until interrupted or a launch fails
    pub fn run(&mut self, playable: Vec<PlayableGame>) -> Result<(), SaverError> {
        if playable.is_empty() {
            tracing::info!("No playable games, nothing to rotate");
            return Ok(());
        }

        tracing::info!(
            "Rotating {} games, {:?} each with a {:?} announcement",
            playable.len(),
            self.timer.duration(),
            self.dwell
        );

        let mut session = RotationSession::new(playable);
        while !session.is_stopped() {
            session = self.step(session)?;
        }

        if session.is_cancelled() {
            tracing::info!("Rotation interrupted after {} launches", session.launches);
        } else {
            tracing::info!("Rotation ended after {} launches", session.launches);
        }

        Ok(())
    }

    /// Performs a single transition
    pub fn step(&mut self, mut session: Session<L>) -> Result<Session<L>, SaverError> {
        if session.is_stopped() {
            return Ok(session);
        }

        // Cancellation is checked before any queued tick gets a say
        if self.is_cancelled() {
            session.cancel();
            return Ok(self.stop(session));
        }

        match std::mem::replace(&mut session.state, RotationState::Idle) {
            RotationState::Idle => Ok(self.announce(session)),
            RotationState::Displaying(game) => {
                if !self.dwell() {
                    session.cancel();
                    return Ok(self.stop(session));
                }

                self.launch(session, game)
            }
            RotationState::Running => match self.events.recv() {
                Ok(RotationEvent::Tick) if !self.is_cancelled() => {
                    tracing::info!("Time is up, moving on to the next game");

                    self.timer.stop();
                    session.timer_armed = false;
                    // Whatever is running now is left to shut down in the background
                    session.close_current_process();

                    Ok(self.announce(session))
                }
                _ => {
                    session.cancel();
                    Ok(self.stop(session))
                }
            },
            RotationState::Stopped => {
                session.state = RotationState::Stopped;
                Ok(session)
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn announce(&mut self, mut session: Session<L>) -> Session<L> {
        let Some(game) = session.pick(&mut self.rng) else {
            return self.stop(session);
        };

        tracing::info!("Up next: {} ({})", game.record.description, game.name());
        tracing::debug!(
            "{} was verified as {:?} and is a clone of {:?}",
            game.name(),
            game.verified_alias,
            game.record.clone_of
        );

        self.display
            .set_metadata(&game.record.description, &game.record.year_manufacturer_line());
        self.display.show_full_screen();

        session.state = RotationState::Displaying(game);
        session
    }

    /// Returns false if the user interrupted the announcement
    fn dwell(&self) -> bool {
        let deadline = Instant::now() + self.dwell;

        loop {
            if self.is_cancelled() {
                return false;
            }

            let now = Instant::now();
            if now >= deadline {
                return true;
            }

            match self.events.recv_timeout((deadline - now).min(DWELL_POLL)) {
                Ok(RotationEvent::Interrupted) => return false,
                Ok(RotationEvent::Tick) => {
                    tracing::debug!("Ignoring stale rotation tick during announcement");
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Not possible while we hold a sender
                Err(RecvTimeoutError::Disconnected) => return !self.is_cancelled(),
            }
        }
    }

    fn launch(
        &mut self,
        mut session: Session<L>,
        game: PlayableGame,
    ) -> Result<Session<L>, SaverError> {
        let request = self.emulator.game_request(game.name());

        match self.launcher.start(&request) {
            Ok(process) => {
                tracing::info!("Launched {}", game.name());

                // Replacing the old handle releases it, it may still be exiting
                session.current_process = Some(process);
                session.launches += 1;

                self.timer.start();
                session.timer_armed = true;
                session.state = RotationState::Running;

                Ok(session)
            }
            Err(source) => {
                drop(self.stop(session));
                Err(SaverError::LaunchFailure {
                    game: game.name().to_string(),
                    source,
                })
            }
        }
    }

    fn stop(&mut self, mut session: Session<L>) -> Session<L> {
        if self.timer.is_armed() {
            self.timer.stop();
        }
        session.timer_armed = false;

        session.close_current_process();
        self.display.close();

        session.state = RotationState::Stopped;
        session
    }
}
