use super::RotationEvent;
use std::{
    sync::{mpsc::Sender, Arc, Condvar, Mutex, MutexGuard},
    thread::JoinHandle,
    time::{Duration, Instant},
};

#[derive(Debug, Default)]
struct TimerState {
    deadline: Option<Instant>,
    shutdown: bool,
}

/// One shot countdown that tells the engine to move on to the next game
///
/// A single worker thread sleeps until the deadline. Starting again before expiry pushes the
/// deadline out instead of queueing a second tick, and after firing the timer stays disarmed
/// until started again.
#[derive(Debug)]
pub struct RotationTimer {
    duration: Duration,
    shared: Arc<(Mutex<TimerState>, Condvar)>,
    worker: Option<JoinHandle<()>>,
}

impl RotationTimer {
    pub fn new(duration: Duration, listener: Sender<RotationEvent>) -> Self {
        let shared = Arc::new((Mutex::new(TimerState::default()), Condvar::new()));
        let worker_shared = shared.clone();

        let worker = std::thread::Builder::new()
            .name("rotation-timer".to_string())
            .spawn(move || run_worker(&worker_shared, &listener))
            .map_err(|err| tracing::error!("Could not spawn rotation timer thread: {}", err))
            .ok();

        Self {
            duration,
            shared,
            worker,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn start(&self) {
        let mut state = self.lock();
        state.deadline = Some(Instant::now() + self.duration);
        self.shared.1.notify_all();
    }

    pub fn stop(&self) {
        let mut state = self.lock();
        state.deadline = None;
        self.shared.1.notify_all();
    }

    pub fn is_armed(&self) -> bool {
        self.lock().deadline.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, TimerState> {
        // The worker never panics while holding the lock, recover the state anyway
        self.shared
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn run_worker(shared: &(Mutex<TimerState>, Condvar), listener: &Sender<RotationEvent>) {
    let (state, condvar) = shared;
    let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    loop {
        if state.shutdown {
            return;
        }

        match state.deadline {
            None => {
                state = condvar
                    .wait(state)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
            }
            Some(deadline) => {
                let now = Instant::now();

                if now >= deadline {
                    state.deadline = None;
                    tracing::debug!("Rotation timer expired");

                    if listener.send(RotationEvent::Tick).is_err() {
                        tracing::debug!("Rotation timer listener is gone, stopping timer");
                        return;
                    }
                    continue;
                }

                state = condvar
                    .wait_timeout(state, deadline - now)
                    .map(|(state, _)| state)
                    .unwrap_or_else(|poisoned| poisoned.into_inner().0);
            }
        }
    }
}

impl Drop for RotationTimer {
    fn drop(&mut self) {
        self.lock().shutdown = true;
        self.shared.1.notify_all();

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::mpsc::{channel, RecvTimeoutError};

    const SLOT: Duration = Duration::from_millis(60);

    #[test]
    fn fires_exactly_once_per_start() {
        let (sender, receiver) = channel();
        let timer = RotationTimer::new(SLOT, sender);

        timer.start();
        assert!(timer.is_armed());

        assert_eq!(
            receiver.recv_timeout(Duration::from_secs(2)),
            Ok(RotationEvent::Tick)
        );
        assert_eq!(
            receiver.recv_timeout(SLOT * 4),
            Err(RecvTimeoutError::Timeout)
        );
        assert!(!timer.is_armed());
    }

    #[test]
    fn stop_before_expiry_suppresses_tick() {
        let (sender, receiver) = channel();
        let timer = RotationTimer::new(SLOT, sender);

        timer.start();
        timer.stop();
        timer.stop();

        assert_eq!(
            receiver.recv_timeout(SLOT * 4),
            Err(RecvTimeoutError::Timeout)
        );
        assert!(!timer.is_armed());
    }

    #[test]
    fn restarting_resets_countdown() {
        let (sender, receiver) = channel();
        let timer = RotationTimer::new(Duration::from_millis(200), sender);
        let started = Instant::now();

        timer.start();
        std::thread::sleep(Duration::from_millis(100));
        timer.start();

        assert_eq!(
            receiver.recv_timeout(Duration::from_secs(2)),
            Ok(RotationEvent::Tick)
        );
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(
            receiver.recv_timeout(Duration::from_millis(400)),
            Err(RecvTimeoutError::Timeout)
        );
    }

    #[test]
    fn can_be_restarted_after_firing() {
        let (sender, receiver) = channel();
        let timer = RotationTimer::new(SLOT, sender);

        for _ in 0..2 {
            timer.start();
            assert_eq!(
                receiver.recv_timeout(Duration::from_secs(2)),
                Ok(RotationEvent::Tick)
            );
        }
    }
}
