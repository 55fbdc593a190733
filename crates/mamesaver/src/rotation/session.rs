use crate::{game::PlayableGame, process::ProcessHandle};
use rand::{seq::IndexedRandom, Rng};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationState {
    Idle,
    /// Announcing the game about to be launched
    Displaying(PlayableGame),
    /// Emulator is up and the timer is armed
    Running,
    Stopped,
}

/// State of a single rotation run
///
/// Moved through each transition of the engine and dropped once the run ends.
#[derive(Debug)]
pub struct RotationSession<H: ProcessHandle> {
    playable: Arc<[PlayableGame]>,
    pub state: RotationState,
    /// At most one, older processes are released once replaced
    pub current_process: Option<H>,
    cancelled: bool,
    pub timer_armed: bool,
    pub launches: usize,
}

impl<H: ProcessHandle> RotationSession<H> {
    pub fn new(playable: impl Into<Arc<[PlayableGame]>>) -> Self {
        Self {
            playable: playable.into(),
            state: RotationState::Idle,
            current_process: None,
            cancelled: false,
            timer_armed: false,
            launches: 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// There is no way back once cancelled
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.state == RotationState::Stopped
    }

    /// Uniform pick, games may come up again right away
    pub fn pick(&self, rng: &mut impl Rng) -> Option<PlayableGame> {
        self.playable.choose(rng).cloned()
    }

    /// Asks the live process, if any, to close without waiting for it
    pub fn close_current_process(&mut self) {
        if let Some(process) = self.current_process.as_mut() {
            if !process.has_exited() {
                process.request_close();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::{DriverStatus, GameRecord};
    use rand::{rngs::StdRng, SeedableRng};
    use std::io;

    struct NoProcess;

    impl ProcessHandle for NoProcess {
        fn has_exited(&mut self) -> bool {
            true
        }

        fn request_close(&mut self) {
            panic!("Exited processes are never asked to close");
        }

        fn read_all_output(&mut self) -> io::Result<String> {
            Ok(String::new())
        }

        fn wait_for_exit(&mut self) -> io::Result<bool> {
            Ok(true)
        }
    }

    fn playable(name: &str) -> PlayableGame {
        PlayableGame {
            record: GameRecord::new(name, name, "1980", "Namco")
                .with_driver_status(DriverStatus::Good),
            verified_alias: None,
        }
    }

    #[test]
    fn picks_stay_inside_playable_list() {
        let games = vec![playable("pacman"), playable("galaga"), playable("dkong")];
        let session = RotationSession::<NoProcess>::new(games.clone());
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let pick = session.pick(&mut rng).unwrap();
            assert!(games.contains(&pick));
        }
    }

    #[test]
    fn single_game_is_always_picked() {
        let session = RotationSession::<NoProcess>::new(vec![playable("pacman")]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            assert_eq!(session.pick(&mut rng).unwrap().name(), "pacman");
        }
    }

    #[test]
    fn empty_list_picks_nothing() {
        let session = RotationSession::<NoProcess>::new(Vec::new());

        assert!(session.pick(&mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn exited_process_is_not_closed() {
        let mut session = RotationSession::new(vec![playable("pacman")]);
        session.current_process = Some(NoProcess);

        session.close_current_process();
    }

    #[test]
    fn every_game_comes_up_eventually() {
        let games = vec![playable("pacman"), playable("galaga"), playable("dkong")];
        let session = RotationSession::<NoProcess>::new(games);
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen: Vec<_> = (0..300)
            .filter_map(|_| session.pick(&mut rng).map(|game| game.record.name))
            .collect();
        seen.sort();
        seen.dedup();

        assert_eq!(seen, ["dkong", "galaga", "pacman"]);
    }
}
