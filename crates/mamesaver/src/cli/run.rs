use crate::{
    config::GlobalConfig,
    error::SaverError,
    game::{
        reconcile::{reconcile, restrict_to_selection},
        selection::{GameList, SelectableGame},
        PlayableGame,
    },
    mame::Emulator,
    process::{ProcessLauncher, SystemLauncher},
    rotation::engine::RotationEngine,
    runtime::{display::TerminalDisplay, input::spawn_input_watcher},
};
use std::{error::Error, path::Path};

pub fn rotation_run(config: &GlobalConfig) -> Result<(), Box<dyn Error>> {
    let emulator = config.emulator();
    let launcher = SystemLauncher;
    let selection = load_selection(&config.game_list_location)?;

    let playable = playable_games(&emulator, &launcher, &selection, config.verify_on_start)?;

    let mut engine = RotationEngine::new(
        emulator,
        launcher,
        TerminalDisplay::default(),
        rand::rng(),
        config.rotation_settings(),
    );
    spawn_input_watcher(engine.interrupt_handle());

    engine.run(playable)?;

    Ok(())
}

pub fn load_selection(path: &Path) -> Result<GameList, SaverError> {
    GameList::load(path).map_err(|err| SaverError::SelectionList {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Works out what may be rotated through
///
/// Without verification the saved selection is trusted as is. With it, the emulator is asked
/// and the result is narrowed down to the saved selection if there is one.
pub fn playable_games(
    emulator: &Emulator,
    launcher: &impl ProcessLauncher,
    selection: &GameList,
    verify: bool,
) -> Result<Vec<PlayableGame>, SaverError> {
    if !verify {
        tracing::info!("Skipping verification, using the saved selection");
        return Ok(selection.selected().map(SelectableGame::to_playable).collect());
    }

    let playable = discover_playable(emulator, launcher)?;

    if selection.is_empty() {
        tracing::info!("No saved selection, every playable game is in the rotation");
        return Ok(playable);
    }

    Ok(restrict_to_selection(playable, selection))
}

pub fn discover_playable(
    emulator: &Emulator,
    launcher: &impl ProcessLauncher,
) -> Result<Vec<PlayableGame>, SaverError> {
    let catalogue = emulator.fetch_catalogue(launcher)?;
    let verified = emulator.fetch_verified_sets(launcher)?;

    Ok(reconcile(&catalogue, &verified))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        game::{DriverStatus, GameRecord},
        mame::test::ListingLauncher,
    };

    const LISTING: &str = r#"<mame>
        <machine name="pacman"><description>Pac-Man</description><year>1980</year><manufacturer>Namco</manufacturer><driver status="good"/></machine>
        <machine name="galaga"><description>Galaga</description><year>1981</year><manufacturer>Namco</manufacturer><driver status="good"/></machine>
        <machine name="dkong"><description>Donkey Kong</description><year>1981</year><manufacturer>Nintendo</manufacturer><driver status="good"/></machine>
    </mame>"#;

    fn launcher() -> ListingLauncher {
        ListingLauncher::default()
            .with_reply("-listxml", LISTING, true)
            .with_reply(
                "-verifyroms",
                "romset pacman is good\nromset galaga is good\nromset dkong is bad\n",
                false,
            )
    }

    fn names(games: &[PlayableGame]) -> Vec<&str> {
        let mut names: Vec<_> = games.iter().map(PlayableGame::name).collect();
        names.sort_unstable();
        names
    }

    fn selectable(name: &str, selected: bool) -> SelectableGame {
        SelectableGame::new(
            &GameRecord::new(name, name, "1980", "Namco").with_driver_status(DriverStatus::Good),
            selected,
        )
    }

    #[test]
    fn without_saved_selection_everything_playable_rotates() {
        let emulator = Emulator::new("mame", "");

        let playable =
            playable_games(&emulator, &launcher(), &GameList::default(), true).unwrap();

        assert_eq!(names(&playable), ["galaga", "pacman"]);
    }

    #[test]
    fn saved_selection_narrows_verified_games() {
        let emulator = Emulator::new("mame", "");
        let selection = GameList::from(vec![
            selectable("pacman", false),
            selectable("galaga", true),
            selectable("dkong", true),
        ]);

        let playable = playable_games(&emulator, &launcher(), &selection, true).unwrap();

        assert_eq!(names(&playable), ["galaga"]);
    }

    #[test]
    fn skipping_verification_never_asks_the_emulator() {
        let emulator = Emulator::new("mame", "");
        let launcher = launcher();
        let selection =
            GameList::from(vec![selectable("pacman", true), selectable("dkong", false)]);

        let playable = playable_games(&emulator, &launcher, &selection, false).unwrap();

        assert_eq!(names(&playable), ["pacman"]);
        assert!(launcher.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_emulator_fails_before_rotation() {
        let emulator = Emulator::new("/nowhere/mame", "");

        let result =
            playable_games(&emulator, &ListingLauncher::default(), &GameList::default(), true);

        assert!(matches!(result, Err(SaverError::CatalogueUnavailable { .. })));
    }
}
