use super::{DriverStatus, GameRecord, PlayableGame};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    error::Error,
    fs::{create_dir_all, File},
    path::Path,
};

/// A game the user can opt in or out of the rotation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectableGame {
    pub name: String,
    pub description: String,
    pub year: String,
    pub manufacturer: String,
    pub selected: bool,
}

impl SelectableGame {
    pub fn new(record: &GameRecord, selected: bool) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            year: record.year.clone(),
            manufacturer: record.manufacturer.clone(),
            selected,
        }
    }

    /// The persisted list doubles as a playable list when verification is skipped
    pub fn to_playable(&self) -> PlayableGame {
        let mut record = GameRecord::new(
            self.name.clone(),
            self.description.clone(),
            self.year.clone(),
            self.manufacturer.clone(),
        );
        record.driver_status = Some(DriverStatus::Good);

        PlayableGame {
            record,
            verified_alias: None,
        }
    }
}

/// Ordered selection list as stored on disk
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct GameList {
    pub games: Vec<SelectableGame>,
}

impl From<Vec<SelectableGame>> for GameList {
    fn from(games: Vec<SelectableGame>) -> Self {
        Self { games }
    }
}

impl GameList {
    /// An absent file is an empty list
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let list_file = File::open(path)?;
        let list = ron::de::from_reader(list_file)?;

        Ok(list)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let list_file = File::create(path)?;
        ron::ser::to_writer_pretty(list_file, self, PrettyConfig::default())?;

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = &SelectableGame> {
        self.games.iter().filter(|game| game.selected)
    }

    /// Rebuilds the list from a fresh playable list
    ///
    /// Games that are still playable keep their selection, new ones come in selected and the
    /// rest are dropped.
    pub fn refresh(&mut self, playable: &[PlayableGame]) {
        let previous: HashMap<&str, bool> = self
            .games
            .iter()
            .map(|game| (game.name.as_str(), game.selected))
            .collect();

        let mut games: Vec<_> = playable
            .iter()
            .map(|game| {
                let selected = previous.get(game.name()).copied().unwrap_or(true);
                SelectableGame::new(&game.record, selected)
            })
            .collect();
        games.sort_by(|a, b| a.description.cmp(&b.description));

        self.games = games;
    }

    /// Returns the names that did not match any game
    pub fn set_selected<'a>(&mut self, names: &'a [String], selected: bool) -> Vec<&'a str> {
        let mut unknown = Vec::new();

        for name in names {
            match self.games.iter_mut().find(|game| &game.name == name) {
                Some(game) => game.selected = selected,
                None => unknown.push(name.as_str()),
            }
        }

        unknown
    }

    pub fn set_all_selected(&mut self, selected: bool) {
        for game in &mut self.games {
            game.selected = selected;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    fn playable(name: &str, description: &str) -> PlayableGame {
        PlayableGame {
            record: GameRecord::new(name, description, "1981", "Namco")
                .with_driver_status(DriverStatus::Good),
            verified_alias: None,
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();

        let list = GameList::load(dir.path().join("gamelist.ron")).unwrap();

        assert!(list.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("gamelist.ron");
        let mut list = GameList::default();
        list.refresh(&[playable("galaga", "Galaga"), playable("pacman", "Pac-Man")]);
        list.set_selected(&["pacman".to_string()], false);

        list.save(&path).unwrap();
        let loaded = GameList::load(&path).unwrap();

        assert_eq!(loaded, list);
        assert_eq!(
            loaded.selected().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            ["galaga"]
        );
    }

    #[test]
    fn refresh_keeps_previous_choices() {
        let mut list = GameList::default();
        list.refresh(&[playable("pacman", "Pac-Man"), playable("dkong", "Donkey Kong")]);
        list.set_selected(&["dkong".to_string()], false);

        list.refresh(&[
            playable("pacman", "Pac-Man"),
            playable("galaga", "Galaga"),
            playable("dkong", "Donkey Kong"),
        ]);

        let states: Vec<_> = list
            .games
            .iter()
            .map(|g| (g.name.as_str(), g.selected))
            .collect();
        assert_eq!(states, [("dkong", false), ("galaga", true), ("pacman", true)]);

        list.refresh(&[playable("galaga", "Galaga")]);
        assert_eq!(list.games.len(), 1);
    }

    #[test]
    fn unknown_names_are_reported() {
        let mut list = GameList::default();
        list.refresh(&[playable("pacman", "Pac-Man")]);

        let names = ["pacman".to_string(), "nope".to_string()];
        let unknown = list.set_selected(&names, false);

        assert_eq!(unknown, ["nope"]);
        assert_eq!(list.selected().count(), 0);

        list.set_all_selected(true);
        assert_eq!(list.selected().count(), 1);
    }
}
