use strum::{Display, EnumString};

pub mod reconcile;
pub mod selection;

/// Emulation quality the catalogue reports for the driver backing a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DriverStatus {
    Good,
    Imperfect,
    Preliminary,
}

/// A single entry of the emulator's catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub name: String,
    pub description: String,
    /// Empty when the catalogue omits it
    pub year: String,
    /// Empty when the catalogue omits it
    pub manufacturer: String,
    pub driver_status: Option<DriverStatus>,
    /// Set by `isbios="yes"`
    pub bios: bool,
    pub clone_of: Option<String>,
}

impl GameRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        year: impl Into<String>,
        manufacturer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            year: year.into(),
            manufacturer: manufacturer.into(),
            driver_status: None,
            bios: false,
            clone_of: None,
        }
    }

    pub fn with_driver_status(mut self, status: DriverStatus) -> Self {
        self.driver_status = Some(status);
        self
    }

    /// BIOS and support sets have no usable description or year
    pub fn is_bios(&self) -> bool {
        self.bios || self.description.trim().is_empty() || self.year.trim().is_empty()
    }

    /// Second line shown under the description while a game is announced
    pub fn year_manufacturer_line(&self) -> String {
        format!("{} {}", self.year, self.manufacturer).trim().to_string()
    }
}

/// A catalogue record that passed verification and is fit to be launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableGame {
    pub record: GameRecord,
    /// Clone name verification reported the set under, if any
    pub verified_alias: Option<String>,
}

impl PlayableGame {
    pub fn name(&self) -> &str {
        &self.record.name
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn driver_status_parses_lowercase() {
        assert_eq!("good".parse::<DriverStatus>().ok(), Some(DriverStatus::Good));
        assert_eq!(
            "preliminary".parse::<DriverStatus>().ok(),
            Some(DriverStatus::Preliminary)
        );
        assert!("excellent".parse::<DriverStatus>().is_err());
        assert_eq!(DriverStatus::Imperfect.to_string(), "imperfect");
    }

    #[test]
    fn missing_year_or_description_means_bios() {
        assert!(!GameRecord::new("pacman", "Pac-Man", "1980", "Namco").is_bios());
        assert!(GameRecord::new("neogeo", "Neo-Geo", "", "SNK").is_bios());
        assert!(GameRecord::new("qsound", "", "1993", "Capcom").is_bios());

        let mut flagged = GameRecord::new("pgm", "PGM", "1997", "IGS");
        flagged.bios = true;
        assert!(flagged.is_bios());
    }

    #[test]
    fn year_manufacturer_line_skips_missing_parts() {
        assert_eq!(
            GameRecord::new("pacman", "Pac-Man", "1980", "Namco").year_manufacturer_line(),
            "1980 Namco"
        );
        assert_eq!(
            GameRecord::new("x", "X", "", "Sega").year_manufacturer_line(),
            "Sega"
        );
    }
}
