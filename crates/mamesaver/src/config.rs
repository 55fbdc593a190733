use crate::{mame::Emulator, rotation::engine::RotationSettings};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use std::{
    fs::{create_dir_all, File},
    ops::Deref,
    path::PathBuf,
    sync::LazyLock,
    time::Duration,
};

pub static STORAGE_DIRECTORY: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mamesaver")
});

pub static CONFIG_LOCATION: LazyLock<PathBuf> =
    LazyLock::new(|| STORAGE_DIRECTORY.join("config.ron"));

#[serde_inline_default]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Minutes each game gets, anything under one is treated as one
    #[serde_inline_default(5)]
    pub rotation_minutes: u32,
    /// Seconds the next game is announced before it starts
    #[serde_inline_default(3)]
    pub dwell_seconds: u32,
    #[serde_inline_default(PathBuf::from("mame"))]
    pub emulator_path: PathBuf,
    /// Appended after the game name, split on whitespace
    #[serde_inline_default("-skip_gameinfo".to_string())]
    pub extra_args: String,
    #[serde_inline_default(STORAGE_DIRECTORY.join("gamelist.ron"))]
    pub game_list_location: PathBuf,
    /// Ask the emulator which sets work before every run instead of trusting the saved list
    #[serde_inline_default(true)]
    pub verify_on_start: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            rotation_minutes: 5,
            dwell_seconds: 3,
            emulator_path: PathBuf::from("mame"),
            extra_args: "-skip_gameinfo".to_string(),
            game_list_location: STORAGE_DIRECTORY.join("gamelist.ron"),
            verify_on_start: true,
        }
    }
}

impl GlobalConfig {
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        create_dir_all(STORAGE_DIRECTORY.deref())?;
        let config_file = File::create(CONFIG_LOCATION.deref())?;
        ron::ser::to_writer_pretty(config_file, self, PrettyConfig::default())?;

        Ok(())
    }

    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_file = File::open(CONFIG_LOCATION.deref())?;
        let config = ron::de::from_reader(config_file)?;

        Ok(config)
    }

    /// Falls back to defaults, a config that fails to parse is reported
    pub fn load_or_default() -> Self {
        if !CONFIG_LOCATION.exists() {
            return Self::default();
        }

        Self::load().unwrap_or_else(|err| {
            tracing::warn!(
                "Ignoring unreadable config at {}: {}",
                CONFIG_LOCATION.display(),
                err
            );
            Self::default()
        })
    }

    pub fn rotation_duration(&self) -> Duration {
        if self.rotation_minutes == 0 {
            tracing::warn!("Rotation time of 0 minutes is too short, using 1 minute");
        }

        Duration::from_secs(u64::from(self.rotation_minutes.max(1)) * 60)
    }

    pub fn dwell_duration(&self) -> Duration {
        Duration::from_secs(self.dwell_seconds.into())
    }

    pub fn rotation_settings(&self) -> RotationSettings {
        RotationSettings {
            rotation: self.rotation_duration(),
            dwell: self.dwell_duration(),
        }
    }

    pub fn emulator(&self) -> Emulator {
        Emulator::new(self.emulator_path.clone(), &self.extra_args)
    }
}
