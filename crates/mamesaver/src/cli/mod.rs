use crate::config::GlobalConfig;
use clap::{Parser, Subcommand};
use config::{config_init, config_show, ConfigAction};
use games::{games_list, games_refresh, games_select, GamesAction};
use run::rotation_run;
use std::error::Error;

pub mod config;
pub mod games;
pub mod run;

#[derive(Debug, Parser)]
#[command(version, about = "Rotates through working MAME games, stops on any key")]
pub struct Cli {
    #[clap(subcommand)]
    pub action: Option<CliAction>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum CliAction {
    #[command(about = Some("Run the game rotation until interrupted"))]
    Run {
        /// Overrides the configured minutes per game
        #[clap(short, long)]
        rotation_minutes: Option<u32>,
        /// Overrides the configured seconds a game is announced for
        #[clap(short, long)]
        dwell_seconds: Option<u32>,
    },
    #[command(about = Some("Commands relating to the game selection list"))]
    Games {
        #[clap(subcommand)]
        action: GamesAction,
    },
    #[command(about = Some("Commands relating to the configuration file"))]
    Config {
        #[clap(subcommand)]
        action: ConfigAction,
    },
}

impl Default for CliAction {
    fn default() -> Self {
        CliAction::Run {
            rotation_minutes: None,
            dwell_seconds: None,
        }
    }
}

pub fn handle_cli(cli_action: CliAction, config: GlobalConfig) -> Result<(), Box<dyn Error>> {
    match cli_action {
        CliAction::Run {
            rotation_minutes,
            dwell_seconds,
        } => {
            let mut config = config;
            if let Some(rotation_minutes) = rotation_minutes {
                config.rotation_minutes = rotation_minutes;
            }
            if let Some(dwell_seconds) = dwell_seconds {
                config.dwell_seconds = dwell_seconds;
            }

            rotation_run(&config)?;
        }
        CliAction::Games { action } => match action {
            GamesAction::Refresh => {
                games_refresh(&config)?;
            }
            GamesAction::List { selected_only } => {
                games_list(&config, selected_only)?;
            }
            GamesAction::Select { names, all } => {
                games_select(&config, names, all, true)?;
            }
            GamesAction::Deselect { names, all } => {
                games_select(&config, names, all, false)?;
            }
        },
        CliAction::Config { action } => match action {
            ConfigAction::Show => {
                config_show(&config)?;
            }
            ConfigAction::Init { force } => {
                config_init(force)?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::parse_from(["mamesaver"]);

        assert!(cli.action.is_none());
        assert!(matches!(
            cli.action.unwrap_or_default(),
            CliAction::Run {
                rotation_minutes: None,
                dwell_seconds: None
            }
        ));
    }

    #[test]
    fn run_overrides_parse() {
        let cli = Cli::parse_from(["mamesaver", "run", "-r", "2", "--dwell-seconds", "5"]);

        assert!(matches!(
            cli.action,
            Some(CliAction::Run {
                rotation_minutes: Some(2),
                dwell_seconds: Some(5)
            })
        ));
    }

    #[test]
    fn select_takes_names() {
        let cli = Cli::parse_from(["mamesaver", "games", "select", "pacman", "galaga"]);

        match cli.action {
            Some(CliAction::Games {
                action: GamesAction::Select { names, all },
            }) => {
                assert_eq!(names, ["pacman", "galaga"]);
                assert!(!all);
            }
            other => panic!("Unexpected parse {:?}", other),
        }
    }
}
