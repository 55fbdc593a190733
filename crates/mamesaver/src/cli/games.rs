use super::run::{discover_playable, load_selection};
use crate::{config::GlobalConfig, game::selection::GameList, process::SystemLauncher};
use clap::Subcommand;
use std::error::Error;

#[derive(Clone, Debug, Subcommand)]
pub enum GamesAction {
    /// Ask the emulator what works and update the saved list
    Refresh,
    List {
        #[clap(short, long)]
        selected_only: bool,
    },
    Select {
        #[clap(required_unless_present = "all", num_args = 1..)]
        names: Vec<String>,
        #[clap(short, long, conflicts_with = "names")]
        all: bool,
    },
    Deselect {
        #[clap(required_unless_present = "all", num_args = 1..)]
        names: Vec<String>,
        #[clap(short, long, conflicts_with = "names")]
        all: bool,
    },
}

pub fn games_refresh(config: &GlobalConfig) -> Result<(), Box<dyn Error>> {
    let playable = discover_playable(&config.emulator(), &SystemLauncher)?;

    let mut list = load_selection(&config.game_list_location)?;
    list.refresh(&playable);
    list.save(&config.game_list_location)?;

    tracing::info!(
        "Saved {} games ({} selected) to {}",
        list.games.len(),
        list.selected().count(),
        config.game_list_location.display()
    );

    Ok(())
}

pub fn games_list(config: &GlobalConfig, selected_only: bool) -> Result<(), Box<dyn Error>> {
    let list = load_selection(&config.game_list_location)?;

    if list.is_empty() {
        println!("No saved games, run `mamesaver games refresh` first");
        return Ok(());
    }

    for line in render_list(&list, selected_only) {
        println!("{}", line);
    }

    Ok(())
}

pub fn games_select(
    config: &GlobalConfig,
    names: Vec<String>,
    all: bool,
    selected: bool,
) -> Result<(), Box<dyn Error>> {
    let mut list = load_selection(&config.game_list_location)?;

    if all {
        list.set_all_selected(selected);
    } else {
        for name in list.set_selected(&names, selected) {
            tracing::warn!("{} is not in the saved game list", name);
        }
    }

    list.save(&config.game_list_location)?;

    Ok(())
}

fn render_list(list: &GameList, selected_only: bool) -> Vec<String> {
    list.games
        .iter()
        .filter(|game| game.selected || !selected_only)
        .map(|game| {
            format!(
                "[{}] {:<16} {} ({} {})",
                if game.selected { 'x' } else { ' ' },
                game.name,
                game.description,
                game.year,
                game.manufacturer
            )
        })
        .collect()
}
