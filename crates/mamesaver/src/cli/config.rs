use crate::config::{GlobalConfig, CONFIG_LOCATION};
use clap::Subcommand;
use ron::ser::PrettyConfig;
use std::error::Error;

#[derive(Clone, Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration in effect
    Show,
    /// Write a default configuration file
    Init {
        /// Replace an existing file
        #[clap(short, long)]
        force: bool,
    },
}

pub fn config_show(config: &GlobalConfig) -> Result<(), Box<dyn Error>> {
    println!("# {}", CONFIG_LOCATION.display());
    println!("{}", ron::ser::to_string_pretty(config, PrettyConfig::default())?);

    Ok(())
}

pub fn config_init(force: bool) -> Result<(), Box<dyn Error>> {
    if CONFIG_LOCATION.exists() && !force {
        return Err(format!(
            "{} already exists, pass --force to overwrite it",
            CONFIG_LOCATION.display()
        )
        .into());
    }

    GlobalConfig::default().save()?;
    tracing::info!("Wrote default config to {}", CONFIG_LOCATION.display());

    Ok(())
}
