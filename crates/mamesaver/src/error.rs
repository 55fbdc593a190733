use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaverError {
    #[error("Could not read the game catalogue from {}: {source}", path.display())]
    CatalogueUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not verify installed ROM sets with {}: {source}", path.display())]
    VerificationUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to launch {game}: {source}")]
    LaunchFailure {
        game: String,
        #[source]
        source: io::Error,
    },
    #[error("Game selection list at {} is unusable: {reason}", path.display())]
    SelectionList { path: PathBuf, reason: String },
}
