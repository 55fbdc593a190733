use crate::{
    error::SaverError,
    game::GameRecord,
    process::{ProcessHandle, ProcessLauncher, ProcessRequest},
};
use indexmap::IndexMap;
use std::{io, path::PathBuf};

pub mod listxml;
pub mod verifyroms;

/// Set name to the clone name it was verified under
pub type VerifiedSets = IndexMap<String, Option<String>>;

/// The emulator binary and how to talk to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emulator {
    pub path: PathBuf,
    pub extra_args: Vec<String>,
}

impl Emulator {
    pub fn new(path: impl Into<PathBuf>, extra_args: &str) -> Self {
        Self {
            path: path.into(),
            extra_args: extra_args.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Directory the emulator runs from, so it finds its own ini and rom paths
    pub fn working_directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Request that runs a single game
    pub fn game_request(&self, game: &str) -> ProcessRequest {
        let mut args = Vec::with_capacity(self.extra_args.len() + 1);
        args.push(game.to_string());
        args.extend(self.extra_args.iter().cloned());

        ProcessRequest {
            program: self.path.clone(),
            args,
            working_directory: self.working_directory(),
            capture_stdout: false,
        }
    }

    fn listing_request(&self, instruction: &str) -> ProcessRequest {
        ProcessRequest {
            program: self.path.clone(),
            args: vec![instruction.to_string()],
            working_directory: self.working_directory(),
            capture_stdout: true,
        }
    }

    pub fn fetch_catalogue(
        &self,
        launcher: &impl ProcessLauncher,
    ) -> Result<Vec<GameRecord>, SaverError> {
        let unavailable = |source: io::Error| SaverError::CatalogueUnavailable {
            path: self.path.clone(),
            source,
        };

        tracing::info!("Reading game catalogue from {}", self.path.display());

        let (output, succeeded) =
            capture(launcher, &self.listing_request("-listxml")).map_err(unavailable)?;

        if output.trim().is_empty() && !succeeded {
            return Err(unavailable(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "emulator exited without listing any games",
            )));
        }

        let catalogue = listxml::parse_catalogue(&output);
        tracing::info!("Catalogue lists {} games", catalogue.len());

        Ok(catalogue)
    }

    pub fn fetch_verified_sets(
        &self,
        launcher: &impl ProcessLauncher,
    ) -> Result<VerifiedSets, SaverError> {
        tracing::info!("Verifying installed ROM sets with {}", self.path.display());

        // Any bad set makes the verifier exit unsuccessfully, so the status is not interesting
        let (output, _) = capture(launcher, &self.listing_request("-verifyroms")).map_err(
            |source| SaverError::VerificationUnavailable {
                path: self.path.clone(),
                source,
            },
        )?;

        Ok(verifyroms::parse_verified_sets(&output))
    }
}

fn capture(launcher: &impl ProcessLauncher, request: &ProcessRequest) -> io::Result<(String, bool)> {
    let mut handle = launcher.start(request)?;
    let output = handle.read_all_output()?;
    let succeeded = handle.wait_for_exit()?;

    Ok((output, succeeded))
}
