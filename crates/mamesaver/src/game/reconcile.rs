use super::{selection::GameList, DriverStatus, GameRecord, PlayableGame};
use crate::mame::VerifiedSets;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Merges the catalogue with the verification report
///
/// Only sets verification reported as good, whose driver the catalogue also marks as good, and
/// which are not BIOS or support sets make it through. The result is keyed by the canonical
/// catalogue name even when verification reported the set under an alias.
pub fn reconcile(catalogue: &[GameRecord], verified: &VerifiedSets) -> Vec<PlayableGame> {
    // First record wins if the catalogue repeats a name
    let mut by_name: HashMap<&str, &GameRecord> = HashMap::with_capacity(catalogue.len());
    for record in catalogue {
        by_name.entry(record.name.as_str()).or_insert(record);
    }

    let mut playable: IndexMap<&str, PlayableGame> = IndexMap::new();

    for (name, alias) in verified {
        let Some(record) = by_name.get(name.as_str()) else {
            tracing::debug!("Verified set {} has no catalogue entry", name);
            continue;
        };

        if record.driver_status != Some(DriverStatus::Good) {
            tracing::debug!(
                "Skipping {} as its driver status is {:?}",
                name,
                record.driver_status
            );
            continue;
        }

        if record.is_bios() {
            tracing::debug!("Skipping {} as it is a BIOS or support set", name);
            continue;
        }

        playable
            .entry(record.name.as_str())
            .or_insert_with(|| PlayableGame {
                record: (*record).clone(),
                verified_alias: alias.clone(),
            });
    }

    tracing::info!(
        "{} of {} verified sets are playable",
        playable.len(),
        verified.len()
    );

    playable.into_values().collect()
}

/// Keeps only the games the user left selected
pub fn restrict_to_selection(playable: Vec<PlayableGame>, selection: &GameList) -> Vec<PlayableGame> {
    let selected: HashSet<&str> = selection.selected().map(|game| game.name.as_str()).collect();

    let before = playable.len();
    let restricted: Vec<_> = playable
        .into_iter()
        .filter(|game| selected.contains(game.name()))
        .collect();

    tracing::info!(
        "{} of {} playable games are selected for rotation",
        restricted.len(),
        before
    );

    restricted
}
