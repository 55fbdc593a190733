use super::VerifiedSets;
use regex::Regex;
use std::sync::LazyLock;

// Only good sets count, "is bad" and "is best available" are left out on purpose
static GOOD_ROMSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"romset (\w+)(?:\s\[(\w*)\])? is good").expect("Pattern is valid")
});

/// Extracts the good sets from the output of `-verifyroms`
pub fn parse_verified_sets(output: &str) -> VerifiedSets {
    let mut verified = VerifiedSets::new();

    for captures in GOOD_ROMSET.captures_iter(output) {
        let name = captures[1].to_string();
        let alias = captures
            .get(2)
            .map(|alias| alias.as_str())
            .filter(|alias| !alias.is_empty())
            .map(str::to_string);

        verified.entry(name).or_insert(alias);
    }

    tracing::info!("Verification reported {} good sets", verified.len());

    verified
}
