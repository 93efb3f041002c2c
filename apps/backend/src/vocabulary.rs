//! Word list for the vocabulary game.

use anyhow::Context;
use flashdrill_core::WordEntry;
use std::collections::BTreeSet;
use std::path::Path;

const BUNDLED: &str = include_str!("../data/vocabulary.json");

/// Load the word list at `path`, or the bundled one when no path is given.
pub fn load(path: Option<&Path>) -> anyhow::Result<Vec<WordEntry>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading word list {}", path.display()))?;
            parse(&text).with_context(|| format!("parsing word list {}", path.display()))
        }
        None => parse(BUNDLED).context("parsing bundled word list"),
    }
}

/// Parse a JSON array of `{en, de, unit}` entries.
///
/// Blank entries are dropped, as are repeats of an English word within a
/// unit (the first one wins).
pub fn parse(text: &str) -> serde_json::Result<Vec<WordEntry>> {
    let entries: Vec<WordEntry> = serde_json::from_str(text)?;
    let mut seen = BTreeSet::new();
    let words: Vec<WordEntry> = entries
        .into_iter()
        .map(|w| WordEntry {
            en: w.en.trim().to_string(),
            de: w.de.trim().to_string(),
            unit: w.unit.trim().to_string(),
        })
        .filter(|w| !w.en.is_empty() && !w.de.is_empty() && !w.unit.is_empty())
        .filter(|w| seen.insert((w.unit.clone(), w.en.clone())))
        .collect();
    Ok(words)
}
