//! Level catalogue loading
//!
//! The fifteen reference levels ship embedded in the binary. A JSON file in
//! the same shape can replace them with `--levels` or be hot-reloaded with
//! `watch`.

use anyhow::{Context, Result};
use numbrush_core::error::LevelError;
use numbrush_core::types::Level;
use std::path::Path;

const BUILTIN: &str = include_str!("../assets/levels.json");

/// The embedded reference catalogue
pub fn builtin() -> Result<Vec<Level>> {
    parse(BUILTIN).context("embedded level catalogue is invalid")
}

/// Read and validate a catalogue file
pub fn load(path: &Path) -> Result<Vec<Level>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&json).with_context(|| format!("invalid level catalogue in {}", path.display()))
}

/// Parse a JSON array of levels. Every level is checked on the way in.
pub fn parse(json: &str) -> Result<Vec<Level>> {
    let levels: Vec<Level> = serde_json::from_str(json)?;
    if levels.is_empty() {
        return Err(LevelError::NoLevels.into());
    }
    Ok(levels)
}
