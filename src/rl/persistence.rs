//! Value-table persistence
//!
//! A table is saved as a flat JSON object mapping each state key in its
//! `"(food_bits, danger_bits)"` form to an object of action id to value:
//!
//! ```json
//! { "(5, 0)": { "0": 1.5, "1": -0.25, "2": 0.0 } }
//! ```
//!
//! Training metadata goes into a sibling `<path>.meta.json` file.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{QLearningConfig, QTable, RewardConfig, StateKey};
use crate::game::{Action, GridConfig};

type TableJson = BTreeMap<String, BTreeMap<String, f64>>;

/// Metadata saved with the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Q-learning hyperparameters used during training
    pub q_learning: QLearningConfig,

    /// Reward constants used during training
    pub rewards: RewardConfig,

    /// Field geometry trained on
    pub grid: GridConfig,

    /// Number of episodes trained
    pub episodes_trained: usize,

    /// Exploration rate reached at the end of training
    pub exploration_rate: f64,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl TableMetadata {
    pub fn new(
        q_learning: QLearningConfig,
        rewards: RewardConfig,
        grid: GridConfig,
        episodes_trained: usize,
        exploration_rate: f64,
    ) -> Self {
        Self {
            q_learning,
            rewards,
            grid,
            episodes_trained,
            exploration_rate,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Path of the metadata file belonging to a table file
pub fn metadata_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}

/// Save a value table and its metadata
///
/// Creates parent directories if they don't exist.
pub fn save_table(table: &QTable, metadata: &TableMetadata, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let json = serde_json::to_string(&table_to_json(table)).context("Failed to serialize table")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write table to {:?}", path))?;

    let meta_path = metadata_path(path);
    let meta_json =
        serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load a value table saved by [`save_table`]
pub fn load_table(path: &Path) -> Result<QTable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read table from {:?}", path))?;
    let raw: TableJson = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse table in {:?}", path))?;

    table_from_json(raw).with_context(|| format!("Invalid table in {:?}", path))
}

/// Load the metadata saved next to a table
pub fn load_metadata(path: &Path) -> Result<TableMetadata> {
    let meta_path = metadata_path(path);
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    serde_json::from_str(&meta_json).context("Failed to deserialize metadata")
}

fn table_to_json(table: &QTable) -> TableJson {
    table
        .sorted_rows()
        .into_iter()
        .map(|(key, values)| {
            let row = Action::ALL
                .iter()
                .map(|action| (action.id().to_string(), values[action.id()]))
                .collect();
            (key.to_string(), row)
        })
        .collect()
}

fn table_from_json(raw: TableJson) -> Result<QTable> {
    let mut table = QTable::new();

    for (key, row) in raw {
        let state: StateKey = key.parse().map_err(|e: String| anyhow!(e))?;
        let mut values = [0.0; 3];

        for (action_id, value) in row {
            let action = action_id
                .parse::<usize>()
                .ok()
                .and_then(Action::from_id)
                .ok_or_else(|| anyhow!("unknown action id {action_id:?} in state {key}"))?;
            values[action.id()] = value;
        }

        table.insert(state, values);
    }

    Ok(table)
}
