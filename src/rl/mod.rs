//! Tabular Q-learning for the Snake environment
//!
//! Provides:
//! - State discretization into a packed 32-value key
//! - A lazily grown action-value table
//! - An epsilon-greedy agent with the one-step Q-learning update
//! - Distance-shaped rewards
//! - JSON persistence of learned tables

pub mod agent;
pub mod config;
pub mod encoder;
pub mod persistence;
pub mod reward;
pub mod table;

pub use agent::{QAgent, Selection};
pub use config::{QLearningConfig, RewardConfig};
pub use encoder::{encode, StateKey};
pub use persistence::{load_metadata, load_table, save_table, TableMetadata};
pub use reward::RewardShaper;
pub use table::QTable;
