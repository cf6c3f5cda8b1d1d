//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is driven by human play, the trained-agent viewer and the Q-learning trainer alike.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

pub use action::{Action, Heading};
pub use config::GridConfig;
pub use engine::{Environment, StepInfo, StepResult};
pub use state::{CollisionType, Position, SnakeState};
