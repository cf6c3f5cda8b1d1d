//! q_snake - grid Snake with a tabular Q-learning agent
//!
//! This library provides:
//! - The deterministic game environment (game module)
//! - State encoding, the Q-table agent, reward shaping and persistence (rl module)
//! - Training statistics and progress export (metrics module)
//! - Terminal rendering and keyboard input (render, input modules)
//! - The train, human and visualize execution modes (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
