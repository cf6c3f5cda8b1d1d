use super::config::RewardConfig;
use crate::game::StepResult;

/// Per-tick reward with distance shaping
///
/// Termination outranks eating, which outranks the distance term. The
/// tracked distance only moves forward on ticks that pay the distance term,
/// so the tick after eating is measured against the distance before the
/// food was eaten.
#[derive(Debug, Clone)]
pub struct RewardShaper {
    config: RewardConfig,
    previous_distance: f64,
}

impl RewardShaper {
    pub fn new(config: RewardConfig, initial_distance: f64) -> Self {
        Self {
            config,
            previous_distance: initial_distance,
        }
    }

    /// Start tracking a new episode
    pub fn reset(&mut self, initial_distance: f64) {
        self.previous_distance = initial_distance;
    }

    /// Reward for the tick that produced `result`, with the head now
    /// `current_distance` away from the food
    pub fn reward(&mut self, result: &StepResult, current_distance: f64) -> f64 {
        if result.terminated {
            return self.config.death_penalty;
        }

        if result.info.ate_food {
            return self.config.food_reward;
        }

        let delta = self.previous_distance - current_distance;
        self.previous_distance = current_distance;
        delta * self.config.distance_reward_weight
    }

    pub fn previous_distance(&self) -> f64 {
        self.previous_distance
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }
}
