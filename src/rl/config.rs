//! Q-learning and reward hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Hyperparameters of the tabular Q-learning agent
///
/// # Example
///
/// ```rust
/// use q_snake::rl::QLearningConfig;
///
/// let config = QLearningConfig {
///     learning_rate: 0.1,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Step size of the value update (alpha)
    ///
    /// Default: 0.001
    pub learning_rate: f64,

    /// Weight of the best next-state value (gamma)
    ///
    /// Default: 0.99
    pub discount_factor: f64,

    /// Initial probability of taking a uniformly random action
    ///
    /// Default: 1.0
    pub exploration_rate: f64,

    /// Multiplier applied to the exploration rate after every episode
    ///
    /// Default: 0.997
    pub exploration_decay: f64,

    /// Floor the decayed exploration rate never drops below; must be
    /// positive so training never turns fully greedy
    ///
    /// Default: 0.001
    pub min_exploration_rate: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            discount_factor: 0.99,
            exploration_rate: 1.0,
            exploration_decay: 0.997,
            min_exploration_rate: 0.001,
        }
    }
}

impl QLearningConfig {
    /// Exploration rate after one more episode of decay
    pub fn decayed(&self, exploration_rate: f64) -> f64 {
        (exploration_rate * self.exploration_decay).max(self.min_exploration_rate)
    }

    /// Validate configuration parameters
    ///
    /// `Ok(())` if all parameters are in range, `Err(String)` describing the
    /// first offending field otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 || self.learning_rate > 1.0 {
            return Err(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            ));
        }

        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(format!(
                "exploration_rate must be in [0, 1], got {}",
                self.exploration_rate
            ));
        }

        if self.exploration_decay <= 0.0 || self.exploration_decay > 1.0 {
            return Err(format!(
                "exploration_decay must be in (0, 1], got {}",
                self.exploration_decay
            ));
        }

        if self.min_exploration_rate <= 0.0 || self.min_exploration_rate > 1.0 {
            return Err(format!(
                "min_exploration_rate must be in (0, 1], got {}",
                self.min_exploration_rate
            ));
        }

        if self.min_exploration_rate > self.exploration_rate {
            return Err(format!(
                "min_exploration_rate ({}) cannot exceed exploration_rate ({})",
                self.min_exploration_rate, self.exploration_rate
            ));
        }

        Ok(())
    }
}

/// Reward shaping constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward for eating food
    pub food_reward: f64,
    /// Reward for dying (negative)
    pub death_penalty: f64,
    /// Scale applied to the change in distance to food
    pub distance_reward_weight: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            food_reward: 150.0,
            death_penalty: -150.0,
            distance_reward_weight: 2.0,
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.food_reward <= 0.0 {
            return Err(format!(
                "food_reward must be positive, got {}",
                self.food_reward
            ));
        }

        if self.death_penalty >= 0.0 {
            return Err(format!(
                "death_penalty must be negative, got {}",
                self.death_penalty
            ));
        }

        if !self.distance_reward_weight.is_finite() {
            return Err("distance_reward_weight must be finite".to_string());
        }

        Ok(())
    }
}
