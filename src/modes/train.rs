//! Q-learning training loop
//!
//! Runs episodes of the Snake environment, updates the agent's value table
//! after every tick, decays exploration between episodes and persists the
//! learned table at the end of the run.
//!
//! # Example
//!
//! ```rust,no_run
//! use q_snake::modes::{TrainConfig, TrainMode};
//! use std::path::PathBuf;
//!
//! let mut config = TrainConfig::new(1000, PathBuf::from("snake_q_table.json"));
//! config.seed = Some(7);
//!
//! let mut train_mode = TrainMode::new(config);
//! let report = train_mode.run()?;
//! println!("best score: {:?}", report.scores.iter().max());
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{bail, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::game::{CollisionType, Environment, GridConfig};
use crate::metrics::{write_progress_csv, TrainingStats};
use crate::rl::{
    encode, save_table, QAgent, QLearningConfig, QTable, RewardConfig, RewardShaper,
    TableMetadata,
};

/// Episodes in the rolling score average of the log line
const ROLLING_WINDOW: usize = 10;

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Path to save the learned table
    pub save_path: PathBuf,

    /// Path for the per-episode score CSV, if wanted
    pub progress_path: Option<PathBuf>,

    /// Force-end episodes after this many ticks
    pub max_ticks_per_episode: Option<usize>,

    /// Seed for food placement and exploration
    pub seed: Option<u64>,

    /// Field geometry
    pub grid: GridConfig,

    /// Learning hyperparameters
    pub q_learning: QLearningConfig,

    /// Reward constants
    pub rewards: RewardConfig,
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    pub fn new(num_episodes: usize, save_path: PathBuf) -> Self {
        Self {
            num_episodes,
            save_path,
            progress_path: None,
            max_ticks_per_episode: None,
            seed: None,
            grid: GridConfig::default(),
            q_learning: QLearningConfig::default(),
            rewards: RewardConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.grid.validate() {
            bail!("invalid grid: {e}");
        }
        if let Err(e) = self.q_learning.validate() {
            bail!("invalid Q-learning config: {e}");
        }
        if let Err(e) = self.rewards.validate() {
            bail!("invalid reward config: {e}");
        }
        if self.max_ticks_per_episode == Some(0) {
            bail!("max_ticks_per_episode must be at least 1");
        }
        Ok(())
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// The snake collided
    Collision(CollisionType),
    /// The tick guard cut the episode short
    TickLimit,
}

impl EpisodeEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeEnd::Collision(CollisionType::Wall) => "wall",
            EpisodeEnd::Collision(CollisionType::SelfCollision) => "self",
            EpisodeEnd::TickLimit => "tick_limit",
        }
    }
}

/// Outcome of one episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeRecord {
    /// Food eaten (`target_length - 1`)
    pub score: usize,
    /// Sum of rewards over the episode
    pub cumulative_reward: f64,
    /// Ticks played
    pub ticks: usize,
    /// How the episode ended
    pub end: EpisodeEnd,
}

/// Snapshot passed to a [`TickObserver`] after every tick
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub episode: usize,
    pub num_episodes: usize,
    pub tick: usize,
    pub exploration_rate: f64,
    pub cumulative_reward: f64,
    pub rolling_score: f64,
    /// Outcome of the previous episode, if any
    pub last_episode: Option<EpisodeRecord>,
}

/// Receives the environment after every training tick (e.g. to draw it)
pub trait TickObserver {
    fn on_tick(&mut self, env: &Environment, context: &TickContext) -> Result<()>;
}

/// Summary returned by [`TrainMode::run`]
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Score of every episode, in order
    pub scores: Vec<usize>,
    /// Every episode record, in order
    pub episodes: Vec<EpisodeRecord>,
    /// Exploration rate after the last decay
    pub final_exploration_rate: f64,
    /// Rows in the learned table
    pub table_size: usize,
}

/// Training mode: the agent/environment interaction loop
pub struct TrainMode {
    agent: QAgent,
    env: Environment,
    shaper: RewardShaper,
    stats: TrainingStats,
    config: TrainConfig,
    exploration_rate: f64,
    observer: Option<Box<dyn TickObserver>>,
    records: Vec<EpisodeRecord>,
}

impl TrainMode {
    /// Create a training mode with an empty table
    pub fn new(config: TrainConfig) -> Self {
        let agent = match config.seed {
            Some(seed) => QAgent::with_seed(seed.wrapping_add(1)),
            None => QAgent::new(),
        };
        Self::with_agent(config, agent)
    }

    /// Continue training from a previously learned table
    pub fn resume(config: TrainConfig, table: QTable) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self::with_agent(config, QAgent::with_table(table, rng))
    }

    fn with_agent(config: TrainConfig, agent: QAgent) -> Self {
        let env = match config.seed {
            Some(seed) => Environment::with_seed(config.grid, seed),
            None => Environment::new(config.grid),
        };
        let shaper = RewardShaper::new(config.rewards.clone(), env.distance_to_food());

        Self {
            agent,
            env,
            shaper,
            stats: TrainingStats::new(ROLLING_WINDOW),
            exploration_rate: config.q_learning.exploration_rate,
            config,
            observer: None,
            records: Vec::new(),
        }
    }

    /// Attach an observer notified after every tick
    pub fn with_observer(mut self, observer: Box<dyn TickObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run the training loop
    ///
    /// Persistence and progress-export failures are logged as warnings and
    /// do not fail the run.
    pub fn run(&mut self) -> Result<TrainingReport> {
        self.config.validate()?;
        self.print_header();

        for episode in 0..self.config.num_episodes {
            let record = self.run_episode(episode);

            self.stats.record_episode(
                record.score,
                record.cumulative_reward,
                record.ticks,
                record.end == EpisodeEnd::TickLimit,
            );

            info!(
                episode,
                score = record.score,
                avg_score_last_10 = format_args!("{:.1}", self.stats.mean_score()),
                exploration_rate = format_args!("{:.4}", self.exploration_rate),
                cumulative_reward = format_args!("{:.1}", record.cumulative_reward),
                ticks = record.ticks,
                end = record.end.as_str(),
                last_action = self.agent.last_selection().as_str(),
                "episode done"
            );

            self.exploration_rate = self.config.q_learning.decayed(self.exploration_rate);
            self.records.push(record);
        }

        // Dropping the observer hands the screen back before the summary
        self.observer = None;
        self.save_table();
        self.export_progress();

        println!("\nTraining complete!");
        println!("{}", self.stats.format_summary());

        Ok(self.report())
    }

    /// Run a single episode from reset to termination or the tick limit
    pub fn run_episode(&mut self, episode: usize) -> EpisodeRecord {
        self.env.reset();
        self.shaper.reset(self.env.distance_to_food());

        let learning_rate = self.config.q_learning.learning_rate;
        let discount_factor = self.config.q_learning.discount_factor;
        let mut cumulative_reward = 0.0;
        let mut ticks = 0;

        let end = loop {
            if let Some(limit) = self.config.max_ticks_per_episode {
                if ticks >= limit {
                    debug!(episode, ticks, "tick limit reached");
                    break EpisodeEnd::TickLimit;
                }
            }

            let state = encode(&self.env);
            let action = self.agent.select_action(state, self.exploration_rate);
            let result = self.env.step(action.apply(self.env.heading()));
            let next_state = encode(&self.env);
            let reward = self
                .shaper
                .reward(&result, self.env.distance_to_food());

            self.agent.update(
                state,
                action,
                reward,
                next_state,
                learning_rate,
                discount_factor,
            );

            cumulative_reward += reward;
            ticks += 1;
            self.notify_observer(episode, ticks, cumulative_reward);

            if let Some(collision) = result.info.collision_type {
                break EpisodeEnd::Collision(collision);
            }
        };

        EpisodeRecord {
            score: self.env.score(),
            cumulative_reward,
            ticks,
            end,
        }
    }

    fn notify_observer(&mut self, episode: usize, tick: usize, cumulative_reward: f64) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };

        let context = TickContext {
            episode,
            num_episodes: self.config.num_episodes,
            tick,
            exploration_rate: self.exploration_rate,
            cumulative_reward,
            rolling_score: self.stats.mean_score(),
            last_episode: self.records.last().copied(),
        };

        if let Err(err) = observer.on_tick(&self.env, &context) {
            warn!(?err, "tick observer failed, continuing without it");
            self.observer = None;
        }
    }

    fn save_table(&self) {
        let metadata = TableMetadata::new(
            self.config.q_learning.clone(),
            self.config.rewards.clone(),
            self.config.grid,
            self.stats.total_episodes(),
            self.exploration_rate,
        );

        match save_table(self.agent.table(), &metadata, &self.config.save_path) {
            Ok(()) => info!(
                path = ?self.config.save_path,
                rows = self.agent.table().len(),
                "table saved"
            ),
            Err(err) => warn!(?err, "failed to save table"),
        }
    }

    fn export_progress(&self) {
        let Some(path) = &self.config.progress_path else {
            return;
        };

        let scores: Vec<usize> = self.records.iter().map(|r| r.score).collect();
        match write_progress_csv(path, &scores) {
            Ok(()) => info!(?path, "progress written"),
            Err(err) => warn!(?err, "failed to write training progress"),
        }
    }

    fn report(&self) -> TrainingReport {
        TrainingReport {
            scores: self.records.iter().map(|r| r.score).collect(),
            episodes: self.records.clone(),
            final_exploration_rate: self.exploration_rate,
            table_size: self.agent.table().len(),
        }
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn agent(&self) -> &QAgent {
        &self.agent
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Print training header information
    fn print_header(&self) {
        let q = &self.config.q_learning;
        let r = &self.config.rewards;

        println!("{}", "=".repeat(70));
        println!("Q-Learning Training - Snake");
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", self.config.num_episodes);
        println!(
            "Grid: {}x{} (cell {})",
            self.config.grid.width, self.config.grid.height, self.config.grid.cell_size
        );
        println!("Q-Learning:");
        println!("  Learning rate: {}", q.learning_rate);
        println!("  Discount factor: {}", q.discount_factor);
        println!(
            "  Exploration: {} (decay {}, floor {})",
            q.exploration_rate, q.exploration_decay, q.min_exploration_rate
        );
        println!("Rewards:");
        println!("  Food: {}", r.food_reward);
        println!("  Death: {}", r.death_penalty);
        println!("  Distance weight: {}", r.distance_reward_weight);
        if let Some(limit) = self.config.max_ticks_per_episode {
            println!("Tick limit: {} per episode", limit);
        }
        println!("Save path: {:?}", self.config.save_path);
        println!("{}", "=".repeat(70));
        println!();
    }
}
