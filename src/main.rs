use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use q_snake::game::GridConfig;
use q_snake::modes::{HumanMode, TrainConfig, TrainMode, VisualizeMode};
use q_snake::render::TrainingView;
use q_snake::rl::{load_table, QLearningConfig, RewardConfig};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file used while the training view owns the terminal
const DISPLAY_LOG_FILE: &str = "training.log";

#[derive(Parser)]
#[command(name = "q_snake")]
#[command(version, about = "Snake game with a tabular Q-learning agent")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "train")]
    mode: Mode,

    /// Number of training episodes
    #[arg(short, long, default_value_t = 1000)]
    episodes: usize,

    /// Render the field while training
    #[arg(short, long)]
    display: bool,

    /// Delay between rendered training ticks, in milliseconds
    #[arg(long, default_value_t = 0)]
    frame_delay_ms: u64,

    /// Field width in coordinate units
    #[arg(long, default_value_t = 400)]
    width: i32,

    /// Field height in coordinate units
    #[arg(long, default_value_t = 300)]
    height: i32,

    /// Cell edge length in coordinate units
    #[arg(long, default_value_t = 10)]
    cell_size: i32,

    /// Seed for food placement and exploration
    #[arg(long)]
    seed: Option<u64>,

    /// End a training episode after this many ticks
    #[arg(long)]
    max_ticks: Option<usize>,

    /// Table file written by training and read by visualize
    #[arg(long, default_value = "snake_q_table.json")]
    table: PathBuf,

    /// CSV file for per-episode training scores
    #[arg(long, default_value = "training_progress.csv")]
    progress: PathBuf,

    /// Continue training from a saved table
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write logs to this file instead of stdout (defaults to training.log
    /// when training with --display)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value_t = QLearningConfig::default().learning_rate)]
    learning_rate: f64,

    #[arg(long, default_value_t = QLearningConfig::default().discount_factor)]
    discount_factor: f64,

    /// Initial exploration rate
    #[arg(long, default_value_t = QLearningConfig::default().exploration_rate)]
    exploration_rate: f64,

    /// Per-episode multiplicative exploration decay
    #[arg(long, default_value_t = QLearningConfig::default().exploration_decay)]
    exploration_decay: f64,

    #[arg(long, default_value_t = QLearningConfig::default().min_exploration_rate)]
    min_exploration_rate: f64,

    #[arg(long, default_value_t = RewardConfig::default().food_reward)]
    food_reward: f64,

    #[arg(long, default_value_t = RewardConfig::default().death_penalty, allow_hyphen_values = true)]
    death_penalty: f64,

    /// Weight of the distance-to-food shaping term
    #[arg(long, default_value_t = RewardConfig::default().distance_reward_weight)]
    distance_reward: f64,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Train a Q-table
    Train,
    /// Play snake with keyboard controls
    Human,
    /// Watch a trained table play
    Visualize,
}

impl Cli {
    fn grid(&self) -> Result<GridConfig> {
        let grid = GridConfig::new(self.width, self.height, self.cell_size);
        grid.validate().map_err(|e| anyhow!(e))?;
        Ok(grid)
    }

    fn train_config(&self) -> Result<TrainConfig> {
        let mut config = TrainConfig::new(self.episodes, self.table.clone());
        config.progress_path = Some(self.progress.clone());
        config.max_ticks_per_episode = self.max_ticks;
        config.seed = self.seed;
        config.grid = self.grid()?;
        config.q_learning = QLearningConfig {
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
            exploration_rate: self.exploration_rate,
            exploration_decay: self.exploration_decay,
            min_exploration_rate: self.min_exploration_rate,
        };
        config.rewards = RewardConfig {
            food_reward: self.food_reward,
            death_penalty: self.death_penalty,
            distance_reward_weight: self.distance_reward,
        };
        config.validate()?;
        Ok(config)
    }

    /// Where logs go; `None` means stdout
    fn log_file(&self) -> Option<PathBuf> {
        match &self.log_file {
            Some(path) => Some(path.clone()),
            None if self.mode == Mode::Train && self.display => {
                Some(PathBuf::from(DISPLAY_LOG_FILE))
            }
            None => None,
        }
    }

    /// Interactive views log only warnings to stdout, which they share
    fn default_log_level(&self) -> &'static str {
        if self.mode == Mode::Train || self.log_file().is_some() {
            "info"
        } else {
            "warn"
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));

    match cli.log_file() {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => fmt().with_env_filter(filter).init(),
    }
    Ok(())
}

fn run_training(cli: &Cli) -> Result<()> {
    let config = cli.train_config()?;

    let mut train_mode = match &cli.resume {
        Some(path) => {
            let table = load_table(path)
                .with_context(|| format!("Failed to resume from {:?}", path))?;
            TrainMode::resume(config, table)
        }
        None => TrainMode::new(config),
    };

    if cli.display {
        let delay = (cli.frame_delay_ms > 0).then(|| Duration::from_millis(cli.frame_delay_ms));
        train_mode = train_mode.with_observer(Box::new(TrainingView::new(delay)));
    }

    train_mode.run()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.mode {
        Mode::Train => run_training(&cli)?,
        Mode::Human => {
            let mut human_mode = HumanMode::new(cli.grid()?, cli.seed);
            human_mode.run().await?;
        }
        Mode::Visualize => {
            let mut visualize_mode = VisualizeMode::load(&cli.table, cli.grid()?, cli.seed)?;
            visualize_mode.run().await?;
        }
    }

    Ok(())
}
