//! Watch a trained table play
//!
//! Loads a table saved by the training mode and lets the agent play
//! greedily in the terminal. Episodes restart automatically after a
//! collision.
//!
//! # Controls
//!
//! - Space: pause/unpause
//! - +/-: change playback speed
//! - R: reset episode
//! - Q/Esc: quit

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;
use std::time::Duration;
use tokio::time::{interval, Interval};
use tracing::{info, warn};

use crate::game::{Environment, GridConfig};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Hud, Renderer, TerminalSession};
use crate::rl::{encode, load_metadata, load_table, QAgent, QTable, TableMetadata};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// 2 Hz
    Slow,
    /// 8 Hz, same as human play
    Normal,
    /// 20 Hz
    Fast,
    /// 60 Hz
    VeryFast,
}

impl PlaybackSpeed {
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }

    fn faster(&self) -> Self {
        match self {
            Self::Slow => Self::Normal,
            Self::Normal => Self::Fast,
            Self::Fast | Self::VeryFast => Self::VeryFast,
        }
    }

    fn slower(&self) -> Self {
        match self {
            Self::VeryFast => Self::Fast,
            Self::Fast => Self::Normal,
            Self::Normal | Self::Slow => Self::Slow,
        }
    }
}

pub struct VisualizeMode {
    agent: QAgent,
    env: Environment,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
    episode_count: usize,
    metrics: GameMetrics,
}

impl VisualizeMode {
    /// Load a saved table and prepare playback
    ///
    /// The grid comes from the table's metadata when present, so the agent
    /// plays on the field it was trained on; `fallback_grid` is used
    /// otherwise.
    pub fn load(table_path: &Path, fallback_grid: GridConfig, seed: Option<u64>) -> Result<Self> {
        let table = load_table(table_path)
            .with_context(|| format!("Failed to load table from {:?}", table_path))?;

        let grid = match load_metadata(table_path) {
            Ok(metadata) => {
                print_banner(table_path, &table, &metadata);
                metadata.grid
            }
            Err(err) => {
                warn!(?err, "no table metadata, using the configured grid");
                fallback_grid
            }
        };

        Ok(Self::new(table, grid, seed))
    }

    pub fn new(table: QTable, grid: GridConfig, seed: Option<u64>) -> Self {
        let (env, rng) = match seed {
            Some(seed) => (
                Environment::with_seed(grid, seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (Environment::new(grid), StdRng::from_entropy()),
        };

        let mut metrics = GameMetrics::new();
        metrics.start_round();

        Self {
            agent: QAgent::with_table(table, rng),
            env,
            renderer: Renderer::new(),
            input_handler: InputHandler::playback(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
            episode_count: 0,
            metrics,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::enter(true)?;
        let result = self.run_playback_loop(&mut session).await;
        session.restore()?;

        info!(
            episodes = self.metrics.rounds_played(),
            best_score = self.metrics.high_score(),
            mean_score = format_args!("{:.2}", self.metrics.mean_score()),
            "playback finished"
        );
        result
    }

    async fn run_playback_loop(&mut self, session: &mut TerminalSession) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.advance();
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let hud = self.hud();
                    let (renderer, env) = (&self.renderer, &self.env);
                    session.draw(|frame| renderer.render(frame, env, &hud))?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// One playback tick: greedy move, or restart after a collision
    fn advance(&mut self) {
        if self.env.is_terminated() {
            self.restart_episode();
            return;
        }

        let state = encode(&self.env);
        let action = self.agent.select_action(state, 0.0);
        let result = self.env.step(action.apply(self.env.heading()));
        self.metrics.on_tick();

        if result.terminated {
            self.metrics.on_round_over(self.env.score());
        }
    }

    /// Start the next episode; an unfinished one is not counted
    fn restart_episode(&mut self) {
        self.env.reset();
        self.episode_count += 1;
        self.metrics.start_round();
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::TogglePause => self.paused = !self.paused,
            KeyAction::Restart => self.restart_episode(),
            KeyAction::SpeedUp => self.change_speed(self.speed.faster(), tick_timer),
            KeyAction::SlowDown => self.change_speed(self.speed.slower(), tick_timer),
            KeyAction::Steer(_) | KeyAction::None => {}
        }
    }

    fn change_speed(&mut self, speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = speed;
        *tick_timer = interval(speed.tick_interval());
    }

    fn hud(&self) -> Hud {
        let hud = Hud::new("Trained agent")
            .stat("Episode", self.episode_count + 1)
            .stat("Score", self.env.score())
            .stat("Speed", self.speed.as_str())
            .round_stats(&self.metrics)
            .control("Space", "pause")
            .control("+/-", "speed")
            .control("R", "reset")
            .control("Q", "quit");

        if self.paused {
            hud.stat("Status", "PAUSED")
        } else {
            hud
        }
    }
}

fn print_banner(table_path: &Path, table: &QTable, metadata: &TableMetadata) {
    println!("{}", "=".repeat(60));
    println!("Loaded Table Information");
    println!("{}", "=".repeat(60));
    println!("Table path: {:?}", table_path);
    println!("States learned: {}", table.len());
    println!("Episodes trained: {}", metadata.episodes_trained);
    println!("Final exploration rate: {:.4}", metadata.exploration_rate);
    println!(
        "Grid: {}x{} (cell {})",
        metadata.grid.width, metadata.grid.height, metadata.grid.cell_size
    );
    println!("Version: {}", metadata.version);
    println!("{}", "=".repeat(60));
    println!();
}
