use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::game::{Environment, GridConfig, Heading};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Hud, Renderer, TerminalSession};

/// Key presses kept for later ticks; further presses are dropped
const KEY_BUFFER_CAPACITY: usize = 4;

/// Keyboard-controlled play in the terminal
///
/// The snake stays still until the first direction key is pressed. Direction
/// keys are queued and applied one per tick, so two quick presses make two
/// turns.
pub struct HumanMode {
    env: Environment,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    key_buffer: VecDeque<Heading>,
    started: bool,
}

impl HumanMode {
    pub fn new(config: GridConfig, seed: Option<u64>) -> Self {
        let env = match seed {
            Some(seed) => Environment::with_seed(config, seed),
            None => Environment::new(config),
        };

        Self {
            env,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::play(),
            should_quit: false,
            key_buffer: VecDeque::with_capacity(KEY_BUFFER_CAPACITY),
            started: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::enter(true)?;
        let result = self.run_game_loop(&mut session).await;
        session.restore()?;

        info!(
            rounds = self.metrics.rounds_played(),
            high_score = self.metrics.high_score(),
            "human session finished"
        );
        result
    }

    async fn run_game_loop(&mut self, session: &mut TerminalSession) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks at 8 Hz (125ms per tick)
        let mut tick_timer = interval(Duration::from_millis(125));

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
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

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(heading) => self.steer(heading),
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::TogglePause | KeyAction::SpeedUp | KeyAction::SlowDown => {}
            KeyAction::None => {}
        }
    }

    fn steer(&mut self, heading: Heading) {
        if !self.started {
            self.started = true;
            self.metrics.start_round();
        }
        if self.key_buffer.len() < KEY_BUFFER_CAPACITY {
            self.key_buffer.push_back(heading);
        }
    }

    fn update_game(&mut self) {
        if !self.started || self.env.is_terminated() {
            return;
        }

        let heading = self.key_buffer.pop_front().unwrap_or(self.env.heading());
        let result = self.env.step(heading);
        self.metrics.on_tick();

        if result.terminated {
            self.metrics.on_round_over(self.env.score());
        }
    }

    fn reset_game(&mut self) {
        self.env.reset();
        self.metrics.clear_round();
        self.key_buffer.clear();
        self.started = false;
    }

    fn hud(&self) -> Hud {
        let hud = Hud::new("Snake")
            .stat("Score", self.env.score())
            .stat("Length", self.env.state().len())
            .round_stats(&self.metrics)
            .control("Arrows/WASD", "move")
            .control("R", "restart")
            .control("Q", "quit")
            .game_over_hint("Press R to restart or Q to quit");

        if self.started {
            hud
        } else {
            hud.stat("Status", "press a direction key")
        }
    }
}
