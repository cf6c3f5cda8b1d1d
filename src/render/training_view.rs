use anyhow::Result;
use std::time::Duration;

use super::{Hud, Renderer, TerminalSession};
use crate::game::Environment;
use crate::modes::{TickContext, TickObserver};

/// Draws every training tick to the terminal
///
/// The alternate screen is entered on the first tick, after the trainer has
/// printed its banner. Raw mode stays off so Ctrl+C still interrupts a long
/// run.
pub struct TrainingView {
    session: Option<TerminalSession>,
    renderer: Renderer,
    frame_delay: Option<Duration>,
}

impl TrainingView {
    pub fn new(frame_delay: Option<Duration>) -> Self {
        Self {
            session: None,
            renderer: Renderer::new(),
            frame_delay,
        }
    }
}

impl TickObserver for TrainingView {
    fn on_tick(&mut self, env: &Environment, context: &TickContext) -> Result<()> {
        if self.session.is_none() {
            self.session = Some(TerminalSession::enter(false)?);
        }

        let hud = training_hud(env, context);
        let renderer = &self.renderer;
        if let Some(session) = self.session.as_mut() {
            session.draw(|frame| renderer.render(frame, env, &hud))?;
        }

        if let Some(delay) = self.frame_delay {
            std::thread::sleep(delay);
        }
        Ok(())
    }
}

fn training_hud(env: &Environment, context: &TickContext) -> Hud {
    let hud = Hud::new("Training")
        .stat(
            "Episode",
            format!("{}/{}", context.episode + 1, context.num_episodes),
        )
        .stat("Score", env.score())
        .stat("Tick", context.tick)
        .stat("Avg(10)", format!("{:.1}", context.rolling_score))
        .stat("Epsilon", format!("{:.3}", context.exploration_rate))
        .stat("Reward", format!("{:.1}", context.cumulative_reward))
        .control("Ctrl+C", "abort training");

    match context.last_episode {
        Some(last) => hud.stat(
            "Last",
            format!(
                "score {} in {} ticks, {}",
                last.score,
                last.ticks,
                last.end.as_str()
            ),
        ),
        None => hud,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, GridConfig};
    use crate::modes::{EpisodeEnd, EpisodeRecord};

    fn context(last_episode: Option<EpisodeRecord>) -> TickContext {
        TickContext {
            episode: 4,
            num_episodes: 10,
            tick: 3,
            exploration_rate: 0.5,
            cumulative_reward: -12.25,
            rolling_score: 1.5,
            last_episode,
        }
    }

    #[test]
    fn test_training_hud() {
        let env = Environment::with_seed(GridConfig::small(), 0);

        let hud = training_hud(&env, &context(None));

        assert_eq!(hud.stats[0], ("Episode", "5/10".to_string()));
        assert_eq!(hud.stats[1], ("Score", "0".to_string()));
        assert_eq!(hud.stats[2], ("Tick", "3".to_string()));
        assert_eq!(hud.stats[3], ("Avg(10)", "1.5".to_string()));
        assert_eq!(hud.stats[4], ("Epsilon", "0.500".to_string()));
        assert_eq!(hud.stats[5], ("Reward", "-12.2".to_string()));
        assert_eq!(hud.stats.len(), 6);
    }

    #[test]
    fn test_training_hud_shows_previous_episode() {
        let env = Environment::with_seed(GridConfig::small(), 0);
        let last = EpisodeRecord {
            score: 7,
            cumulative_reward: 310.0,
            ticks: 412,
            end: EpisodeEnd::Collision(CollisionType::Wall),
        };

        let hud = training_hud(&env, &context(Some(last)));

        assert_eq!(
            hud.stats.last(),
            Some(&("Last", "score 7 in 412 ticks, wall".to_string()))
        );
    }

    #[test]
    fn test_terminal_untouched_until_first_tick() {
        let view = TrainingView::new(Some(Duration::from_millis(5)));
        assert!(view.session.is_none());
        assert_eq!(view.frame_delay, Some(Duration::from_millis(5)));
    }
}
