use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::Environment;
use crate::metrics::GameMetrics;

/// Heads-up display shown around the field
#[derive(Debug, Clone, Default)]
pub struct Hud {
    /// Title on the field border
    pub title: String,
    /// Labelled values in the header
    pub stats: Vec<(&'static str, String)>,
    /// Key/description pairs in the footer
    pub controls: Vec<(&'static str, &'static str)>,
    /// Hint shown under the game-over banner
    pub game_over_hint: Option<&'static str>,
}

impl Hud {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn stat(mut self, label: &'static str, value: impl ToString) -> Self {
        self.stats.push((label, value.to_string()));
        self
    }

    pub fn control(mut self, key: &'static str, description: &'static str) -> Self {
        self.controls.push((key, description));
        self
    }

    pub fn game_over_hint(mut self, hint: &'static str) -> Self {
        self.game_over_hint = Some(hint);
        self
    }

    /// Round clock, tick count and score tallies of an interactive session
    pub fn round_stats(self, metrics: &GameMetrics) -> Self {
        self.stat("Ticks", metrics.ticks())
            .stat("Time", metrics.format_time())
            .stat("High Score", metrics.high_score())
            .stat("Avg", format!("{:.1}", metrics.mean_score()))
    }
}

/// Draws an environment as a grid of cells; never mutates it
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, env: &Environment, hud: &Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Field
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(hud), chunks[0]);

        let field_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if env.is_terminated() {
            frame.render_widget(self.render_game_over(env, hud), field_area);
        } else {
            frame.render_widget(self.render_field(env, hud), field_area);
        }

        frame.render_widget(self.render_controls(hud), chunks[2]);
    }

    fn render_field(&self, env: &Environment, hud: &Hud) -> Paragraph<'_> {
        let config = env.config();
        let state = env.state();
        let head = state.head();

        let lines: Vec<Line> = (0..config.rows())
            .map(|row| {
                let spans: Vec<Span> = (0..config.columns())
                    .map(|col| {
                        let pos = config.cell(col, row);
                        if pos == head {
                            Span::styled(
                                "■ ",
                                Style::default()
                                    .fg(Color::White)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else if state.collides_with_body(pos) {
                            Span::styled("□ ", Style::default().fg(Color::Green))
                        } else if pos == state.food {
                            Span::styled(
                                "● ",
                                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::styled(". ", Style::default().fg(Color::DarkGray))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::Blue))
                    .title(format!(" {} ", hud.title)),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, hud: &Hud) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for (i, (label, value)) in hud.stats.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("    "));
            }
            spans.push(Span::styled(
                format!("{label}: "),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::styled(
                value.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, env: &Environment, hud: &Hud) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    env.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if let Some(hint) = hud.game_over_hint {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(hint, Style::default().fg(Color::Gray))));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, hud: &Hud) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for (i, (key, description)) in hud.controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {description}")));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GridConfig, Heading, Position, SnakeState};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_hud_builder() {
        let hud = Hud::new("Training")
            .stat("Score", 3)
            .control("Q", "quit")
            .game_over_hint("press R");
        assert_eq!(hud.stats, vec![("Score", "3".to_string())]);
        assert_eq!(hud.controls, vec![("Q", "quit")]);
        assert_eq!(hud.game_over_hint, Some("press R"));
    }

    #[test]
    fn test_round_stats() {
        let mut metrics = GameMetrics::new();
        metrics.start_round();
        metrics.on_tick();
        metrics.on_tick();
        metrics.on_round_over(3);

        let hud = Hud::new("Snake").round_stats(&metrics);

        let labels: Vec<_> = hud.stats.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["Ticks", "Time", "High Score", "Avg"]);
        assert_eq!(hud.stats[0].1, "2");
        assert_eq!(hud.stats[2].1, "3");
        assert_eq!(hud.stats[3].1, "3.0");
    }

    #[test]
    fn test_renders_snake_and_food() {
        let env = Environment::from_state(
            GridConfig::small(),
            SnakeState::with_body(
                vec![Position::new(30, 30), Position::new(40, 30)],
                Heading::Right,
                Position::new(70, 50),
            )
            .unwrap(),
            0,
        );
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let hud = Hud::new("Snake").stat("Score", env.score());

        terminal
            .draw(|frame| Renderer::new().render(frame, &env, &hud))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains('■'));
        assert!(text.contains('□'));
        assert!(text.contains('●'));
        assert!(text.contains("Score: 1"));
    }

    #[test]
    fn test_renders_game_over() {
        let mut env = Environment::from_state(
            GridConfig::small(),
            SnakeState::new(Position::new(0, 0), Heading::Up, Position::new(70, 50)),
            0,
        );
        env.step(Heading::Up);
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        terminal
            .draw(|frame| Renderer::new().render(frame, &env, &Hud::new("Snake")))
            .unwrap();

        assert!(buffer_text(&terminal).contains("GAME OVER"));
    }
}
