use std::time::{Duration, Instant};

/// Round clock and score tallies for the interactive modes
///
/// The clock runs from [`GameMetrics::start_round`] until the round ends,
/// so the final time stays on screen after a collision.
#[derive(Debug, Clone, Default)]
pub struct GameMetrics {
    round_started: Option<Instant>,
    elapsed: Duration,
    ticks: usize,
    rounds_played: usize,
    high_score: usize,
    total_score: usize,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock of a new round
    pub fn start_round(&mut self) {
        self.round_started = Some(Instant::now());
        self.elapsed = Duration::ZERO;
        self.ticks = 0;
    }

    /// Abandon the current round without counting it
    pub fn clear_round(&mut self) {
        self.round_started = None;
        self.elapsed = Duration::ZERO;
        self.ticks = 0;
    }

    /// Refresh the elapsed time while the clock runs
    pub fn update(&mut self) {
        if let Some(started) = self.round_started {
            self.elapsed = started.elapsed();
        }
    }

    pub fn on_tick(&mut self) {
        self.ticks += 1;
    }

    /// Count a finished round and stop its clock
    pub fn on_round_over(&mut self, final_score: usize) {
        self.update();
        self.round_started = None;
        self.rounds_played += 1;
        self.total_score += final_score;
        self.high_score = self.high_score.max(final_score);
    }

    pub fn is_running(&self) -> bool {
        self.round_started.is_some()
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    pub fn high_score(&self) -> usize {
        self.high_score
    }

    /// Mean final score over finished rounds
    pub fn mean_score(&self) -> f64 {
        if self.rounds_played == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.rounds_played as f64
    }

    /// Elapsed time of the round as `mm:ss`
    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_clock_only_runs_inside_a_round() {
        let mut metrics = GameMetrics::new();
        metrics.update();
        assert!(!metrics.is_running());
        assert_eq!(metrics.elapsed, Duration::ZERO);

        metrics.start_round();
        assert!(metrics.is_running());

        metrics.on_round_over(2);
        assert!(!metrics.is_running());
        let frozen = metrics.elapsed;
        metrics.update();
        assert_eq!(metrics.elapsed, frozen);
    }

    #[test]
    fn test_score_tallies() {
        let mut metrics = GameMetrics::new();
        assert_eq!(metrics.mean_score(), 0.0);

        metrics.on_round_over(10);
        metrics.on_round_over(5);
        assert_eq!(metrics.high_score(), 10);
        assert_eq!(metrics.rounds_played(), 2);
        assert_eq!(metrics.mean_score(), 7.5);

        metrics.on_round_over(15);
        assert_eq!(metrics.high_score(), 15);
    }

    #[test]
    fn test_new_round_resets_ticks_but_keeps_tallies() {
        let mut metrics = GameMetrics::new();
        metrics.start_round();
        metrics.on_tick();
        metrics.on_tick();
        assert_eq!(metrics.ticks(), 2);
        metrics.on_round_over(4);

        metrics.start_round();
        assert_eq!(metrics.ticks(), 0);
        assert_eq!(metrics.high_score(), 4);

        metrics.on_tick();
        metrics.clear_round();
        assert_eq!(metrics.ticks(), 0);
        assert!(!metrics.is_running());
        assert_eq!(metrics.rounds_played(), 1);
    }
}
