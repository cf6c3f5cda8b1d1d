//! Training statistics tracking
//!
//! Rolling averages over recent episodes plus run-wide totals.

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use q_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(10);
/// stats.record_episode(3, 212.5, 87, false);
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.mean_score(), 3.0);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Episode scores (rolling window)
    episode_scores: VecDeque<usize>,

    /// Cumulative episode rewards (rolling window)
    episode_rewards: VecDeque<f64>,

    /// Episode lengths in ticks (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Total number of episodes completed
    total_episodes: usize,

    /// Total number of ticks taken
    total_ticks: usize,

    /// Episodes cut short by the tick limit
    truncated_episodes: usize,

    /// Best score seen so far
    best_score: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker averaging over the last `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_scores: VecDeque::with_capacity(window_size),
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_ticks: 0,
            truncated_episodes: 0,
            best_score: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    pub fn record_episode(&mut self, score: usize, reward: f64, ticks: usize, truncated: bool) {
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, ticks, self.window_size);
        self.total_episodes += 1;
        self.total_ticks += ticks;
        self.best_score = self.best_score.max(score);
        if truncated {
            self.truncated_episodes += 1;
        }
    }

    /// Mean score over the rolling window, 0.0 before any episode
    pub fn mean_score(&self) -> f64 {
        Self::mean(self.episode_scores.iter().map(|&s| s as f64), self.episode_scores.len())
    }

    /// Mean cumulative reward over the rolling window
    pub fn mean_reward(&self) -> f64 {
        Self::mean(self.episode_rewards.iter().copied(), self.episode_rewards.len())
    }

    /// Mean episode length over the rolling window
    pub fn mean_length(&self) -> f64 {
        Self::mean(self.episode_lengths.iter().map(|&l| l as f64), self.episode_lengths.len())
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_ticks(&self) -> usize {
        self.total_ticks
    }

    pub fn truncated_episodes(&self) -> usize {
        self.truncated_episodes
    }

    pub fn best_score(&self) -> usize {
        self.best_score
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Ticks: {} | Best: {} | Score: {:.2} | Reward: {:.2} | Len: {:.1} | Truncated: {}",
            self.total_episodes,
            self.total_ticks,
            self.best_score,
            self.mean_score(),
            self.mean_reward(),
            self.mean_length(),
            self.truncated_episodes,
        )
    }

    fn mean(values: impl Iterator<Item = f64>, len: usize) -> f64 {
        if len == 0 {
            0.0
        } else {
            values.sum::<f64>() / len as f64
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
