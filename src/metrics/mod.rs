pub mod game_metrics;
pub mod progress;
pub mod training_stats;

pub use game_metrics::GameMetrics;
pub use progress::{moving_average, progress_window, write_progress_csv};
pub use training_stats::TrainingStats;
