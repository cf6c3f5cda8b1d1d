pub mod human;
pub mod train;
pub mod visualize;

pub use human::HumanMode;
pub use train::{
    EpisodeEnd, EpisodeRecord, TickContext, TickObserver, TrainConfig, TrainMode, TrainingReport,
};
pub use visualize::{PlaybackSpeed, VisualizeMode};
