pub mod renderer;
pub mod terminal;
pub mod training_view;

pub use renderer::{Hud, Renderer};
pub use terminal::TerminalSession;
pub use training_view::TrainingView;
