pub mod handler;

pub use handler::{Bindings, InputHandler, KeyAction};
