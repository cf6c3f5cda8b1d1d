use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Heading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Heading),
    TogglePause,
    SpeedUp,
    SlowDown,
    Restart,
    Quit,
    None,
}

/// Which keys a screen listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bindings {
    /// Keyboard play: direction keys steer
    Play,
    /// Watching an agent: playback controls, direction keys ignored
    Playback,
}

/// Maps key events to actions for one set of [`Bindings`]
///
/// Restart and quit are bound everywhere.
pub struct InputHandler {
    bindings: Bindings,
}

impl InputHandler {
    pub fn new(bindings: Bindings) -> Self {
        Self { bindings }
    }

    pub fn play() -> Self {
        Self::new(Bindings::Play)
    }

    pub fn playback() -> Self {
        Self::new(Bindings::Playback)
    }

    pub fn bindings(&self) -> Bindings {
        self.bindings
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => return KeyAction::Restart,
            _ => {}
        }

        match self.bindings {
            Bindings::Play => steering(key.code).map_or(KeyAction::None, KeyAction::Steer),
            Bindings::Playback => playback(key.code),
        }
    }
}

/// Arrow keys and WASD, either case
fn steering(code: KeyCode) -> Option<Heading> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Heading::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Heading::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Heading::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Heading::Right),
        _ => None,
    }
}

fn playback(code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Char(' ') => KeyAction::TogglePause,
        KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::SpeedUp,
        KeyCode::Char('-') | KeyCode::Char('_') => KeyAction::SlowDown,
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(handler: &InputHandler, code: KeyCode) -> KeyAction {
        handler.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_steering_keys() {
        let handler = InputHandler::play();
        let cases = [
            (KeyCode::Up, Heading::Up),
            (KeyCode::Down, Heading::Down),
            (KeyCode::Left, Heading::Left),
            (KeyCode::Right, Heading::Right),
            (KeyCode::Char('w'), Heading::Up),
            (KeyCode::Char('a'), Heading::Left),
            (KeyCode::Char('s'), Heading::Down),
            (KeyCode::Char('d'), Heading::Right),
        ];

        for (code, heading) in cases {
            assert_eq!(press(&handler, code), KeyAction::Steer(heading), "{code:?}");
        }

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::Steer(Heading::Up)
        );
    }

    #[test]
    fn test_play_ignores_playback_keys() {
        let handler = InputHandler::play();
        for code in [KeyCode::Char(' '), KeyCode::Char('+'), KeyCode::Char('-')] {
            assert_eq!(press(&handler, code), KeyAction::None);
        }
    }

    #[test]
    fn test_playback_keys() {
        let handler = InputHandler::playback();
        assert_eq!(handler.bindings(), Bindings::Playback);

        assert_eq!(press(&handler, KeyCode::Char(' ')), KeyAction::TogglePause);
        assert_eq!(press(&handler, KeyCode::Char('+')), KeyAction::SpeedUp);
        assert_eq!(press(&handler, KeyCode::Char('=')), KeyAction::SpeedUp);
        assert_eq!(press(&handler, KeyCode::Char('-')), KeyAction::SlowDown);

        // The agent steers during playback
        assert_eq!(press(&handler, KeyCode::Up), KeyAction::None);
        assert_eq!(press(&handler, KeyCode::Char('d')), KeyAction::None);
    }

    #[test]
    fn test_shared_keys() {
        for handler in [InputHandler::play(), InputHandler::playback()] {
            assert_eq!(press(&handler, KeyCode::Char('q')), KeyAction::Quit);
            assert_eq!(press(&handler, KeyCode::Esc), KeyAction::Quit);
            assert_eq!(press(&handler, KeyCode::Char('r')), KeyAction::Restart);
            assert_eq!(press(&handler, KeyCode::Char('x')), KeyAction::None);

            let r_upper = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
            assert_eq!(handler.handle_key_event(r_upper), KeyAction::Restart);

            let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
            assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
        }
    }
}
