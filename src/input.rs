//! Key bindings and per-frame key state with rising-edge detection.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key does. Arrow keys and vim keys share the same actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    Restart,
    Quit,
    None,
}

/// Map key event to action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if code == KeyCode::Char('c') && modifiers == KeyModifiers::CONTROL {
        return Action::Quit;
    }
    if !modifiers.is_empty() && modifiers != KeyModifiers::SHIFT {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k') => Action::Rotate,
        KeyCode::Down | KeyCode::Char('j') => Action::SoftDrop,
        KeyCode::Enter | KeyCode::Char(' ') => Action::HardDrop,
        _ => Action::None,
    }
}

/// Pressed/released state of the five game keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keys {
    pub left: bool,
    pub right: bool,
    pub rotate: bool,
    pub soft_drop: bool,
    pub hard_drop: bool,
}

impl Keys {
    fn slot(&mut self, action: Action) -> Option<&mut bool> {
        match action {
            Action::MoveLeft => Some(&mut self.left),
            Action::MoveRight => Some(&mut self.right),
            Action::Rotate => Some(&mut self.rotate),
            Action::SoftDrop => Some(&mut self.soft_drop),
            Action::HardDrop => Some(&mut self.hard_drop),
            Action::Restart | Action::Quit | Action::None => None,
        }
    }

    /// Keys down now that were up in `previous`.
    pub fn rising_since(&self, previous: &Self) -> Self {
        Self {
            left: self.left && !previous.left,
            right: self.right && !previous.right,
            rotate: self.rotate && !previous.rotate,
            soft_drop: self.soft_drop && !previous.soft_drop,
            hard_drop: self.hard_drop && !previous.hard_drop,
        }
    }
}

/// Held keys plus the rising edges latched during the current frame.
///
/// With release reporting, keys stay down from their press event until their
/// release event. Without it every press event stands for a release followed by
/// a press, so each press (including OS auto-repeat) produces one rising edge.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: Keys,
    edges: Keys,
    release_events: bool,
}

impl InputState {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            ..Self::default()
        }
    }

    /// Builds a state directly from two snapshots.
    pub fn from_snapshots(previous: Keys, current: Keys) -> Self {
        Self {
            current,
            edges: current.rising_since(&previous),
            release_events: true,
        }
    }

    /// Starts a new frame: held keys carry over, edges are cleared.
    pub fn begin_frame(&mut self) {
        if !self.release_events {
            self.current = Keys::default();
        }
        self.edges = Keys::default();
    }

    /// Feeds one terminal key event into the current snapshot.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = key_to_action(key);
        let pressed = match key.kind {
            KeyEventKind::Press => true,
            KeyEventKind::Release => false,
            KeyEventKind::Repeat => return,
        };
        let Some(slot) = self.current.slot(action) else {
            return;
        };
        // Compared against the state as it stands mid-frame, so release then
        // press inside one frame still fires. Latched until the next frame.
        let rising = pressed && !*slot;
        *slot = pressed;
        if rising {
            if let Some(edge) = self.edges.slot(action) {
                *edge = true;
            }
        }
    }

    /// Rising edges this frame.
    pub fn edges(&self) -> Keys {
        self.edges
    }

    pub fn held(&self) -> Keys {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_key_mapping() {
        let press = |code| key_to_action(event(code, KeyEventKind::Press));
        assert_eq!(press(KeyCode::Left), Action::MoveLeft);
        assert_eq!(press(KeyCode::Char('l')), Action::MoveRight);
        assert_eq!(press(KeyCode::Up), Action::Rotate);
        assert_eq!(press(KeyCode::Char('j')), Action::SoftDrop);
        assert_eq!(press(KeyCode::Char(' ')), Action::HardDrop);
        assert_eq!(press(KeyCode::Esc), Action::Quit);
        assert_eq!(press(KeyCode::Char('x')), Action::None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Action::Quit);
    }

    #[test]
    fn test_held_key_fires_once_with_release_events() {
        let mut input = InputState::new(true);
        input.begin_frame();
        input.handle_key(event(KeyCode::Left, KeyEventKind::Press));
        assert!(input.edges().left);

        input.begin_frame();
        assert!(input.held().left);
        assert!(!input.edges().left);

        input.begin_frame();
        input.handle_key(event(KeyCode::Left, KeyEventKind::Release));
        assert!(!input.held().left);
        assert!(!input.edges().left);

        input.begin_frame();
        input.handle_key(event(KeyCode::Left, KeyEventKind::Press));
        assert!(input.edges().left);
    }

    #[test]
    fn test_release_and_press_within_one_frame_fires() {
        let mut input = InputState::new(true);
        input.begin_frame();
        input.handle_key(event(KeyCode::Down, KeyEventKind::Press));
        input.begin_frame();
        assert!(input.held().soft_drop);

        input.begin_frame();
        input.handle_key(event(KeyCode::Down, KeyEventKind::Release));
        input.handle_key(event(KeyCode::Down, KeyEventKind::Press));
        assert!(input.edges().soft_drop);
        assert!(input.held().soft_drop);
    }

    #[test]
    fn test_tap_within_one_frame_still_fires() {
        let mut input = InputState::new(true);
        input.begin_frame();
        input.handle_key(event(KeyCode::Up, KeyEventKind::Press));
        input.handle_key(event(KeyCode::Up, KeyEventKind::Release));
        assert!(input.edges().rotate);
        assert!(!input.held().rotate);
    }

    #[test]
    fn test_each_press_fires_without_release_events() {
        let mut input = InputState::new(false);
        for _ in 0..3 {
            input.begin_frame();
            input.handle_key(event(KeyCode::Down, KeyEventKind::Press));
            assert!(input.edges().soft_drop);
        }
        input.begin_frame();
        assert!(!input.edges().soft_drop);
    }

    #[test]
    fn test_from_snapshots() {
        let previous = Keys {
            left: true,
            ..Keys::default()
        };
        let current = Keys {
            left: true,
            hard_drop: true,
            ..Keys::default()
        };
        let edges = InputState::from_snapshots(previous, current).edges();
        assert!(!edges.left);
        assert!(edges.hard_drop);
    }
}
