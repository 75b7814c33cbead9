use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// What a terminal event asks the front-end to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Steer(Direction),
    /// Left click at a terminal position; mapped onto the board by the caller
    Tap { column: u16, row: u16 },
    Restart,
    Pause,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }
        if let Some(direction) = steering_key(key.code) {
            return InputAction::Steer(direction);
        }

        match key.code {
            KeyCode::Esc => InputAction::Quit,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => InputAction::Quit,
                'r' => InputAction::Restart,
                ' ' | 'p' => InputAction::Pause,
                _ => InputAction::None,
            },
            _ => InputAction::None,
        }
    }

    /// Only a left press counts; drags and releases would re-steer mid-gesture
    pub fn handle_mouse_event(&self, mouse: MouseEvent) -> InputAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InputAction::Tap {
                column: mouse.column,
                row: mouse.row,
            },
            _ => InputAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Arrow keys and WASD, either case
fn steering_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        },
        _ => None,
    }
}
