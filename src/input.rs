//! Input state fed by the host
//!
//! Platform code updates this on key and mouse events; the running phase
//! reads it once per frame and the driver calls [`InputState::end_frame`]
//! after the update.

use glam::Vec2;

/// Logical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl InputAction {
    pub const ALL: [InputAction; 5] = [
        InputAction::Up,
        InputAction::Down,
        InputAction::Left,
        InputAction::Right,
        InputAction::Fire,
    ];

    /// Default mapping from host key names
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" => Some(InputAction::Up),
            "a" => Some(InputAction::Left),
            "s" => Some(InputAction::Down),
            "d" => Some(InputAction::Right),
            "rmb" => Some(InputAction::Fire),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub down: bool,
    /// Pressed since the last `end_frame`
    pub just_pressed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorState {
    /// Last absolute position relative to the canvas
    pub position: Vec2,
    /// Motion accumulated since the last `end_frame`
    pub delta: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    buttons: [KeyState; 5],
    pub cursor: CursorState,
}

impl InputState {
    pub fn button(&self, action: InputAction) -> KeyState {
        self.buttons[action.index()]
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.button(action).down
    }

    pub fn just_pressed(&self, action: InputAction) -> bool {
        self.button(action).just_pressed
    }

    pub fn press(&mut self, action: InputAction) {
        let state = &mut self.buttons[action.index()];
        state.down = true;
        state.just_pressed = true;
    }

    pub fn release(&mut self, action: InputAction) {
        self.buttons[action.index()].down = false;
    }

    /// Returns false for unmapped keys
    pub fn key_down(&mut self, key: &str) -> bool {
        match InputAction::from_key(key) {
            Some(action) => {
                self.press(action);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match InputAction::from_key(key) {
            Some(action) => {
                self.release(action);
                true
            }
            None => false,
        }
    }

    /// Absolute cursor move; the difference is added to `delta`
    pub fn cursor_moved(&mut self, position: Vec2) {
        self.cursor.delta += position - self.cursor.position;
        self.cursor.position = position;
    }

    /// Relative cursor motion (pointer lock)
    pub fn cursor_moved_by(&mut self, delta: Vec2) {
        self.cursor.delta += delta;
    }

    pub fn end_frame(&mut self) {
        for button in &mut self.buttons {
            button.just_pressed = false;
        }
        self.cursor.delta = Vec2::ZERO;
    }
}
