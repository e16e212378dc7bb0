//! Window-independent input events.
//!
//! The application shell translates winit events into [`InputEvent`]s and
//! batches one frame's worth of them into an [`InputFrame`] together with the
//! modifier state sampled for that frame. Everything downstream, the
//! [`InteractionController`] included, only sees these types.

pub mod controller;

pub use controller::{ControllerAction, DragOp, InteractionController, ModeFlags, ScrollOp};

use winit::keyboard::KeyCode;

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Hold for rotate mode
    R,
    /// Hold for translate mode
    T,
    /// Hold for shear mode
    H,
    /// Toggle the overview viewport
    O,
    S,
    L,
    Tab,
    Delete,
    /// Number row `1`..`6`
    Digit(u8),
}

impl Key {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        let key = match code {
            KeyCode::KeyR => Key::R,
            KeyCode::KeyT => Key::T,
            KeyCode::KeyH => Key::H,
            KeyCode::KeyO => Key::O,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyL => Key::L,
            KeyCode::Tab => Key::Tab,
            KeyCode::Delete | KeyCode::Backspace => Key::Delete,
            KeyCode::Digit1 | KeyCode::Numpad1 => Key::Digit(1),
            KeyCode::Digit2 | KeyCode::Numpad2 => Key::Digit(2),
            KeyCode::Digit3 | KeyCode::Numpad3 => Key::Digit(3),
            KeyCode::Digit4 | KeyCode::Numpad4 => Key::Digit(4),
            KeyCode::Digit5 | KeyCode::Numpad5 => Key::Digit(5),
            KeyCode::Digit6 | KeyCode::Numpad6 => Key::Digit(6),
            _ => return None,
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

impl WheelDirection {
    /// `+1` for up, `-1` for down
    pub fn sign(self) -> f32 {
        match self {
            WheelDirection::Up => 1.0,
            WheelDirection::Down => -1.0,
        }
    }

    /// Direction of a raw wheel delta, `None` for a zero delta
    pub fn from_delta(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(WheelDirection::Up)
        } else if delta < 0.0 {
            Some(WheelDirection::Down)
        } else {
            None
        }
    }
}

/// Keyboard modifiers held during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}

/// Pointer coordinates are window pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown { button: MouseButton, x: f32, y: f32 },
    MouseUp { button: MouseButton, x: f32, y: f32 },
    MouseMotion { x: f32, y: f32 },
    /// One wheel notch
    Scroll(WheelDirection),
}

/// Events collected between two frames
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub modifiers: Modifiers,
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn new(modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Empties the event list, keeping the current modifier state.
    pub fn take(&mut self) -> InputFrame {
        InputFrame {
            modifiers: self.modifiers,
            events: std::mem::take(&mut self.events),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_map_to_editor_keys() {
        assert_eq!(Key::from_key_code(KeyCode::KeyR), Some(Key::R));
        assert_eq!(Key::from_key_code(KeyCode::Numpad4), Some(Key::Digit(4)));
        assert_eq!(Key::from_key_code(KeyCode::Digit7), None);
        assert_eq!(Key::from_key_code(KeyCode::KeyQ), None);
        // Quitting is handled by the window, not the editor
        assert_eq!(Key::from_key_code(KeyCode::Escape), None);
    }

    #[test]
    fn wheel_direction_from_delta() {
        assert_eq!(WheelDirection::from_delta(2.5), Some(WheelDirection::Up));
        assert_eq!(WheelDirection::from_delta(-0.1), Some(WheelDirection::Down));
        assert_eq!(WheelDirection::from_delta(0.0), None);
    }

    #[test]
    fn take_keeps_modifiers() {
        let mut frame = InputFrame::new(Modifiers::shift()).with_event(InputEvent::KeyDown(Key::T));
        let taken = frame.take();
        assert_eq!(taken.events.len(), 1);
        assert!(frame.is_empty());
        assert_eq!(frame.modifiers, Modifiers::shift());
    }
}
