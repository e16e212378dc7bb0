//! Interaction state machine.
//!
//! Two kinds of state drive the editor's input handling:
//!
//! - modifier flags (`ctrl`, `shift`, `alt`), sampled fresh every frame;
//! - mode flags (rotate, translate, shear), latched while `R`, `T` or `H` is
//!   held down.
//!
//! The controller turns events into small commands ([`ScrollOp`], [`DragOp`],
//! [`ControllerAction`]) and leaves applying them to the scene. The pure
//! helpers [`ModeFlags::apply_key`] and [`resolve_scroll`] carry the
//! transition rules.

use crate::config::InteractionSettings;
use crate::gfx::camera::CameraPreset;
use crate::gfx::scene::{Axis, ShearPlane};

use super::{Key, Modifiers, MouseButton, WheelDirection};

/// Transform modes latched by key down / key up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub rotate: bool,
    pub translate: bool,
    pub shear: bool,
}

impl ModeFlags {
    /// Updates the flag bound to `key`. Returns whether `key` is a mode key.
    pub fn apply_key(&mut self, key: Key, pressed: bool) -> bool {
        match key {
            Key::R => self.rotate = pressed,
            Key::T => self.translate = pressed,
            Key::H => self.shear = pressed,
            _ => return false,
        }
        true
    }
}

/// One transform applied to every selected object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOp {
    Rotate(Axis, f32),
    Translate(Axis, f32),
    Scale(Axis, f32),
    ScaleUniform(f32),
    Shear(ShearPlane, f32),
}

/// Resolves one wheel notch into the operations for the selected objects.
///
/// Every held modifier contributes an operation along its axis (ctrl X,
/// shift Y, alt Z). Per axis the priority is shear (ctrl only) > rotate >
/// translate > scale. With no modifier held the notch scales uniformly.
pub fn resolve_scroll(
    modes: ModeFlags,
    modifiers: Modifiers,
    direction: WheelDirection,
    steps: &InteractionSettings,
) -> Vec<ScrollOp> {
    let sign = direction.sign();
    if !modifiers.any() {
        return vec![ScrollOp::ScaleUniform(sign * steps.scale_step)];
    }

    let held = [
        (modifiers.ctrl, Axis::X),
        (modifiers.shift, Axis::Y),
        (modifiers.alt, Axis::Z),
    ];
    held.into_iter()
        .filter(|(down, _)| *down)
        .map(|(_, axis)| {
            if modes.shear && axis == Axis::X {
                ScrollOp::Shear(ShearPlane::Xy, sign * steps.shear_step)
            } else if modes.rotate {
                ScrollOp::Rotate(axis, sign * steps.rotate_step)
            } else if modes.translate {
                ScrollOp::Translate(axis, sign * steps.translate_step)
            } else {
                ScrollOp::Scale(axis, sign * steps.scale_step)
            }
        })
        .collect()
}

/// Camera movement produced by dragging, deltas in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOp {
    Orbit { dx: f32, dy: f32 },
    Pan { dx: f32, dy: f32 },
}

/// Non-transform commands triggered from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerAction {
    CameraPreset(CameraPreset),
    ToggleOverview,
    ToggleSidebar,
    DeleteSelected,
    SaveScene,
    ReloadScene,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    button: MouseButton,
    last: [f32; 2],
}

#[derive(Debug, Default)]
pub struct InteractionController {
    modes: ModeFlags,
    modifiers: Modifiers,
    anchor: Option<DragAnchor>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples the modifier state for this frame.
    pub fn begin_frame(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn modes(&self) -> ModeFlags {
        self.modes
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn key(&mut self, key: Key, pressed: bool) -> Option<ControllerAction> {
        if self.modes.apply_key(key, pressed) {
            log::trace!("Mode flags now {:?}", self.modes);
            return None;
        }
        if !pressed {
            return None;
        }

        match key {
            Key::Digit(n) => CameraPreset::from_number(n).map(ControllerAction::CameraPreset),
            Key::O => Some(ControllerAction::ToggleOverview),
            Key::Tab => Some(ControllerAction::ToggleSidebar),
            Key::Delete => Some(ControllerAction::DeleteSelected),
            Key::S if self.modifiers.ctrl => Some(ControllerAction::SaveScene),
            Key::L if self.modifiers.ctrl => Some(ControllerAction::ReloadScene),
            _ => None,
        }
    }

    /// Records the drag anchor for a button press.
    pub fn press(&mut self, button: MouseButton, x: f32, y: f32) {
        self.anchor = Some(DragAnchor {
            button,
            last: [x, y],
        });
    }

    pub fn release(&mut self) {
        self.anchor = None;
    }

    /// Converts pointer motion into a camera drag while a button is held.
    pub fn drag(&mut self, x: f32, y: f32) -> Option<DragOp> {
        let anchor = self.anchor.as_mut()?;
        let dx = x - anchor.last[0];
        let dy = y - anchor.last[1];
        anchor.last = [x, y];

        Some(match anchor.button {
            MouseButton::Left => DragOp::Orbit { dx, dy },
            MouseButton::Right => DragOp::Pan { dx, dy },
        })
    }

    pub fn scroll(&self, direction: WheelDirection, steps: &InteractionSettings) -> Vec<ScrollOp> {
        resolve_scroll(self.modes, self.modifiers, direction, steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> InteractionSettings {
        InteractionSettings::default()
    }

    #[test]
    fn mode_keys_latch_while_held() {
        let mut modes = ModeFlags::default();
        assert!(modes.apply_key(Key::R, true));
        assert!(modes.rotate);
        assert!(modes.apply_key(Key::T, true));
        assert!(modes.apply_key(Key::R, false));
        assert_eq!(
            modes,
            ModeFlags {
                rotate: false,
                translate: true,
                shear: false
            }
        );
        assert!(!modes.apply_key(Key::O, true));
    }

    #[test]
    fn ctrl_without_mode_scales_x() {
        let ops = resolve_scroll(ModeFlags::default(), Modifiers::ctrl(), WheelDirection::Up, &steps());
        assert_eq!(ops, vec![ScrollOp::Scale(Axis::X, 0.05)]);
    }

    #[test]
    fn no_modifier_scales_uniformly() {
        let ops = resolve_scroll(ModeFlags::default(), Modifiers::NONE, WheelDirection::Down, &steps());
        assert_eq!(ops, vec![ScrollOp::ScaleUniform(-0.05)]);
    }

    #[test]
    fn rotate_beats_translate() {
        let modes = ModeFlags {
            rotate: true,
            translate: true,
            shear: false,
        };
        let ops = resolve_scroll(modes, Modifiers::alt(), WheelDirection::Up, &steps());
        assert_eq!(ops, vec![ScrollOp::Rotate(Axis::Z, 5.0)]);
    }

    #[test]
    fn shear_applies_to_ctrl_only() {
        let modes = ModeFlags {
            rotate: true,
            translate: false,
            shear: true,
        };
        let modifiers = Modifiers {
            ctrl: true,
            shift: true,
            alt: false,
        };
        let ops = resolve_scroll(modes, modifiers, WheelDirection::Down, &steps());
        assert_eq!(
            ops,
            vec![
                ScrollOp::Shear(ShearPlane::Xy, -0.05),
                ScrollOp::Rotate(Axis::Y, -5.0),
            ]
        );
    }

    #[test]
    fn translate_along_shift_axis() {
        let modes = ModeFlags {
            translate: true,
            ..ModeFlags::default()
        };
        let ops = resolve_scroll(modes, Modifiers::shift(), WheelDirection::Up, &steps());
        assert_eq!(ops, vec![ScrollOp::Translate(Axis::Y, 0.1)]);
    }

    #[test]
    fn drag_follows_anchor_button() {
        let mut controller = InteractionController::new();
        assert_eq!(controller.drag(5.0, 5.0), None);

        controller.press(MouseButton::Left, 10.0, 10.0);
        assert_eq!(controller.drag(13.0, 8.0), Some(DragOp::Orbit { dx: 3.0, dy: -2.0 }));
        assert_eq!(controller.drag(14.0, 8.0), Some(DragOp::Orbit { dx: 1.0, dy: 0.0 }));

        controller.release();
        assert!(!controller.is_dragging());

        controller.press(MouseButton::Right, 0.0, 0.0);
        assert_eq!(controller.drag(4.0, 2.0), Some(DragOp::Pan { dx: 4.0, dy: 2.0 }));
    }

    #[test]
    fn keyboard_actions() {
        let mut controller = InteractionController::new();
        assert_eq!(
            controller.key(Key::Digit(5), true),
            Some(ControllerAction::CameraPreset(CameraPreset::Top))
        );
        assert_eq!(controller.key(Key::Digit(9), true), None);
        assert_eq!(controller.key(Key::S, true), None);
        assert_eq!(controller.key(Key::Delete, false), None);

        controller.begin_frame(Modifiers::ctrl());
        assert_eq!(controller.key(Key::S, true), Some(ControllerAction::SaveScene));
        assert_eq!(controller.key(Key::L, true), Some(ControllerAction::ReloadScene));
        assert_eq!(controller.key(Key::R, true), None);
        assert!(controller.modes().rotate);
    }
}
