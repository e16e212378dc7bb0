//! Object creation buttons along the left edge of the window.
//!
//! The sidebar is hit-tested before picking, so a click on a button never
//! reaches the scene.

use crate::gfx::scene::ObjectKind;

const BUTTON_X: f32 = 10.0;
const FIRST_BUTTON_Y: f32 = 100.0;
const BUTTON_WIDTH: f32 = 200.0;
const BUTTON_HEIGHT: f32 = 50.0;
const BUTTON_SPACING: f32 = 10.0;

/// A labelled rectangle in window pixels, origin top-left
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: &'static str,
    pub kind: ObjectKind,
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub hovered: bool,
}

impl Button {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.position[0]
            && x <= self.position[0] + self.size[0]
            && y >= self.position[1]
            && y <= self.position[1] + self.size[1]
    }
}

#[derive(Debug, Clone)]
pub struct Sidebar {
    buttons: Vec<Button>,
    visible: bool,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}

impl Sidebar {
    pub fn new() -> Self {
        let entries = [
            ("Cube", ObjectKind::Cube),
            ("Sphere", ObjectKind::Sphere),
            ("Cone", ObjectKind::Cone),
            ("Cylinder", ObjectKind::Cylinder),
            ("Half Sphere", ObjectKind::HalfSphere),
            ("Pyramid", ObjectKind::Pyramid),
            ("Light", ObjectKind::Light),
        ];

        let buttons = entries
            .into_iter()
            .enumerate()
            .map(|(i, (label, kind))| Button {
                label,
                kind,
                position: [
                    BUTTON_X,
                    FIRST_BUTTON_Y + i as f32 * (BUTTON_HEIGHT + BUTTON_SPACING),
                ],
                size: [BUTTON_WIDTH, BUTTON_HEIGHT],
                hovered: false,
            })
            .collect();

        Self {
            buttons,
            visible: true,
        }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
        for button in &mut self.buttons {
            button.hovered = false;
        }
    }

    /// The kind of the button under `(x, y)`, if the sidebar is shown.
    pub fn check_click(&self, x: f32, y: f32) -> Option<ObjectKind> {
        if !self.visible {
            return None;
        }
        self.buttons
            .iter()
            .find(|button| button.contains(x, y))
            .map(|button| button.kind)
    }

    pub fn update_hover(&mut self, x: f32, y: f32) {
        let visible = self.visible;
        for button in &mut self.buttons {
            button.hovered = visible && button.contains(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stacks_buttons() {
        let sidebar = Sidebar::new();
        let buttons = sidebar.buttons();
        assert_eq!(buttons.len(), 7);
        assert_eq!(buttons[0].position, [10.0, 100.0]);
        assert_eq!(buttons[1].position, [10.0, 160.0]);
        assert_eq!(buttons[6].label, "Light");
    }

    #[test]
    fn click_maps_to_kind() {
        let sidebar = Sidebar::new();
        assert_eq!(sidebar.check_click(50.0, 120.0), Some(ObjectKind::Cube));
        assert_eq!(sidebar.check_click(50.0, 185.0), Some(ObjectKind::Sphere));
        // Gap between the first two buttons
        assert_eq!(sidebar.check_click(50.0, 155.0), None);
        assert_eq!(sidebar.check_click(400.0, 120.0), None);
    }

    #[test]
    fn hidden_sidebar_ignores_clicks_and_hover() {
        let mut sidebar = Sidebar::new();
        sidebar.update_hover(50.0, 120.0);
        assert!(sidebar.buttons()[0].hovered);

        sidebar.toggle_visibility();
        assert!(!sidebar.buttons()[0].hovered);
        assert_eq!(sidebar.check_click(50.0, 120.0), None);
        sidebar.update_hover(50.0, 120.0);
        assert!(!sidebar.buttons()[0].hovered);
    }
}
