//! 2D overlay drawn with ImGui's background draw list: sidebar buttons,
//! the overview frame and a status line.

use crate::gfx::camera::Viewport;
use crate::input::ModeFlags;

use super::sidebar::Sidebar;

const BUTTON_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];
const BUTTON_HOVER_COLOR: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
const LABEL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BORDER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BORDER_MARGIN: f32 = 5.0;

pub struct OverlayState<'a> {
    pub sidebar: &'a Sidebar,
    /// Overview inset when it is shown
    pub overview: Option<Viewport>,
    pub window_height: f32,
    pub status: String,
}

/// Frame around a bottom-left-origin viewport, as top-left-origin corners.
pub fn overview_border(viewport: &Viewport, window_height: f32) -> ([f32; 2], [f32; 2]) {
    let top = window_height - viewport.y - viewport.height;
    (
        [viewport.x - BORDER_MARGIN, top - BORDER_MARGIN],
        [
            viewport.x + viewport.width + BORDER_MARGIN,
            top + viewport.height + BORDER_MARGIN,
        ],
    )
}

/// Object count, selection size and the latched transform modes.
pub fn status_line(object_count: usize, selected: usize, modes: ModeFlags) -> String {
    let mut line = format!("{object_count} objects, {selected} selected");
    let active: Vec<&str> = [
        (modes.rotate, "rotate"),
        (modes.translate, "translate"),
        (modes.shear, "shear"),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, name)| name)
    .collect();
    if !active.is_empty() {
        line.push_str(" | ");
        line.push_str(&active.join(" + "));
    }
    line
}

pub fn draw_overlay(ui: &imgui::Ui, state: &OverlayState) {
    let draw_list = ui.get_background_draw_list();

    if state.sidebar.is_visible() {
        for button in state.sidebar.buttons() {
            let [x, y] = button.position;
            let [w, h] = button.size;
            let color = if button.hovered {
                BUTTON_HOVER_COLOR
            } else {
                BUTTON_COLOR
            };
            draw_list
                .add_rect([x, y], [x + w, y + h], color)
                .filled(true)
                .rounding(4.0)
                .build();

            let [tw, th] = ui.calc_text_size(button.label);
            draw_list.add_text(
                [x + (w - tw) * 0.5, y + (h - th) * 0.5],
                LABEL_COLOR,
                button.label,
            );
        }
    }

    if let Some(viewport) = &state.overview {
        let (min, max) = overview_border(viewport, state.window_height);
        draw_list.add_rect(min, max, BORDER_COLOR).thickness(1.0).build();
    }

    draw_list.add_text(
        [10.0, state.window_height - 30.0],
        LABEL_COLOR,
        &state.status,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_wraps_overview_inset() {
        let inset = Viewport::overview_inset(1920.0, 1030.0);
        let (min, max) = overview_border(&inset, 1030.0);
        assert_eq!(min, [1585.0, 5.0]);
        assert_eq!(max, [1915.0, 195.0]);
    }

    #[test]
    fn status_lists_active_modes() {
        assert_eq!(status_line(3, 1, ModeFlags::default()), "3 objects, 1 selected");
        let modes = ModeFlags {
            rotate: true,
            translate: false,
            shear: true,
        };
        assert_eq!(status_line(2, 0, modes), "2 objects, 0 selected | rotate + shear");
    }
}
