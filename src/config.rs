//! # Editor Configuration
//!
//! Runtime settings for the editor window, the scene file and the interaction
//! step sizes. Every field has a default, so a configuration file only needs to
//! name what it changes:
//!
//! ```json
//! {
//!     "scene_path": "my_scene.json",
//!     "window": { "width": 1280, "height": 720 },
//!     "interaction": { "rotate_step": 15.0 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::gfx::resources::MAX_LIGHTS;

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frame pacing target
    pub target_fps: u32,
    /// Clear colour (RGB)
    pub background: [f32; 3],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "shapeshop".to_string(),
            width: 1920,
            height: 1030,
            target_fps: 60,
            background: [0.53, 0.81, 0.92],
        }
    }
}

/// Step sizes applied per scroll notch or per pixel of drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Degrees per scroll step
    pub rotate_step: f32,
    /// World units per scroll step
    pub translate_step: f32,
    pub scale_step: f32,
    pub shear_step: f32,
    /// Camera zoom per scroll step when nothing is selected
    pub zoom_step: f32,
    /// World units of pan per pixel of right-drag
    pub pan_speed: f32,
    /// Degrees of orbit per pixel of left-drag
    pub orbit_speed: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            rotate_step: 5.0,
            translate_step: 0.1,
            scale_step: 0.05,
            shear_step: 0.05,
            zoom_step: 0.5,
            pan_speed: 0.01,
            orbit_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub window: WindowConfig,
    pub interaction: InteractionSettings,
    /// Where Ctrl+S saves and Ctrl+L loads
    pub scene_path: PathBuf,
    /// Load `scene_path` at startup when it exists
    pub load_on_start: bool,
    /// Read object requests from stdin on a separate thread
    pub control_panel: bool,
    /// Planar shadows cast by the first light source
    pub shadows: bool,
    /// Number of simultaneously active light sources
    pub light_slots: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            interaction: InteractionSettings::default(),
            scene_path: PathBuf::from("scene.json"),
            load_on_start: true,
            control_panel: true,
            shadows: false,
            light_slots: 8,
        }
    }
}

impl EditorConfig {
    /// Reads a JSON configuration file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        let config: EditorConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(EditorError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.window.target_fps == 0 {
            return Err(EditorError::Config("target_fps must be positive".into()));
        }
        if self.light_slots > MAX_LIGHTS {
            return Err(EditorError::Config(format!(
                "light_slots is {}, the renderer shades at most {MAX_LIGHTS}",
                self.light_slots
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "shadows": true, "interaction": { "rotate_step": 15.0 } }"#)
                .unwrap();

        assert!(config.shadows);
        assert_eq!(config.interaction.rotate_step, 15.0);
        assert_eq!(config.interaction.zoom_step, 0.5);
        assert_eq!(config.scene_path, PathBuf::from("scene.json"));
        assert_eq!(config.light_slots, 8);
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let mut config = EditorConfig::default();
        config.window.width = 0;
        assert!(matches!(config.validate(), Err(EditorError::Config(_))));
    }

    #[test]
    fn light_slots_beyond_shader_limit_are_rejected() {
        let mut config = EditorConfig::default();
        config.light_slots = MAX_LIGHTS;
        assert!(config.validate().is_ok());

        config.light_slots = MAX_LIGHTS + 1;
        assert!(matches!(config.validate(), Err(EditorError::Config(_))));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let result = EditorConfig::load("definitely/not/here.json");
        assert!(matches!(result, Err(EditorError::Io { .. })));
    }
}
