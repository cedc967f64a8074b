use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::animation::ease::EasingMode;
use crate::event::input::Key;
use crate::foundation::color::{Color, StaticColor};
use crate::foundation::core::Fps;
use crate::foundation::error::{StageError, StageResult};
use crate::scene::actor::EasingState;

/// Engine settings. Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Window title hint for the host.
    pub title: String,
    /// Stage width in pixels.
    pub width: f64,
    /// Stage height in pixels.
    pub height: f64,
    /// Target frame rate.
    pub fps: Fps,
    /// Clear color handed to the renderer.
    pub background: Color,
    /// Key press that asks the host to quit when no handler consumes it.
    pub quit_key: Option<Key>,
    /// Largest frame delta fed to transitions.
    pub max_frame_delta_ms: f64,
    /// Easing state pushed by [`Stage::save_easing_state`](crate::Stage::save_easing_state).
    pub default_easing: EasingState,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            title: "stagecraft".to_owned(),
            width: 800.0,
            height: 600.0,
            fps: Fps::default(),
            background: Color::from_static(StaticColor::Black),
            quit_key: None,
            max_frame_delta_ms: 250.0,
            default_easing: EasingState {
                duration_ms: 250.0,
                delay_ms: 0.0,
                mode: EasingMode::EaseOutCubic,
            },
        }
    }
}

impl StageConfig {
    /// Parse a configuration from JSON.
    pub fn from_reader<R: Read>(r: R) -> StageResult<Self> {
        let config: Self = serde_json::from_reader(r)
            .map_err(|e| StageError::validation(format!("parse stage config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StageError::validation(format!("open stage config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check sizes, frame rate and timing limits.
    pub fn validate(&self) -> StageResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(StageError::validation(format!(
                "stage width must be > 0, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(StageError::validation(format!(
                "stage height must be > 0, got {}",
                self.height
            )));
        }
        self.fps.validate()?;
        if !(self.max_frame_delta_ms.is_finite() && self.max_frame_delta_ms > 0.0) {
            return Err(StageError::validation(format!(
                "max_frame_delta_ms must be > 0, got {}",
                self.max_frame_delta_ms
            )));
        }
        let e = self.default_easing;
        if !(e.duration_ms.is_finite() && e.duration_ms >= 0.0)
            || !(e.delay_ms.is_finite() && e.delay_ms >= 0.0)
        {
            return Err(StageError::validation(
                "default_easing duration and delay must be >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/config.rs"]
mod tests;
