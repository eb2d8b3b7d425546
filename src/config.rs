// SPDX: CC0-1.0

use crate::{
    registry::Detail,
    viewport::{DEFAULT_GRIDLINE_SPACING, DEFAULT_LINE_WIDTH, DEFAULT_ZOOM_FACTOR},
    Canvas, Number,
};
use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path};

/// Startup settings. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: Number,
    pub height: Number,
    pub detail: Detail,
    pub gridline_spacing: Number,
    pub line_width: Number,
    pub zoom_factor: Number,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            detail: Detail::MIN,
            gridline_spacing: DEFAULT_GRIDLINE_SPACING,
            line_width: DEFAULT_LINE_WIDTH,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Self = serde_json::from_str(json).context("invalid settings")?;
        settings.check()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in settings file {}", path.display()))
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    fn check(&self) -> anyhow::Result<()> {
        for (name, val) in [("width", self.width), ("height", self.height)] {
            anyhow::ensure!(
                val > 0.0 && val <= Canvas::MAX_SIDE,
                "{name} must be greater than 0 and at most {} px, found {val}",
                Canvas::MAX_SIDE
            );
        }
        anyhow::ensure!(
            self.zoom_factor.is_finite() && self.zoom_factor > 1.0,
            "zoom_factor must be greater than 1, found {}",
            self.zoom_factor
        );
        Ok(())
    }
}
