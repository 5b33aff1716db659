//! View parameters consumed by the transform / rendering layer.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::numeric::{ensure_finite, ensure_positive};

const DEFAULT_VIEWPORT_WIDTH: u32 = 1200;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 800;

/// Zoom, pan and viewport size of the curve view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl ViewState {
    pub fn validate(&self) -> CoreResult<()> {
        ensure_positive(self.zoom, "zoom")?;
        ensure_finite(self.pan_x, "pan x")?;
        ensure_finite(self.pan_y, "pan y")?;
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(CoreError::InvalidArg {
                what: "viewport size must be non-zero",
            });
        }
        Ok(())
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_pan(mut self, pan_x: f64, pan_y: f64) -> Self {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }
}
