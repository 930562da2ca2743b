use serde::{Deserialize, Serialize};

use crate::core::{GridId, Rect};
use crate::error::{TicklineError, TicklineResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn validate(self) -> TicklineResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(TicklineError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Opaque handle of a label bitmap owned by the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelHandle(pub u64);

/// Label bitmap produced by a `LabelRasterizer`, with its pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBitmap {
    pub handle: LabelHandle,
    pub width: f64,
    pub height: f64,
}

/// Draw command for one mark of one grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkInstruction {
    pub grid: GridId,
    pub index: f64,
    pub rect: Rect,
}

impl MarkInstruction {
    pub fn validate(self) -> TicklineResult<()> {
        if !self.index.is_finite() {
            return Err(TicklineError::InvalidData(
                "mark index must be finite".to_owned(),
            ));
        }
        self.rect.validate()
    }
}

/// Final position of one label bitmap (bottom-left corner, window coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub grid: GridId,
    pub index: f64,
    pub bitmap: LabelBitmap,
    pub x: f64,
    pub y: f64,
}

impl LabelPlacement {
    pub fn validate(self) -> TicklineResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(TicklineError::InvalidData(
                "label coordinates must be finite".to_owned(),
            ));
        }
        if !self.bitmap.width.is_finite()
            || !self.bitmap.height.is_finite()
            || self.bitmap.width < 0.0
            || self.bitmap.height < 0.0
        {
            return Err(TicklineError::InvalidData(
                "label bitmap size must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// The axis line drawn along the tickline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl AxisLine {
    pub fn validate(self) -> TicklineResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(TicklineError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(TicklineError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
