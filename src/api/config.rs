use serde::{Deserialize, Serialize};

use crate::core::{Grid, Orientation, Rect};
use crate::error::{TicklineError, TicklineResult};
use crate::render::Color;

use super::validation::{validate_finite, validate_optional_bound};

/// Public tickline bootstrap configuration.
///
/// This type is serializable so host applications can persist/load tickline
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicklineConfig {
    pub bounds: Rect,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub backward: bool,
    #[serde(default)]
    pub index_0: f64,
    #[serde(default = "default_index_1")]
    pub index_1: f64,
    /// Pan limits; `None` is unbounded.
    #[serde(default)]
    pub min_index: Option<f64>,
    #[serde(default)]
    pub max_index: Option<f64>,
    /// Explicit zoom limits; `None` derives them from the grids. An explicit
    /// infinite limit is written as `"inf"`, since JSON has no infinity.
    #[serde(default, with = "scale_limit_serde")]
    pub scale_min: Option<f64>,
    #[serde(default, with = "scale_limit_serde")]
    pub scale_max: Option<f64>,
    #[serde(default = "default_true")]
    pub zoomable: bool,
    #[serde(default = "default_translation_touches")]
    pub translation_touches: usize,
    /// Drag distance in pixels before a pan starts moving. Negative disables it.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,
    #[serde(default)]
    pub line_offset: f64,
    #[serde(default = "default_true")]
    pub draw_line: bool,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_line_color")]
    pub line_color: Color,
    #[serde(default = "default_background_color")]
    pub background_color: Option<Color>,
    /// Gap between a mark and its label, in pixels.
    #[serde(default = "default_label_padding")]
    pub label_padding: f64,
    /// Duration of an animated `center_on`, in seconds.
    #[serde(default = "default_center_duration")]
    pub center_duration: f64,
    #[serde(default)]
    pub grids: Vec<Grid>,
}

impl TicklineConfig {
    /// Creates a config with default behavior and no grids.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            orientation: Orientation::default(),
            backward: false,
            index_0: 0.0,
            index_1: default_index_1(),
            min_index: None,
            max_index: None,
            scale_min: None,
            scale_max: None,
            zoomable: true,
            translation_touches: default_translation_touches(),
            drag_threshold: default_drag_threshold(),
            line_offset: 0.0,
            draw_line: true,
            line_width: default_line_width(),
            line_color: default_line_color(),
            background_color: default_background_color(),
            label_padding: default_label_padding(),
            center_duration: default_center_duration(),
            grids: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_backward(mut self, backward: bool) -> Self {
        self.backward = backward;
        self
    }

    #[must_use]
    pub fn with_ends(mut self, index_0: f64, index_1: f64) -> Self {
        self.index_0 = index_0;
        self.index_1 = index_1;
        self
    }

    #[must_use]
    pub fn with_index_limits(mut self, min_index: Option<f64>, max_index: Option<f64>) -> Self {
        self.min_index = min_index;
        self.max_index = max_index;
        self
    }

    #[must_use]
    pub fn with_scale_limits(mut self, scale_min: Option<f64>, scale_max: Option<f64>) -> Self {
        self.scale_min = scale_min;
        self.scale_max = scale_max;
        self
    }

    #[must_use]
    pub fn with_zoomable(mut self, zoomable: bool) -> Self {
        self.zoomable = zoomable;
        self
    }

    #[must_use]
    pub fn with_translation_touches(mut self, translation_touches: usize) -> Self {
        self.translation_touches = translation_touches;
        self
    }

    #[must_use]
    pub fn with_drag_threshold(mut self, drag_threshold: f64) -> Self {
        self.drag_threshold = drag_threshold;
        self
    }

    #[must_use]
    pub fn with_draw_line(mut self, draw_line: bool) -> Self {
        self.draw_line = draw_line;
        self
    }

    #[must_use]
    pub fn with_background_color(mut self, color: Option<Color>) -> Self {
        self.background_color = color;
        self
    }

    #[must_use]
    pub fn with_center_duration(mut self, seconds: f64) -> Self {
        self.center_duration = seconds;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grids.push(grid);
        self
    }

    pub fn validate(&self) -> TicklineResult<()> {
        self.bounds.validate()?;
        validate_finite("index_0", self.index_0)?;
        validate_finite("index_1", self.index_1)?;
        validate_optional_bound("min_index", self.min_index)?;
        validate_optional_bound("max_index", self.max_index)?;
        if let (Some(min), Some(max)) = (self.min_index, self.max_index) {
            if min > max {
                return Err(TicklineError::InvalidConfig(format!(
                    "min_index ({min}) must be <= max_index ({max})"
                )));
            }
        }
        for (name, value) in [("scale_min", self.scale_min), ("scale_max", self.scale_max)] {
            if let Some(value) = value {
                if value.is_nan() || value < 0.0 {
                    return Err(TicklineError::InvalidConfig(format!(
                        "{name} must be >= 0, got {value}"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.scale_min, self.scale_max) {
            if min > max {
                return Err(TicklineError::InvalidConfig(format!(
                    "scale_min ({min}) must be <= scale_max ({max})"
                )));
            }
        }
        if self.translation_touches == 0 {
            return Err(TicklineError::InvalidConfig(
                "translation_touches must be >= 1".to_owned(),
            ));
        }
        validate_finite("drag_threshold", self.drag_threshold)?;
        validate_finite("line_offset", self.line_offset)?;
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(TicklineError::InvalidConfig(
                "line_width must be finite and > 0".to_owned(),
            ));
        }
        self.line_color.validate()?;
        if let Some(color) = self.background_color {
            color.validate()?;
        }
        if !self.label_padding.is_finite() || self.label_padding < 0.0 {
            return Err(TicklineError::InvalidConfig(
                "label_padding must be finite and >= 0".to_owned(),
            ));
        }
        if !self.center_duration.is_finite() || self.center_duration < 0.0 {
            return Err(TicklineError::InvalidConfig(
                "center_duration must be finite and >= 0".to_owned(),
            ));
        }
        for grid in &self.grids {
            grid.validate()?;
        }
        Ok(())
    }
}

/// Roulette-specific settings layered on top of a `TicklineConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouletteConfig {
    /// Number of slots visible at once.
    #[serde(default = "default_density")]
    pub density: f64,
    /// Pull-back speed towards the nearest slot, in pixels per second.
    #[serde(default = "default_pull_back_speed")]
    pub pull_back_speed: f64,
    #[serde(default = "default_slot_font_size")]
    pub font_size: f64,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            pull_back_speed: default_pull_back_speed(),
            font_size: default_slot_font_size(),
        }
    }
}

impl RouletteConfig {
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn validate(self) -> TicklineResult<()> {
        for (name, value) in [
            ("density", self.density),
            ("pull_back_speed", self.pull_back_speed),
            ("font_size", self.font_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TicklineError::InvalidConfig(format!(
                    "roulette {name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

mod scale_limit_serde {
    use serde::{Deserialize, Deserializer, Serializer, de};

    const UNBOUNDED: &str = "inf";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Keyword(String),
    }

    pub(super) fn serialize<S: Serializer>(
        value: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(limit) if *limit == f64::INFINITY => serializer.serialize_str(UNBOUNDED),
            Some(limit) => serializer.serialize_some(limit),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Number(limit)) => Ok(Some(limit)),
            Some(Repr::Keyword(keyword)) if keyword == UNBOUNDED => Ok(Some(f64::INFINITY)),
            Some(Repr::Keyword(keyword)) => Err(<D::Error as de::Error>::custom(format!(
                "scale limit must be a number or \"{UNBOUNDED}\", got \"{keyword}\""
            ))),
        }
    }
}

fn default_index_1() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

fn default_translation_touches() -> usize {
    1
}

fn default_drag_threshold() -> f64 {
    20.0
}

fn default_line_width() -> f64 {
    4.0
}

fn default_line_color() -> Color {
    Color::rgb(1.0, 1.0, 1.0)
}

fn default_background_color() -> Option<Color> {
    Some(Color::rgb(0.0, 0.0, 0.0))
}

fn default_label_padding() -> f64 {
    9.0
}

fn default_center_duration() -> f64 {
    0.3
}

fn default_density() -> f64 {
    4.2
}

fn default_pull_back_speed() -> f64 {
    50.0
}

fn default_slot_font_size() -> f64 {
    20.0
}

#[cfg(test)]
mod tests {
    use super::{RouletteConfig, TicklineConfig};
    use crate::core::{Grid, Rect};

    #[test]
    fn missing_fields_take_defaults() {
        let config: TicklineConfig = serde_json::from_str(
            r#"{"bounds":{"x":0.0,"y":0.0,"width":100.0,"height":400.0}}"#,
        )
        .expect("parse");
        assert_eq!(config, TicklineConfig::new(Rect::new(0.0, 0.0, 100.0, 400.0)));
        assert!(config.zoomable);
        assert_eq!(config.translation_touches, 1);
        assert_eq!(config.drag_threshold, 20.0);
    }

    #[test]
    fn infinite_scale_limit_stays_explicit() {
        let config = TicklineConfig::new(Rect::new(0.0, 0.0, 100.0, 400.0))
            .with_scale_limits(Some(0.0), Some(f64::INFINITY));
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(json.contains(r#""scale_max":"inf""#));
        let parsed: TicklineConfig = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.scale_min, Some(0.0));
        assert_eq!(parsed.scale_max, Some(f64::INFINITY));

        let derived = TicklineConfig::new(Rect::new(0.0, 0.0, 100.0, 400.0));
        let json = serde_json::to_string(&derived).expect("serialize");
        let parsed: TicklineConfig = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.scale_max, None);

        let bad = json.replace(r#""scale_max":null"#, r#""scale_max":"huge""#);
        assert!(serde_json::from_str::<TicklineConfig>(&bad).is_err());
    }

    #[test]
    fn validation_rejects_inverted_limits() {
        let config = TicklineConfig::new(Rect::new(0.0, 0.0, 100.0, 400.0))
            .with_scale_limits(Some(10.0), Some(1.0));
        assert!(config.validate().is_err());

        let config = TicklineConfig::new(Rect::new(0.0, 0.0, 100.0, 400.0))
            .with_index_limits(Some(5.0), Some(-5.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_translation_touches_and_bad_grids() {
        let base = TicklineConfig::new(Rect::new(0.0, 0.0, 100.0, 400.0));
        assert!(base.clone().with_translation_touches(0).validate().is_err());
        assert!(
            base.with_grid(Grid::lattice().with_scale_factor(0.5))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn roulette_density_must_be_positive() {
        assert!(RouletteConfig::default().validate().is_ok());
        assert!(RouletteConfig::default().with_density(0.0).validate().is_err());
    }
}
