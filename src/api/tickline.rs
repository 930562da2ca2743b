use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AxisViewport, Grid, GridId, GridSet, Orientation, Rect};
use crate::error::{TicklineError, TicklineResult};
use crate::interaction::{DampedScrollEffect, GestureResolver, ScrollEffect};
use crate::render::{
    Color, LabelRasterizer, Renderer, TicklineFrame, TicklineLabeller,
};

use super::invalidation::{InvalidationTopic, InvalidationTopics};
use super::validation::{validate_finite, validate_optional_bound, validate_scale_limits};
use super::TicklineConfig;

/// Notifications produced while running frames, drained by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TicklineEvent {
    /// A `center_on` completed.
    Centered,
    /// Momentum ended after a release.
    Settled { index_mid: f64 },
    /// A roulette's selected value changed.
    SelectionChanged { value: i64 },
}

/// Linear move of both ends towards a centered target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct CenterTransition {
    pub(super) from: (f64, f64),
    pub(super) to: (f64, f64),
    pub(super) elapsed: f64,
    pub(super) duration: f64,
}

/// Headless tickline: owns the viewport, its grids and the scroll effect,
/// and turns pointer input and frame ticks into rendered frames.
///
/// Mutations only mark invalidation topics; `run_frame` does the pending
/// work once per frame, however many mutations happened since the last one.
pub struct Tickline<R, E = DampedScrollEffect>
where
    R: Renderer + LabelRasterizer,
    E: ScrollEffect,
{
    pub(super) renderer: R,
    pub(super) effect: E,
    pub(super) view: AxisViewport,
    pub(super) grids: GridSet,
    pub(super) labeller: TicklineLabeller,
    pub(super) gestures: GestureResolver,
    pub(super) scale_min: Option<f64>,
    pub(super) scale_max: Option<f64>,
    pub(super) zoomable: bool,
    pub(super) translation_touches: usize,
    pub(super) drag_threshold: f64,
    pub(super) draw_line: bool,
    pub(super) line_width: f64,
    pub(super) line_color: Color,
    pub(super) background_color: Option<Color>,
    pub(super) label_padding: f64,
    pub(super) center_duration: f64,
    pub(super) snap_anchor: Option<f64>,
    pub(super) pull_back_speed: Option<f64>,
    pub(super) densest: Option<GridId>,
    pub(super) pending: InvalidationTopics,
    pub(super) transition: Option<CenterTransition>,
    pub(super) events: Vec<TicklineEvent>,
    pub(super) last_frame: Option<TicklineFrame>,
    pub(super) redraw_count: usize,
}

impl<R> Tickline<R, DampedScrollEffect>
where
    R: Renderer + LabelRasterizer,
{
    /// Creates a tickline driven by the default damped scroll effect.
    pub fn new(renderer: R, config: TicklineConfig) -> TicklineResult<Self> {
        Self::with_effect(renderer, DampedScrollEffect::default(), config)
    }
}

impl<R, E> Tickline<R, E>
where
    R: Renderer + LabelRasterizer,
    E: ScrollEffect,
{
    pub fn with_effect(renderer: R, effect: E, config: TicklineConfig) -> TicklineResult<Self> {
        config.validate()?;

        let mut view = AxisViewport::new(config.orientation, config.bounds)
            .with_ends(config.index_0, config.index_1)
            .with_backward(config.backward);
        view.set_index_limits(
            config.min_index.unwrap_or(f64::NEG_INFINITY),
            config.max_index.unwrap_or(f64::INFINITY),
        );
        view.set_line_offset(config.line_offset);
        let grids = GridSet::from_grids(config.grids)?;

        let mut tickline = Self {
            renderer,
            effect,
            view,
            grids,
            labeller: TicklineLabeller::default(),
            gestures: GestureResolver::new(),
            scale_min: config.scale_min,
            scale_max: config.scale_max,
            zoomable: config.zoomable,
            translation_touches: config.translation_touches,
            drag_threshold: config.drag_threshold,
            draw_line: config.draw_line,
            line_width: config.line_width,
            line_color: config.line_color,
            background_color: config.background_color,
            label_padding: config.label_padding,
            center_duration: config.center_duration,
            snap_anchor: None,
            pull_back_speed: None,
            densest: None,
            pending: InvalidationTopics::all(),
            transition: None,
            events: Vec::new(),
            last_frame: None,
            redraw_count: 0,
        };
        validate_scale_limits(tickline.scale_min(), tickline.scale_max())?;
        tickline.enforce_scale_bounds();
        tickline.densest = tickline.grids.densest(tickline.view.scale());
        tickline.push_effect_constants();
        tickline.calibrate_effect();
        debug!(
            grids = tickline.grids.len(),
            index_0 = tickline.view.index_0(),
            index_1 = tickline.view.index_1(),
            "tickline created"
        );
        Ok(tickline)
    }

    #[must_use]
    pub fn view(&self) -> &AxisViewport {
        &self.view
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn effect(&self) -> &E {
        &self.effect
    }

    #[must_use]
    pub fn grids(&self) -> &GridSet {
        &self.grids
    }

    #[must_use]
    pub fn labeller(&self) -> &TicklineLabeller {
        &self.labeller
    }

    #[must_use]
    pub fn index_0(&self) -> f64 {
        self.view.index_0()
    }

    #[must_use]
    pub fn index_1(&self) -> f64 {
        self.view.index_1()
    }

    #[must_use]
    pub fn index_mid(&self) -> f64 {
        self.view.index_mid()
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.view.scale()
    }

    /// Zoom limits in effect.
    ///
    /// A limit left to the grids never crosses an explicit one: it is pulled
    /// onto it instead. With both derived, the zoom-out floor wins.
    #[must_use]
    pub fn scale_limits(&self) -> (f64, f64) {
        let derived_min = self.grids.default_scale_min();
        let derived_max = self.grids.default_scale_max(self.view.line_length());
        match (self.scale_min, self.scale_max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, derived_max.max(min)),
            (None, Some(max)) => (derived_min.min(max), max),
            (None, None) => (derived_min, derived_max.max(derived_min)),
        }
    }

    /// Lower zoom limit: explicit, or implied by the grids.
    #[must_use]
    pub fn scale_min(&self) -> f64 {
        self.scale_limits().0
    }

    /// Upper zoom limit: explicit, or implied by the grids.
    #[must_use]
    pub fn scale_max(&self) -> f64 {
        self.scale_limits().1
    }

    /// Densest grid drawn at the current scale, as of the last frame.
    #[must_use]
    pub fn densest_grid(&self) -> Option<GridId> {
        self.densest
    }

    #[must_use]
    pub fn zoomable(&self) -> bool {
        self.zoomable
    }

    #[must_use]
    pub fn translation_touches(&self) -> usize {
        self.translation_touches
    }

    #[must_use]
    pub fn center_duration(&self) -> f64 {
        self.center_duration
    }

    /// True while the effect carries momentum or a drag is in progress.
    #[must_use]
    pub fn in_motion(&self) -> bool {
        self.effect.velocity() != 0.0 || self.effect.is_manual()
    }

    /// True while an animated `center_on` is running.
    #[must_use]
    pub fn is_centering(&self) -> bool {
        self.transition.is_some()
    }

    #[must_use]
    pub fn pending_topics(&self) -> InvalidationTopics {
        self.pending
    }

    /// Number of frames rendered so far.
    #[must_use]
    pub fn redraw_count(&self) -> usize {
        self.redraw_count
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&TicklineFrame> {
        self.last_frame.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<TicklineEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn invalidate(&mut self, topics: InvalidationTopics) {
        self.pending.insert(topics);
    }

    /// Schedules a redraw without any state change.
    pub fn request_redraw(&mut self) {
        self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::Redraw));
    }

    pub fn set_ends(&mut self, index_0: f64, index_1: f64) -> TicklineResult<()> {
        validate_finite("index_0", index_0)?;
        validate_finite("index_1", index_1)?;
        self.view.set_ends(index_0, index_1);
        self.enforce_scale_bounds();
        self.invalidate(InvalidationTopics::scale_changed());
        Ok(())
    }

    /// Rescales around `index_0`, clamped to the zoom limits.
    pub fn set_scale(&mut self, scale: f64) -> TicklineResult<()> {
        if scale.is_nan() || scale <= 0.0 {
            return Err(TicklineError::InvalidData(format!(
                "scale must be > 0, got {scale}"
            )));
        }
        let clamped = self.clamp_scale(scale);
        self.view.set_scale(clamped);
        self.invalidate(InvalidationTopics::scale_changed());
        Ok(())
    }

    pub fn set_index_mid(&mut self, index_mid: f64) -> TicklineResult<()> {
        validate_finite("index_mid", index_mid)?;
        self.view.set_index_mid(index_mid);
        self.invalidate(InvalidationTopics::moved());
        Ok(())
    }

    pub fn translate_by(&mut self, distance: f64) -> TicklineResult<()> {
        validate_finite("distance", distance)?;
        self.view.translate_by(distance);
        self.invalidate(InvalidationTopics::moved());
        Ok(())
    }

    pub fn set_backward(&mut self, backward: bool) {
        self.view.set_backward(backward);
        self.invalidate(InvalidationTopics::all());
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.view.set_orientation(orientation);
        self.enforce_scale_bounds();
        self.invalidate(InvalidationTopics::all());
    }

    /// Resizes the widget. Both ends are kept, so the scale follows the new
    /// length within the zoom limits.
    pub fn set_bounds(&mut self, bounds: Rect) -> TicklineResult<()> {
        bounds.validate()?;
        self.view.set_bounds(bounds);
        self.enforce_scale_bounds();
        self.invalidate(InvalidationTopics::all());
        debug!(
            width = bounds.width,
            height = bounds.height,
            scale = self.view.scale(),
            "tickline resized"
        );
        Ok(())
    }

    pub fn set_index_limits(
        &mut self,
        min_index: Option<f64>,
        max_index: Option<f64>,
    ) -> TicklineResult<()> {
        validate_optional_bound("min_index", min_index)?;
        validate_optional_bound("max_index", max_index)?;
        let min_index = min_index.unwrap_or(f64::NEG_INFINITY);
        let max_index = max_index.unwrap_or(f64::INFINITY);
        if min_index > max_index {
            return Err(TicklineError::InvalidConfig(format!(
                "min_index ({min_index}) must be <= max_index ({max_index})"
            )));
        }
        self.view.set_index_limits(min_index, max_index);
        self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::Calibration));
        Ok(())
    }

    /// Overrides the zoom limits; `None` falls back to the grid-derived one.
    pub fn set_scale_limits(
        &mut self,
        scale_min: Option<f64>,
        scale_max: Option<f64>,
    ) -> TicklineResult<()> {
        let previous = (self.scale_min, self.scale_max);
        self.scale_min = scale_min;
        self.scale_max = scale_max;
        if let Err(err) = validate_scale_limits(self.scale_min(), self.scale_max()) {
            (self.scale_min, self.scale_max) = previous;
            return Err(err);
        }
        if self.enforce_scale_bounds() {
            self.invalidate(InvalidationTopics::scale_changed());
        }
        Ok(())
    }

    pub fn set_zoomable(&mut self, zoomable: bool) {
        self.zoomable = zoomable;
    }

    pub fn set_translation_touches(&mut self, translation_touches: usize) -> TicklineResult<()> {
        if translation_touches == 0 {
            return Err(TicklineError::InvalidConfig(
                "translation_touches must be >= 1".to_owned(),
            ));
        }
        self.translation_touches = translation_touches;
        Ok(())
    }

    pub fn set_drag_threshold(&mut self, drag_threshold: f64) -> TicklineResult<()> {
        self.drag_threshold = validate_finite("drag_threshold", drag_threshold)?;
        self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::EffectConstants));
        Ok(())
    }

    pub fn set_line_offset(&mut self, line_offset: f64) -> TicklineResult<()> {
        self.view
            .set_line_offset(validate_finite("line_offset", line_offset)?);
        self.request_redraw();
        Ok(())
    }

    pub fn set_draw_line(&mut self, draw_line: bool) {
        self.draw_line = draw_line;
        self.request_redraw();
    }

    pub fn set_background_color(&mut self, color: Option<Color>) -> TicklineResult<()> {
        if let Some(color) = color {
            color.validate()?;
        }
        self.background_color = color;
        self.request_redraw();
        Ok(())
    }

    pub fn set_center_duration(&mut self, seconds: f64) -> TicklineResult<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(TicklineError::InvalidConfig(
                "center_duration must be finite and >= 0".to_owned(),
            ));
        }
        self.center_duration = seconds;
        Ok(())
    }

    /// Makes the effect settle on `anchor + k / scale_factor` of the first grid.
    pub fn set_snap_anchor(&mut self, anchor: Option<f64>) -> TicklineResult<()> {
        if let Some(anchor) = anchor {
            validate_finite("snap anchor", anchor)?;
        }
        self.snap_anchor = anchor;
        self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::Calibration));
        Ok(())
    }

    /// Speed, in pixels per second, at which the effect pulls onto the snap
    /// lattice.
    pub fn set_pull_back_speed(&mut self, speed: Option<f64>) -> TicklineResult<()> {
        if let Some(speed) = speed {
            if !speed.is_finite() || speed < 0.0 {
                return Err(TicklineError::InvalidConfig(
                    "pull_back_speed must be finite and >= 0".to_owned(),
                ));
            }
        }
        self.pull_back_speed = speed;
        self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::EffectConstants));
        Ok(())
    }

    pub fn add_grid(&mut self, grid: Grid) -> TicklineResult<GridId> {
        let id = self.grids.push(grid)?;
        self.grids_changed();
        Ok(id)
    }

    /// Replaces the grid at `id`; returns `false` if there is no such grid.
    pub fn replace_grid(&mut self, id: GridId, grid: Grid) -> TicklineResult<bool> {
        let replaced = self.grids.replace(id, grid)?;
        if replaced {
            self.grids_changed();
        }
        Ok(replaced)
    }

    pub fn clear_grids(&mut self) {
        self.grids.clear();
        self.grids_changed();
    }

    pub fn set_labeller(&mut self, labeller: TicklineLabeller) {
        self.labeller = labeller;
        self.request_redraw();
    }

    fn grids_changed(&mut self) {
        self.enforce_scale_bounds();
        self.invalidate(InvalidationTopics::all());
        debug!(grids = self.grids.len(), "grid set changed");
    }

    pub(super) fn clamp_scale(&self, scale: f64) -> f64 {
        let (min, max) = self.scale_limits();
        if scale < min {
            min
        } else if scale > max {
            max
        } else {
            scale
        }
    }

    /// Pulls the scale back inside the zoom limits, keeping the center.
    /// Returns whether anything changed.
    pub(super) fn enforce_scale_bounds(&mut self) -> bool {
        let scale = self.view.scale();
        let clamped = self.clamp_scale(scale);
        if clamped == scale || !clamped.is_finite() || clamped <= 0.0 {
            return false;
        }
        let mid = self.view.index_mid();
        self.view.set_scale(clamped);
        self.view.set_index_mid(mid);
        true
    }
}
