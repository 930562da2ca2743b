use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Grid, GridId, Rect, SlotKind, ValueFormat};
use crate::error::{TicklineError, TicklineResult};
use crate::interaction::{DampedScrollEffect, GestureOutcome, PointerEvent, ScrollEffect};
use crate::render::{LabelRasterizer, Renderer, SlotLabeller, TicklineLabeller};

use super::{RouletteConfig, Tickline, TicklineConfig, TicklineEvent};

const SLOT_GRID: GridId = GridId(0);

/// Result of `Roulette::select_and_center`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// The value was newly selected and centering was scheduled.
    Changed,
    /// The value was already selected; nothing was scheduled.
    Unchanged,
}

/// Where a roulette is in its select/center cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouletteState {
    Idle { selected: Option<i64> },
    Centering { target: i64 },
}

/// Value picker built on a tickline with a single slot grid.
///
/// The slot under the center is the `rolling_value`; once the roulette comes
/// to rest it becomes the `selected_value`.
pub struct Roulette<R, E = DampedScrollEffect>
where
    R: Renderer + LabelRasterizer,
    E: ScrollEffect,
{
    tickline: Tickline<R, E>,
    config: RouletteConfig,
    selected_value: Option<i64>,
    centering_target: Option<i64>,
    events: Vec<TicklineEvent>,
}

impl<R> Roulette<R, DampedScrollEffect>
where
    R: Renderer + LabelRasterizer,
{
    /// Plain roulette: slot `k` shows value `k`. Nothing is selected yet.
    pub fn new(
        renderer: R,
        bounds: Rect,
        format: ValueFormat,
        config: RouletteConfig,
    ) -> TicklineResult<Self> {
        Self::with_effect(
            renderer,
            DampedScrollEffect::default(),
            bounds,
            SlotKind::Plain,
            format,
            config,
        )
    }

    /// Cyclic roulette over `cycle` values, starting selected and centered
    /// on its first value.
    pub fn cyclic(
        renderer: R,
        bounds: Rect,
        cycle: i64,
        zero_indexed: bool,
        format: ValueFormat,
        config: RouletteConfig,
    ) -> TicklineResult<Self> {
        let slot = SlotKind::cyclic(cycle, zero_indexed)?;
        let mut roulette = Self::with_effect(
            renderer,
            DampedScrollEffect::default(),
            bounds,
            slot,
            format,
            config,
        )?;
        roulette.selected_value = Some(slot.first_value());
        roulette.center(false)?;
        Ok(roulette)
    }

    /// Zero-indexed, two-digit cyclic roulette for hours, minutes or seconds.
    pub fn time_format(
        renderer: R,
        bounds: Rect,
        cycle: i64,
        config: RouletteConfig,
    ) -> TicklineResult<Self> {
        Self::cyclic(
            renderer,
            bounds,
            cycle,
            true,
            ValueFormat::ZeroPadded { width: 2 },
            config,
        )
    }
}

impl<R, E> Roulette<R, E>
where
    R: Renderer + LabelRasterizer,
    E: ScrollEffect,
{
    pub fn with_effect(
        renderer: R,
        effect: E,
        bounds: Rect,
        slot: SlotKind,
        format: ValueFormat,
        config: RouletteConfig,
    ) -> TicklineResult<Self> {
        config.validate()?;
        bounds.validate()?;

        let grid = Grid::slot(slot, format).with_font_size(config.font_size);
        let tickline_config = TicklineConfig::new(bounds)
            .with_zoomable(false)
            .with_draw_line(false)
            .with_drag_threshold(-1.0)
            .with_scale_limits(Some(0.0), Some(f64::INFINITY))
            .with_grid(grid);
        let mut tickline = Tickline::with_effect(renderer, effect, tickline_config)?;
        tickline.set_labeller(TicklineLabeller::Slot(SlotLabeller::new()));
        tickline.set_snap_anchor(Some(0.0))?;
        tickline.set_pull_back_speed(Some(config.pull_back_speed))?;

        let mut roulette = Self {
            tickline,
            config,
            selected_value: None,
            centering_target: None,
            events: Vec::new(),
        };
        roulette.apply_density()?;
        roulette.tickline.set_index_mid(0.0)?;
        debug!(?slot, density = config.density, "roulette created");
        Ok(roulette)
    }

    #[must_use]
    pub fn tickline(&self) -> &Tickline<R, E> {
        &self.tickline
    }

    #[must_use]
    pub fn config(&self) -> RouletteConfig {
        self.config
    }

    #[must_use]
    pub fn slot(&self) -> SlotKind {
        self.slot_grid()
            .and_then(Grid::slot_kind)
            .unwrap_or_default()
    }

    fn slot_grid(&self) -> Option<&Grid> {
        self.tickline.grids().get(SLOT_GRID)
    }

    #[must_use]
    pub fn selected_value(&self) -> Option<i64> {
        self.selected_value
    }

    /// Value of the slot currently under the center.
    #[must_use]
    pub fn rolling_value(&self) -> i64 {
        self.slot().slot_value(self.local_mid())
    }

    fn local_mid(&self) -> f64 {
        let mid = self.tickline.index_mid();
        self.slot_grid().map_or(mid, |grid| grid.localize(mid))
    }

    #[must_use]
    pub fn state(&self) -> RouletteState {
        match self.centering_target {
            Some(target) if self.tickline.is_centering() => RouletteState::Centering { target },
            _ => RouletteState::Idle {
                selected: self.selected_value,
            },
        }
    }

    /// True while the roulette carries momentum, is being dragged or is
    /// centering. Once it stops, the rolling value is the selected one.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.tickline.in_motion() || self.tickline.is_centering()
    }

    #[must_use]
    pub fn is_rolling(&self) -> bool {
        self.tickline.effect().velocity() != 0.0
    }

    /// Global index of the slot showing `value` nearest to the center.
    pub fn index_of(&self, value: i64) -> TicklineResult<f64> {
        let local = self.slot().index_of(value, self.local_mid())?;
        Ok(self
            .slot_grid()
            .map_or(local, |grid| grid.globalize(local)))
    }

    pub fn center_on(&mut self, value: i64, animate: bool) -> TicklineResult<()> {
        let index = self.index_of(value)?;
        self.centering_target = Some(value);
        self.tickline.center_on(index, animate)?;
        self.absorb_tickline_events();
        Ok(())
    }

    /// Centers on the selected value, if any.
    pub fn center(&mut self, animate: bool) -> TicklineResult<()> {
        match self.selected_value {
            Some(value) => self.center_on(value, animate),
            None => Ok(()),
        }
    }

    /// Selects `value` and centers on it.
    pub fn select_and_center(&mut self, value: i64, animate: bool) -> TicklineResult<Selection> {
        if self.selected_value == Some(value) {
            return Ok(Selection::Unchanged);
        }
        let index = self.index_of(value)?;
        self.set_selected(value);
        self.centering_target = Some(value);
        self.tickline.center_on(index, animate)?;
        self.absorb_tickline_events();
        Ok(Selection::Changed)
    }

    /// Number of slots visible at once.
    pub fn set_density(&mut self, density: f64) -> TicklineResult<()> {
        let config = self.config.with_density(density);
        config.validate()?;
        self.config = config;
        self.apply_density()?;
        self.center(true)
    }

    /// Resizes the roulette, keeping its density and recentering on the
    /// selected value.
    pub fn set_bounds(&mut self, bounds: Rect) -> TicklineResult<()> {
        self.tickline.set_bounds(bounds)?;
        self.apply_density()?;
        self.center(true)
    }

    fn apply_density(&mut self) -> TicklineResult<()> {
        let scale = self.tickline.view().line_length() / self.config.density;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TicklineError::InvalidGeometry {
                width: self.tickline.view().bounds().width,
                height: self.tickline.view().bounds().height,
            });
        }
        self.tickline.set_scale(scale)
    }

    pub fn pointer_down(&mut self, event: PointerEvent) -> TicklineResult<GestureOutcome> {
        self.tickline.pointer_down(event)
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> TicklineResult<GestureOutcome> {
        self.tickline.pointer_move(event)
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> TicklineResult<GestureOutcome> {
        self.tickline.pointer_up(event)
    }

    /// Runs one tickline frame and applies its events to the selection.
    pub fn run_frame(&mut self, delta_seconds: f64) -> TicklineResult<bool> {
        let rendered = self.tickline.run_frame(delta_seconds)?;
        self.absorb_tickline_events();
        Ok(rendered)
    }

    pub fn drain_events(&mut self) -> Vec<TicklineEvent> {
        std::mem::take(&mut self.events)
    }

    fn absorb_tickline_events(&mut self) {
        for event in self.tickline.drain_events() {
            match event {
                TicklineEvent::Settled { .. } => {
                    self.events.push(event);
                    let value = self.rolling_value();
                    self.set_selected(value);
                }
                TicklineEvent::Centered => {
                    self.centering_target = None;
                    self.events.push(event);
                }
                TicklineEvent::SelectionChanged { .. } => self.events.push(event),
            }
        }
    }

    fn set_selected(&mut self, value: i64) {
        if self.selected_value == Some(value) {
            return;
        }
        self.selected_value = Some(value);
        self.events.push(TicklineEvent::SelectionChanged { value });
        debug!(value, "roulette selection changed");
    }
}
