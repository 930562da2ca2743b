use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{TicklineError, TicklineResult};

/// Range and snapping lattice pushed to a scroll effect by its tickline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollCalibration {
    pub min: f64,
    pub max: f64,
    /// Origin of the snapping lattice, if the effect should snap.
    pub anchor: Option<f64>,
    /// Spacing of the snapping lattice.
    pub interval: Option<f64>,
}

impl Default for ScrollCalibration {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            anchor: None,
            interval: None,
        }
    }
}

/// Scale-dependent thresholds, all expressed in global index units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConstants {
    /// Accumulated drag distance below which updates do not scroll.
    pub drag_threshold: f64,
    /// Release distance below which no momentum is kept.
    pub min_distance: f64,
    /// Velocity below which momentum stops.
    pub min_velocity: f64,
    /// Overscroll below which the spring is released.
    pub min_overscroll: f64,
    /// Speed used to pull towards the snapping lattice. Zero snaps at once.
    pub pull_back_velocity: f64,
}

impl Default for ScrollConstants {
    fn default() -> Self {
        Self {
            drag_threshold: 0.0,
            min_distance: 0.1,
            min_velocity: 0.5,
            min_overscroll: 0.5,
            pull_back_velocity: 0.0,
        }
    }
}

/// Result of advancing a scroll effect by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    /// Position the tickline center should follow.
    pub scroll: f64,
    pub moved: bool,
    /// Set once, on the frame the effect comes to rest after a release.
    pub settled: bool,
}

/// Momentum and overscroll physics driving a tickline's center.
///
/// The tickline is the only writer of calibration and constants; the effect
/// is the only writer of velocity and of the manual-drag flag outside of
/// gestures.
pub trait ScrollEffect {
    /// A drag begins at `value`.
    fn start(&mut self, value: f64, time: f64);
    /// The drag moved to `value`.
    fn update(&mut self, value: f64, time: f64);
    /// The drag was released at `value`; momentum may continue.
    fn stop(&mut self, value: f64, time: f64);
    /// Abandons the current drag without momentum.
    fn cancel(&mut self);

    fn velocity(&self) -> f64;
    fn set_velocity(&mut self, velocity: f64);
    fn is_manual(&self) -> bool;
    fn set_manual(&mut self, manual: bool);

    /// Current position.
    fn scroll(&self) -> f64;
    /// Moves to `value` without a drag, keeping momentum state.
    fn sync_to(&mut self, value: f64);

    fn calibrate(&mut self, calibration: ScrollCalibration);
    fn set_constants(&mut self, constants: ScrollConstants);

    /// Advances momentum by `delta_seconds`.
    fn step(&mut self, delta_seconds: f64) -> ScrollStep;
}

/// Tuning for `DampedScrollEffect`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DampedScrollConfig {
    /// Fraction of velocity lost per reference frame.
    pub friction: f64,
    /// Reference frame duration, in seconds.
    pub reference_frame: f64,
    /// Extra velocity damping while overscrolled.
    pub edge_damping: f64,
    /// Spring pulling an overscroll back inside `[min, max]`.
    pub spring_constant: f64,
}

impl Default for DampedScrollConfig {
    fn default() -> Self {
        Self {
            friction: 0.05,
            reference_frame: 0.017,
            edge_damping: 0.25,
            spring_constant: 2.0,
        }
    }
}

impl DampedScrollConfig {
    pub fn validate(self) -> TicklineResult<()> {
        if !self.friction.is_finite() || !(0.0..1.0).contains(&self.friction) {
            return Err(TicklineError::InvalidConfig(
                "scroll friction must be finite and in [0, 1)".to_owned(),
            ));
        }
        if !self.reference_frame.is_finite() || self.reference_frame <= 0.0 {
            return Err(TicklineError::InvalidConfig(
                "scroll reference frame must be finite and > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("edge_damping", self.edge_damping),
            ("spring_constant", self.spring_constant),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TicklineError::InvalidConfig(format!(
                    "scroll {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

const MAX_HISTORY: usize = 5;
const SNAP_EPSILON: f64 = 1e-9;

/// Deterministic kinetic scrolling with a spring at the range edges and
/// optional snapping to `anchor + k * interval` once momentum fades.
#[derive(Debug, Clone, PartialEq)]
pub struct DampedScrollEffect {
    config: DampedScrollConfig,
    constants: ScrollConstants,
    calibration: ScrollCalibration,
    value: f64,
    velocity: f64,
    overscroll: f64,
    manual: bool,
    coasting: bool,
    displacement: f64,
    history: SmallVec<[(f64, f64); MAX_HISTORY]>,
}

impl Default for DampedScrollEffect {
    fn default() -> Self {
        Self::new(DampedScrollConfig::default())
    }
}

impl DampedScrollEffect {
    #[must_use]
    pub fn new(config: DampedScrollConfig) -> Self {
        Self {
            config,
            constants: ScrollConstants::default(),
            calibration: ScrollCalibration::default(),
            value: 0.0,
            velocity: 0.0,
            overscroll: 0.0,
            manual: false,
            coasting: false,
            displacement: 0.0,
            history: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> DampedScrollConfig {
        self.config
    }

    #[must_use]
    pub fn constants(&self) -> ScrollConstants {
        self.constants
    }

    #[must_use]
    pub fn calibration(&self) -> ScrollCalibration {
        self.calibration
    }

    #[must_use]
    pub fn overscroll(&self) -> f64 {
        self.overscroll
    }

    fn record(&mut self, time: f64) {
        if self.history.len() == MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push((time, self.value));
    }

    fn apply_distance(&mut self, distance: f64) {
        self.value += distance;
        self.update_overscroll();
    }

    fn update_overscroll(&mut self) {
        let (min, max) = ordered(self.calibration.min, self.calibration.max);
        self.overscroll = if self.value < min {
            self.value - min
        } else if self.value > max {
            self.value - max
        } else {
            0.0
        };
    }

    /// Nearest lattice position, when snapping is configured.
    fn snap_target(&self) -> Option<f64> {
        let anchor = self.calibration.anchor?;
        let interval = self.calibration.interval.filter(|i| i.is_finite() && *i > 0.0)?;
        let target = anchor + ((self.value - anchor) / interval).round() * interval;
        let (min, max) = ordered(self.calibration.min, self.calibration.max);
        Some(target.clamp(min, max))
    }

    fn release_velocity(&self) -> f64 {
        let (Some(&(t0, v0)), Some(&(t1, v1))) = (self.history.first(), self.history.last()) else {
            return 0.0;
        };
        let distance = v1 - v0;
        let elapsed = t1 - t0;
        if distance.abs() < self.constants.min_distance || elapsed <= 0.0 {
            return 0.0;
        }
        distance / elapsed
    }

    fn damp(&mut self, delta_seconds: f64) {
        let frames = delta_seconds / self.config.reference_frame;
        let mut force = self.velocity * self.config.friction * frames;
        if self.overscroll.abs() > self.constants.min_overscroll {
            force += (self.velocity * self.config.edge_damping
                + self.overscroll * self.config.spring_constant)
                * frames;
        } else {
            self.overscroll = 0.0;
        }

        let (min, max) = ordered(self.calibration.min, self.calibration.max);
        let returning_to_max = self.overscroll > 0.0 && self.velocity < 0.0;
        let returning_to_min = self.overscroll < 0.0 && self.velocity > 0.0;

        self.velocity -= force;
        self.apply_distance(self.velocity * delta_seconds);

        if (returning_to_min && self.value > min) || (returning_to_max && self.value < max) {
            self.value = self.value.clamp(min, max);
            self.velocity = 0.0;
            self.overscroll = 0.0;
            return;
        }

        let floor = if self.snap_target().is_some() {
            self.constants.min_velocity.max(self.constants.pull_back_velocity)
        } else {
            self.constants.min_velocity
        };
        if self.velocity.abs() <= floor && self.overscroll.abs() <= self.constants.min_overscroll {
            self.value = self.value.clamp(min, max);
            self.velocity = 0.0;
            self.overscroll = 0.0;
        }
    }

    fn pull_to(&mut self, target: f64, delta_seconds: f64) {
        let gap = target - self.value;
        let reach = self.constants.pull_back_velocity * delta_seconds;
        if reach <= 0.0 || gap.abs() <= reach {
            self.value = target;
        } else {
            self.value += reach.copysign(gap);
        }
        self.update_overscroll();
    }

    fn at_rest(&self) -> bool {
        self.velocity == 0.0
            && self.overscroll == 0.0
            && self
                .snap_target()
                .is_none_or(|target| (self.value - target).abs() <= SNAP_EPSILON)
    }
}

impl ScrollEffect for DampedScrollEffect {
    fn start(&mut self, value: f64, time: f64) {
        self.manual = true;
        self.coasting = false;
        self.velocity = 0.0;
        self.displacement = 0.0;
        self.value = value;
        self.update_overscroll();
        self.history.clear();
        self.record(time);
    }

    fn update(&mut self, value: f64, time: f64) {
        let distance = value - self.value;
        self.displacement += distance.abs();
        if self.displacement > self.constants.drag_threshold {
            self.apply_distance(distance);
        }
        self.record(time);
    }

    fn stop(&mut self, value: f64, time: f64) {
        self.update(value, time);
        self.manual = false;
        self.velocity = self.release_velocity();
        self.coasting = true;
        trace!(velocity = self.velocity, "scroll released");
    }

    fn cancel(&mut self) {
        self.manual = false;
        self.history.clear();
        self.displacement = 0.0;
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: f64) {
        self.velocity = if velocity.is_finite() { velocity } else { 0.0 };
    }

    fn is_manual(&self) -> bool {
        self.manual
    }

    fn set_manual(&mut self, manual: bool) {
        self.manual = manual;
    }

    fn scroll(&self) -> f64 {
        self.value
    }

    fn sync_to(&mut self, value: f64) {
        self.value = value;
        self.update_overscroll();
    }

    fn calibrate(&mut self, calibration: ScrollCalibration) {
        self.calibration = calibration;
        self.update_overscroll();
    }

    fn set_constants(&mut self, constants: ScrollConstants) {
        self.constants = constants;
    }

    fn step(&mut self, delta_seconds: f64) -> ScrollStep {
        let before = self.value;
        if self.manual || !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return ScrollStep {
                scroll: self.value,
                moved: false,
                settled: false,
            };
        }

        if self.velocity != 0.0 || self.overscroll != 0.0 {
            self.damp(delta_seconds);
        } else if let Some(target) = self.snap_target() {
            if (self.value - target).abs() > SNAP_EPSILON {
                self.pull_to(target, delta_seconds);
            }
        }

        let settled = self.coasting && self.at_rest();
        if settled {
            self.coasting = false;
        }
        ScrollStep {
            scroll: self.value,
            moved: self.value != before,
            settled,
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a > b { (b, a) } else { (a, b) }
}
