use tracing::{debug, trace};

use crate::error::TicklineResult;
use crate::interaction::{ScrollCalibration, ScrollConstants, ScrollEffect};
use crate::render::{LabelRasterizer, Renderer};

use super::invalidation::{InvalidationTopic, InvalidationTopics};
use super::tickline::CenterTransition;
use super::validation::{validate_finite, validate_frame_delta};
use super::{Tickline, TicklineEvent};

impl<R, E> Tickline<R, E>
where
    R: Renderer + LabelRasterizer,
    E: ScrollEffect,
{
    /// Advances momentum and transitions by `delta_seconds`, then performs
    /// each pending topic once. Returns whether a frame was rendered.
    pub fn run_frame(&mut self, delta_seconds: f64) -> TicklineResult<bool> {
        let delta_seconds = validate_frame_delta(delta_seconds)?;

        if self.transition.is_some() {
            self.step_transition(delta_seconds);
        } else {
            self.step_effect(delta_seconds);
        }

        if self.pending.take(InvalidationTopic::Densest) {
            let densest = self.grids.densest(self.view.scale());
            if densest != self.densest {
                trace!(?densest, "densest grid changed");
            }
            self.densest = densest;
        }
        if self.pending.take(InvalidationTopic::EffectConstants) {
            self.push_effect_constants();
        }
        if self.pending.take(InvalidationTopic::Calibration) {
            self.calibrate_effect();
        }
        if self.pending.take(InvalidationTopic::Redraw) {
            self.redraw()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Centers the viewport on global index `target`, at the current scale.
    ///
    /// Animated calls run linearly over `center_duration`; a new call
    /// replaces any transition still running. `Centered` is emitted when the
    /// target is reached.
    pub fn center_on(&mut self, target: f64, animate: bool) -> TicklineResult<()> {
        validate_finite("center target", target)?;
        let to = self.view.ends_centered_on(target);
        if self.transition.take().is_some() {
            trace!("centering replaced");
        }
        self.effect.set_velocity(0.0);

        if !animate || self.center_duration == 0.0 {
            self.view.set_ends(to.0, to.1);
            self.finish_centering();
            return Ok(());
        }
        self.transition = Some(CenterTransition {
            from: (self.view.index_0(), self.view.index_1()),
            to,
            elapsed: 0.0,
            duration: self.center_duration,
        });
        debug!(target, duration = self.center_duration, "centering started");
        Ok(())
    }

    fn step_transition(&mut self, delta_seconds: f64) {
        let Some(mut transition) = self.transition.take() else {
            return;
        };
        transition.elapsed += delta_seconds;
        let progress = (transition.elapsed / transition.duration).min(1.0);
        let lerp = |from: f64, to: f64| from + (to - from) * progress;
        if progress >= 1.0 {
            self.view.set_ends(transition.to.0, transition.to.1);
            self.finish_centering();
            return;
        }
        self.view.set_ends(
            lerp(transition.from.0, transition.to.0),
            lerp(transition.from.1, transition.to.1),
        );
        self.transition = Some(transition);
        self.invalidate(InvalidationTopics::moved());
    }

    fn finish_centering(&mut self) {
        self.events.push(TicklineEvent::Centered);
        self.invalidate(InvalidationTopics::moved());
        debug!(index_mid = self.view.index_mid(), "centered");
    }

    fn step_effect(&mut self, delta_seconds: f64) {
        let step = self.effect.step(delta_seconds);
        if step.moved {
            self.view.set_index_mid(step.scroll);
            self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::Redraw));
        }
        if step.settled {
            let index_mid = self.view.index_mid();
            self.events.push(TicklineEvent::Settled { index_mid });
            self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::Calibration));
            debug!(index_mid, "scroll settled");
        }
    }

    pub(super) fn push_effect_constants(&mut self) {
        let scale = self.view.scale();
        if !scale.is_finite() || scale <= 0.0 {
            return;
        }
        self.effect.set_constants(ScrollConstants {
            drag_threshold: self.drag_threshold / scale,
            min_distance: 0.1 / scale,
            min_velocity: 0.1 / scale,
            min_overscroll: 0.5 / scale,
            pull_back_velocity: self.pull_back_speed.map_or(0.0, |speed| speed / scale),
        });
    }

    pub(super) fn calibrate_effect(&mut self) {
        let interval = self
            .snap_anchor
            .and_then(|_| self.grids.iter().next())
            .map(|(_, grid)| grid.globalize(1.0));
        self.effect.calibrate(ScrollCalibration {
            min: self.view.min_index(),
            max: self.view.max_index(),
            anchor: self.snap_anchor,
            interval,
        });
        if !self.effect.is_manual() && self.effect.velocity() == 0.0 && self.transition.is_none()
        {
            self.effect.sync_to(self.view.index_mid());
        }
    }
}
