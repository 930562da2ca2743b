use tracing::trace;

use crate::error::TicklineResult;
use crate::interaction::{GestureLimits, GestureOutcome, PointerEvent, ScrollEffect};
use crate::render::{LabelRasterizer, Renderer};

use super::invalidation::{InvalidationTopic, InvalidationTopics};
use super::validation::validate_pointer_event;
use super::Tickline;

impl<R, E> Tickline<R, E>
where
    R: Renderer + LabelRasterizer,
    E: ScrollEffect,
{
    fn gesture_limits(&self) -> GestureLimits {
        let (scale_min, scale_max) = self.scale_limits();
        GestureLimits {
            translation_touches: self.translation_touches,
            zoomable: self.zoomable,
            scale_min,
            scale_max,
        }
    }

    /// Registers a new contact. Contacts outside the bounds are ignored.
    ///
    /// Grabbing the tickline interrupts a running `center_on`.
    pub fn pointer_down(&mut self, event: PointerEvent) -> TicklineResult<GestureOutcome> {
        let event = validate_pointer_event(event)?;
        let limits = self.gesture_limits();
        let outcome = self
            .gestures
            .pointer_down(event, &self.view, &mut self.effect, limits);
        if outcome.consumed && self.transition.take().is_some() {
            trace!("centering interrupted by contact");
        }
        Ok(outcome)
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> TicklineResult<GestureOutcome> {
        let event = validate_pointer_event(event)?;
        let limits = self.gesture_limits();
        let outcome = self
            .gestures
            .pointer_move(event, &mut self.view, &mut self.effect, limits);
        if outcome.zoomed {
            self.invalidate(InvalidationTopics::scale_changed());
        } else if outcome.translated {
            self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::Redraw));
        }
        Ok(outcome)
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> TicklineResult<GestureOutcome> {
        let event = validate_pointer_event(event)?;
        let limits = self.gesture_limits();
        let outcome = self
            .gestures
            .pointer_up(event, &self.view, &mut self.effect, limits);
        if outcome.consumed {
            self.invalidate(InvalidationTopics::from_topic(InvalidationTopic::Calibration));
        }
        Ok(outcome)
    }

    /// Number of contacts currently held.
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.gestures.contact_count()
    }
}
