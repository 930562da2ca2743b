use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{AxisViewport, Point};
use crate::interaction::ScrollEffect;

/// One pointer sample in window coordinates. `time` is in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub time: f64,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(id: u64, x: f64, y: f64, time: f64) -> Self {
        Self { id, x, y, time }
    }

    #[must_use]
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Tickline settings the resolver needs for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureLimits {
    /// Number of contacts that pan the tickline.
    pub translation_touches: usize,
    pub zoomable: bool,
    pub scale_min: f64,
    pub scale_max: f64,
}

/// What a pointer event did to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureOutcome {
    /// The event belongs to this tickline.
    pub consumed: bool,
    pub translated: bool,
    /// Scale changed (or the pinch midpoint moved).
    pub zoomed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    id: u64,
    last: Point,
}

/// Turns pointer contacts into pans and anchored zooms.
///
/// Contacts are kept in arrival order. Only the two contacts farthest apart
/// drive a pinch; with three or more contacts down, moves of any other
/// contact do not zoom.
#[derive(Debug, Clone, Default)]
pub struct GestureResolver {
    contacts: SmallVec<[Contact; 4]>,
}

impl GestureResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub fn is_tracking(&self, id: u64) -> bool {
        self.position_of(id).is_some()
    }

    /// Forgets every contact without touching the effect.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    fn position_of(&self, id: u64) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id == id)
    }

    fn translate_now(&self, limits: GestureLimits) -> bool {
        self.contacts.len() == limits.translation_touches
    }

    pub fn pointer_down<E: ScrollEffect + ?Sized>(
        &mut self,
        event: PointerEvent,
        view: &AxisViewport,
        effect: &mut E,
        limits: GestureLimits,
    ) -> GestureOutcome {
        let point = event.point();
        if !view.bounds().contains(point) {
            return GestureOutcome::default();
        }
        if self.is_tracking(event.id) {
            return GestureOutcome {
                consumed: true,
                ..GestureOutcome::default()
            };
        }

        self.contacts.push(Contact {
            id: event.id,
            last: point,
        });
        if self.translate_now(limits) {
            effect.start(view.index_mid(), event.time);
        } else {
            effect.set_velocity(0.0);
            effect.cancel();
        }
        trace!(id = event.id, contacts = self.contacts.len(), "contact down");
        GestureOutcome {
            consumed: true,
            ..GestureOutcome::default()
        }
    }

    pub fn pointer_move<E: ScrollEffect + ?Sized>(
        &mut self,
        event: PointerEvent,
        view: &mut AxisViewport,
        effect: &mut E,
        limits: GestureLimits,
    ) -> GestureOutcome {
        let Some(position) = self.position_of(event.id) else {
            return GestureOutcome::default();
        };
        let outcome = self.transform(position, event, view, effect, limits);
        self.contacts[position].last = event.point();
        outcome
    }

    pub fn pointer_up<E: ScrollEffect + ?Sized>(
        &mut self,
        event: PointerEvent,
        view: &AxisViewport,
        effect: &mut E,
        limits: GestureLimits,
    ) -> GestureOutcome {
        let Some(position) = self.position_of(event.id) else {
            return GestureOutcome::default();
        };
        if self.translate_now(limits) {
            effect.stop(view.index_mid(), event.time);
        }
        self.contacts.remove(position);
        trace!(id = event.id, contacts = self.contacts.len(), "contact up");
        GestureOutcome {
            consumed: true,
            ..GestureOutcome::default()
        }
    }

    fn transform<E: ScrollEffect + ?Sized>(
        &self,
        position: usize,
        event: PointerEvent,
        view: &mut AxisViewport,
        effect: &mut E,
        limits: GestureLimits,
    ) -> GestureOutcome {
        let mut outcome = GestureOutcome {
            consumed: true,
            ..GestureOutcome::default()
        };
        let orientation = view.orientation();
        let current = event.point();
        let previous = self.contacts[position].last;
        let scale = view.scale();
        let dir = view.dir();

        if self.translate_now(limits) {
            let delta = (current.along(orientation) - previous.along(orientation))
                / limits.translation_touches as f64;
            effect.update(view.index_mid() - delta / scale * dir, event.time);
            view.set_index_mid(effect.scroll());
            outcome.translated = true;
        } else {
            effect.set_velocity(0.0);
            effect.cancel();
        }

        if self.contacts.len() < 2 || !limits.zoomable {
            return outcome;
        }

        let anchor = first_farthest(self.contacts.iter().map(|contact| contact.last), current)
            .map(|(_, point)| point);
        let Some(anchor) = anchor else {
            return outcome;
        };
        let farthest = first_farthest(self.contacts.iter().map(|contact| contact.last), anchor);
        if farthest.map(|(index, _)| index) != Some(position) {
            return outcome;
        }

        let previous_length = previous.distance(anchor);
        if previous_length == 0.0 {
            return outcome;
        }
        let inter = view.calc_intercept(anchor, current, false);
        let old_inter = view.calc_intercept(anchor, previous, false);
        let inter_index = view.pos_to_index(old_inter, false);
        let ratio = current.distance(anchor) / previous_length;

        let mut new_scale = scale * ratio;
        if new_scale < limits.scale_min {
            new_scale = limits.scale_min;
        } else if new_scale > limits.scale_max {
            new_scale = limits.scale_max;
        }
        if !new_scale.is_finite() || new_scale <= 0.0 || !inter_index.is_finite() {
            return outcome;
        }

        let index_0 = inter_index - dir * inter / new_scale;
        let index_1 = index_0 + dir * view.line_length() / new_scale;
        view.set_ends(index_0, index_1);

        // Keep the effect's history on the new center so a release does not jump.
        let mid = view.index_mid();
        effect.update(mid, event.time);
        effect.sync_to(mid);
        effect.set_manual(true);
        trace!(scale = new_scale, inter, "pinch");
        outcome.zoomed = true;
        outcome
    }
}

/// First point (in order) at the greatest distance from `from`.
fn first_farthest(points: impl Iterator<Item = Point>, from: Point) -> Option<(usize, Point)> {
    let mut best: Option<(usize, Point, f64)> = None;
    for (index, point) in points.enumerate() {
        let distance = point.distance(from);
        if best.is_none_or(|(_, _, longest)| distance > longest) {
            best = Some((index, point, distance));
        }
    }
    best.map(|(index, point, _)| (index, point))
}

#[cfg(test)]
mod tests {
    use super::{GestureLimits, GestureResolver, PointerEvent};
    use crate::core::{AxisViewport, Orientation, Rect};
    use crate::interaction::{DampedScrollEffect, ScrollEffect};

    fn limits() -> GestureLimits {
        GestureLimits {
            translation_touches: 1,
            zoomable: true,
            scale_min: 1.0,
            scale_max: 50.0,
        }
    }

    fn view() -> AxisViewport {
        AxisViewport::new(Orientation::Horizontal, Rect::new(0.0, 0.0, 200.0, 40.0))
            .with_ends(0.0, 20.0)
    }

    #[test]
    fn single_contact_pans_against_drag_direction() {
        let mut view = view();
        let mut effect = DampedScrollEffect::default();
        let mut resolver = GestureResolver::new();

        let down = resolver.pointer_down(PointerEvent::new(1, 100.0, 20.0, 0.0), &view, &mut effect, limits());
        assert!(down.consumed);
        assert!(effect.is_manual());

        let moved = resolver.pointer_move(
            PointerEvent::new(1, 130.0, 20.0, 0.1),
            &mut view,
            &mut effect,
            limits(),
        );
        assert!(moved.translated);
        assert!((view.index_mid() - 7.0).abs() <= 1e-12);
        assert!((view.scale() - 10.0).abs() <= 1e-12);

        resolver.pointer_up(PointerEvent::new(1, 130.0, 20.0, 0.1), &view, &mut effect, limits());
        assert_eq!(resolver.contact_count(), 0);
        assert!(!effect.is_manual());
    }

    #[test]
    fn contact_outside_bounds_is_ignored() {
        let view = view();
        let mut effect = DampedScrollEffect::default();
        let mut resolver = GestureResolver::new();
        let outcome =
            resolver.pointer_down(PointerEvent::new(1, 250.0, 20.0, 0.0), &view, &mut effect, limits());
        assert!(!outcome.consumed);
        assert_eq!(resolver.contact_count(), 0);
    }

    #[test]
    fn pinch_doubling_distance_doubles_scale_around_midpoint() {
        let mut view = view();
        let mut effect = DampedScrollEffect::default();
        let mut resolver = GestureResolver::new();
        resolver.pointer_down(PointerEvent::new(1, 50.0, 20.0, 0.0), &view, &mut effect, limits());
        resolver.pointer_down(PointerEvent::new(2, 100.0, 20.0, 0.0), &view, &mut effect, limits());
        assert!(!effect.is_manual());

        let outcome = resolver.pointer_move(
            PointerEvent::new(2, 150.0, 20.0, 0.1),
            &mut view,
            &mut effect,
            limits(),
        );
        assert!(outcome.zoomed);
        assert!(!outcome.translated);
        assert!((view.scale() - 20.0).abs() <= 1e-9);
        assert!((view.index_0() - 2.5).abs() <= 1e-9);
        assert!((effect.scroll() - view.index_mid()).abs() <= 1e-12);
        assert!(effect.is_manual());
    }

    #[test]
    fn pinch_is_clamped_to_scale_max() {
        let mut view = view();
        let mut effect = DampedScrollEffect::default();
        let mut resolver = GestureResolver::new();
        resolver.pointer_down(PointerEvent::new(1, 90.0, 20.0, 0.0), &view, &mut effect, limits());
        resolver.pointer_down(PointerEvent::new(2, 100.0, 20.0, 0.0), &view, &mut effect, limits());
        // distance 10 -> 100: ratio 10, scale would be 100
        resolver.pointer_move(PointerEvent::new(2, 190.0, 20.0, 0.1), &mut view, &mut effect, limits());
        assert!((view.scale() - 50.0).abs() <= 1e-9);
    }

    #[test]
    fn third_contact_between_pair_does_not_zoom() {
        let mut view = view();
        let mut effect = DampedScrollEffect::default();
        let mut resolver = GestureResolver::new();
        for (id, x) in [(1, 20.0), (2, 180.0), (3, 100.0)] {
            resolver.pointer_down(PointerEvent::new(id, x, 20.0, 0.0), &view, &mut effect, limits());
        }
        let outcome = resolver.pointer_move(
            PointerEvent::new(3, 110.0, 20.0, 0.1),
            &mut view,
            &mut effect,
            limits(),
        );
        assert!(!outcome.zoomed);
        assert!((view.scale() - 10.0).abs() <= 1e-12);
    }

    #[test]
    fn non_zoomable_ignores_pinch() {
        let mut view = view();
        let mut effect = DampedScrollEffect::default();
        let mut resolver = GestureResolver::new();
        let limits = GestureLimits {
            zoomable: false,
            ..limits()
        };
        resolver.pointer_down(PointerEvent::new(1, 50.0, 20.0, 0.0), &view, &mut effect, limits);
        resolver.pointer_down(PointerEvent::new(2, 100.0, 20.0, 0.0), &view, &mut effect, limits);
        let outcome =
            resolver.pointer_move(PointerEvent::new(2, 150.0, 20.0, 0.1), &mut view, &mut effect, limits);
        assert!(!outcome.zoomed);
        assert_eq!(view.index_0(), 0.0);
    }
}
