use crate::core::types::{Orientation, Point, Rect};

/// Which pair of viewport ends `AxisViewport::index_to_pos` should use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexFrame {
    /// The viewport's own `index_0`/`index_1`.
    Current,
    /// Explicit ends, as if the viewport were showing `[i0, i1]`.
    Ends { i0: f64, i1: f64 },
    /// Ends derived from a hypothetical center at the current scale.
    Mid(f64),
}

/// Mutable view record of one tickline: where the two ends of the widget sit
/// on the infinite global-index axis.
///
/// `index_0` always maps to `pos0` (the left or bottom edge of `bounds`) and
/// `index_1` to the opposite edge; `backward` flips the direction in which
/// indices grow so `index_0 > index_1` while the scale stays positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisViewport {
    orientation: Orientation,
    backward: bool,
    index_0: f64,
    index_1: f64,
    min_index: f64,
    max_index: f64,
    bounds: Rect,
    line_offset: f64,
}

impl AxisViewport {
    #[must_use]
    pub fn new(orientation: Orientation, bounds: Rect) -> Self {
        Self {
            orientation,
            backward: false,
            index_0: 0.0,
            index_1: 10.0,
            min_index: f64::NEG_INFINITY,
            max_index: f64::INFINITY,
            bounds,
            line_offset: 0.0,
        }
    }

    #[must_use]
    pub fn with_ends(mut self, index_0: f64, index_1: f64) -> Self {
        self.index_0 = index_0;
        self.index_1 = index_1;
        self
    }

    #[must_use]
    pub fn with_backward(mut self, backward: bool) -> Self {
        self.set_backward(backward);
        self
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.orientation.is_vertical()
    }

    #[must_use]
    pub fn backward(&self) -> bool {
        self.backward
    }

    /// Sets the direction flag. Turning `backward` on while the ends are
    /// ascending swaps them so the scale keeps its sign.
    pub fn set_backward(&mut self, backward: bool) {
        self.backward = backward;
        if backward && self.index_0 < self.index_1 {
            std::mem::swap(&mut self.index_0, &mut self.index_1);
        } else if !backward && self.index_0 > self.index_1 {
            std::mem::swap(&mut self.index_0, &mut self.index_1);
        }
    }

    /// `-1.0` when `backward`, otherwise `1.0`.
    #[must_use]
    pub fn dir(&self) -> f64 {
        if self.backward { -1.0 } else { 1.0 }
    }

    #[must_use]
    pub fn index_0(&self) -> f64 {
        self.index_0
    }

    #[must_use]
    pub fn index_1(&self) -> f64 {
        self.index_1
    }

    pub fn set_ends(&mut self, index_0: f64, index_1: f64) {
        self.index_0 = index_0;
        self.index_1 = index_1;
    }

    #[must_use]
    pub fn min_index(&self) -> f64 {
        self.min_index
    }

    #[must_use]
    pub fn max_index(&self) -> f64 {
        self.max_index
    }

    pub fn set_index_limits(&mut self, min_index: f64, max_index: f64) {
        self.min_index = min_index;
        self.max_index = max_index;
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    #[must_use]
    pub fn line_offset(&self) -> f64 {
        self.line_offset
    }

    pub fn set_line_offset(&mut self, offset: f64) {
        self.line_offset = offset;
    }

    /// Absolute cross-axis coordinate of the drawn axis line.
    #[must_use]
    pub fn line_pos(&self) -> f64 {
        if self.is_vertical() {
            self.bounds.center_x() + self.line_offset
        } else {
            self.bounds.center_y() + self.line_offset
        }
    }

    /// Extent of the widget along the axis.
    #[must_use]
    pub fn line_length(&self) -> f64 {
        if self.is_vertical() {
            self.bounds.height
        } else {
            self.bounds.width
        }
    }

    /// Window coordinate at which the axis starts.
    #[must_use]
    pub fn pos0(&self) -> f64 {
        if self.is_vertical() {
            self.bounds.y
        } else {
            self.bounds.x
        }
    }

    /// Screen distance per unit of global index.
    ///
    /// Returns `f64::INFINITY` when both ends coincide.
    #[must_use]
    pub fn scale(&self) -> f64 {
        let span = self.index_1 - self.index_0;
        if span == 0.0 {
            return f64::INFINITY;
        }
        self.line_length() / span * self.dir()
    }

    /// Rescales around `index_0`. Non-positive or NaN scales are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_nan() || scale <= 0.0 {
            return;
        }
        self.index_1 = self.index_0 + self.dir() * self.line_length() / scale;
    }

    #[must_use]
    pub fn index_mid(&self) -> f64 {
        (self.index_0 + self.index_1) / 2.0
    }

    /// Moves the viewport so `mid` sits at its center, keeping the scale.
    pub fn set_index_mid(&mut self, mid: f64) {
        let half = self.half_span();
        self.index_0 = mid - half;
        self.index_1 = mid + half;
    }

    /// Ends that would center `mid` at the current scale.
    #[must_use]
    pub fn ends_centered_on(&self, mid: f64) -> (f64, f64) {
        let half = self.half_span();
        (mid - half, mid + half)
    }

    pub fn translate_by(&mut self, distance: f64) {
        self.index_0 += distance;
        self.index_1 += distance;
    }

    /// Smaller and larger of the two ends.
    #[must_use]
    pub fn visible_range(&self) -> (f64, f64) {
        (
            self.index_0.min(self.index_1),
            self.index_0.max(self.index_1),
        )
    }

    /// Converts an axis coordinate to a global index. With `window` the
    /// coordinate is taken relative to the window instead of the widget.
    #[must_use]
    pub fn pos_to_index(&self, pos: f64, window: bool) -> f64 {
        let origin = if window { self.pos0() } else { 0.0 };
        self.index_0 + self.dir() * (pos - origin) / self.scale()
    }

    /// Window coordinate of a global index, on- or off-screen.
    #[must_use]
    pub fn index_to_pos(&self, index: f64, frame: IndexFrame) -> f64 {
        let (i0, i1) = match frame {
            IndexFrame::Current => (self.index_0, self.index_1),
            IndexFrame::Ends { i0, i1 } => (i0, i1),
            IndexFrame::Mid(mid) => self.ends_centered_on(mid),
        };
        if i0 == i1 {
            return self.pos0();
        }
        (i0 - index) / (i0 - i1) * self.line_length() + self.pos0()
    }

    /// Axis coordinate of the midpoint between two window points, which is
    /// the point held fixed during a pinch.
    #[must_use]
    pub fn calc_intercept(&self, anchor: Point, antianchor: Point, to_window: bool) -> f64 {
        let mid = (anchor.along(self.orientation) + antianchor.along(self.orientation)) / 2.0;
        if to_window { mid } else { mid - self.pos0() }
    }

    fn half_span(&self) -> f64 {
        let scale = self.scale();
        if !scale.is_finite() {
            return 0.0;
        }
        self.line_length() / 2.0 / scale * self.dir()
    }
}
