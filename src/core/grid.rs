use serde::{Deserialize, Serialize};

use crate::core::axis::{AxisViewport, IndexFrame};
use crate::core::slot::{SlotKind, ValueFormat};
use crate::core::types::{HAlign, LabelAlign, Orientation, Rect, TickSize, VAlign};
use crate::error::{TicklineError, TicklineResult};

/// Stable handle of a grid inside a `GridSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridId(pub usize);

/// Closed set of grid behaviors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridVariant {
    /// Regular lattice `k + offset` with numeric labels.
    #[default]
    Lattice,
    /// Regular lattice without labels, usually the finest grid.
    Labelless,
    /// Marks only at the listed local indices, sorted ascending.
    DataList { data: Vec<f64> },
    /// Lattice whose labels are discrete roulette values.
    Slot { slot: SlotKind, format: ValueFormat },
}

/// Variant tag used to route grids to labellers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridTag {
    Lattice,
    Labelless,
    DataList,
    Slot,
}

/// One visible mark: window coordinate along the axis and local index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    pub pos: f64,
    pub index: f64,
}

/// One set of evenly spaced (or listed) marks drawn on a tickline.
///
/// A grid with `scale_factor = 5` places marks every `1/5` global index; its
/// marks are suppressed entirely once they would sit closer than `min_space`
/// on screen, and lose their labels below `min_label_space`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    #[serde(default = "default_min_space")]
    pub min_space: f64,
    #[serde(default = "default_min_label_space")]
    pub min_label_space: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub halign: HAlign,
    #[serde(default)]
    pub valign: VAlign,
    #[serde(default)]
    pub label_global: bool,
    #[serde(default)]
    pub tick_size: TickSize,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub variant: GridVariant,
}

fn default_scale_factor() -> f64 {
    1.0
}

fn default_min_space() -> f64 {
    10.0
}

fn default_min_label_space() -> f64 {
    37.0
}

const SLOT_FONT_SIZE: f64 = 20.0;

impl Default for Grid {
    fn default() -> Self {
        Self::lattice()
    }
}

impl Grid {
    /// Labelled lattice with unit spacing.
    #[must_use]
    pub fn lattice() -> Self {
        Self {
            scale_factor: default_scale_factor(),
            min_space: default_min_space(),
            min_label_space: default_min_label_space(),
            offset: 0.0,
            halign: HAlign::Left,
            valign: VAlign::Bottom,
            label_global: false,
            tick_size: TickSize::default(),
            font_size: None,
            variant: GridVariant::Lattice,
        }
    }

    #[must_use]
    pub fn labelless() -> Self {
        Self {
            variant: GridVariant::Labelless,
            ..Self::lattice()
        }
    }

    /// Sparse grid at the given local indices. Labels are shown at any
    /// spacing by default since the data is irregular.
    pub fn data_list(data: Vec<f64>) -> TicklineResult<Self> {
        validate_data_list(&data)?;
        Ok(Self {
            min_label_space: 0.0,
            halign: HAlign::LineRight,
            variant: GridVariant::DataList { data },
            ..Self::lattice()
        })
    }

    #[must_use]
    pub fn slot(slot: SlotKind, format: ValueFormat) -> Self {
        Self {
            tick_size: TickSize::new(0.0, 0.0),
            font_size: Some(SLOT_FONT_SIZE),
            variant: GridVariant::Slot { slot, format },
            ..Self::lattice()
        }
    }

    #[must_use]
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    #[must_use]
    pub fn with_min_space(mut self, min_space: f64) -> Self {
        self.min_space = min_space;
        self
    }

    #[must_use]
    pub fn with_min_label_space(mut self, min_label_space: f64) -> Self {
        self.min_label_space = min_label_space;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_halign(mut self, halign: HAlign) -> Self {
        self.halign = halign;
        self
    }

    #[must_use]
    pub fn with_valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    #[must_use]
    pub fn with_label_global(mut self, label_global: bool) -> Self {
        self.label_global = label_global;
        self
    }

    #[must_use]
    pub fn with_tick_size(mut self, tick_size: TickSize) -> Self {
        self.tick_size = tick_size;
        self
    }

    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn validate(&self) -> TicklineResult<()> {
        if !self.scale_factor.is_finite() || self.scale_factor < 1.0 {
            return Err(TicklineError::InvalidConfig(format!(
                "grid scale_factor must be finite and >= 1, got {}",
                self.scale_factor
            )));
        }
        for (name, value) in [
            ("min_space", self.min_space),
            ("min_label_space", self.min_label_space),
            ("tick_size.width", self.tick_size.width),
            ("tick_size.length", self.tick_size.length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TicklineError::InvalidConfig(format!(
                    "grid {name} must be finite and >= 0"
                )));
            }
        }
        if !self.offset.is_finite() {
            return Err(TicklineError::InvalidConfig(
                "grid offset must be finite".to_owned(),
            ));
        }
        if let Some(font_size) = self.font_size {
            if !font_size.is_finite() || font_size <= 0.0 {
                return Err(TicklineError::InvalidConfig(
                    "grid font_size must be finite and > 0".to_owned(),
                ));
            }
        }
        match &self.variant {
            GridVariant::DataList { data } => validate_data_list(data),
            GridVariant::Slot { slot, .. } => match slot {
                SlotKind::Cyclic { cycle, .. } if *cycle < 1 => Err(
                    TicklineError::InvalidConfig("slot cycle must be >= 1".to_owned()),
                ),
                _ => Ok(()),
            },
            GridVariant::Lattice | GridVariant::Labelless => Ok(()),
        }
    }

    #[must_use]
    pub fn tag(&self) -> GridTag {
        match self.variant {
            GridVariant::Lattice => GridTag::Lattice,
            GridVariant::Labelless => GridTag::Labelless,
            GridVariant::DataList { .. } => GridTag::DataList,
            GridVariant::Slot { .. } => GridTag::Slot,
        }
    }

    /// Slot mapping, if this grid is a roulette slot.
    #[must_use]
    pub fn slot_kind(&self) -> Option<SlotKind> {
        match self.variant {
            GridVariant::Slot { slot, .. } => Some(slot),
            _ => None,
        }
    }

    /// Screen distance between consecutive marks at tickline `scale`.
    #[must_use]
    pub fn spacing(&self, scale: f64) -> f64 {
        scale / self.scale_factor
    }

    /// Smallest tickline scale at which this grid is drawn.
    #[must_use]
    pub fn density_tolerance(&self) -> f64 {
        self.scale_factor * self.min_space
    }

    #[must_use]
    pub fn localize(&self, global_index: f64) -> f64 {
        global_index * self.scale_factor
    }

    #[must_use]
    pub fn globalize(&self, local_index: f64) -> f64 {
        local_index / self.scale_factor
    }

    #[must_use]
    pub fn label_align(&self, orientation: Orientation) -> LabelAlign {
        match orientation {
            Orientation::Vertical => LabelAlign::H(self.halign),
            Orientation::Horizontal => LabelAlign::V(self.valign),
        }
    }

    #[must_use]
    pub fn label_font_size(&self) -> f64 {
        self.font_size.unwrap_or(match self.variant {
            GridVariant::Slot { .. } => SLOT_FONT_SIZE,
            _ => self.tick_size.length * 2.0,
        })
    }

    /// Label text for the mark at local `index`, or `None` when this grid
    /// does not label it.
    #[must_use]
    pub fn label_text(&self, index: f64) -> Option<String> {
        match &self.variant {
            GridVariant::Labelless => None,
            GridVariant::Lattice | GridVariant::DataList { .. } => {
                let value = if self.label_global {
                    self.globalize(index)
                } else {
                    index
                };
                Some(format_index(value))
            }
            GridVariant::Slot { slot, format } => Some(format.format(slot.slot_value(index))),
        }
    }

    /// Screen rect of a mark centered at window coordinate `pos`.
    #[must_use]
    pub fn mark_rect(&self, view: &AxisViewport, pos: f64) -> Rect {
        let TickSize { width, length } = self.tick_size;
        let bounds = view.bounds();
        if view.is_vertical() {
            let x = match self.halign {
                HAlign::Left => bounds.x,
                HAlign::LineLeft => view.line_pos() - length,
                HAlign::LineRight => view.line_pos(),
                HAlign::Right => bounds.right() - length,
            };
            Rect::new(x, pos - width / 2.0, length, width)
        } else {
            let y = match self.valign {
                VAlign::Top => bounds.top() - length,
                VAlign::LineTop => view.line_pos(),
                VAlign::LineBottom => view.line_pos() - length,
                VAlign::Bottom => bounds.y,
            };
            Rect::new(pos - width / 2.0, y, width, length)
        }
    }

    /// Lazily enumerates the marks to draw.
    ///
    /// `extend_by` widens both ends of the viewport by that many global
    /// index units, normally one lattice step of the densest visible grid,
    /// so marks centered just offscreen are still produced. Pass `0.0` for a
    /// strict visibility test.
    #[must_use]
    pub fn visible_marks(&self, view: &AxisViewport, extend_by: f64) -> VisibleMarks<'_> {
        let scale = view.scale();
        let spacing = self.spacing(scale);
        if !scale.is_finite() || spacing <= 0.0 || spacing < self.min_space {
            return VisibleMarks::empty();
        }

        let (lo, hi) = view.visible_range();
        let extend_by = if extend_by.is_finite() {
            extend_by.abs()
        } else {
            0.0
        };
        let lo = self.localize(lo - extend_by);
        let hi = self.localize(hi + extend_by);
        let forward = !view.backward();

        let cursor = match &self.variant {
            GridVariant::DataList { data } => {
                let offset = self.offset;
                if forward {
                    let start = data.partition_point(|&d| d + offset < lo);
                    Cursor::Listed {
                        data,
                        offset,
                        next: start,
                        remaining: data.len() - start,
                    }
                } else {
                    let end = data.partition_point(|&d| d + offset <= hi);
                    Cursor::ListedBackward {
                        data,
                        offset,
                        remaining: end,
                    }
                }
            }
            _ => {
                let first = if forward {
                    (lo - self.offset).ceil() + self.offset
                } else {
                    (hi - self.offset).floor() + self.offset
                };
                Cursor::Lattice {
                    first,
                    step: view.dir(),
                    taken: 0,
                }
            }
        };

        VisibleMarks {
            view: *view,
            scale_factor: self.scale_factor,
            lo,
            hi,
            cursor,
            done: false,
        }
    }
}

/// Iterator returned by `Grid::visible_marks`. Marks come out with
/// increasing screen position; the sequence is finite and not restartable.
#[derive(Debug, Clone)]
pub struct VisibleMarks<'a> {
    view: AxisViewport,
    scale_factor: f64,
    lo: f64,
    hi: f64,
    cursor: Cursor<'a>,
    done: bool,
}

#[derive(Debug, Clone)]
enum Cursor<'a> {
    Empty,
    Lattice {
        first: f64,
        step: f64,
        taken: u64,
    },
    Listed {
        data: &'a [f64],
        offset: f64,
        next: usize,
        remaining: usize,
    },
    ListedBackward {
        data: &'a [f64],
        offset: f64,
        remaining: usize,
    },
}

impl VisibleMarks<'_> {
    fn empty() -> Self {
        Self {
            view: AxisViewport::new(Orientation::default(), Rect::default()),
            scale_factor: 1.0,
            lo: 0.0,
            hi: 0.0,
            cursor: Cursor::Empty,
            done: true,
        }
    }

    fn mark_at(&self, index: f64) -> Mark {
        Mark {
            pos: self
                .view
                .index_to_pos(index / self.scale_factor, IndexFrame::Current),
            index,
        }
    }
}

impl Iterator for VisibleMarks<'_> {
    type Item = Mark;

    fn next(&mut self) -> Option<Mark> {
        if self.done {
            return None;
        }
        let index = match &mut self.cursor {
            Cursor::Empty => None,
            Cursor::Lattice { first, step, taken } => {
                let index = *first + *step * (*taken as f64);
                *taken += 1;
                Some(index)
            }
            Cursor::Listed {
                data,
                offset,
                next,
                remaining,
            } => {
                if *remaining == 0 {
                    None
                } else {
                    let index = data[*next] + *offset;
                    *next += 1;
                    *remaining -= 1;
                    Some(index)
                }
            }
            Cursor::ListedBackward {
                data,
                offset,
                remaining,
            } => {
                if *remaining == 0 {
                    None
                } else {
                    *remaining -= 1;
                    Some(data[*remaining] + *offset)
                }
            }
        };

        match index {
            Some(index) if index >= self.lo && index <= self.hi => Some(self.mark_at(index)),
            _ => {
                self.done = true;
                None
            }
        }
    }
}

fn validate_data_list(data: &[f64]) -> TicklineResult<()> {
    if data.iter().any(|value| !value.is_finite()) {
        return Err(TicklineError::InvalidData(
            "data list indices must be finite".to_owned(),
        ));
    }
    if data.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(TicklineError::InvalidData(
            "data list indices must be sorted ascending".to_owned(),
        ));
    }
    Ok(())
}

/// Formats an index without trailing zeros: `5`, `0.2`, `-1.25`.
fn format_index(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        let whole = rounded as i64;
        return whole.to_string();
    }
    let text = format!("{value:.6}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

#[cfg(test)]
mod tests {
    use super::{Grid, GridTag, format_index};
    use crate::core::axis::AxisViewport;
    use crate::core::slot::{SlotKind, ValueFormat};
    use crate::core::types::{HAlign, Orientation, Rect, TickSize, VAlign};

    fn horizontal(index_0: f64, index_1: f64) -> AxisViewport {
        AxisViewport::new(Orientation::Horizontal, Rect::new(0.0, 0.0, 100.0, 40.0))
            .with_ends(index_0, index_1)
    }

    #[test]
    fn lattice_marks_cover_viewport_in_order() {
        let grid = Grid::lattice();
        let marks: Vec<_> = grid.visible_marks(&horizontal(0.0, 10.0), 0.0).collect();
        let indices: Vec<f64> = marks.iter().map(|mark| mark.index).collect();
        assert_eq!(indices, (0..=10).map(f64::from).collect::<Vec<_>>());
        assert!((marks[5].pos - 50.0).abs() <= 1e-9);
    }

    #[test]
    fn too_sparse_grid_yields_nothing() {
        let grid = Grid::lattice().with_scale_factor(5.0);
        // spacing = 10 / 5 = 2 < min_space 10
        assert_eq!(grid.visible_marks(&horizontal(0.0, 10.0), 0.0).count(), 0);
    }

    #[test]
    fn offset_shifts_lattice() {
        let grid = Grid::lattice().with_offset(0.5);
        let indices: Vec<f64> = grid
            .visible_marks(&horizontal(0.0, 3.0), 0.0)
            .map(|mark| mark.index)
            .collect();
        assert_eq!(indices, vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn extension_adds_one_step_each_side() {
        let grid = Grid::lattice().with_min_space(1.0);
        let indices: Vec<f64> = grid
            .visible_marks(&horizontal(0.5, 9.5), 1.0)
            .map(|mark| mark.index)
            .collect();
        assert_eq!(indices.first().copied(), Some(0.0));
        assert_eq!(indices.last().copied(), Some(10.0));
    }

    #[test]
    fn backward_lattice_walks_down_with_increasing_position() {
        let view = horizontal(0.0, 10.0).with_backward(true);
        let marks: Vec<_> = Grid::lattice().visible_marks(&view, 0.0).collect();
        assert_eq!(marks.first().map(|mark| mark.index), Some(10.0));
        assert_eq!(marks.last().map(|mark| mark.index), Some(0.0));
        assert!(marks.windows(2).all(|pair| pair[0].pos < pair[1].pos));
    }

    #[test]
    fn data_list_respects_bounds_in_both_directions() {
        let grid = Grid::data_list(vec![-3.0, 1.0, 2.0, 4.0, 8.0, 16.0])
            .expect("sorted data")
            .with_min_space(1.0);
        let forward: Vec<f64> = grid
            .visible_marks(&horizontal(0.0, 10.0), 0.0)
            .map(|mark| mark.index)
            .collect();
        assert_eq!(forward, vec![1.0, 2.0, 4.0, 8.0]);

        let view = horizontal(0.0, 10.0).with_backward(true);
        let backward: Vec<f64> = grid.visible_marks(&view, 0.0).map(|mark| mark.index).collect();
        assert_eq!(backward, vec![8.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn unsorted_data_list_is_rejected() {
        assert!(Grid::data_list(vec![2.0, 1.0]).is_err());
    }

    #[test]
    fn degenerate_viewport_enumerates_nothing() {
        assert_eq!(Grid::lattice().visible_marks(&horizontal(4.0, 4.0), 1.0).count(), 0);
    }

    #[test]
    fn labels_follow_variant() {
        let global = Grid::lattice().with_scale_factor(5.0).with_label_global(true);
        assert_eq!(global.label_text(6.0).as_deref(), Some("1.2"));
        assert_eq!(Grid::lattice().label_text(7.0).as_deref(), Some("7"));
        assert_eq!(Grid::labelless().label_text(7.0), None);
        let slot = Grid::slot(
            SlotKind::cyclic(60, true).expect("cycle"),
            ValueFormat::ZeroPadded { width: 2 },
        );
        assert_eq!(slot.label_text(65.0).as_deref(), Some("05"));
        assert_eq!(slot.tag(), GridTag::Slot);
    }

    #[test]
    fn mark_rect_follows_alignment() {
        let view = AxisViewport::new(Orientation::Vertical, Rect::new(0.0, 0.0, 60.0, 100.0));
        let grid = Grid::lattice()
            .with_tick_size(TickSize::new(2.0, 8.0))
            .with_halign(HAlign::Right);
        let rect = grid.mark_rect(&view, 50.0);
        assert_eq!(rect, Rect::new(52.0, 49.0, 8.0, 2.0));

        let view = AxisViewport::new(Orientation::Horizontal, Rect::new(0.0, 0.0, 100.0, 60.0));
        let grid = Grid::lattice().with_valign(VAlign::LineTop);
        let rect = grid.mark_rect(&view, 20.0);
        assert_eq!(rect, Rect::new(19.0, 30.0, 2.0, 8.0));
    }

    #[test]
    fn index_formatting_trims_zeros() {
        assert_eq!(format_index(3.0), "3");
        assert_eq!(format_index(-0.25), "-0.25");
        assert_eq!(format_index(0.2), "0.2");
    }
}
