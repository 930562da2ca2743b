//! Label arbitration for one redraw pass.
//!
//! Every pass follows the same cycle: `begin_pass`, then one `register` per
//! drawn mark, then `finish_pass` to collect the placements to render.
//! `TickLabeller` drops labels that would land on the same anchor, keeping
//! the one from the finest grid. `SlotLabeller` keeps rasterized bitmaps
//! across passes for roulettes, and `CompositeLabeller` routes grids to
//! member labellers by variant tag.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::{AxisViewport, Grid, GridId, GridTag, HAlign, LabelAlign, Rect, VAlign};
use crate::render::{LabelBitmap, LabelHandle, LabelPlacement, LabelRasterizer};

/// Anchors closer than this (in pixels) share a registrar slot.
const ANCHOR_TOLERANCE: f64 = 1e-6;

/// Per-pass inputs shared by all registrations.
#[derive(Debug, Clone, Copy)]
pub struct LabelContext<'a> {
    pub view: &'a AxisViewport,
    /// Gap between a mark and its label.
    pub padding: f64,
}

pub trait Labeller {
    /// Prepares for a new pass.
    fn begin_pass(&mut self);

    /// Offers a label for the mark of `grid` at local `index` drawn at `rect`.
    fn register<T: LabelRasterizer + ?Sized>(
        &mut self,
        ctx: &LabelContext<'_>,
        id: GridId,
        grid: &Grid,
        index: f64,
        rect: Rect,
        rasterizer: &mut T,
    );

    /// Emits the placements of the pass.
    fn finish_pass(&mut self) -> Vec<LabelPlacement>;
}

/// Anchor bucket of `ANCHOR_TOLERANCE` width, plus alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RegistrarKey {
    bucket: OrderedFloat<f64>,
    align: LabelAlign,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    placement: LabelPlacement,
    anchor: f64,
    scale_factor: f64,
}

/// Default labeller: at most one label per (anchor, alignment) per pass,
/// finer grids winning.
#[derive(Debug, Default)]
pub struct TickLabeller {
    registrar: IndexMap<RegistrarKey, Candidate>,
}

impl TickLabeller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of labels currently held for this pass.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.registrar.len()
    }

    /// Slot for `anchor`: a held label within tolerance in this or an
    /// adjacent bucket, or this anchor's own bucket.
    fn slot_for(&self, anchor: f64, align: LabelAlign) -> RegistrarKey {
        let bucket = (anchor / ANCHOR_TOLERANCE).round();
        [bucket, bucket - 1.0, bucket + 1.0]
            .into_iter()
            .map(|bucket| RegistrarKey {
                bucket: OrderedFloat(bucket),
                align,
            })
            .find(|key| {
                self.registrar
                    .get(key)
                    .is_some_and(|held| (held.anchor - anchor).abs() <= ANCHOR_TOLERANCE)
            })
            .unwrap_or(RegistrarKey {
                bucket: OrderedFloat(bucket),
                align,
            })
    }
}

impl Labeller for TickLabeller {
    fn begin_pass(&mut self) {
        self.registrar.clear();
    }

    fn register<T: LabelRasterizer + ?Sized>(
        &mut self,
        ctx: &LabelContext<'_>,
        id: GridId,
        grid: &Grid,
        index: f64,
        rect: Rect,
        rasterizer: &mut T,
    ) {
        let view = ctx.view;
        if grid.spacing(view.scale()) < grid.min_label_space {
            return;
        }
        let Some(text) = grid.label_text(index) else {
            return;
        };

        let orientation = view.orientation();
        let anchor = rect.mid_along(orientation);
        let key = self.slot_for(anchor, grid.label_align(orientation));
        if let Some(existing) = self.registrar.get(&key) {
            if existing.scale_factor >= grid.scale_factor {
                return;
            }
        }

        let Some(bitmap) = rasterizer.rasterize(&text, grid.label_font_size()) else {
            return;
        };
        let (x, y) = label_origin(view, grid, rect, bitmap, ctx.padding);
        self.registrar.insert(
            key,
            Candidate {
                placement: LabelPlacement {
                    grid: id,
                    index,
                    bitmap,
                    x,
                    y,
                },
                anchor,
                scale_factor: grid.scale_factor,
            },
        );
    }

    fn finish_pass(&mut self) -> Vec<LabelPlacement> {
        self.registrar
            .drain(..)
            .map(|(_, candidate)| candidate.placement)
            .collect()
    }
}

/// Positions a label beside its mark, on the side facing away from the
/// widget edge the mark hugs.
fn label_origin(
    view: &AxisViewport,
    grid: &Grid,
    rect: Rect,
    bitmap: LabelBitmap,
    padding: f64,
) -> (f64, f64) {
    let length = grid.tick_size.length;
    if view.is_vertical() {
        let anchor = rect.center_y();
        let x = match grid.halign {
            HAlign::Left | HAlign::LineRight => rect.x + length + padding,
            HAlign::Right | HAlign::LineLeft => rect.x - bitmap.width - padding,
        };
        (x, anchor - bitmap.height / 2.0)
    } else {
        let anchor = rect.center_x();
        let y = match grid.valign {
            VAlign::Top | VAlign::LineBottom => rect.y - bitmap.height - padding,
            VAlign::Bottom | VAlign::LineTop => rect.y + length + padding,
        };
        (anchor - bitmap.width / 2.0, y)
    }
}

/// Labeller for roulette slots.
///
/// Bitmaps are cached by lattice index and only rasterized when an index
/// scrolls into view; indices that leave the view are evicted at the end of
/// the pass and their handles reported through `take_evicted`.
#[derive(Debug, Default)]
pub struct SlotLabeller {
    cache: IndexMap<OrderedFloat<f64>, LabelBitmap>,
    pass: IndexMap<OrderedFloat<f64>, LabelPlacement>,
    evicted: Vec<LabelHandle>,
}

impl SlotLabeller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Handles of bitmaps dropped since the last call.
    pub fn take_evicted(&mut self) -> Vec<LabelHandle> {
        std::mem::take(&mut self.evicted)
    }
}

impl Labeller for SlotLabeller {
    fn begin_pass(&mut self) {
        self.pass.clear();
    }

    fn register<T: LabelRasterizer + ?Sized>(
        &mut self,
        ctx: &LabelContext<'_>,
        id: GridId,
        grid: &Grid,
        index: f64,
        rect: Rect,
        rasterizer: &mut T,
    ) {
        let key = OrderedFloat(index);
        let bitmap = match self.cache.get(&key) {
            Some(bitmap) => *bitmap,
            None => {
                let Some(text) = grid.label_text(index) else {
                    return;
                };
                let Some(bitmap) = rasterizer.rasterize(&text, grid.label_font_size()) else {
                    return;
                };
                self.cache.insert(key, bitmap);
                bitmap
            }
        };

        let bounds = ctx.view.bounds();
        let (x, y) = if ctx.view.is_vertical() {
            (
                bounds.center_x() - bitmap.width / 2.0,
                rect.center_y() - bitmap.height / 2.0,
            )
        } else {
            (
                rect.center_x() - bitmap.width / 2.0,
                bounds.center_y() - bitmap.height / 2.0,
            )
        };
        self.pass.insert(
            key,
            LabelPlacement {
                grid: id,
                index,
                bitmap,
                x,
                y,
            },
        );
    }

    fn finish_pass(&mut self) -> Vec<LabelPlacement> {
        let pass = &self.pass;
        let evicted = &mut self.evicted;
        self.cache.retain(|key, bitmap| {
            let keep = pass.contains_key(key);
            if !keep {
                evicted.push(bitmap.handle);
            }
            keep
        });
        trace!(
            visible = self.pass.len(),
            evicted = self.evicted.len(),
            "slot labels finished"
        );
        self.pass.drain(..).map(|(_, placement)| placement).collect()
    }
}

/// Member of a `CompositeLabeller`.
#[derive(Debug)]
pub enum MemberLabeller {
    Tick(TickLabeller),
    Slot(SlotLabeller),
}

impl Labeller for MemberLabeller {
    fn begin_pass(&mut self) {
        match self {
            Self::Tick(labeller) => labeller.begin_pass(),
            Self::Slot(labeller) => labeller.begin_pass(),
        }
    }

    fn register<T: LabelRasterizer + ?Sized>(
        &mut self,
        ctx: &LabelContext<'_>,
        id: GridId,
        grid: &Grid,
        index: f64,
        rect: Rect,
        rasterizer: &mut T,
    ) {
        match self {
            Self::Tick(labeller) => labeller.register(ctx, id, grid, index, rect, rasterizer),
            Self::Slot(labeller) => labeller.register(ctx, id, grid, index, rect, rasterizer),
        }
    }

    fn finish_pass(&mut self) -> Vec<LabelPlacement> {
        match self {
            Self::Tick(labeller) => labeller.finish_pass(),
            Self::Slot(labeller) => labeller.finish_pass(),
        }
    }
}

/// Routes registrations to member labellers by grid variant tag.
///
/// Tags without a route go to the first member.
#[derive(Debug, Default)]
pub struct CompositeLabeller {
    members: Vec<MemberLabeller>,
    routes: Vec<(GridTag, usize)>,
}

impl CompositeLabeller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member handling `tags`. A tag already routed keeps its first route.
    #[must_use]
    pub fn with_member(mut self, member: MemberLabeller, tags: &[GridTag]) -> Self {
        let position = self.members.len();
        self.members.push(member);
        for tag in tags {
            if !self.routes.iter().any(|(routed, _)| routed == tag) {
                self.routes.push((*tag, position));
            }
        }
        self
    }

    fn route(&self, tag: GridTag) -> Option<usize> {
        self.routes
            .iter()
            .find(|(routed, _)| *routed == tag)
            .map(|(_, position)| *position)
            .or(if self.members.is_empty() { None } else { Some(0) })
    }
}

impl Labeller for CompositeLabeller {
    fn begin_pass(&mut self) {
        for member in &mut self.members {
            member.begin_pass();
        }
    }

    fn register<T: LabelRasterizer + ?Sized>(
        &mut self,
        ctx: &LabelContext<'_>,
        id: GridId,
        grid: &Grid,
        index: f64,
        rect: Rect,
        rasterizer: &mut T,
    ) {
        if let Some(position) = self.route(grid.tag()) {
            self.members[position].register(ctx, id, grid, index, rect, rasterizer);
        }
    }

    fn finish_pass(&mut self) -> Vec<LabelPlacement> {
        self.members
            .iter_mut()
            .flat_map(|member| member.finish_pass())
            .collect()
    }
}

/// Labeller owned by a tickline.
#[derive(Debug)]
pub enum TicklineLabeller {
    Tick(TickLabeller),
    Slot(SlotLabeller),
    Composite(CompositeLabeller),
}

impl Default for TicklineLabeller {
    fn default() -> Self {
        Self::Tick(TickLabeller::default())
    }
}

impl Labeller for TicklineLabeller {
    fn begin_pass(&mut self) {
        match self {
            Self::Tick(labeller) => labeller.begin_pass(),
            Self::Slot(labeller) => labeller.begin_pass(),
            Self::Composite(labeller) => labeller.begin_pass(),
        }
    }

    fn register<T: LabelRasterizer + ?Sized>(
        &mut self,
        ctx: &LabelContext<'_>,
        id: GridId,
        grid: &Grid,
        index: f64,
        rect: Rect,
        rasterizer: &mut T,
    ) {
        match self {
            Self::Tick(labeller) => labeller.register(ctx, id, grid, index, rect, rasterizer),
            Self::Slot(labeller) => labeller.register(ctx, id, grid, index, rect, rasterizer),
            Self::Composite(labeller) => {
                labeller.register(ctx, id, grid, index, rect, rasterizer);
            }
        }
    }

    fn finish_pass(&mut self) -> Vec<LabelPlacement> {
        match self {
            Self::Tick(labeller) => labeller.finish_pass(),
            Self::Slot(labeller) => labeller.finish_pass(),
            Self::Composite(labeller) => labeller.finish_pass(),
        }
    }
}
