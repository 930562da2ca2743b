use crate::core::grid::{Grid, GridId};
use crate::error::TicklineResult;

/// Ordered collection of the grids drawn on one tickline.
///
/// Keeps `(scale_factor * min_space, id)` pairs sorted so the densest
/// visible grid can be found with one binary search per scale change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSet {
    grids: Vec<Grid>,
    tolerances: Vec<(f64, GridId)>,
}

impl GridSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grids(grids: Vec<Grid>) -> TicklineResult<Self> {
        for grid in &grids {
            grid.validate()?;
        }
        let mut set = Self {
            grids,
            tolerances: Vec::new(),
        };
        set.rebuild_tolerances();
        Ok(set)
    }

    pub fn push(&mut self, grid: Grid) -> TicklineResult<GridId> {
        grid.validate()?;
        let id = GridId(self.grids.len());
        self.grids.push(grid);
        self.rebuild_tolerances();
        Ok(id)
    }

    /// Replaces the grid at `id`; returns `false` if `id` is unknown.
    pub fn replace(&mut self, id: GridId, grid: Grid) -> TicklineResult<bool> {
        grid.validate()?;
        let Some(slot) = self.grids.get_mut(id.0) else {
            return Ok(false);
        };
        *slot = grid;
        self.rebuild_tolerances();
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.grids.clear();
        self.tolerances.clear();
    }

    #[must_use]
    pub fn get(&self, id: GridId) -> Option<&Grid> {
        self.grids.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridId, &Grid)> {
        self.grids
            .iter()
            .enumerate()
            .map(|(index, grid)| (GridId(index), grid))
    }

    /// Visible grid with the smallest spacing at `scale`, i.e. the one with
    /// the largest `scale_factor * min_space` not exceeding `scale`.
    #[must_use]
    pub fn densest(&self, scale: f64) -> Option<GridId> {
        let visible = self
            .tolerances
            .partition_point(|(tolerance, _)| *tolerance <= scale);
        visible
            .checked_sub(1)
            .map(|position| self.tolerances[position].1)
    }

    /// One lattice step of the densest grid, in global index units.
    #[must_use]
    pub fn extension(&self, scale: f64) -> f64 {
        self.densest(scale)
            .and_then(|id| self.get(id))
            .map_or(0.0, |grid| grid.globalize(1.0))
    }

    /// Zoom-out limit implied by the grids: the coarsest grid must keep its
    /// `min_space`.
    #[must_use]
    pub fn default_scale_min(&self) -> f64 {
        self.tolerances.first().map_or(0.0, |(tolerance, _)| *tolerance)
    }

    /// Zoom-in limit implied by the grids: one step of the finest grid may
    /// span at most the whole line.
    #[must_use]
    pub fn default_scale_max(&self, line_length: f64) -> f64 {
        self.grids
            .iter()
            .map(|grid| line_length * grid.scale_factor)
            .reduce(f64::max)
            .unwrap_or(f64::INFINITY)
    }

    fn rebuild_tolerances(&mut self) {
        self.tolerances = self
            .iter()
            .map(|(id, grid)| (grid.density_tolerance(), id))
            .collect();
        self.tolerances.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
}
