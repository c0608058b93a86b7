/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It divides a rectangular region of the world into uniform cells and buckets
 * boid indices by position, so a neighbor query only has to look at the few
 * cells around a boid instead of the whole flock.
 *
 * Optimized for performance by:
 * - Tracking which cells are non-empty, so clearing and scanning skip empty space
 * - Storing indices into the flock rather than references, so resizing the
 *   flock can never leave a cell pointing at a moved boid
 * - Clamping out-of-range positions into the edge cells instead of bounds checks
 *   at every access
 */

use std::collections::BTreeSet;

use nannou::prelude::*;

use crate::error::{Result, SimulationError};

/// Column/row address of a grid cell. Column grows with x, row grows with y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex {
    pub column: usize,
    pub row: usize,
}

impl CellIndex {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    bounds: Rect,
    cell_size: Vec2,
    columns: usize,
    rows: usize,
    // Column-major: cells[column * rows + row]
    cells: Vec<Vec<usize>>,
    active_cells: BTreeSet<CellIndex>,
    clamped_last_rebuild: usize,
}

impl SpatialGrid {
    /// Allocate `ceil(width / cell_width) x ceil(height / cell_height)` buckets
    /// covering `bounds`.
    pub fn new(bounds: Rect, cell_size: Vec2) -> Result<Self> {
        if !(cell_size.x > 0.0 && cell_size.y > 0.0 && cell_size.x.is_finite() && cell_size.y.is_finite()) {
            return Err(SimulationError::InvalidCellSize {
                width: cell_size.x,
                height: cell_size.y,
            });
        }
        if !(bounds.w() > 0.0 && bounds.h() > 0.0 && bounds.w().is_finite() && bounds.h().is_finite()) {
            return Err(SimulationError::EmptyGridBounds {
                width: bounds.w(),
                height: bounds.h(),
            });
        }

        let columns = (bounds.w() / cell_size.x).ceil() as usize;
        let rows = (bounds.h() / cell_size.y).ceil() as usize;

        Ok(Self {
            bounds,
            cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
            active_cells: BTreeSet::new(),
            clamped_last_rebuild: 0,
        })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// (columns, rows)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Unclamped cell coordinates of a position. May lie outside the grid.
    #[inline]
    pub fn cell_coords(&self, position: Point2) -> (isize, isize) {
        // Float-to-int casts saturate, and NaN becomes 0
        let column = ((position.x - self.bounds.left()) / self.cell_size.x).floor() as isize;
        let row = ((position.y - self.bounds.bottom()) / self.cell_size.y).floor() as isize;
        (column, row)
    }

    /// Cell containing `position`. Positions outside the grid are clamped into the
    /// nearest edge cell.
    #[inline]
    pub fn cell_index(&self, position: Point2) -> CellIndex {
        let (column, row) = self.cell_coords(position);
        CellIndex {
            column: column.clamp(0, self.columns as isize - 1) as usize,
            row: row.clamp(0, self.rows as isize - 1) as usize,
        }
    }

    #[inline]
    fn slot(&self, index: CellIndex) -> usize {
        index.column * self.rows + index.row
    }

    /// Empty every bucket that held boids, and the active set.
    pub fn clear(&mut self) {
        for index in std::mem::take(&mut self.active_cells) {
            let slot = self.slot(index);
            self.cells[slot].clear();
        }
        self.clamped_last_rebuild = 0;
    }

    /// Bucket a boid by position and mark its cell active.
    pub fn insert(&mut self, boid_index: usize, position: Point2) -> CellIndex {
        let (column, row) = self.cell_coords(position);
        let index = self.cell_index(position);
        if column != index.column as isize || row != index.row as isize {
            self.clamped_last_rebuild += 1;
        }

        let slot = self.slot(index);
        self.cells[slot].push(boid_index);
        self.active_cells.insert(index);
        index
    }

    /// Boids in the cell at signed coordinates. Anything outside the grid is an
    /// empty cell.
    pub fn cell_at(&self, column: isize, row: isize) -> &[usize] {
        if column < 0 || row < 0 || column >= self.columns as isize || row >= self.rows as isize {
            return &[];
        }
        &self.cells[self.slot(CellIndex::new(column as usize, row as usize))]
    }

    pub fn cell(&self, index: CellIndex) -> &[usize] {
        self.cell_at(index.column as isize, index.row as isize)
    }

    /// Non-empty cells in column/row order.
    pub fn active_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.active_cells.iter().copied()
    }

    pub fn active_cell_count(&self) -> usize {
        self.active_cells.len()
    }

    /// How many inserts since the last clear had to be clamped into an edge cell.
    pub fn clamped_count(&self) -> usize {
        self.clamped_last_rebuild
    }

    /// World-space rectangle covered by a cell.
    pub fn cell_rect(&self, index: CellIndex) -> Rect {
        let left = self.bounds.left() + index.column as f32 * self.cell_size.x;
        let bottom = self.bounds.bottom() + index.row as f32 * self.cell_size.y;
        Rect::from_corners(
            pt2(left, bottom),
            pt2(left + self.cell_size.x, bottom + self.cell_size.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialGrid {
        SpatialGrid::new(
            Rect::from_corners(pt2(0.0, 0.0), pt2(50.0, 50.0)),
            vec2(10.0, 10.0),
        )
        .expect("valid grid")
    }

    #[test]
    fn dimensions_round_up() {
        let grid = SpatialGrid::new(
            Rect::from_corners(pt2(0.0, 0.0), pt2(55.0, 20.0)),
            vec2(10.0, 10.0),
        )
        .expect("valid grid");
        assert_eq!(grid.dimensions(), (6, 2));
    }

    #[test]
    fn rejects_degenerate_configuration() {
        let bounds = Rect::from_corners(pt2(0.0, 0.0), pt2(50.0, 50.0));
        assert!(matches!(
            SpatialGrid::new(bounds, vec2(0.0, 10.0)),
            Err(SimulationError::InvalidCellSize { .. })
        ));
        assert!(matches!(
            SpatialGrid::new(bounds, vec2(10.0, -1.0)),
            Err(SimulationError::InvalidCellSize { .. })
        ));
        assert!(matches!(
            SpatialGrid::new(Rect::from_corners(pt2(0.0, 0.0), pt2(0.0, 50.0)), vec2(10.0, 10.0)),
            Err(SimulationError::EmptyGridBounds { .. })
        ));
    }

    #[test]
    fn insert_buckets_by_floor_and_tracks_active_cells() {
        let mut grid = grid();
        assert_eq!(grid.insert(0, pt2(5.0, 5.0)), CellIndex::new(0, 0));
        assert_eq!(grid.insert(1, pt2(6.0, 5.0)), CellIndex::new(0, 0));
        assert_eq!(grid.insert(2, pt2(40.0, 40.0)), CellIndex::new(4, 4));

        assert_eq!(grid.cell(CellIndex::new(0, 0)), &[0, 1]);
        assert_eq!(grid.cell(CellIndex::new(4, 4)), &[2]);
        let active: Vec<_> = grid.active_cells().collect();
        assert_eq!(active, vec![CellIndex::new(0, 0), CellIndex::new(4, 4)]);
    }

    #[test]
    fn clear_empties_buckets_and_active_set() {
        let mut grid = grid();
        grid.insert(0, pt2(5.0, 5.0));
        grid.insert(1, pt2(45.0, 5.0));
        grid.clear();
        assert_eq!(grid.active_cell_count(), 0);
        assert!(grid.cell(CellIndex::new(0, 0)).is_empty());
        assert!(grid.cell(CellIndex::new(4, 0)).is_empty());
    }

    #[test]
    fn out_of_range_positions_clamp_into_edge_cells() {
        let mut grid = grid();
        assert_eq!(grid.insert(0, pt2(-30.0, 25.0)), CellIndex::new(0, 2));
        assert_eq!(grid.insert(1, pt2(500.0, 500.0)), CellIndex::new(4, 4));
        assert_eq!(grid.insert(2, pt2(f32::NAN, 5.0)), CellIndex::new(0, 0));
        assert_eq!(grid.clamped_count(), 2);
    }

    #[test]
    fn cells_outside_the_grid_read_as_empty() {
        let mut grid = grid();
        grid.insert(0, pt2(5.0, 5.0));
        assert!(grid.cell_at(-1, 0).is_empty());
        assert!(grid.cell_at(0, -1).is_empty());
        assert!(grid.cell_at(5, 0).is_empty());
        assert!(grid.cell_at(0, 5).is_empty());
        assert_eq!(grid.cell_at(0, 0), &[0]);
    }

    #[test]
    fn cell_rect_matches_bucketing() {
        let grid = grid();
        let rect = grid.cell_rect(CellIndex::new(2, 3));
        assert_eq!(rect.left(), 20.0);
        assert_eq!(rect.bottom(), 30.0);
        assert_eq!(rect.w(), 10.0);
        assert_eq!(grid.cell_index(rect.xy()), CellIndex::new(2, 3));
    }
}
