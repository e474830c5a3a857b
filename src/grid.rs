//! Grid data model.
//!
//! This module contains the [`Grid`] and [`Cell`] types shared by the user interface and the
//! pathfinding engine, together with the coordinate type used to address cells and the helpers
//! that build and edit a grid.

use std::{fmt, str::FromStr, sync::Arc};

use color_eyre::{
    eyre::{bail, ensure, eyre, OptionExt as _, Result},
    Report,
};

/// Position of a cell in a grid.
///
/// Rows grow downwards and columns grow to the right, both starting at zero in the top-left
/// corner of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub col: usize,
}

impl Coord {
    /// Builds a coordinate from a row and a column index.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the number of orthogonal steps between two coordinates.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns whether two coordinates are orthogonal neighbours.
    #[must_use]
    pub const fn is_adjacent_to(self, other: Self) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Coord {
    type Err = Report;

    /// Parses a coordinate written as `row,col`.
    fn from_str(text: &str) -> Result<Self> {
        let (row, col) = text
            .split_once(',')
            .ok_or_eyre("coordinate must be written as `row,col`")?;

        Ok(Self::new(row.trim().parse()?, col.trim().parse()?))
    }
}

/// Single element of a [`Grid`].
///
/// A cell only carries structural data. The tentative distance, visited flag and predecessor
/// used while searching live in the engine's per-run state, see
/// [`NodeState`](crate::pathfinding::NodeState).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Position of the cell, fixed at creation.
    pub coord: Coord,
    /// Whether the search starts from this cell.
    pub is_start: bool,
    /// Whether the search is looking for this cell.
    pub is_finish: bool,
    /// Whether the cell blocks movement.
    pub is_wall: bool,
}

impl Cell {
    /// Builds an open cell at the given coordinate of a grid with the given endpoints.
    const fn open(coord: Coord, start: Coord, finish: Coord) -> Self {
        Self {
            coord,
            is_start: coord.row == start.row && coord.col == start.col,
            is_finish: coord.row == finish.row && coord.col == finish.col,
            is_wall: false,
        }
    }
}

/// Rectangular grid of cells stored in row-major order.
///
/// Every cell sits behind its own [`Arc`]. Cloning a grid shares all of its cells, and editing
/// a grid through [`Grid::with_wall_toggled`] swaps out the one edited cell only, so callers can
/// tell unchanged cells apart by pointer identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    height: usize,
    /// Number of columns, shared by every row.
    width: usize,
    /// Coordinate of the start cell.
    start: Coord,
    /// Coordinate of the finish cell.
    finish: Coord,
    /// Cells in row-major order.
    cells: Vec<Arc<Cell>>,
}

impl Grid {
    /// Builds a grid of open cells with a single start and a single finish cell.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    /// - Either dimension is zero or the cell count overflows
    /// - The start or the finish coordinate lies outside the grid
    /// - The start and the finish are the same cell
    pub fn new(height: usize, width: usize, start: Coord, finish: Coord) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "grid must have at least one row and one column, got {height}x{width}"
        );
        let len = height
            .checked_mul(width)
            .ok_or_else(|| eyre!("a {height}x{width} grid has too many cells"))?;
        ensure!(
            start.row < height && start.col < width,
            "start {start} lies outside the {height}x{width} grid"
        );
        ensure!(
            finish.row < height && finish.col < width,
            "finish {finish} lies outside the {height}x{width} grid"
        );
        ensure!(
            start != finish,
            "start and finish must be different cells, both are {start}"
        );

        let mut cells = Vec::with_capacity(len);
        for row in 0..height {
            for col in 0..width {
                cells.push(Arc::new(Cell::open(Coord::new(row, col), start, finish)));
            }
        }

        Ok(Self {
            height,
            width,
            start,
            finish,
            cells,
        })
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns whether the grid holds no cells, which a constructed grid never does.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the coordinate of the start cell.
    #[must_use]
    pub const fn start(&self) -> Coord {
        self.start
    }

    /// Returns the coordinate of the finish cell.
    #[must_use]
    pub const fn finish(&self) -> Coord {
        self.finish
    }

    /// Returns whether a coordinate addresses a cell of this grid.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    /// Returns the row-major index of a coordinate, if it lies inside the grid.
    #[must_use]
    pub const fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row * self.width + coord.col)
        } else {
            None
        }
    }

    /// Returns the coordinate stored at a row-major index, if the index is in range.
    #[must_use]
    pub const fn coord_at(&self, index: usize) -> Option<Coord> {
        if index < self.height * self.width {
            Some(Coord::new(index / self.width, index % self.width))
        } else {
            None
        }
    }

    /// Returns the cell at a coordinate.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index))
            .map(AsRef::as_ref)
    }

    /// Returns whether the cell at a coordinate is a wall. Coordinates outside the grid are not.
    #[must_use]
    pub fn is_wall(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(|cell| cell.is_wall)
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().map(AsRef::as_ref)
    }

    /// Iterates over the coordinates of all wall cells in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells()
            .filter(|cell| cell.is_wall)
            .map(|cell| cell.coord)
    }

    /// Iterates over the orthogonal neighbours of a cell that lie inside the grid.
    ///
    /// Neighbours are yielded in row-major order: up, left, right, down. A coordinate outside
    /// the grid has no neighbours.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        let Coord { row, col } = coord;
        let (height, width) = (self.height, self.width);
        let inside = self.contains(coord);

        let up = row.checked_sub(1).map(|row| Coord::new(row, col));
        let left = col.checked_sub(1).map(|col| Coord::new(row, col));
        let right = col.checked_add(1).map(|col| Coord::new(row, col));
        let down = row.checked_add(1).map(|row| Coord::new(row, col));

        [up, left, right, down]
            .into_iter()
            .flatten()
            .filter(move |neighbor| inside && neighbor.row < height && neighbor.col < width)
    }

    /// Returns a copy of the grid with the wall flag of one cell flipped.
    ///
    /// Every other cell is shared with `self`, so its value and identity are preserved. The
    /// start and finish cells are not guarded; flipping them yields an endpoint that is also a
    /// wall, which the engine later rejects.
    ///
    /// # Errors
    ///
    /// This function returns an error if the coordinate lies outside the grid.
    pub fn with_wall_toggled(&self, coord: Coord) -> Result<Self> {
        let index = self.index(coord).ok_or_else(|| {
            eyre!(
                "cell {coord} lies outside the {}x{} grid",
                self.height,
                self.width
            )
        })?;

        let mut grid = self.clone();
        let slot = grid
            .cells
            .get_mut(index)
            .ok_or_eyre("failed to retrieve cell to toggle")?;
        let mut cell = **slot;
        cell.is_wall = !cell.is_wall;
        *slot = Arc::new(cell);

        Ok(grid)
    }

    /// Returns a copy of the grid with every wall removed.
    ///
    /// Cells that were not walls are shared with `self`.
    #[must_use]
    pub fn without_walls(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                if cell.is_wall {
                    Arc::new(Cell {
                        is_wall: false,
                        ..**cell
                    })
                } else {
                    Arc::clone(cell)
                }
            })
            .collect();

        Self {
            cells,
            ..*self
        }
    }
}

impl fmt::Display for Grid {
    /// Prints the grid as an ASCII layout: `S` start, `F` finish, `#` wall and `.` open.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, cell) in self.cells().enumerate() {
            if index > 0 && index % self.width == 0 {
                writeln!(formatter)?;
            }
            let symbol = if cell.is_start {
                'S'
            } else if cell.is_finish {
                'F'
            } else if cell.is_wall {
                '#'
            } else {
                '.'
            };
            write!(formatter, "{symbol}")?;
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = Report;

    /// Parses an ASCII layout as printed by the [`Display`](fmt::Display) implementation.
    ///
    /// Surrounding whitespace and blank lines are ignored. Every row must have the same length,
    /// only the characters `S`, `F`, `#` and `.` are allowed, and exactly one start and one
    /// finish must be present.
    fn from_str(layout: &str) -> Result<Self> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.first().ok_or_eyre("grid layout is empty")?.len();

        let mut start = None;
        let mut finish = None;
        let mut walls = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            ensure!(
                line.len() == width,
                "row {row} has {} cells but the first row has {width}",
                line.len()
            );

            for (col, byte) in line.bytes().enumerate() {
                let coord = Coord::new(row, col);
                match byte {
                    b'.' => {}
                    b'#' => walls.push(coord),
                    b'S' => {
                        ensure!(start.is_none(), "layout has more than one start cell");
                        start = Some(coord);
                    }
                    b'F' => {
                        ensure!(finish.is_none(), "layout has more than one finish cell");
                        finish = Some(coord);
                    }
                    other => bail!("unexpected character {:?} at {coord}", char::from(other)),
                }
            }
        }

        let mut grid = Self::new(
            lines.len(),
            width,
            start.ok_or_eyre("layout has no start cell")?,
            finish.ok_or_eyre("layout has no finish cell")?,
        )?;
        for wall in walls {
            let index = grid
                .index(wall)
                .ok_or_eyre("failed to locate wall inside parsed grid")?;
            if let Some(cell) = grid.cells.get_mut(index) {
                Arc::make_mut(cell).is_wall = true;
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses a small grid with a couple of walls.
    fn small_grid() -> Grid {
        Grid::new(3, 4, Coord::new(1, 0), Coord::new(1, 3)).expect("failed to build grid")
    }

    #[test]
    fn test_new_marks_single_start_and_finish() {
        let grid = Grid::new(20, 50, Coord::new(10, 15), Coord::new(10, 35))
            .expect("failed to build default grid");

        assert_eq!(grid.len(), 1000);
        assert_eq!(grid.cells().filter(|cell| cell.is_start).count(), 1);
        assert_eq!(grid.cells().filter(|cell| cell.is_finish).count(), 1);
        assert_eq!(grid.walls().count(), 0);
        assert!(
            grid.cell(Coord::new(10, 15))
                .expect("start should exist")
                .is_start
        );
        assert!(
            grid.cell(Coord::new(10, 35))
                .expect("finish should exist")
                .is_finish
        );
    }

    #[test]
    fn test_new_stores_cells_row_major() {
        let grid = small_grid();

        let coords: Vec<Coord> = grid.cells().map(|cell| cell.coord).collect();
        assert_eq!(coords.first(), Some(&Coord::new(0, 0)));
        assert_eq!(coords.get(4), Some(&Coord::new(1, 0)));
        assert_eq!(coords.last(), Some(&Coord::new(2, 3)));
        assert_eq!(grid.index(Coord::new(2, 1)), Some(9));
        assert_eq!(grid.coord_at(9), Some(Coord::new(2, 1)));
        assert_eq!(grid.coord_at(12), None);
    }

    #[test]
    fn test_new_rejects_malformed_input() {
        assert!(Grid::new(0, 5, Coord::new(0, 0), Coord::new(0, 1)).is_err());
        assert!(Grid::new(5, 0, Coord::new(0, 0), Coord::new(0, 1)).is_err());
        assert!(Grid::new(2, 2, Coord::new(2, 0), Coord::new(0, 1)).is_err());
        assert!(Grid::new(2, 2, Coord::new(0, 0), Coord::new(0, 2)).is_err());
        assert!(Grid::new(2, 2, Coord::new(1, 1), Coord::new(1, 1)).is_err());
    }

    #[test]
    fn test_toggle_wall_flips_only_target() {
        let grid = small_grid();
        let target = Coord::new(0, 2);

        let toggled = grid.with_wall_toggled(target).expect("toggle should succeed");

        assert!(toggled.is_wall(target));
        assert!(!grid.is_wall(target), "original grid must stay untouched");
        for (before, after) in grid.cells.iter().zip(&toggled.cells) {
            if before.coord == target {
                assert!(!Arc::ptr_eq(before, after));
            } else {
                assert!(Arc::ptr_eq(before, after), "{} was replaced", before.coord);
            }
        }
    }

    #[test]
    fn test_toggle_wall_twice_restores_grid() {
        let grid = small_grid();
        let target = Coord::new(2, 2);

        let twice = grid
            .with_wall_toggled(target)
            .and_then(|grid| grid.with_wall_toggled(target))
            .expect("toggles should succeed");

        assert_eq!(twice, grid);
    }

    #[test]
    fn test_toggle_wall_allows_endpoints() {
        let grid = small_grid();

        let toggled = grid
            .with_wall_toggled(grid.start())
            .expect("toggling the start is allowed");

        let start = toggled.cell(grid.start()).expect("start should exist");
        assert!(start.is_start && start.is_wall);
    }

    #[test]
    fn test_toggle_wall_out_of_bounds() {
        let grid = small_grid();

        assert!(grid.with_wall_toggled(Coord::new(3, 0)).is_err());
        assert!(grid.with_wall_toggled(Coord::new(0, 4)).is_err());
    }

    #[test]
    fn test_neighbors_are_bounded_and_ordered() {
        let grid = small_grid();

        let corner: Vec<Coord> = grid.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(corner, vec![Coord::new(0, 1), Coord::new(1, 0)]);

        let middle: Vec<Coord> = grid.neighbors(Coord::new(1, 1)).collect();
        assert_eq!(
            middle,
            vec![
                Coord::new(0, 1),
                Coord::new(1, 0),
                Coord::new(1, 2),
                Coord::new(2, 1)
            ]
        );

        let edge: Vec<Coord> = grid.neighbors(Coord::new(2, 3)).collect();
        assert_eq!(edge, vec![Coord::new(1, 3), Coord::new(2, 2)]);

        assert_eq!(grid.neighbors(Coord::new(5, 5)).count(), 0);
    }

    #[test]
    fn test_without_walls_clears_every_wall() {
        let grid: Grid = "
            S.#.
            .##F
        "
        .parse()
        .expect("layout should parse");

        let cleared = grid.without_walls();

        assert_eq!(grid.walls().count(), 3);
        assert_eq!(cleared.walls().count(), 0);
        assert_eq!(cleared.start(), grid.start());
        assert_eq!(cleared.finish(), grid.finish());
    }

    #[test]
    fn test_layout_parse_and_display() {
        let layout = "S.#.\n.#..\n...F";

        let grid: Grid = layout.parse().expect("layout should parse");

        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.start(), Coord::new(0, 0));
        assert_eq!(grid.finish(), Coord::new(2, 3));
        assert_eq!(
            grid.walls().collect::<Vec<_>>(),
            vec![Coord::new(0, 2), Coord::new(1, 1)]
        );
        assert_eq!(grid.to_string(), layout);
    }

    #[test]
    fn test_layout_parse_rejects_bad_layouts() {
        assert!("".parse::<Grid>().is_err());
        assert!("S..\n..".parse::<Grid>().is_err());
        assert!("S.x\n..F".parse::<Grid>().is_err());
        assert!("...\n..F".parse::<Grid>().is_err());
        assert!("S..\n...".parse::<Grid>().is_err());
        assert!("SS.\n..F".parse::<Grid>().is_err());
        assert!("S.F\n..F".parse::<Grid>().is_err());
    }

    #[test]
    fn test_coord_parse() {
        assert_eq!("10,15".parse::<Coord>().ok(), Some(Coord::new(10, 15)));
        assert_eq!(" 3 , 4 ".parse::<Coord>().ok(), Some(Coord::new(3, 4)));
        assert!("10".parse::<Coord>().is_err());
        assert!("a,1".parse::<Coord>().is_err());
        assert!("-1,1".parse::<Coord>().is_err());
    }

    #[test]
    fn test_coord_distances() {
        let origin = Coord::new(2, 3);

        assert_eq!(origin.manhattan_distance(Coord::new(5, 1)), 5);
        assert!(origin.is_adjacent_to(Coord::new(2, 4)));
        assert!(!origin.is_adjacent_to(Coord::new(3, 4)));
        assert!(!origin.is_adjacent_to(origin));
        assert_eq!(origin.to_string(), "(2, 3)");
    }
}
