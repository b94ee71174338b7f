//! Board module - manages the tile grid
//!
//! The board is a 20x20 grid where each cell holds a tile or is empty.
//! Cells are only empty while a cascade is in flight: removal empties them,
//! gravity moves the holes to the top of each column, and refill closes them.
//! Uses a flat array, row-major (`row * GRID_SIZE + col`).

use crate::rng::SimpleRng;
use crate::types::{Cell, Pos, Tile, CELL_COUNT, GRID_SIZE};

/// The game board - 20 x 20 cells using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Create a new board with every cell empty
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    /// Create a fully populated board of random tiles
    pub fn random(rng: &mut SimpleRng) -> Self {
        let mut board = Self::new();
        board.refill(rng);
        board
    }

    /// Build a board cell by cell
    pub fn from_fn(mut f: impl FnMut(Pos) -> Cell) -> Self {
        let mut board = Self::new();
        for (i, cell) in board.cells.iter_mut().enumerate() {
            if let Some(pos) = Pos::from_index(i) {
                *cell = f(pos);
            }
        }
        board
    }

    /// Build a board from row-major cells; `None` unless exactly `CELL_COUNT` are given
    pub fn from_cells(cells: &[Cell]) -> Option<Self> {
        let cells: [Cell; CELL_COUNT] = cells.try_into().ok()?;
        Some(Self { cells })
    }

    /// Get cell at `pos`
    /// Returns None if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        pos.in_bounds().then(|| self.cells[pos.index()])
    }

    /// The tile at `pos`, if in bounds and occupied
    #[inline]
    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.get(pos).flatten()
    }

    /// Set cell at `pos`
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        self.cells[pos.index()] = cell;
        true
    }

    /// Empty the cell at `pos`, returning what was there
    pub fn take(&mut self, pos: Pos) -> Cell {
        if !pos.in_bounds() {
            return None;
        }
        self.cells[pos.index()].take()
    }

    /// Exchange two cells. Returns false (and does nothing) if either is out of bounds.
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        if !a.in_bounds() || !b.in_bounds() {
            return false;
        }
        self.cells.swap(a.index(), b.index());
        true
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Drop every column's tiles down onto the lowest empty cells
    ///
    /// Relative order within a column is preserved and all holes end up at the
    /// top. Running it twice is the same as running it once.
    /// Returns how many tiles moved.
    pub fn apply_gravity(&mut self) -> usize {
        let mut moved = 0;
        for col in 0..GRID_SIZE {
            let mut write_row = GRID_SIZE;
            for read_row in (0..GRID_SIZE).rev() {
                let read = read_row * GRID_SIZE + col;
                if self.cells[read].is_none() {
                    continue;
                }
                write_row -= 1;
                if write_row != read_row {
                    let write = write_row * GRID_SIZE + col;
                    self.cells[write] = self.cells[read].take();
                    moved += 1;
                }
            }
        }
        moved
    }

    /// Fill every empty cell with a freshly drawn tile
    /// Returns the number of cells filled
    pub fn refill(&mut self, rng: &mut SimpleRng) -> usize {
        let mut filled = 0;
        for cell in self.cells.iter_mut().filter(|c| c.is_none()) {
            *cell = Some(rng.draw_tile());
            filled += 1;
        }
        filled
    }

    /// Uniformly permute all cells (Fisher-Yates over the flat grid)
    pub fn shuffle(&mut self, rng: &mut SimpleRng) {
        rng.shuffle(&mut self.cells);
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row.min(GRID_SIZE - 1) * GRID_SIZE;
        &self.cells[start..start + GRID_SIZE]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Suit;

    fn tile(suit: Suit, rank: u8) -> Tile {
        Tile::new(suit, rank).unwrap()
    }

    #[test]
    fn test_board_get_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(Pos::new(0, 0)), Some(None));
        assert_eq!(board.get(Pos::new(20, 0)), None);
        assert_eq!(board.get(Pos::new(0, 20)), None);
        assert_eq!(board.tile(Pos::new(0, 20)), None);
    }

    #[test]
    fn test_board_set_take_swap() {
        let mut board = Board::new();
        let m1 = tile(Suit::Characters, 1);
        let z7 = tile(Suit::Honor, 7);

        assert!(board.set(Pos::new(3, 4), Some(m1)));
        assert!(board.set(Pos::new(3, 5), Some(z7)));
        assert!(!board.set(Pos::new(3, 20), Some(m1)));

        assert!(board.swap(Pos::new(3, 4), Pos::new(3, 5)));
        assert_eq!(board.tile(Pos::new(3, 4)), Some(z7));
        assert_eq!(board.tile(Pos::new(3, 5)), Some(m1));
        assert!(!board.swap(Pos::new(3, 4), Pos::new(20, 5)));

        assert_eq!(board.take(Pos::new(3, 4)), Some(z7));
        assert_eq!(board.tile(Pos::new(3, 4)), None);
    }

    #[test]
    fn test_gravity_preserves_column_order() {
        let mut rng = SimpleRng::new(5);
        let mut board = Board::random(&mut rng);
        let col = 7u8;
        let above: Vec<Cell> = (0..10).map(|r| board.get(Pos::new(r, col)).unwrap()).collect();

        // Knock out three cells in the middle of the column.
        for r in 10..13 {
            board.take(Pos::new(r, col));
        }
        let moved = board.apply_gravity();
        assert_eq!(moved, 10);

        for r in 0..3 {
            assert_eq!(board.tile(Pos::new(r, col)), None);
        }
        for (i, cell) in above.iter().enumerate() {
            assert_eq!(board.get(Pos::new(i as u8 + 3, col)), Some(*cell));
        }
        assert_eq!(board.empty_count(), 3);
    }

    #[test]
    fn test_gravity_is_idempotent() {
        let mut rng = SimpleRng::new(11);
        let mut board = Board::random(&mut rng);
        for i in (0..CELL_COUNT).step_by(7) {
            board.take(Pos::from_index(i).unwrap());
        }
        board.apply_gravity();
        let once = board.clone();
        assert_eq!(board.apply_gravity(), 0);
        assert_eq!(board, once);
    }

    #[test]
    fn test_refill_closes_every_hole() {
        let mut rng = SimpleRng::new(8);
        let mut board = Board::new();
        assert_eq!(board.refill(&mut rng), CELL_COUNT);
        assert!(board.is_full());
        assert_eq!(board.refill(&mut rng), 0);
    }

    #[test]
    fn test_shuffle_keeps_multiset() {
        let mut rng = SimpleRng::new(21);
        let mut board = Board::random(&mut rng);
        let mut before: Vec<Cell> = board.cells().to_vec();
        board.shuffle(&mut rng);
        let mut after: Vec<Cell> = board.cells().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_from_cells_requires_full_grid() {
        assert!(Board::from_cells(&[None; 10]).is_none());
        let board = Board::from_cells(&[None; CELL_COUNT]).unwrap();
        assert_eq!(board, Board::new());
    }
}
