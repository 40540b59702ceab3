//! Game board representation and collision detection

use crate::piece::Piece;
use crate::tetromino::TetrominoType;

/// Board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or tagged with the piece that filled it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// One board row
pub type Row = [Cell; BOARD_WIDTH];

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at (row, col), None if out of bounds
    #[allow(dead_code)]
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|line| line.get(col as usize))
            .copied()
    }

    /// Set a cell, returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        match self
            .cells
            .get_mut(row as usize)
            .and_then(|line| line.get_mut(col as usize))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.cells
    }

    /// Whether any occupied cell of the piece is outside the side walls, at
    /// or below the floor, or on top of a settled cell. Cells above the top
    /// edge never collide.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.block_positions().any(|(row, col)| {
            if row < 0 {
                return false;
            }
            if row >= BOARD_HEIGHT as i32 || col < 0 || col >= BOARD_WIDTH as i32 {
                return true;
            }
            self.cells[row as usize][col as usize].is_filled()
        })
    }

    /// Write the piece into the grid; cells above the top edge are dropped
    pub fn merge(&mut self, piece: &Piece) {
        for (row, col) in piece.block_positions() {
            if row >= 0 {
                self.set(row, col, Cell::Filled(piece.piece_type));
            }
        }
    }

    /// Indices of completely filled rows, ascending
    pub fn full_rows(&self) -> Vec<usize> {
        (0..BOARD_HEIGHT).filter(|&row| self.is_line_full(row)).collect()
    }

    /// Remove the given rows and pad the top with empty rows. The remaining
    /// rows keep their relative order.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        let mut doomed = [false; BOARD_HEIGHT];
        for &row in rows {
            if let Some(flag) = doomed.get_mut(row) {
                *flag = true;
            }
        }

        let mut rebuilt = [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        let mut write_row = BOARD_HEIGHT;
        // Walk bottom-up so surviving rows sink into place
        for read_row in (0..BOARD_HEIGHT).rev() {
            if doomed[read_row] {
                continue;
            }
            write_row -= 1;
            rebuilt[write_row] = self.cells[read_row];
        }
        self.cells = rebuilt;
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, row: i32, piece: TetrominoType) {
        for col in 0..BOARD_WIDTH as i32 {
            board.set(row, col, Cell::Filled(piece));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert!(board.full_rows().is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(TetrominoType::Z)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_HEIGHT as i32, 0), None);
        assert_eq!(board.get(0, BOARD_WIDTH as i32), None);
        assert!(!board.set(BOARD_HEIGHT as i32, 0, Cell::Filled(TetrominoType::I)));
    }

    #[test]
    fn test_piece_inside_empty_board_is_free() {
        let board = Board::new();
        let piece = Piece::at(TetrominoType::T, 0, 5);
        assert!(!board.collides(&piece));
    }

    #[test]
    fn test_walls_and_floor_collide() {
        let board = Board::new();
        // Vertical I occupies mask column 1
        let i = TetrominoType::I;
        assert!(!board.collides(&Piece::at(i, -1, 0)));
        assert!(board.collides(&Piece::at(i, -2, 0)));
        assert!(!board.collides(&Piece::at(i, 8, 0)));
        assert!(board.collides(&Piece::at(i, 9, 0)));
        // Rows 16..19 are the last four
        assert!(!board.collides(&Piece::at(i, 0, 16)));
        assert!(board.collides(&Piece::at(i, 0, 17)));
    }

    #[test]
    fn test_rows_above_top_are_exempt() {
        let board = Board::new();
        let piece = Piece::at(TetrominoType::I, 0, -3);
        assert!(!board.collides(&piece));
    }

    #[test]
    fn test_settled_cells_collide() {
        let mut board = Board::new();
        board.set(3, 1, Cell::Filled(TetrominoType::O));
        assert!(board.collides(&Piece::at(TetrominoType::I, 0, 0)));
        assert!(!board.collides(&Piece::at(TetrominoType::I, 1, 0)));
    }

    #[test]
    fn test_merge_skips_hidden_rows() {
        let mut board = Board::new();
        let piece = Piece::at(TetrominoType::I, 0, -2);
        board.merge(&piece);
        assert_eq!(board.get(0, 1), Some(Cell::Filled(TetrominoType::I)));
        assert_eq!(board.get(1, 1), Some(Cell::Filled(TetrominoType::I)));
        assert_eq!(board.get(2, 1), Some(Cell::Empty));
    }

    #[test]
    fn test_full_rows_ascending() {
        let mut board = Board::new();
        fill_row(&mut board, 19, TetrominoType::I);
        fill_row(&mut board, 17, TetrominoType::J);
        board.set(18, 0, Cell::Filled(TetrominoType::L));
        assert_eq!(board.full_rows(), vec![17, 19]);
    }

    #[test]
    fn test_remove_single_row() {
        let mut board = Board::new();
        fill_row(&mut board, 19, TetrominoType::I);
        board.set(18, 0, Cell::Filled(TetrominoType::Z));

        board.remove_rows(&[19]);
        assert_eq!(board.get(19, 0), Some(Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(18, 0), Some(Cell::Empty));
        assert!(board.full_rows().is_empty());
    }

    #[test]
    fn test_remove_non_contiguous_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 19, TetrominoType::I);
        board.set(18, 2, Cell::Filled(TetrominoType::S));
        fill_row(&mut board, 17, TetrominoType::I);
        board.set(16, 4, Cell::Filled(TetrominoType::T));

        board.remove_rows(&[17, 19]);
        assert_eq!(board.get(19, 2), Some(Cell::Filled(TetrominoType::S)));
        assert_eq!(board.get(18, 4), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(board.get(17, 4), Some(Cell::Empty));
        let filled = board
            .rows()
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count();
        assert_eq!(filled, 2);
    }
}
