//! Tetromino definitions and shapes
//!
//! Every piece carries four pre-baked 4x4 rotation masks. They are looked up
//! at spawn time only; rotating an active piece transforms its own mask.

use ratatui::style::Color;

/// Side length of every rotation mask
pub const MASK_SIZE: usize = 4;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoType {
    /// Display color, matching the classic palette of this game
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Rgb(0x4c, 0xc9, 0xf0),
            TetrominoType::O => Color::Rgb(0xf1, 0xfa, 0x8c),
            TetrominoType::T => Color::Rgb(0xbd, 0x93, 0xf9),
            TetrominoType::S => Color::Rgb(0x50, 0xfa, 0x7b),
            TetrominoType::Z => Color::Rgb(0xff, 0x55, 0x55),
            TetrominoType::J => Color::Rgb(0x8b, 0xe9, 0xfd),
            TetrominoType::L => Color::Rgb(0xff, 0xb8, 0x6c),
        }
    }

    /// All tetromino types, in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Rotation mask for a rotation index; the index wraps modulo 4
    pub fn shape(&self, rotation: usize) -> Mask {
        Mask(self.states()[rotation % 4])
    }

    fn states(&self) -> &'static [[[u8; MASK_SIZE]; MASK_SIZE]; 4] {
        match self {
            TetrominoType::I => &I_STATES,
            TetrominoType::O => &O_STATES,
            TetrominoType::T => &T_STATES,
            TetrominoType::S => &S_STATES,
            TetrominoType::Z => &Z_STATES,
            TetrominoType::J => &J_STATES,
            TetrominoType::L => &L_STATES,
        }
    }
}

// Masks are written row by row, row 0 on top.
const I_STATES: [[[u8; 4]; 4]; 4] = [
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
];

const O_STATES: [[[u8; 4]; 4]; 4] = [
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
];

const T_STATES: [[[u8; 4]; 4]; 4] = [
    [[0, 0, 0, 0], [1, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
];

const S_STATES: [[[u8; 4]; 4]; 4] = [
    [[0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
    [[1, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
    [[1, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
];

const Z_STATES: [[[u8; 4]; 4]; 4] = [
    [[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
];

const J_STATES: [[[u8; 4]; 4]; 4] = [
    [[0, 0, 0, 0], [1, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
    [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 1, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
];

const L_STATES: [[[u8; 4]; 4]; 4] = [
    [[0, 0, 0, 0], [1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
    [[1, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
];

/// A 4x4 occupancy mask, row 0 on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask([[u8; MASK_SIZE]; MASK_SIZE]);

impl Mask {
    /// Whether the cell at (row, col) is occupied
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.0[row][col] != 0
    }

    /// Occupied (row, col) offsets in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..MASK_SIZE).flat_map(move |row| {
            (0..MASK_SIZE)
                .filter(move |&col| self.is_set(row, col))
                .map(move |col| (row as i32, col as i32))
        })
    }

    /// A new mask turned 90 degrees clockwise
    pub fn rotated_cw(&self) -> Mask {
        let mut out = [[0u8; MASK_SIZE]; MASK_SIZE];
        for (row, line) in self.0.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                out[col][MASK_SIZE - 1 - row] = value;
            }
        }
        Mask(out)
    }

    /// A new mask turned 90 degrees counter-clockwise
    pub fn rotated_ccw(&self) -> Mask {
        self.rotated_cw().rotated_cw().rotated_cw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_has_four_cells() {
        for piece in TetrominoType::all() {
            for rotation in 0..4 {
                let count = piece.shape(rotation).cells().count();
                assert_eq!(count, 4, "{:?} rotation {}", piece, rotation);
            }
        }
    }

    #[test]
    fn test_rotation_index_wraps() {
        assert_eq!(TetrominoType::T.shape(5), TetrominoType::T.shape(1));
    }

    #[test]
    fn test_four_clockwise_turns_restore_mask() {
        for piece in TetrominoType::all() {
            let mask = piece.shape(0);
            let turned = mask.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(turned, mask);
        }
    }

    #[test]
    fn test_ccw_undoes_cw() {
        let mask = TetrominoType::L.shape(0);
        assert_eq!(mask.rotated_cw().rotated_ccw(), mask);
    }

    #[test]
    fn test_rotate_horizontal_i_is_vertical() {
        let rotated = TetrominoType::I.shape(1).rotated_cw();
        // Row 1 turns into column 2
        let cells: Vec<_> = rotated.cells().collect();
        assert_eq!(cells, vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: std::collections::HashSet<_> =
            TetrominoType::all().iter().map(|t| t.color()).collect();
        assert_eq!(colors.len(), 7);
    }
}
