//! Active falling piece

use crate::tetromino::{Mask, TetrominoType};

/// Spawn offset of the mask's top-left corner
pub const SPAWN_X: i32 = 3;
pub const SPAWN_Y: i32 = -1;

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// An active falling piece. `x`/`y` place the top-left of the 4x4 mask on
/// the board; `y` may be negative while the piece enters from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub piece_type: TetrominoType,
    /// Rotation index in 0..4, counted from the spawn state
    pub rotation: usize,
    pub mask: Mask,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a new piece at the spawn position
    pub fn new(piece_type: TetrominoType) -> Self {
        Self::at(piece_type, SPAWN_X, SPAWN_Y)
    }

    /// Create a piece in its spawn orientation at an arbitrary offset
    pub fn at(piece_type: TetrominoType, x: i32, y: i32) -> Self {
        Self {
            piece_type,
            rotation: 0,
            mask: piece_type.shape(0),
            x,
            y,
        }
    }

    /// Absolute (row, col) board positions of all occupied cells
    pub fn block_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.mask
            .cells()
            .map(|(row, col)| (self.y + row, self.x + col))
    }

    /// The same piece moved by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// The same piece with its own mask turned a quarter in `direction`
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let (mask, rotation) = match direction {
            RotationDirection::Clockwise => (self.mask.rotated_cw(), (self.rotation + 1) % 4),
            RotationDirection::CounterClockwise => {
                (self.mask.rotated_ccw(), (self.rotation + 3) % 4)
            }
        };
        Self {
            mask,
            rotation,
            ..*self
        }
    }
}
