//! Read-only view of a game for rendering

use crate::board::{BOARD_HEIGHT, Row};
use crate::clock::Clock;
use crate::game::Game;
use crate::piece::Piece;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub board: [Row; BOARD_HEIGHT],
    /// Falling piece; hidden while rows are being cleared
    pub current: Option<Piece>,
    pub next: Piece,
    pub score: u64,
    pub high_score: u64,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
    /// Gravity speed relative to level 0
    pub speed_multiplier: f64,
    pub paused: bool,
    pub over: bool,
    pub muted: bool,
    /// Rows being animated away, ascending
    pub clearing_rows: Vec<usize>,
    /// Animation progress in 0.0..=1.0
    pub clear_progress: f64,
}

impl Snapshot {
    pub fn capture<C: Clock>(game: &Game<C>) -> Self {
        let clearing_rows = game
            .clearing
            .as_ref()
            .map(|animation| animation.rows.clone())
            .unwrap_or_default();

        Self {
            board: *game.board.rows(),
            current: game.clearing.is_none().then_some(game.current_piece),
            next: game.next_piece,
            score: game.score.points,
            high_score: game.high_score(),
            lines: game.score.lines,
            level: game.score.level,
            drop_interval_ms: game.score.drop_interval_ms,
            speed_multiplier: game.score.speed_multiplier(),
            paused: game.is_paused(),
            over: game.is_over(),
            muted: game.muted,
            clearing_rows,
            clear_progress: game.clear_progress().unwrap_or(0.0),
        }
    }

    /// Whether `row` is part of the running clear animation
    pub fn is_clearing(&self, row: usize) -> bool {
        self.clearing_rows.binary_search(&row).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::bag::Bag;
    use crate::board::{BOARD_WIDTH, Cell};
    use crate::clock::ManualClock;
    use crate::game::Game;
    use crate::highscore::MemoryHighScore;
    use crate::tetromino::TetrominoType;
    use std::time::Duration;

    fn game() -> (Game<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let game = Game::with_parts(
            Bag::with_sequence(5, &TetrominoType::all()),
            clock.clone(),
            Box::new(MemoryHighScore::with_best(300)),
        );
        (game, clock)
    }

    #[test]
    fn test_fresh_snapshot() {
        let (game, _) = game();
        let snap = game.snapshot();
        assert_eq!(snap.current.map(|p| p.piece_type), Some(TetrominoType::I));
        assert_eq!(snap.next.piece_type, TetrominoType::O);
        assert_eq!(snap.high_score, 300);
        assert_eq!(snap.speed_multiplier, 1.0);
        assert_eq!(snap.drop_interval_ms, 1000);
        assert!(!snap.paused && !snap.over && !snap.muted);
        assert!(snap.clearing_rows.is_empty());
        assert_eq!(snap.clear_progress, 0.0);
    }

    #[test]
    fn test_clearing_snapshot() {
        let (mut game, clock) = game();
        for col in 0..BOARD_WIDTH as i32 {
            if col != 4 {
                game.board.set(19, col, Cell::Filled(TetrominoType::Z));
            }
        }
        game.hard_drop();
        clock.advance(Duration::from_millis(400));

        let snap = game.snapshot();
        assert!(snap.current.is_none());
        assert_eq!(snap.clearing_rows, vec![19]);
        assert!(snap.is_clearing(19));
        assert!(!snap.is_clearing(18));
        assert!((snap.clear_progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_frozen_while_paused() {
        let (mut game, clock) = game();
        for col in 0..BOARD_WIDTH as i32 {
            if col != 4 {
                game.board.set(19, col, Cell::Filled(TetrominoType::Z));
            }
        }
        game.hard_drop();
        clock.advance(Duration::from_millis(200));
        game.toggle_pause();
        clock.advance(Duration::from_secs(3));

        let snap = game.snapshot();
        assert!(snap.paused);
        assert!((snap.clear_progress - 0.25).abs() < 1e-9);
    }
}
