//! Core game state and logic
//!
//! A round runs Spawning -> Falling -> Locking, then either straight back to
//! Spawning or through a timed clear animation whose rows are only removed
//! once the animation has played out. Pausing freezes both gravity and the
//! animation; game over is terminal until a reset.

use crate::audio::Sfx;
use crate::bag::Bag;
use crate::board::Board;
use crate::clock::{Clock, MonotonicClock};
use crate::highscore::HighScoreStore;
use crate::piece::{Piece, RotationDirection};
use crate::score::Score;
use crate::snapshot::Snapshot;
use std::time::Duration;
use tracing::{debug, info};

/// How long full rows flash before they are removed
pub const CLEAR_ANIMATION: Duration = Duration::from_millis(800);

/// Horizontal wall kicks, tried in this order
const KICK_OFFSETS: [i32; 5] = [0, 1, -1, 2, -2];

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCW,
    RotateCCW,
    TogglePause,
    Reset,
    ToggleMute,
    Quit,
}

/// Rows waiting to be removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearAnimation {
    /// Full rows, ascending
    pub rows: Vec<usize>,
    /// Clock reading when the animation began, shifted forward by any pause
    pub started_at: Duration,
}

/// The main game struct
pub struct Game<C: Clock = MonotonicClock> {
    /// The game board
    pub board: Board,
    /// Current falling piece
    pub current_piece: Piece,
    /// Piece shown in the preview
    pub next_piece: Piece,
    /// Piece bag randomizer
    bag: Bag,
    /// Score tracking
    pub score: Score,
    /// Current game state
    pub state: GameState,
    /// In-progress line clear
    pub clearing: Option<ClearAnimation>,
    /// Time accumulated towards the next gravity step
    drop_counter: Duration,
    /// When the current pause began
    paused_at: Option<Duration>,
    /// Suppresses sound cues
    pub muted: bool,
    /// Best score known to the store
    high_score: u64,
    store: Box<dyn HighScoreStore>,
    clock: C,
    /// Sound cues raised since the last drain
    cues: Vec<Sfx>,
}

impl Game {
    /// Start a game on the wall clock with a freshly seeded bag
    pub fn new(store: Box<dyn HighScoreStore>) -> Self {
        Self::with_parts(Bag::new(), MonotonicClock::new(), store)
    }
}

impl<C: Clock> Game<C> {
    /// Start a game from explicit parts. The bag's current window is dealt
    /// as-is: its first piece falls first, its second is shown as next.
    pub fn with_parts(mut bag: Bag, clock: C, store: Box<dyn HighScoreStore>) -> Self {
        let current_piece = Piece::new(bag.draw());
        let next_piece = Piece::new(bag.draw());
        let high_score = store.load();

        let mut game = Self {
            board: Board::new(),
            current_piece,
            next_piece,
            bag,
            score: Score::new(),
            state: GameState::Playing,
            clearing: None,
            drop_counter: Duration::ZERO,
            paused_at: None,
            muted: false,
            high_score,
            store,
            clock,
            cues: Vec::new(),
        };
        game.play(Sfx::Start);
        info!(
            "game started: current={:?} next={:?} best={}",
            game.current_piece.piece_type, game.next_piece.piece_type, game.high_score
        );
        game
    }

    /// Process an action, applying the input rules for the current state
    pub fn process_action(&mut self, action: Action) {
        match action {
            Action::Reset => self.reset(),
            Action::TogglePause => self.toggle_pause(),
            Action::ToggleMute => self.toggle_mute(),
            // Leaving the game is the caller's business
            Action::Quit => {}
            _ if self.state != GameState::Playing || self.clearing.is_some() => {}
            Action::MoveLeft => self.move_piece(-1),
            Action::MoveRight => self.move_piece(1),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
            Action::RotateCW => {
                self.try_rotate(RotationDirection::Clockwise);
            }
            Action::RotateCCW => {
                self.try_rotate(RotationDirection::CounterClockwise);
            }
        }
    }

    /// Advance timers by one frame
    pub fn tick(&mut self, delta: Duration) {
        if self.state != GameState::Playing {
            return;
        }

        if let Some(animation) = &self.clearing {
            let elapsed = self.clock.now().saturating_sub(animation.started_at);
            if elapsed >= CLEAR_ANIMATION {
                self.commit_clear();
            }
            // No gravity on animation frames
            return;
        }

        self.drop_counter += delta;
        if self.drop_counter > self.drop_interval() {
            self.soft_drop();
        }
    }

    /// Start over with an empty board and a fresh bag
    pub fn reset(&mut self) {
        self.bag.reshuffle();
        self.board = Board::new();
        self.score = Score::new();
        self.current_piece = Piece::new(self.bag.draw());
        self.next_piece = Piece::new(self.bag.draw());
        self.state = GameState::Playing;
        self.clearing = None;
        self.drop_counter = Duration::ZERO;
        self.paused_at = None;
        self.update_high_score();
        self.play(Sfx::Start);
        info!("game reset");
    }

    /// Pause or resume; ignored once the game is over
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                self.paused_at = Some(self.clock.now());
                self.play(Sfx::Pause);
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                if let Some(paused_at) = self.paused_at.take() {
                    let paused_for = self.clock.now().saturating_sub(paused_at);
                    if let Some(animation) = &mut self.clearing {
                        animation.started_at += paused_for;
                    }
                }
                self.play(Sfx::Resume);
            }
            GameState::GameOver => {}
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Shift the piece one column; stays put if blocked
    pub fn move_piece(&mut self, dir: i32) {
        if !self.piece_active() {
            return;
        }
        let moved = self.current_piece.shifted(dir, 0);
        if !self.board.collides(&moved) {
            self.current_piece = moved;
        }
    }

    /// Rotate with horizontal wall kicks. Returns whether the piece turned.
    pub fn try_rotate(&mut self, direction: RotationDirection) -> bool {
        if !self.piece_active() {
            return false;
        }
        let rotated = self.current_piece.rotated(direction);
        for offset in KICK_OFFSETS {
            let candidate = rotated.shifted(offset, 0);
            if !self.board.collides(&candidate) {
                self.current_piece = candidate;
                self.play(Sfx::Rotate);
                return true;
            }
        }
        false
    }

    /// Move down one row, locking if the piece cannot fall
    pub fn soft_drop(&mut self) {
        if !self.piece_active() {
            return;
        }
        let lowered = self.current_piece.shifted(0, 1);
        if self.board.collides(&lowered) {
            self.lock_piece();
        } else {
            self.current_piece = lowered;
            self.drop_counter = Duration::ZERO;
        }
    }

    /// Drop straight to the resting row and lock immediately
    pub fn hard_drop(&mut self) {
        if !self.piece_active() {
            return;
        }
        let mut distance = 0;
        while !self.board.collides(&self.current_piece.shifted(0, 1)) {
            self.current_piece = self.current_piece.shifted(0, 1);
            distance += 1;
        }
        debug!("hard drop of {} rows", distance);
        self.play(Sfx::HardDrop);
        self.lock_piece();
    }

    /// Merge the piece and either start a clear or bring in the next piece
    fn lock_piece(&mut self) {
        self.board.merge(&self.current_piece);
        let rows = self.board.full_rows();
        debug!(
            "locked {:?} at ({}, {}), {} full rows",
            self.current_piece.piece_type,
            self.current_piece.x,
            self.current_piece.y,
            rows.len()
        );

        if rows.is_empty() {
            self.spawn_next();
            self.check_top_out();
        } else {
            self.play(if rows.len() >= 4 {
                Sfx::ClearSweepTetris
            } else {
                Sfx::ClearSweep
            });
            self.clearing = Some(ClearAnimation {
                rows,
                started_at: self.clock.now(),
            });
        }
    }

    /// Remove the animated rows, score them and bring in the next piece
    fn commit_clear(&mut self) {
        let mut rows = self
            .clearing
            .take()
            .map(|animation| animation.rows)
            .unwrap_or_default();
        rows.sort_unstable();
        self.board.remove_rows(&rows);

        let lines = rows.len();
        if lines > 0 {
            let points = self.score.add_clear(lines);
            debug!(
                "cleared {} lines for {} points, level {}",
                lines, points, self.score.level
            );
            self.update_high_score();
            self.play(if lines >= 4 {
                Sfx::TetrisDone
            } else {
                Sfx::LineDone
            });
        }

        self.drop_counter = Duration::ZERO;
        self.spawn_next();
        self.check_top_out();
    }

    /// Promote the preview piece and draw a new one
    fn spawn_next(&mut self) {
        self.current_piece = Piece::new(self.next_piece.piece_type);
        self.next_piece = Piece::new(self.bag.draw());
        self.drop_counter = Duration::ZERO;
    }

    fn check_top_out(&mut self) {
        if self.board.collides(&self.current_piece) {
            self.state = GameState::GameOver;
            self.paused_at = None;
            self.play(Sfx::GameOver);
            info!(
                "game over: score={} lines={} level={}",
                self.score.points, self.score.lines, self.score.level
            );
        }
    }

    /// Persist the score if it beats the stored best
    fn update_high_score(&mut self) {
        let stored = self.store.load();
        if self.score.points > stored {
            self.store.store(self.score.points);
            info!("new high score {}", self.score.points);
        }
        self.high_score = stored.max(self.score.points);
    }

    fn piece_active(&self) -> bool {
        self.state != GameState::GameOver && self.clearing.is_none()
    }

    fn play(&mut self, cue: Sfx) {
        if !self.muted {
            self.cues.push(cue);
        }
    }

    /// Take the sound cues raised since the last call
    pub fn drain_cues(&mut self) -> Vec<Sfx> {
        std::mem::take(&mut self.cues)
    }

    pub fn drop_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.score.drop_interval_ms))
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// True while paused and after game over
    pub fn is_paused(&self) -> bool {
        self.state != GameState::Playing
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Final score, once the game has ended
    pub fn final_score(&self) -> Option<u64> {
        self.is_over().then_some(self.score.points)
    }

    /// Fraction of the clear animation played so far
    pub fn clear_progress(&self) -> Option<f64> {
        let animation = self.clearing.as_ref()?;
        let now = self.paused_at.unwrap_or_else(|| self.clock.now());
        let elapsed = now.saturating_sub(animation.started_at);
        Some((elapsed.as_secs_f64() / CLEAR_ANIMATION.as_secs_f64()).min(1.0))
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}
