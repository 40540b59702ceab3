//! 7-bag randomizer for piece generation
//!
//! All 7 pieces are shuffled, then dealt out one by one. A new shuffle only
//! happens once the current bag is empty, so every aligned window of 7 draws
//! holds each piece exactly once.

use crate::tetromino::TetrominoType;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    /// Pieces left in the current shuffle window
    pending: VecDeque<TetrominoType>,
    rng: ChaCha8Rng,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    /// Create an empty bag seeded from OS entropy
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(7),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create an empty bag with a deterministic shuffle sequence
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            pending: VecDeque::with_capacity(7),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a bag whose current window is `pieces`; fresh shuffles seeded
    /// with `seed` follow once they run out
    #[cfg(test)]
    pub fn with_sequence(seed: u64, pieces: &[TetrominoType]) -> Self {
        let mut bag = Self::with_seed(seed);
        bag.pending.extend(pieces.iter().copied());
        bag
    }

    /// Remove and return the next piece, reshuffling when the bag is empty
    pub fn draw(&mut self) -> TetrominoType {
        match self.pending.pop_front() {
            Some(piece) => piece,
            None => self.refill(),
        }
    }

    /// Throw away the current window and start a fresh shuffle
    pub fn reshuffle(&mut self) {
        self.pending.clear();
        let first = self.refill();
        self.pending.push_front(first);
    }

    /// Pieces still waiting in the current window
    #[allow(dead_code)]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Shuffle a new window, deal its first piece and queue the rest
    fn refill(&mut self) -> TetrominoType {
        let mut fresh = TetrominoType::all();
        fresh.shuffle(&mut self.rng);
        let [first, rest @ ..] = fresh;
        self.pending.extend(rest);
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bag_contains_all_pieces() {
        let mut bag = Bag::new();
        let pieces: HashSet<_> = (0..7).map(|_| bag.draw()).collect();
        assert_eq!(pieces.len(), 7);
    }

    #[test]
    fn test_aligned_windows_hold_each_piece_once() {
        let mut bag = Bag::with_seed(42);
        for _ in 0..20 {
            let window: HashSet<_> = (0..7).map(|_| bag.draw()).collect();
            assert_eq!(window.len(), 7);
        }
    }

    #[test]
    fn test_refills_only_when_empty() {
        let mut bag = Bag::with_seed(1);
        bag.draw();
        assert_eq!(bag.remaining(), 6);
        for _ in 0..6 {
            bag.draw();
        }
        assert_eq!(bag.remaining(), 0);
        bag.draw();
        assert_eq!(bag.remaining(), 6);
    }

    #[test]
    fn test_sequence_is_dealt_in_order() {
        let seq = TetrominoType::all();
        let mut bag = Bag::with_sequence(7, &seq);
        let dealt: Vec<_> = (0..7).map(|_| bag.draw()).collect();
        assert_eq!(dealt, seq.to_vec());
        // Next window is a fresh shuffle
        let next: HashSet<_> = (0..7).map(|_| bag.draw()).collect();
        assert_eq!(next.len(), 7);
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = Bag::with_seed(99);
        let mut b = Bag::with_seed(99);
        for _ in 0..21 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_reshuffle_discards_window() {
        let mut bag = Bag::with_sequence(3, &[TetrominoType::I, TetrominoType::O]);
        bag.reshuffle();
        assert_eq!(bag.remaining(), 7);
        let window: HashSet<_> = (0..7).map(|_| bag.draw()).collect();
        assert_eq!(window.len(), 7);
        assert_eq!(bag.remaining(), 0);
    }

    #[test]
    fn test_empty_bag_deals_fresh_window() {
        let mut bag = Bag::with_seed(5);
        assert_eq!(bag.remaining(), 0);
        let first = bag.draw();
        assert_eq!(bag.remaining(), 6);
        let mut window: HashSet<_> = (0..6).map(|_| bag.draw()).collect();
        assert!(window.insert(first));
        assert_eq!(window.len(), 7);
    }
}
