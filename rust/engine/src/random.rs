//! Randomness ports.
//!
//! The engine never owns an ambient generator. Randomness enters through two
//! narrow seams: a [`Shuffler`] that permutes cards in place and a
//! [`Randomizer`] that draws a bounded index. Hosts inject [`SeededRng`] for
//! reproducible play; tests inject plain closures.
//!
//! ```
//! use uno_engine::deck::Deck;
//! use uno_engine::random::SeededRng;
//!
//! let mut d1 = Deck::standard();
//! let mut d2 = Deck::standard();
//! d1.shuffle(&mut SeededRng::new(42));
//! d2.shuffle(&mut SeededRng::new(42));
//! assert_eq!(d1, d2);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::Card;

/// Permutes a slice of cards in place.
pub trait Shuffler {
    fn shuffle(&mut self, cards: &mut [Card]);
}

/// Draws an index in `[0, bound)`.
pub trait Randomizer {
    fn bound(&mut self, bound: usize) -> usize;
}

impl<F> Shuffler for F
where
    F: FnMut(&mut [Card]),
{
    fn shuffle(&mut self, cards: &mut [Card]) {
        self(cards)
    }
}

impl<F> Randomizer for F
where
    F: FnMut(usize) -> usize,
{
    fn bound(&mut self, bound: usize) -> usize {
        self(bound)
    }
}

/// Owned shuffler handed to rounds.
pub type BoxedShuffler = Box<dyn Shuffler + Send>;
/// Owned randomizer handed to games.
pub type BoxedRandomizer = Box<dyn Randomizer + Send>;

/// Seeded ChaCha20 generator usable as both ports.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    rng: ChaCha20Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy; the chosen seed is still reported by [`SeededRng::seed`].
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Shuffler for SeededRng {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut self.rng);
    }
}

impl Randomizer for SeededRng {
    fn bound(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}

/// Leaves card order untouched.
pub fn identity_shuffler() -> BoxedShuffler {
    Box::new(|_: &mut [Card]| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::full_deck;

    #[test]
    fn same_seed_same_permutation() {
        let mut a = full_deck();
        let mut b = full_deck();
        SeededRng::new(7).shuffle(&mut a);
        SeededRng::new(7).shuffle(&mut b);
        assert_eq!(a, b);
        assert_ne!(a, full_deck(), "shuffle should move cards (high probability)");
    }

    #[test]
    fn randomizer_stays_in_bounds() {
        let mut rng = SeededRng::new(99);
        for bound in 1..20 {
            for _ in 0..50 {
                assert!(rng.bound(bound) < bound);
            }
        }
    }

    #[test]
    fn closures_are_ports() {
        let mut reverse = |cards: &mut [Card]| cards.reverse();
        let mut cards = full_deck();
        Shuffler::shuffle(&mut reverse, &mut cards);
        assert_eq!(cards[0], Card::WildDraw);

        let mut always_last = |n: usize| n - 1;
        assert_eq!(always_last.bound(4), 3);
    }
}
