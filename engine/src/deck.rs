//! §4.1: `shuffle(seed) → deck`, `deal(deck, counts) → list<hand>`.
//!
//! The "seed" in the spec is realized here as an RNG stream owned by the
//! [`crate::room::Room`]: every shuffle draws from that stream rather than
//! re-seeding per round, so successive rounds in the same room produce
//! different decks while the whole sequence stays reproducible when the
//! stream itself was seeded deterministically (§9 RNG note).

use bluffhouse_types::cards::standard_deck;
use bluffhouse_types::Card;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error as ThisError;

/// Builds the room's RNG stream: deterministic when a seed override is
/// configured (testing), otherwise seeded from OS entropy so deals are
/// cryptographically unpredictable in production.
pub fn make_rng(seed_override: Option<u64>) -> ChaCha20Rng {
    match seed_override {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_rng(OsRng).expect("OS entropy source available"),
    }
}

/// A freshly shuffled standard 52-card deck, drawn from `rng`.
pub fn shuffle(rng: &mut impl Rng) -> Vec<Card> {
    let mut deck = standard_deck();
    deck.shuffle(rng);
    deck
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum DeckError {
    #[error("not enough cards to deal: need {need}, have {have}")]
    NotEnoughCards { need: usize, have: usize },
}

/// Deals `counts.len()` hands off the top of `deck`, consuming it in order.
pub fn deal(deck: &mut Vec<Card>, counts: &[u8]) -> Result<Vec<Vec<Card>>, DeckError> {
    let total: usize = counts.iter().map(|&c| c as usize).sum();
    if deck.len() < total {
        return Err(DeckError::NotEnoughCards {
            need: total,
            have: deck.len(),
        });
    }
    let mut hands = Vec::with_capacity(counts.len());
    for &count in counts {
        hands.push(deck.drain(0..count as usize).collect());
    }
    Ok(hands)
}

#[cfg(test)]
#[path = "deck_tests.rs"]
mod tests;
