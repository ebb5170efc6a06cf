//! §4.2 membership predicate: does a declared hand exist in the union of
//! all dealt cards?

use bluffhouse_types::cards::{Rank, Suit};
use bluffhouse_types::{Card, HandDeclaration};

fn count_rank(cards: &[Card], rank: Rank) -> usize {
    cards.iter().filter(|c| c.rank == rank).count()
}

fn contains(cards: &[Card], suit: Suit, rank: Rank) -> bool {
    cards.iter().any(|c| c.suit == suit && c.rank == rank)
}

/// `holds(H, C)` from §4.2. `HIGH_CARD` isn't listed explicitly among the
/// structural-match rules there, but it's the same pattern one threshold
/// down: a card of that rank is present.
pub fn holds(declaration: &HandDeclaration, cards: &[Card]) -> bool {
    match declaration {
        HandDeclaration::HighCard { rank } => count_rank(cards, *rank) >= 1,
        HandDeclaration::Pair { rank } => count_rank(cards, *rank) >= 2,
        HandDeclaration::ThreeOfAKind { rank } => count_rank(cards, *rank) >= 3,
        HandDeclaration::FourOfAKind { rank } => count_rank(cards, *rank) == 4,
        HandDeclaration::TwoPairs { low, high } => {
            count_rank(cards, *low) >= 2 && count_rank(cards, *high) >= 2
        }
        HandDeclaration::FullHouse { triple, pair } => {
            count_rank(cards, *triple) >= 3 && count_rank(cards, *pair) >= 2
        }
        HandDeclaration::Straight { start } => (0..5).all(|i| count_rank(cards, start + i) >= 1),
        HandDeclaration::Flush { suit, ranks } => {
            ranks.iter().all(|r| contains(cards, *suit, *r))
        }
        HandDeclaration::StraightFlush { suit, start } => {
            (0..5).all(|i| contains(cards, *suit, start + i))
        }
        HandDeclaration::RoyalFlush { suit } => (10..=14).all(|r| contains(cards, *suit, r)),
    }
}

#[cfg(test)]
#[path = "bluff_tests.rs"]
mod tests;
