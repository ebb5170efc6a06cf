//! Hand categories, hand declarations, and their total-order comparator.

use crate::cards::{Rank, Suit};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// §3: HIGH_CARD < PAIR < TWO_PAIRS < THREE_OF_A_KIND < STRAIGHT < FLUSH <
/// FULL_HOUSE < FOUR_OF_A_KIND < STRAIGHT_FLUSH < ROYAL_FLUSH.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPairs,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum HandDeclaration {
    HighCard { rank: Rank },
    Pair { rank: Rank },
    TwoPairs { low: Rank, high: Rank },
    ThreeOfAKind { rank: Rank },
    Straight { start: Rank },
    Flush { suit: Suit, ranks: [Rank; 5] },
    FullHouse { triple: Rank, pair: Rank },
    FourOfAKind { rank: Rank },
    StraightFlush { suit: Suit, start: Rank },
    RoyalFlush { suit: Suit },
}

impl HandDeclaration {
    pub fn category(&self) -> HandCategory {
        match self {
            HandDeclaration::HighCard { .. } => HandCategory::HighCard,
            HandDeclaration::Pair { .. } => HandCategory::Pair,
            HandDeclaration::TwoPairs { .. } => HandCategory::TwoPairs,
            HandDeclaration::ThreeOfAKind { .. } => HandCategory::ThreeOfAKind,
            HandDeclaration::Straight { .. } => HandCategory::Straight,
            HandDeclaration::Flush { .. } => HandCategory::Flush,
            HandDeclaration::FullHouse { .. } => HandCategory::FullHouse,
            HandDeclaration::FourOfAKind { .. } => HandCategory::FourOfAKind,
            HandDeclaration::StraightFlush { .. } => HandCategory::StraightFlush,
            HandDeclaration::RoyalFlush { .. } => HandCategory::RoyalFlush,
        }
    }

    /// Canonicalizes a two-pair declaration so the lower rank comes first.
    pub fn two_pairs(r1: Rank, r2: Rank) -> Self {
        let (low, high) = if r1 < r2 { (r1, r2) } else { (r2, r1) };
        HandDeclaration::TwoPairs { low, high }
    }
}

/// Total-order comparator from §4.1. Category wins first; within a category,
/// compares by the tie-break key named in §4.1. A flush tie on max rank, or
/// two royal flushes, compare Equal — neither is a valid raise over the
/// other (§9: this is an invariant of the game, not an implementation gap).
pub fn compare(a: &HandDeclaration, b: &HandDeclaration) -> Ordering {
    let category_order = a.category().cmp(&b.category());
    if category_order != Ordering::Equal {
        return category_order;
    }
    match (a, b) {
        (HandDeclaration::HighCard { rank: ra }, HandDeclaration::HighCard { rank: rb })
        | (HandDeclaration::Pair { rank: ra }, HandDeclaration::Pair { rank: rb })
        | (HandDeclaration::ThreeOfAKind { rank: ra }, HandDeclaration::ThreeOfAKind { rank: rb })
        | (HandDeclaration::FourOfAKind { rank: ra }, HandDeclaration::FourOfAKind { rank: rb })
        | (HandDeclaration::Straight { start: ra }, HandDeclaration::Straight { start: rb }) => {
            ra.cmp(rb)
        }
        (
            HandDeclaration::StraightFlush { start: ra, .. },
            HandDeclaration::StraightFlush { start: rb, .. },
        ) => ra.cmp(rb),
        (
            HandDeclaration::TwoPairs { low: la, high: ha },
            HandDeclaration::TwoPairs { low: lb, high: hb },
        ) => ha.cmp(hb).then(la.cmp(lb)),
        (
            HandDeclaration::FullHouse { triple: ta, pair: pa },
            HandDeclaration::FullHouse { triple: tb, pair: pb },
        ) => ta.cmp(tb).then(pa.cmp(pb)),
        (HandDeclaration::Flush { ranks: ra, .. }, HandDeclaration::Flush { ranks: rb, .. }) => {
            let max_a = ra.iter().max().copied().unwrap_or(0);
            let max_b = rb.iter().max().copied().unwrap_or(0);
            max_a.cmp(&max_b)
        }
        (HandDeclaration::RoyalFlush { .. }, HandDeclaration::RoyalFlush { .. }) => {
            Ordering::Equal
        }
        _ => unreachable!("same category implies same variant"),
    }
}

/// Strict greater-than per §4.1. A caller's new declaration must satisfy
/// `gt(new, current)` to be accepted.
pub fn gt(a: &HandDeclaration, b: &HandDeclaration) -> bool {
    compare(a, b) == Ordering::Greater
}

#[cfg(test)]
#[path = "hand_tests.rs"]
mod tests;
