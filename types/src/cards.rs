//! Suits, ranks, and cards.
//!
//! Ranks are ace-high: 2..=10, Jack=11, Queen=12, King=13, Ace=14. There is
//! no low-ace straight (mirrors the ace-high convention the rest of the
//! corpus uses for comparisons, e.g. `card_rank_ace_high`).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Parses a suit alias: English name or its Unicode glyph.
    pub fn parse_alias(s: &str) -> Option<Suit> {
        match s {
            "hearts" | "heart" | "♥" | "♥️" => Some(Suit::Hearts),
            "diamonds" | "diamond" | "♦" | "♦️" => Some(Suit::Diamonds),
            "clubs" | "club" | "♣" | "♣️" => Some(Suit::Clubs),
            "spades" | "spade" | "♠" | "♠️" => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        };
        write!(f, "{s}")
    }
}

/// Ace-high rank, 2..=14.
pub type Rank = u8;

pub const MIN_RANK: Rank = 2;
pub const MAX_RANK: Rank = 14;

/// Parses a rank alias: digits 2-10, or j/jack, q/queen, k/king, a/ace.
/// Trailing plural `s` is stripped by the caller before this is invoked.
pub fn parse_rank_alias(s: &str) -> Option<Rank> {
    match s {
        "j" | "jack" => Some(11),
        "q" | "queen" => Some(12),
        "k" | "king" => Some(13),
        "a" | "ace" => Some(14),
        digits => digits.parse::<Rank>().ok().filter(|r| (2..=10).contains(r)),
    }
}

pub fn rank_name(rank: Rank) -> &'static str {
    match rank {
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "jack",
        12 => "queen",
        13 => "king",
        14 => "ace",
        _ => "?",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }
}

/// A standard 52-card deck, unshuffled, in suit-major / rank-ascending order.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in MIN_RANK..=MAX_RANK {
            deck.push(Card::new(suit, rank));
        }
    }
    deck
}

#[cfg(test)]
#[path = "cards_tests.rs"]
mod tests;
