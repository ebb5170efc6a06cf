//! §4.2: a small hand-written recursive-descent parser from a normalized,
//! lowercased hand-declaration string into a [`HandDeclaration`].

use crate::cards::{parse_rank_alias, Rank, Suit};
use crate::hand::HandDeclaration;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty hand declaration")]
    Empty,
    #[error("unrecognized hand category in {0:?}")]
    UnknownCategory(String),
    #[error("missing rank in declaration")]
    MissingRank,
    #[error("invalid rank {0:?}")]
    InvalidRank(String),
    #[error("missing suit in declaration")]
    MissingSuit,
    #[error("invalid suit {0:?}")]
    InvalidSuit(String),
    #[error("flush needs exactly 5 distinct ranks, got {0}")]
    FlushRankCount(usize),
    #[error("two pairs must name two distinct ranks")]
    TwoPairsSameRank,
    #[error("full house must name two distinct ranks")]
    FullHouseSameRank,
    #[error("full house needs one triple (count 3) and one pair (count 2)")]
    FullHouseBadCounts,
    #[error("straight start must be in 2..=10, got {0}")]
    StraightStartOutOfRange(Rank),
    #[error("straight flush start must be in 2..=9, got {0}")]
    StraightFlushStartOutOfRange(Rank),
}

const CONNECTORS: &[&str] = &["of", "and", "from", "kind"];

/// Normalizes to lowercase tokens, treating `:` and `,` as whitespace.
fn tokenize(input: &str) -> Vec<String> {
    input
        .to_lowercase()
        .replace([':', ','], " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn rank_token(tok: &str) -> Option<Rank> {
    if let Some(r) = parse_rank_alias(tok) {
        return Some(r);
    }
    tok.strip_suffix('s').and_then(parse_rank_alias)
}

fn is_connector(tok: &str) -> bool {
    CONNECTORS.contains(&tok)
}

/// Finds the first token that parses as a suit, skipping connector words.
fn find_suit(tokens: &[String]) -> Result<(Suit, usize), ParseError> {
    for (i, tok) in tokens.iter().enumerate() {
        if is_connector(tok) {
            continue;
        }
        if let Some(suit) = Suit::parse_alias(tok) {
            return Ok((suit, i));
        }
        return Err(ParseError::InvalidSuit(tok.clone()));
    }
    Err(ParseError::MissingSuit)
}

/// Finds every rank among `tokens`, skipping connector words; errors on the
/// first non-connector token that isn't a valid rank.
fn collect_ranks(tokens: &[String]) -> Result<Vec<Rank>, ParseError> {
    let mut ranks = Vec::new();
    for tok in tokens {
        if is_connector(tok) {
            continue;
        }
        match rank_token(tok) {
            Some(r) => ranks.push(r),
            None => return Err(ParseError::InvalidRank(tok.clone())),
        }
    }
    Ok(ranks)
}

fn single_rank(tokens: &[String]) -> Result<Rank, ParseError> {
    let ranks = collect_ranks(tokens)?;
    ranks.first().copied().ok_or(ParseError::MissingRank)
}

/// Parses a normalized hand-declaration string into a [`HandDeclaration`].
pub fn parse(input: &str) -> Result<HandDeclaration, ParseError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let words: Vec<&str> = tokens.iter().map(String::as_str).collect();

    match words.as_slice() {
        ["royal", "flush", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            let (suit, _) = find_suit(&rest)?;
            Ok(HandDeclaration::RoyalFlush { suit })
        }
        ["straight", "flush", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            let (suit, suit_idx) = find_suit(&rest)?;
            let start = single_rank(&rest[suit_idx + 1..])?;
            if !(2..=9).contains(&start) {
                return Err(ParseError::StraightFlushStartOutOfRange(start));
            }
            Ok(HandDeclaration::StraightFlush { suit, start })
        }
        ["straight", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            let start = single_rank(&rest)?;
            if !(2..=10).contains(&start) {
                return Err(ParseError::StraightStartOutOfRange(start));
            }
            Ok(HandDeclaration::Straight { start })
        }
        ["flush", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            let (suit, suit_idx) = find_suit(&rest)?;
            let ranks = collect_ranks(&rest[suit_idx + 1..])?;
            if ranks.len() != 5 || !all_distinct(&ranks) {
                return Err(ParseError::FlushRankCount(ranks.len()));
            }
            let mut arr = [0u8; 5];
            arr.copy_from_slice(&ranks);
            Ok(HandDeclaration::Flush { suit, ranks: arr })
        }
        ["full", "house", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            let pairs = collect_count_rank_pairs(&rest)?;
            if pairs.len() != 2 {
                return Err(ParseError::FullHouseBadCounts);
            }
            let triple = pairs.iter().find(|(c, _)| *c == 3).map(|(_, r)| *r);
            let pair = pairs.iter().find(|(c, _)| *c == 2).map(|(_, r)| *r);
            match (triple, pair) {
                (Some(t), Some(p)) => {
                    if t == p {
                        return Err(ParseError::FullHouseSameRank);
                    }
                    Ok(HandDeclaration::FullHouse { triple: t, pair: p })
                }
                _ => Err(ParseError::FullHouseBadCounts),
            }
        }
        ["two", "pairs", rest @ ..] | ["two", "pair", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            let ranks = collect_ranks(&rest)?;
            if ranks.len() != 2 {
                return Err(ParseError::MissingRank);
            }
            if ranks[0] == ranks[1] {
                return Err(ParseError::TwoPairsSameRank);
            }
            Ok(HandDeclaration::two_pairs(ranks[0], ranks[1]))
        }
        ["four", "of", "a", "kind", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            Ok(HandDeclaration::FourOfAKind { rank: single_rank(&rest)? })
        }
        ["three", "of", "a", "kind", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            Ok(HandDeclaration::ThreeOfAKind { rank: single_rank(&rest)? })
        }
        ["high", "card", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            Ok(HandDeclaration::HighCard { rank: single_rank(&rest)? })
        }
        ["pair", rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
            Ok(HandDeclaration::Pair { rank: single_rank(&rest)? })
        }
        _ => Err(ParseError::UnknownCategory(input.to_string())),
    }
}

/// Renders a declaration back into one of the canonical long forms §4.2
/// accepts, so `parse(to_canonical(d)) == Ok(d)` for any valid `d`.
pub fn to_canonical(decl: &HandDeclaration) -> String {
    use crate::cards::rank_name;
    match decl {
        HandDeclaration::HighCard { rank } => format!("high card {}", rank_name(*rank)),
        HandDeclaration::Pair { rank } => format!("pair of {}s", rank_name(*rank)),
        HandDeclaration::TwoPairs { low, high } => {
            format!("two pairs {} and {}", rank_name(*low), rank_name(*high))
        }
        HandDeclaration::ThreeOfAKind { rank } => format!("three of a kind {}", rank_name(*rank)),
        HandDeclaration::Straight { start } => format!("straight from {}", rank_name(*start)),
        HandDeclaration::Flush { suit, ranks } => format!(
            "flush of {}: {}",
            suit,
            ranks
                .iter()
                .map(|r| rank_name(*r).to_string())
                .collect::<Vec<_>>()
                .join(",")
        ),
        HandDeclaration::FullHouse { triple, pair } => {
            format!("full house: 3 {}s and 2 {}s", rank_name(*triple), rank_name(*pair))
        }
        HandDeclaration::FourOfAKind { rank } => format!("four of a kind {}", rank_name(*rank)),
        HandDeclaration::StraightFlush { suit, start } => {
            format!("straight flush {} from {}", suit, rank_name(*start))
        }
        HandDeclaration::RoyalFlush { suit } => format!("royal flush {}", suit),
    }
}

fn all_distinct(ranks: &[Rank]) -> bool {
    let mut seen = std::collections::HashSet::new();
    ranks.iter().all(|r| seen.insert(*r))
}

/// Parses a sequence like `3 jacks and 2 10s` into `[(3, jack_rank), (2, ten_rank)]`.
fn collect_count_rank_pairs(tokens: &[String]) -> Result<Vec<(u8, Rank)>, ParseError> {
    let mut pairs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];
        if is_connector(tok) {
            i += 1;
            continue;
        }
        let count: u8 = tok
            .parse()
            .map_err(|_| ParseError::InvalidRank(tok.clone()))?;
        i += 1;
        let rank_tok = tokens.get(i).ok_or(ParseError::MissingRank)?;
        let rank = rank_token(rank_tok).ok_or_else(|| ParseError::InvalidRank(rank_tok.clone()))?;
        pairs.push((count, rank));
        i += 1;
    }
    Ok(pairs)
}

#[cfg(test)]
#[path = "handspec_tests.rs"]
mod tests;
