use super::*;

#[test]
fn standard_deck_has_52_distinct_cards() {
    let deck = standard_deck();
    assert_eq!(deck.len(), 52);
    let mut seen = std::collections::HashSet::new();
    for card in &deck {
        assert!(seen.insert((card.suit, card.rank)), "duplicate card {card:?}");
    }
}

#[test]
fn rank_alias_round_trip_for_face_cards() {
    for (alias, rank) in [("j", 11), ("jack", 11), ("q", 12), ("queen", 12), ("k", 13), ("king", 13), ("a", 14), ("ace", 14)] {
        assert_eq!(parse_rank_alias(alias), Some(rank));
    }
}

#[test]
fn rank_alias_accepts_numeric_digits_in_range() {
    for r in 2..=10 {
        assert_eq!(parse_rank_alias(&r.to_string()), Some(r));
    }
    assert_eq!(parse_rank_alias("1"), None);
    assert_eq!(parse_rank_alias("11"), None);
    assert_eq!(parse_rank_alias("banana"), None);
}

#[test]
fn suit_alias_accepts_glyphs() {
    assert_eq!(Suit::parse_alias("♥"), Some(Suit::Hearts));
    assert_eq!(Suit::parse_alias("spades"), Some(Suit::Spades));
    assert_eq!(Suit::parse_alias("nonsense"), None);
}
