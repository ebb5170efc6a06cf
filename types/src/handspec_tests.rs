use super::*;
use crate::cards::Suit;
use crate::hand::HandDeclaration;

#[test]
fn parses_canonical_examples_from_the_spec() {
    assert_eq!(parse("pair of kings"), Ok(HandDeclaration::Pair { rank: 13 }));
    assert_eq!(
        parse("two pairs 3 and 7"),
        Ok(HandDeclaration::TwoPairs { low: 3, high: 7 })
    );
    assert_eq!(
        parse("flush of hearts: 2,5,7,king,ace"),
        Ok(HandDeclaration::Flush {
            suit: Suit::Hearts,
            ranks: [2, 5, 7, 13, 14]
        })
    );
    assert_eq!(
        parse("full house: 3 jacks and 2 10s"),
        Ok(HandDeclaration::FullHouse { triple: 11, pair: 10 })
    );
    assert_eq!(parse("straight from 10"), Ok(HandDeclaration::Straight { start: 10 }));
    assert_eq!(
        parse("straight flush spades from 9"),
        Ok(HandDeclaration::StraightFlush { suit: Suit::Spades, start: 9 })
    );
    assert_eq!(
        parse("royal flush diamonds"),
        Ok(HandDeclaration::RoyalFlush { suit: Suit::Diamonds })
    );
}

#[test]
fn rejects_straight_start_out_of_range() {
    assert_eq!(
        parse("straight from 11"),
        Err(ParseError::StraightStartOutOfRange(11))
    );
    assert_eq!(
        parse("straight flush hearts from 10"),
        Err(ParseError::StraightFlushStartOutOfRange(10))
    );
}

#[test]
fn rejects_two_pairs_with_same_rank() {
    assert_eq!(parse("two pairs 7 and 7"), Err(ParseError::TwoPairsSameRank));
}

#[test]
fn rejects_full_house_with_same_rank_or_bad_counts() {
    assert_eq!(
        parse("full house: 3 jacks and 2 jacks"),
        Err(ParseError::FullHouseSameRank)
    );
    assert_eq!(
        parse("full house: 3 jacks and 3 queens"),
        Err(ParseError::FullHouseBadCounts)
    );
}

#[test]
fn rejects_flush_without_exactly_five_distinct_ranks() {
    assert_eq!(
        parse("flush of hearts: 2,5,7,king"),
        Err(ParseError::FlushRankCount(4))
    );
    assert_eq!(
        parse("flush of hearts: 2,5,7,king,king"),
        Err(ParseError::FlushRankCount(5))
    );
}

#[test]
fn accepts_the_bare_a_alias_for_ace() {
    assert_eq!(parse("pair of a"), Ok(HandDeclaration::Pair { rank: 14 }));
    assert_eq!(parse("high card a"), Ok(HandDeclaration::HighCard { rank: 14 }));
}

#[test]
fn rejects_unknown_category() {
    assert!(matches!(parse("bluff"), Err(ParseError::UnknownCategory(_))));
    assert!(matches!(parse(""), Err(ParseError::Empty)));
}

/// Property 2: parsing the canonical emitted string for any valid
/// declaration re-yields the same structured declaration.
#[test]
fn canonical_round_trip_holds_for_every_category() {
    let sample = vec![
        HandDeclaration::HighCard { rank: 9 },
        HandDeclaration::Pair { rank: 13 },
        HandDeclaration::TwoPairs { low: 3, high: 11 },
        HandDeclaration::ThreeOfAKind { rank: 6 },
        HandDeclaration::Straight { start: 10 },
        HandDeclaration::Flush { suit: Suit::Hearts, ranks: [2, 5, 7, 13, 14] },
        HandDeclaration::FullHouse { triple: 11, pair: 10 },
        HandDeclaration::FourOfAKind { rank: 8 },
        HandDeclaration::StraightFlush { suit: Suit::Spades, start: 9 },
        HandDeclaration::RoyalFlush { suit: Suit::Diamonds },
    ];
    for decl in sample {
        let rendered = to_canonical(&decl);
        let reparsed = parse(&rendered).unwrap_or_else(|e| panic!("{rendered:?} failed: {e}"));
        assert_eq!(reparsed, decl, "round trip mismatch for {rendered:?}");
    }
}
