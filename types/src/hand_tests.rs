use super::*;
use crate::cards::Suit;
use std::cmp::Ordering;

fn pair(r: Rank) -> HandDeclaration {
    HandDeclaration::Pair { rank: r }
}

#[test]
fn category_ordinal_is_as_specified() {
    use HandCategory::*;
    let ordered = [
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
    ];
    for w in ordered.windows(2) {
        assert!(w[0] < w[1]);
    }
}

#[test]
fn higher_category_always_wins() {
    let a = pair(14);
    let b = HandDeclaration::TwoPairs { low: 2, high: 3 };
    assert!(gt(&b, &a));
    assert!(!gt(&a, &b));
}

#[test]
fn pair_ties_break_on_rank() {
    assert!(gt(&pair(14), &pair(13)));
    assert!(!gt(&pair(13), &pair(14)));
    assert_eq!(compare(&pair(13), &pair(13)), Ordering::Equal);
}

#[test]
fn two_pairs_compares_high_then_low() {
    let a = HandDeclaration::two_pairs(3, 7);
    let b = HandDeclaration::two_pairs(4, 7);
    assert!(gt(&b, &a)); // same high (7), higher low (4>3)
    let c = HandDeclaration::two_pairs(2, 8);
    assert!(gt(&c, &a)); // higher high (8>7)
}

#[test]
fn full_house_compares_triple_then_pair() {
    let a = HandDeclaration::FullHouse { triple: 3, pair: 10 };
    let b = HandDeclaration::FullHouse { triple: 3, pair: 11 };
    assert!(gt(&b, &a));
    let c = HandDeclaration::FullHouse { triple: 4, pair: 2 };
    assert!(gt(&c, &a));
}

#[test]
fn flush_ties_on_equal_max_are_not_a_raise() {
    let a = HandDeclaration::Flush { suit: Suit::Hearts, ranks: [2, 5, 7, 9, 14] };
    let b = HandDeclaration::Flush { suit: Suit::Spades, ranks: [3, 4, 6, 8, 14] };
    assert_eq!(compare(&a, &b), Ordering::Equal);
    assert!(!gt(&a, &b));
    assert!(!gt(&b, &a));
}

#[test]
fn flush_with_higher_max_wins() {
    let a = HandDeclaration::Flush { suit: Suit::Hearts, ranks: [2, 5, 7, 9, 13] };
    let b = HandDeclaration::Flush { suit: Suit::Spades, ranks: [3, 4, 6, 8, 14] };
    assert!(gt(&b, &a));
}

#[test]
fn royal_flush_has_no_raise() {
    let a = HandDeclaration::RoyalFlush { suit: Suit::Hearts };
    let b = HandDeclaration::RoyalFlush { suit: Suit::Spades };
    assert_eq!(compare(&a, &b), Ordering::Equal);
    assert!(!gt(&a, &b));
    assert!(!gt(&b, &a));
}

/// Property 1: for every pair of distinct declarations, exactly one of
/// gt(A,B), gt(B,A), or equality (same category+key) holds.
#[test]
fn ordering_is_total_over_a_sample() {
    let sample = vec![
        HandDeclaration::HighCard { rank: 5 },
        pair(9),
        pair(14),
        HandDeclaration::two_pairs(3, 7),
        HandDeclaration::two_pairs(4, 7),
        HandDeclaration::ThreeOfAKind { rank: 6 },
        HandDeclaration::Straight { start: 5 },
        HandDeclaration::Flush { suit: Suit::Hearts, ranks: [2, 5, 7, 9, 14] },
        HandDeclaration::FullHouse { triple: 3, pair: 10 },
        HandDeclaration::FourOfAKind { rank: 8 },
        HandDeclaration::StraightFlush { suit: Suit::Clubs, start: 4 },
        HandDeclaration::RoyalFlush { suit: Suit::Diamonds },
    ];
    for a in &sample {
        for b in &sample {
            let ab = gt(a, b);
            let ba = gt(b, a);
            assert!(!(ab && ba), "both directions greater for {a:?} vs {b:?}");
            if ab {
                assert_eq!(compare(b, a), Ordering::Less);
            }
            if !ab && !ba {
                assert_eq!(compare(a, b), Ordering::Equal);
            }
        }
    }
}
