use super::*;

#[test]
fn shuffle_preserves_the_52_cards() {
    let mut rng = make_rng(Some(1));
    let deck = shuffle(&mut rng);
    assert_eq!(deck.len(), 52);
    let mut sorted = deck.clone();
    sorted.sort_by_key(|c| (c.suit as u8, c.rank));
    let mut canonical = standard_deck();
    canonical.sort_by_key(|c| (c.suit as u8, c.rank));
    assert_eq!(sorted, canonical);
}

#[test]
fn same_seed_yields_the_same_shuffle() {
    let mut a = make_rng(Some(42));
    let mut b = make_rng(Some(42));
    assert_eq!(shuffle(&mut a), shuffle(&mut b));
}

#[test]
fn deal_consumes_the_deck_in_order_without_duplication() {
    let mut rng = make_rng(Some(7));
    let mut deck = shuffle(&mut rng);
    let top_three = deck[0..3].to_vec();
    let hands = deal(&mut deck, &[1, 2]).unwrap();
    assert_eq!(hands[0], vec![top_three[0]]);
    assert_eq!(hands[1], vec![top_three[1], top_three[2]]);
    assert_eq!(deck.len(), 49);
}

#[test]
fn deal_rejects_insufficient_cards() {
    let mut deck = vec![standard_deck()[0]];
    let err = deal(&mut deck, &[2]).unwrap_err();
    assert_eq!(
        err,
        DeckError::NotEnoughCards {
            need: 2,
            have: 1
        }
    );
}
