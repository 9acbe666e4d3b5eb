use std::collections::HashSet;

use fairdeal_engine::cards::{full_deck, Card, DECK_SIZE};
use fairdeal_engine::deck::ShuffledDeck;
use fairdeal_engine::errors::EngineError;
use fairdeal_engine::fairness::{SeededShuffle, ShuffleOrigin, ShuffleProof, Shuffler};
use std::sync::Arc;

fn sorted(mut cards: Vec<Card>) -> Vec<Card> {
    cards.sort();
    cards
}

#[test]
fn system_deck_is_a_permutation_of_52() {
    for _ in 0..20 {
        let deck = ShuffledDeck::create();
        assert_eq!(deck.len(), DECK_SIZE);
        assert_eq!(sorted(deck.full_deck().to_vec()), sorted(full_deck()));
        assert!(deck.cut_position() < DECK_SIZE);
        assert!(!deck.origin().is_fallback());
    }
}

#[test]
fn multi_deck_shoe_holds_each_card_deck_count_times() {
    let shuffler = Shuffler::new(4).with_source(Arc::new(SeededShuffle::new(99)));
    let shoe = ShuffledDeck::from_shuffler(&shuffler);
    assert_eq!(shoe.len(), 4 * DECK_SIZE);
    assert_eq!(shoe.deck_count(), 4);
    for card in full_deck() {
        let n = shoe.full_deck().iter().filter(|&&c| c == card).count();
        assert_eq!(n, 4, "{} appears {} times", card, n);
    }
    assert!(shoe.proof().verify(4).is_ok());
}

#[test]
fn dealing_order_visits_every_index_once() {
    let deck = ShuffledDeck::new_with_seed(2024);
    let order = deck.dealing_order();
    let unique: HashSet<usize> = order.indexes.iter().copied().collect();
    assert_eq!(unique.len(), DECK_SIZE);
    assert_eq!(order.indexes[0], deck.cut_position());
    for (i, idx) in order.indexes.iter().enumerate() {
        assert_eq!(*idx, (deck.cut_position() + i) % DECK_SIZE);
        assert_eq!(order.cards[i], deck.full_deck()[*idx]);
    }
}

#[test]
fn dealing_follows_the_displayed_order() {
    let mut deck = ShuffledDeck::new_with_seed(77);
    let mut dealt = deck.deal(5).unwrap();
    dealt.extend(deck.deal(2).unwrap());
    deck.burn_card();
    dealt.push(deck.deal_card().unwrap());

    let shown = deck.dealing_order_for_display();
    assert_eq!(&shown.cards[..7], &dealt[..7]);
    assert_eq!(shown.cards[8], dealt[7]);
    assert_eq!(deck.dealt(), 9);
    assert_eq!(deck.remaining(), DECK_SIZE - 9);
}

#[test]
fn same_seed_same_shoe() {
    let a = ShuffledDeck::new_with_seed(12345);
    let b = ShuffledDeck::new_with_seed(12345);
    assert_eq!(a.full_deck(), b.full_deck());
    assert_eq!(a.cut_position(), b.cut_position());

    let c = ShuffledDeck::new_with_seed(54321);
    assert_ne!(
        a.full_deck(),
        c.full_deck(),
        "different seeds should produce different orders (high probability)"
    );
}

#[test]
fn deal_past_the_end_is_insufficient_cards() {
    let mut deck = ShuffledDeck::new_with_seed(1);
    deck.deal(48).unwrap();
    assert!(deck.needs_reshuffle(10));
    assert!(!deck.needs_reshuffle(4));
    assert_eq!(
        deck.deal(5),
        Err(EngineError::InsufficientCards {
            requested: 5,
            remaining: 4
        })
    );
    assert_eq!(deck.remaining(), 4);
}

#[test]
fn published_proof_rebuilds_the_same_shoe() {
    let deck = ShuffledDeck::new_with_seed(8);
    let json = serde_json::to_string(&deck.proof().to_wire()).unwrap();

    let proof = ShuffleProof::from_json(&json).unwrap();
    let rebuilt = ShuffledDeck::from_proof(proof, ShuffleOrigin::Source { name: "audit".into() }).unwrap();
    assert_eq!(rebuilt.full_deck(), deck.full_deck());
    assert_eq!(rebuilt.dealing_order(), deck.dealing_order());
}

#[test]
fn dealing_in_chunks_walks_the_dealing_order() {
    let mut deck = ShuffledDeck::new_with_seed(808);
    let expected: Vec<Card> = deck.card_sequence().collect();

    let mut dealt = Vec::new();
    for n in [1, 2, 5, 7, 13, 24] {
        dealt.extend(deck.deal(n).unwrap());
    }
    assert_eq!(deck.remaining(), 0);
    assert_eq!(dealt, expected);

    let distinct: HashSet<Card> = dealt.iter().copied().collect();
    assert_eq!(distinct.len(), DECK_SIZE);
}
