//! Composition of a review session.
//!
//! Due cards come first in deck order, up to the target size. Any room left is
//! filled with a random sample of cards that are not due yet, and the result is
//! shuffled so due and backfilled cards are indistinguishable by position.
//! Suspended cards are never used for backfill.

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::Card;

pub const DEFAULT_SESSION_SIZE: usize = 10;

/// Picks the cards for a session and returns their indices into `cards`.
/// An empty result means there is nothing to study.
pub fn compose_session_indices<R: Rng + ?Sized>(
    cards: &[Card],
    today: NaiveDate,
    target_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    let (due, other): (Vec<usize>, Vec<usize>) =
        (0..cards.len()).partition(|&i| cards[i].is_due(today));
    let other: Vec<usize> = other
        .into_iter()
        .filter(|&i| !cards[i].schedule.is_suspended())
        .collect();

    let mut selected: Vec<usize> = due.iter().copied().take(target_size).collect();
    let due_taken = selected.len();

    let missing = target_size - selected.len();
    if missing > 0 && !other.is_empty() {
        let amount = missing.min(other.len());
        selected.extend(other.choose_multiple(rng, amount).copied());
    }

    selected.shuffle(rng);

    tracing::info!(
        "Composed session of {} cards ({} due of {}, {} backfilled)",
        selected.len(),
        due_taken,
        due.len(),
        selected.len() - due_taken
    );
    selected
}

/// Same as [`compose_session_indices`] but returns the cards themselves.
pub fn compose_session<'a, R: Rng + ?Sized>(
    cards: &'a [Card],
    today: NaiveDate,
    target_size: usize,
    rng: &mut R,
) -> Vec<&'a Card> {
    compose_session_indices(cards, today, target_size, rng)
        .into_iter()
        .map(|i| &cards[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Schedule;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    /// Builds `total` cards; the first `due` were never reviewed, the rest were reviewed today.
    fn deck(total: usize, due: usize) -> Vec<Card> {
        (0..total)
            .map(|i| {
                let mut card = Card::new(format!("front {i}"), format!("back {i}"));
                if i >= due {
                    card.schedule = Schedule::Active { interval_days: 5 };
                    card.last_review = Some(today().and_hms_opt(8, 0, 0).unwrap());
                }
                card
            })
            .collect()
    }

    #[test]
    fn test_three_due_backfilled_to_ten() {
        let cards = deck(15, 3);
        let mut rng = StdRng::seed_from_u64(7);

        let session = compose_session_indices(&cards, today(), 10, &mut rng);

        assert_eq!(session.len(), 10);
        for due in 0..3 {
            assert!(session.contains(&due), "due card {due} missing");
        }
        let unique: HashSet<_> = session.iter().collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_due_cards_taken_in_deck_order() {
        let cards = deck(20, 12);
        let mut rng = StdRng::seed_from_u64(1);

        let mut session = compose_session_indices(&cards, today(), 10, &mut rng);
        session.sort();

        assert_eq!(session, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_deck_gives_empty_session() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(compose_session(&[], today(), 10, &mut rng).is_empty());
    }

    #[test]
    fn test_zero_target_size() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(compose_session(&deck(5, 2), today(), 0, &mut rng).is_empty());
    }

    #[test]
    fn test_suspended_cards_are_not_backfilled() {
        let mut cards = deck(4, 1);
        for card in &mut cards[1..] {
            card.schedule = Schedule::Suspended;
        }
        let mut rng = StdRng::seed_from_u64(9);

        let session = compose_session(&cards, today(), 10, &mut rng);

        assert_eq!(session.len(), 1);
        assert_eq!(session[0].front, "front 0");
    }

    #[test]
    fn test_returns_references_into_deck() {
        let cards = deck(3, 3);
        let mut rng = StdRng::seed_from_u64(5);

        let session = compose_session(&cards, today(), 10, &mut rng);

        assert_eq!(session.len(), 3);
        assert!(session.iter().all(|c| cards.iter().any(|d| std::ptr::eq(*c, d))));
    }

    proptest! {
        #[test]
        fn prop_session_size_bounds(total in 0usize..40, due_share in 0usize..40, target in 0usize..25, seed in any::<u64>()) {
            let due = due_share.min(total);
            let cards = deck(total, due);
            let mut rng = StdRng::seed_from_u64(seed);

            let session = compose_session_indices(&cards, today(), target, &mut rng);

            if total >= target {
                prop_assert_eq!(session.len(), target);
            } else {
                prop_assert_eq!(session.len(), total);
            }
            let unique: HashSet<_> = session.iter().collect();
            prop_assert_eq!(unique.len(), session.len());
            let due_in_session = session.iter().filter(|&&i| i < due).count();
            prop_assert_eq!(due_in_session, due.min(target));
        }

        #[test]
        fn prop_fixed_seed_is_deterministic(total in 0usize..30, due_share in 0usize..30, seed in any::<u64>()) {
            let cards = deck(total, due_share.min(total));

            let first = compose_session_indices(&cards, today(), 10, &mut StdRng::seed_from_u64(seed));
            let second = compose_session_indices(&cards, today(), 10, &mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(first, second);
        }
    }
}
