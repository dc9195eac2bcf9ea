//! Review session state machine and the loop that drives it.
//!
//! Each card goes front -> back -> rated. Skipped cards return to the end of the
//! queue and are not rated. Quitting drops whatever is left. The deck is written
//! to the sink once, after the loop, and only when something was rated.

use std::collections::VecDeque;

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;

use super::session::compose_session_indices;
use super::{Card, Clock, Deck, DeckSet, Rating};
use crate::error::Result;

/// Which face of the current card is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    PresentingFront,
    PresentingBack,
    Finished,
}

/// What the user asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Reveal,
    Rate(Rating),
    Skip,
    Quit,
}

/// Result of handling one action.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    Revealed,
    Rated { index: usize, card: Card },
    Skipped,
    Quit,
    /// The action does not apply in the current phase.
    Ignored,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub planned: usize,
    pub rated: usize,
    pub skipped: usize,
    pub quit: bool,
}

impl SessionSummary {
    /// True when the deck was changed and needs saving.
    pub fn has_changes(&self) -> bool {
        self.rated > 0
    }
}

/// Front end that shows cards and reads the user's choice.
pub trait ReviewPrompt {
    fn front(&mut self, card: &Card, remaining: usize) -> Action;
    fn back(&mut self, card: &Card) -> Action;
}

/// Persistence target for the whole deck set.
pub trait DeckSink {
    fn save(&mut self, decks: &DeckSet) -> Result<()>;
}

/// Cards of one deck queued for review.
#[derive(Clone, Debug)]
pub struct LearningSession {
    pub deck_name: String,
    queue: VecDeque<usize>,
    phase: Phase,
    summary: SessionSummary,
}

impl LearningSession {
    /// Creates a session over `queue`, a list of indices into the deck's cards.
    pub fn new(deck_name: impl Into<String>, queue: Vec<usize>) -> Self {
        let planned = queue.len();
        Self {
            deck_name: deck_name.into(),
            phase: if queue.is_empty() {
                Phase::Finished
            } else {
                Phase::PresentingFront
            },
            queue: queue.into(),
            summary: SessionSummary {
                planned,
                ..SessionSummary::default()
            },
        }
    }

    /// Composes a session for `deck` as of `today`.
    pub fn compose<R: Rng + ?Sized>(
        deck: &Deck,
        today: NaiveDate,
        target_size: usize,
        rng: &mut R,
    ) -> Self {
        let queue = compose_session_indices(&deck.cards, today, target_size, rng);
        Self::new(deck.name.clone(), queue)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.front().copied()
    }

    pub fn current_card<'a>(&self, deck: &'a Deck) -> Option<&'a Card> {
        self.current_index().and_then(|i| deck.cards.get(i))
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Applies one user action. Ratings update the card in `deck` as of `now`.
    pub fn handle(&mut self, action: Action, deck: &mut Deck, now: NaiveDateTime) -> Transition {
        match (self.phase, action) {
            (Phase::Finished, _) => Transition::Ignored,
            (_, Action::Quit) => {
                tracing::info!(
                    "Session on '{}' stopped with {} cards left",
                    self.deck_name,
                    self.queue.len()
                );
                self.queue.clear();
                self.summary.quit = true;
                self.phase = Phase::Finished;
                Transition::Quit
            }
            (_, Action::Skip) => {
                if let Some(index) = self.queue.pop_front() {
                    self.queue.push_back(index);
                }
                self.summary.skipped += 1;
                self.phase = Phase::PresentingFront;
                Transition::Skipped
            }
            (Phase::PresentingFront, Action::Reveal) => {
                self.phase = Phase::PresentingBack;
                Transition::Revealed
            }
            (Phase::PresentingBack, Action::Rate(rating)) => {
                let Some(index) = self.queue.pop_front() else {
                    self.phase = Phase::Finished;
                    return Transition::Ignored;
                };
                let Some(card) = deck.cards.get_mut(index) else {
                    tracing::warn!("Card {} vanished from deck '{}'", index, self.deck_name);
                    self.advance();
                    return Transition::Ignored;
                };
                card.apply(rating, now);
                self.summary.rated += 1;
                let card = card.clone();
                self.advance();
                Transition::Rated { index, card }
            }
            (Phase::PresentingFront, Action::Rate(_)) | (Phase::PresentingBack, Action::Reveal) => {
                Transition::Ignored
            }
        }
    }

    fn advance(&mut self) {
        self.phase = if self.queue.is_empty() {
            Phase::Finished
        } else {
            Phase::PresentingFront
        };
    }

    /// Drives the session to the end through `prompt`.
    pub fn run<P: ReviewPrompt + ?Sized, C: Clock + ?Sized>(
        &mut self,
        deck: &mut Deck,
        clock: &C,
        prompt: &mut P,
    ) -> SessionSummary {
        while !self.is_completed() {
            let Some(card) = self.current_card(deck) else {
                tracing::warn!("Session on '{}' points past the deck", self.deck_name);
                self.queue.clear();
                self.phase = Phase::Finished;
                break;
            };
            let action = match self.phase {
                Phase::PresentingFront => prompt.front(card, self.queue.len()),
                Phase::PresentingBack => prompt.back(card),
                Phase::Finished => break,
            };
            self.handle(action, deck, clock.now());
        }
        self.summary
    }
}

/// Writes the deck set if the session changed anything.
/// Returns whether a write happened. On failure the in-memory decks are untouched and
/// the call can simply be repeated.
pub fn persist<S: DeckSink + ?Sized>(
    summary: &SessionSummary,
    decks: &DeckSet,
    sink: &mut S,
) -> Result<bool> {
    if !summary.has_changes() {
        tracing::info!("Nothing rated, skipping save");
        return Ok(false);
    }
    sink.save(decks)?;
    Ok(true)
}

/// Composes, runs and saves one session on `deck_name`.
pub fn review_deck<R, C, P, S>(
    decks: &mut DeckSet,
    deck_name: &str,
    target_size: usize,
    clock: &C,
    rng: &mut R,
    prompt: &mut P,
    sink: &mut S,
) -> Result<SessionSummary>
where
    R: Rng + ?Sized,
    C: Clock + ?Sized,
    P: ReviewPrompt + ?Sized,
    S: DeckSink + ?Sized,
{
    let deck = decks.deck_mut(deck_name)?;
    let mut session = LearningSession::compose(deck, clock.today(), target_size, rng);
    let summary = session.run(deck, clock, prompt);
    persist(&summary, decks, sink)?;
    Ok(summary)
}
