//! Deck is a named, ordered list of cards
use chrono::NaiveDate;

use super::Card;

#[derive(Clone, Debug, PartialEq)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    pub fn add_card(&mut self, front: impl Into<String>, back: impl Into<String>) -> &Card {
        self.cards.push(Card::new(front, back));
        &self.cards[self.cards.len() - 1]
    }

    pub fn due_count(&self, today: NaiveDate) -> usize {
        self.cards.iter().filter(|c| c.is_due(today)).count()
    }

    pub fn suspended_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| c.schedule.is_suspended())
            .count()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new("My Deck")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Schedule;

    #[test]
    fn test_counts() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut deck = Deck::new("Polish Vocabulary");
        deck.add_card("cześć", "hello");
        deck.add_card("dziękuję", "thank you");
        deck.add_card("proszę", "please");

        deck.cards[1].last_review = Some(today.and_hms_opt(9, 0, 0).unwrap());
        deck.cards[2].schedule = Schedule::Suspended;
        deck.cards[2].last_review = Some(today.and_hms_opt(9, 0, 0).unwrap());

        assert_eq!(deck.due_count(today), 1);
        assert_eq!(deck.suspended_count(), 1);
    }
}
