//! Container for all available decks.
//!
//! Stored as a JSON object mapping deck name to its list of cards.
//! Decks keep the order in which they appear in the file.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Card, Deck};
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeckSet {
    pub decks: Vec<Deck>,
}

impl DeckSet {
    pub fn get(&self, name: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.name == name)
    }

    pub fn deck_mut(&mut self, name: &str) -> Result<&mut Deck> {
        self.get_mut(name)
            .ok_or_else(|| Error::DeckNotFound(name.to_string()))
    }

    /// Returns the deck, creating an empty one at the end if needed.
    pub fn get_or_create(&mut self, name: &str) -> &mut Deck {
        let index = match self.decks.iter().position(|d| d.name == name) {
            Some(index) => index,
            None => {
                tracing::info!("Creating deck '{}'", name);
                self.decks.push(Deck::new(name));
                self.decks.len() - 1
            }
        };
        &mut self.decks[index]
    }
}

impl Serialize for DeckSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.decks.len()))?;
        for deck in &self.decks {
            map.serialize_entry(&deck.name, &deck.cards)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DeckSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DeckSetVisitor)
    }
}

struct DeckSetVisitor;

impl<'de> Visitor<'de> for DeckSetVisitor {
    type Value = DeckSet;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of deck names to card lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<DeckSet, A::Error> {
        let mut set = DeckSet::default();
        while let Some((name, cards)) = access.next_entry::<String, Vec<Card>>()? {
            match set.get_mut(&name) {
                // Duplicate keys: last one wins, like a JSON object
                Some(deck) => deck.cards = cards,
                None => set.decks.push(Deck { name, cards }),
            }
        }
        Ok(set)
    }
}
