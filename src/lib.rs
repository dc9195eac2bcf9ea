pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{Error, Result};
pub use models::{
    Card, Clock, Deck, DeckSet, FixedClock, LearningSession, Quality, Rating, Schedule,
    SystemClock,
};
