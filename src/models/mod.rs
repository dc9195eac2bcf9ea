pub mod card;
pub mod clock;
pub mod deck;
pub mod deck_set;
pub mod learning_session;
pub mod session;
pub mod sm2;

pub use card::{Card, Schedule};
pub use clock::{Clock, FixedClock, SystemClock};
pub use deck::Deck;
pub use deck_set::DeckSet;
pub use learning_session::LearningSession;
pub use sm2::{Quality, Rating};
