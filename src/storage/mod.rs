pub mod json;

pub use json::{JsonFileSink, load_deck_set, save_deck_set};
