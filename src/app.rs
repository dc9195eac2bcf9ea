//! Terminal front end: deck commands and the interactive review loop.

use std::io::{self, BufRead, Write};

use anyhow::{Context, bail};
use flashcards_app::config::Config;
use flashcards_app::models::learning_session::{
    Action, DeckSink, ReviewPrompt, SessionSummary, persist,
};
use flashcards_app::storage::JsonFileSink;
use flashcards_app::{Card, Clock, LearningSession, Rating, Schedule};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Reads review actions line by line. End of input counts as quitting.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Option<String> {
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                None
            }
        }
    }

    /// Asks a yes/no question, defaulting to no.
    pub fn confirm(&mut self, question: &str) -> bool {
        let _ = write!(self.output, "{} [y/N] ", question);
        matches!(
            self.read_line().as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        )
    }
}

fn skip_or_quit(answer: &str) -> Option<Action> {
    match answer.to_ascii_lowercase().as_str() {
        "k" | "skip" => Some(Action::Skip),
        "q" | "quit" => Some(Action::Quit),
        _ => None,
    }
}

impl<R: BufRead, W: Write> ReviewPrompt for TerminalPrompt<R, W> {
    fn front(&mut self, card: &Card, remaining: usize) -> Action {
        let _ = writeln!(self.output, "\n[{} left] {}", remaining, card.front);
        let _ = write!(self.output, "(Enter = show answer, k = skip, q = quit) ");
        let Some(answer) = self.read_line() else {
            return Action::Quit;
        };
        skip_or_quit(&answer).unwrap_or(Action::Reveal)
    }

    fn back(&mut self, card: &Card) -> Action {
        let _ = writeln!(self.output, "    {}", card.back);
        loop {
            let _ = write!(self.output, "Rate 0-5, s = suspend, k = skip, q = quit: ");
            let Some(answer) = self.read_line() else {
                return Action::Quit;
            };
            if let Some(action) = skip_or_quit(&answer) {
                return action;
            }
            match answer.parse::<Rating>() {
                Ok(rating) => return Action::Rate(rating),
                Err(e) => {
                    let _ = writeln!(self.output, "{}", e);
                }
            }
        }
    }
}

fn describe(card: &Card, clock: &dyn Clock) -> String {
    let today = clock.today();
    match card.schedule {
        Schedule::Suspended => "suspended".to_string(),
        Schedule::Active { .. } if card.is_due(today) => "due".to_string(),
        Schedule::Active { interval_days } => match card.due_date(today) {
            Some(date) => format!("due {} (every {} days)", date, interval_days),
            None => format!("every {} days", interval_days),
        },
    }
}

/// Prints every deck with its card counts.
pub fn list_decks(config: &Config, clock: &dyn Clock) -> anyhow::Result<()> {
    let decks = JsonFileSink::new(&config.deck_file).load()?;
    if decks.decks.is_empty() {
        println!("No decks yet. Add one with `flashcards add <deck> <front> <back>`.");
        return Ok(());
    }
    let today = clock.today();
    for deck in &decks.decks {
        println!(
            "{} ({} cards, {} due, {} suspended)",
            deck.name,
            deck.cards.len(),
            deck.due_count(today),
            deck.suspended_count()
        );
    }
    Ok(())
}

/// Prints the cards of one deck with their schedule.
pub fn list_cards(config: &Config, deck_name: &str, clock: &dyn Clock) -> anyhow::Result<()> {
    let decks = JsonFileSink::new(&config.deck_file).load()?;
    let Some(deck) = decks.get(deck_name) else {
        bail!("Deck '{}' not found", deck_name);
    };
    for (i, card) in deck.cards.iter().enumerate() {
        println!(
            "{:>3}. {} -> {}  [{}]  EF {:.2}, {} reviews",
            i + 1,
            card.front,
            card.back,
            describe(card, clock),
            card.easiness,
            card.reviews
        );
    }
    Ok(())
}

/// Appends a new card, creating the deck when needed.
pub fn add_card(config: &Config, deck_name: &str, front: &str, back: &str) -> anyhow::Result<()> {
    let front = front.trim();
    let back = back.trim();
    if front.is_empty() || back.is_empty() {
        bail!("Front and back must not be empty");
    }

    let mut sink = JsonFileSink::new(&config.deck_file);
    let mut decks = sink.load()?;
    let deck = decks.get_or_create(deck_name);
    deck.add_card(front, back);
    let total = deck.cards.len();

    sink.save(&decks)
        .with_context(|| format!("Failed to save {}", sink.path().display()))?;
    println!("Added card to '{}' ({} cards).", deck_name, total);
    Ok(())
}

/// Runs an interactive review of one deck and saves the result once.
pub fn review(
    config: &Config,
    deck_name: &str,
    size: usize,
    seed: Option<u64>,
    clock: &dyn Clock,
) -> anyhow::Result<SessionSummary> {
    let mut sink = JsonFileSink::new(&config.deck_file);
    let mut decks = sink.load()?;
    let deck = decks.deck_mut(deck_name)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut session = LearningSession::compose(deck, clock.today(), size, &mut rng);
    if session.is_completed() {
        println!("Nothing to study in '{}'.", deck_name);
        return Ok(session.summary());
    }

    let stdin = io::stdin();
    let mut prompt = TerminalPrompt::new(stdin.lock(), io::stdout());
    let summary = session.run(deck, clock, &mut prompt);
    println!(
        "\nReviewed {} of {} cards ({} skips){}.",
        summary.rated,
        summary.planned,
        summary.skipped,
        if summary.quit { ", stopped early" } else { "" }
    );

    loop {
        match persist(&summary, &decks, &mut sink) {
            Ok(_) => return Ok(summary),
            Err(e) => {
                eprintln!("Failed to save {}: {}", sink.path().display(), e);
                if !prompt.confirm("Retry saving?") {
                    return Err(e).context("Review results were not saved");
                }
            }
        }
    }
}
