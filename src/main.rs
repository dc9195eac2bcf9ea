mod app;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use flashcards_app::config::Config;
use flashcards_app::{Clock, FixedClock, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flashcards", about = "Spaced repetition flashcards", version)]
struct Cli {
    /// Deck store to use (default: $FLASHCARDS_FILE, flashcards.toml or ~/.flashcards.json)
    #[arg(long, global = true)]
    deck_file: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List decks with their due counts
    Decks,

    /// Add a card to a deck, creating the deck if needed
    Add {
        deck: String,
        front: String,
        back: String,
    },

    /// List the cards of a deck
    List { deck: String },

    /// Review a deck interactively
    Review {
        deck: String,
        /// Number of cards in the session (default: from config, 10)
        #[arg(long)]
        size: Option<usize>,
        /// Seed for a reproducible card order
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.deck_file)?;
    let clock: Box<dyn Clock> = match cli.today {
        Some(date) => Box::new(FixedClock::on_date(date)),
        None => Box::new(SystemClock),
    };

    match cli.command {
        Command::Decks => app::list_decks(&config, clock.as_ref()),
        Command::Add { deck, front, back } => app::add_card(&config, &deck, &front, &back),
        Command::List { deck } => app::list_cards(&config, &deck, clock.as_ref()),
        Command::Review { deck, size, seed } => {
            let size = size.unwrap_or(config.session_size);
            app::review(&config, &deck, size, seed, clock.as_ref()).map(|_| ())
        }
    }
}
