//! SM-2 (SuperMemo 2) style scheduling.
//!
//! Two pure pieces live here:
//! - the due check: a card is due once `interval_days` have passed since its last review
//! - the updater: after each rating the easiness factor (EF) moves by a quality-deficit term,
//!   and the next interval is the current one multiplied by the new EF
//!
//! EF never falls below 1.3 and active intervals stay within 1..=365 days.
//! Rating a card "suspend" takes it out of every future session.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime};

use super::{Card, Schedule};
use crate::error::{Error, Result};

pub const MIN_EASINESS: f64 = 1.3;
pub const DEFAULT_EASINESS: f64 = 2.5;
pub const MAX_INTERVAL_DAYS: u32 = 365;
/// On-disk `interval_days` value of a suspended card.
pub const SUSPENDED_INTERVAL_DAYS: i64 = 99999;

/// Recall quality: 0 = complete blackout, 5 = perfect response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Quality {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::InvalidQuality(value));
        }
        Ok(Quality(value))
    }
}

/// What the user answered for a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Suspend,
    Quality(Quality),
}

impl FromStr for Rating {
    type Err = Error;

    /// Accepts `0`-`5`, or `s` / `suspend`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("s") || trimmed.eq_ignore_ascii_case("suspend") {
            return Ok(Rating::Suspend);
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(|q| Quality::try_from(q).ok())
            .map(Rating::Quality)
            .ok_or_else(|| Error::InvalidRating(s.to_string()))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Suspend => write!(f, "suspend"),
            Rating::Quality(q) => write!(f, "{}", q.value()),
        }
    }
}

/// Returns true when the card should be reviewed on `today`.
/// Only the date of the last review counts, not the time of day.
pub fn is_due(card: &Card, today: NaiveDate) -> bool {
    let Some(last_review) = card.last_review else {
        return true;
    };
    match card.schedule {
        Schedule::Suspended => false,
        Schedule::Active { interval_days } => last_review
            .date()
            .checked_add_days(Days::new(u64::from(interval_days)))
            .is_some_and(|due| due <= today),
    }
}

/// New easiness factor after a quality rating.
pub fn next_easiness(easiness: f64, quality: Quality) -> f64 {
    let deficit = f64::from(Quality::MAX - quality.value());
    let new_ef = easiness + (0.1 - deficit * 0.08 * (5.0 - easiness));
    new_ef.max(MIN_EASINESS)
}

/// Next interval: the current one grown by the new easiness factor, truncated to whole days.
pub fn next_interval(interval_days: u32, new_easiness: f64) -> u32 {
    let grown = (f64::from(interval_days) * new_easiness).trunc();
    grown.clamp(1.0, f64::from(MAX_INTERVAL_DAYS)) as u32
}

/// Calculates the card's state after a rating given at `now`.
pub fn update(card: &Card, rating: Rating, now: NaiveDateTime) -> Card {
    let (schedule, easiness) = match rating {
        Rating::Suspend => (Schedule::Suspended, card.easiness),
        Rating::Quality(quality) => {
            // A suspended card brought back by a rating restarts from one day.
            let interval = card.schedule.interval_days().unwrap_or(1);
            let new_ef = next_easiness(card.easiness, quality);
            let new_interval = next_interval(interval, new_ef);
            (
                Schedule::Active {
                    interval_days: new_interval,
                },
                new_ef,
            )
        }
    };

    tracing::debug!(
        "Rated '{}' {}: easiness {:.2} -> {:.2}, schedule {:?} -> {:?}",
        card.front,
        rating,
        card.easiness,
        easiness,
        card.schedule,
        schedule
    );

    Card {
        front: card.front.clone(),
        back: card.back.clone(),
        schedule,
        easiness,
        last_review: Some(now),
        reviews: card.reviews.saturating_add(1),
    }
}

impl Card {
    /// Applies a rating in place.
    pub fn apply(&mut self, rating: Rating, now: NaiveDateTime) {
        *self = update(self, rating, now);
    }
}
