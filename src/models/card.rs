//! Card is a pair <front, back> together with its spaced repetition state.
//! The text fields are never inspected by the scheduler.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::sm2::{self, DEFAULT_EASINESS, MAX_INTERVAL_DAYS, MIN_EASINESS, SUSPENDED_INTERVAL_DAYS};

/// Where a card stands in the review cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Due again `interval_days` after the last review (1..=365).
    Active { interval_days: u32 },
    /// Excluded from every future session.
    Suspended,
}

impl Schedule {
    pub fn interval_days(&self) -> Option<u32> {
        match self {
            Schedule::Active { interval_days } => Some(*interval_days),
            Schedule::Suspended => None,
        }
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, Schedule::Suspended)
    }

    /// Encodes the schedule as the on-disk `interval_days` integer.
    fn to_stored(self) -> i64 {
        match self {
            Schedule::Active { interval_days } => i64::from(interval_days),
            Schedule::Suspended => SUSPENDED_INTERVAL_DAYS,
        }
    }

    fn from_stored(stored: i64) -> Self {
        if stored == SUSPENDED_INTERVAL_DAYS {
            return Schedule::Suspended;
        }
        let clamped = stored.clamp(1, i64::from(MAX_INTERVAL_DAYS));
        if clamped != stored {
            tracing::warn!(
                "Stored interval {} out of range, clamped to {}",
                stored,
                clamped
            );
        }
        Schedule::Active {
            interval_days: clamped as u32,
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::Active { interval_days: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "CardRecord", into = "CardRecord")]
pub struct Card {
    pub front: String,
    pub back: String,
    pub schedule: Schedule,
    pub easiness: f64,
    pub last_review: Option<NaiveDateTime>,
    pub reviews: u32,
}

impl Card {
    /// Creates a never-reviewed card with the default schedule.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            schedule: Schedule::default(),
            easiness: DEFAULT_EASINESS,
            last_review: None,
            reviews: 0,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        sm2::is_due(self, today)
    }

    /// Date of the next review, `None` for suspended cards.
    /// A card that was never reviewed is due from the start, reported as `today`.
    pub fn due_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let interval = self.schedule.interval_days()?;
        match self.last_review {
            None => Some(today),
            Some(reviewed) => reviewed
                .date()
                .checked_add_days(chrono::Days::new(u64::from(interval))),
        }
    }
}

/// Persisted shape of a card.
#[derive(Serialize, Deserialize)]
struct CardRecord {
    front: String,
    back: String,
    #[serde(default = "default_interval_days")]
    interval_days: i64,
    #[serde(default = "default_easiness")]
    easiness: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "review_time"
    )]
    last_review: Option<NaiveDateTime>,
    #[serde(default)]
    reviews: u32,
}

fn default_interval_days() -> i64 {
    1
}

fn default_easiness() -> f64 {
    DEFAULT_EASINESS
}

impl From<CardRecord> for Card {
    fn from(record: CardRecord) -> Self {
        let easiness = if record.easiness.is_finite() {
            record.easiness.max(MIN_EASINESS)
        } else {
            DEFAULT_EASINESS
        };
        if easiness != record.easiness {
            tracing::warn!(
                "Stored easiness {} for '{}' replaced by {}",
                record.easiness,
                record.front,
                easiness
            );
        }
        Self {
            schedule: Schedule::from_stored(record.interval_days),
            front: record.front,
            back: record.back,
            easiness,
            last_review: record.last_review,
            reviews: record.reviews,
        }
    }
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        Self {
            front: card.front,
            back: card.back,
            interval_days: card.schedule.to_stored(),
            easiness: card.easiness,
            last_review: card.last_review,
            reviews: card.reviews,
        }
    }
}

/// ISO-8601 review timestamps. Written as naive local time; read leniently.
mod review_time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }

    pub(super) fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
            return Ok(time.naive_local());
        }
        if let Ok(time) = raw.parse::<NaiveDateTime>() {
            return Ok(time);
        }
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Ok(time);
        }
        raw.parse::<NaiveDate>()
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| format!("invalid review timestamp '{}'", raw))
    }
}
