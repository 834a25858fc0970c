//! Booking schedule: fixed day slots and availability filtering.
//!
//! The booking day runs from 09:00 to 20:00 inclusive at half-hour
//! granularity, which yields 23 fixed slots. Availability for "today" removes
//! every slot that starts less than one hour from now; future days are always
//! offered in full. An empty result for today is a valid outcome the caller
//! must present as "pick a future date", not an error.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use mockable::Clock;
use thiserror::Error;

use crate::domain::Error;

/// First bookable slot of the day, minutes from midnight (09:00).
const OPENING_MINUTES: u32 = 9 * 60;
/// Last bookable slot of the day, minutes from midnight (20:00).
const CLOSING_MINUTES: u32 = 20 * 60;
/// Slot granularity in minutes.
const SLOT_STEP_MINUTES: u32 = 30;
/// Minimum lead time between "now" and a same-day booking.
const LEAD_TIME_MINUTES: u32 = 60;

/// Errors raised when parsing a slot label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotParseError {
    /// Label was not zero-padded `HH:MM`.
    #[error("slot must be a zero-padded HH:MM label, got {value:?}")]
    Malformed {
        /// The rejected input.
        value: String,
    },
    /// A well-formed time that is not one of the fixed bookable slots.
    #[error("slot {value:?} is outside the bookable day (09:00-20:00, half-hour steps)")]
    OutsideBookableDay {
        /// The rejected input.
        value: String,
    },
}

/// A fixed half-hour booking slot, e.g. `"14:30"`.
///
/// ## Invariants
/// - Always one of the 23 labels produced by [`day_slots`]; parsing anything
///   else fails.
/// - Ordering follows the time of day, which for zero-padded labels is also
///   the lexicographic order of the rendered strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    minutes_from_midnight: u32,
}

impl Slot {
    /// Minutes from midnight at which this slot starts.
    #[must_use]
    pub const fn minutes_from_midnight(&self) -> u32 {
        self.minutes_from_midnight
    }

    /// Render the zero-padded `HH:MM` label.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.minutes_from_midnight / 60;
        let minutes = self.minutes_from_midnight % 60;
        write!(f, "{hours:02}:{minutes:02}")
    }
}

impl FromStr for Slot {
    type Err = SlotParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = || SlotParseError::Malformed {
            value: input.to_owned(),
        };

        let (hours_part, minutes_part) = input.split_once(':').ok_or_else(malformed)?;
        if hours_part.len() != 2 || minutes_part.len() != 2 {
            return Err(malformed());
        }
        let hours: u32 = hours_part.parse().map_err(|_| malformed())?;
        let minutes: u32 = minutes_part.parse().map_err(|_| malformed())?;
        if hours > 23 || minutes > 59 {
            return Err(malformed());
        }

        let total = hours * 60 + minutes;
        let aligned = total % SLOT_STEP_MINUTES == 0;
        if !aligned || total < OPENING_MINUTES || total > CLOSING_MINUTES {
            return Err(SlotParseError::OutsideBookableDay {
                value: input.to_owned(),
            });
        }
        Ok(Self {
            minutes_from_midnight: total,
        })
    }
}

/// The full ordered candidate set of bookable slots for any day.
///
/// # Examples
/// ```
/// use backend::domain::schedule::day_slots;
///
/// let slots = day_slots();
/// assert_eq!(slots.len(), 23);
/// assert_eq!(slots.first().map(ToString::to_string).as_deref(), Some("09:00"));
/// assert_eq!(slots.last().map(ToString::to_string).as_deref(), Some("20:00"));
/// ```
#[must_use]
pub fn day_slots() -> Vec<Slot> {
    (OPENING_MINUTES..=CLOSING_MINUTES)
        .step_by(SLOT_STEP_MINUTES as usize)
        .map(|minutes_from_midnight| Slot {
            minutes_from_midnight,
        })
        .collect()
}

fn lead_time_cutoff(now: NaiveDateTime) -> Option<u32> {
    let threshold = now + chrono::Duration::minutes(i64::from(LEAD_TIME_MINUTES));
    // A cutoff past midnight means no slot of the requested day qualifies.
    if threshold.date() > now.date() {
        return None;
    }
    Some(threshold.time().hour() * 60 + threshold.time().minute())
}

/// Pure availability filter: the slots a client may still select for `date`
/// when the current instant is `now`.
///
/// Past dates are rejected; future dates return the full candidate set; for
/// today only slots at least one hour away survive. Returning an empty vector
/// is a valid outcome.
pub fn slots_open_at(date: NaiveDate, now: NaiveDateTime) -> Result<Vec<Slot>, Error> {
    let today = now.date();
    if date < today {
        return Err(Error::invalid_request("booking date is in the past"));
    }
    if date > today {
        return Ok(day_slots());
    }

    let Some(cutoff) = lead_time_cutoff(now) else {
        return Ok(Vec::new());
    };
    Ok(day_slots()
        .into_iter()
        .filter(|slot| slot.minutes_from_midnight() >= cutoff)
        .collect())
}

/// Validate that `slot` on `date` may still be booked at instant `now`.
pub fn ensure_bookable(date: NaiveDate, slot: Slot, now: NaiveDateTime) -> Result<(), Error> {
    let open = slots_open_at(date, now)?;
    if open.contains(&slot) {
        Ok(())
    } else {
        Err(Error::invalid_request(format!(
            "slot {slot} is no longer available on {date}"
        )))
    }
}

/// Availability queries against the injected clock.
#[derive(Clone)]
pub struct AvailabilityService {
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    /// Create an availability service reading "now" from the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Slots a client may still select for `date` as of now.
    pub fn available_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, Error> {
        slots_open_at(date, self.clock.utc().naive_utc())
    }
}
