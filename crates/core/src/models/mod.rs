//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::ScheduleTime;

/// One row of the train catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainRecord {
    /// Railway-assigned train number. Display field only: the seed data
    /// itself repeats 11078, so the number is not a unique key.
    pub number: u32,
    /// Service name, e.g. `Rajdhani Express`.
    pub name: String,
    /// Boarding station.
    pub source: String,
    /// Terminal station.
    pub destination: String,
    /// Departure from the boarding station.
    pub start_time: ScheduleTime,
    /// Arrival at the terminal station.
    pub reach_time: ScheduleTime,
    /// Seats the service runs with.
    pub total_seats: u32,
    /// Seats still open for booking. The seed keeps balances above
    /// `total_seats` for some trains; no upper bound is enforced.
    pub balance: u32,
}

impl fmt::Display for TrainRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Train No: {}, Name: {}, Source: {} (Start: {}), Destination: {} (Reach: {})",
            self.number, self.name, self.source, self.start_time, self.destination, self.reach_time
        )
    }
}

/// Free-text form input for a new catalog row.
///
/// Mirrors the admin insert form: every field arrives as a string and is
/// validated here, before any store mutation, by [`TrainRecordDraft::parse`].
#[derive(Debug, Clone, Default)]
pub struct TrainRecordDraft {
    /// Raw train number input.
    pub number: String,
    /// Raw service name input.
    pub name: String,
    /// Raw boarding station input.
    pub source: String,
    /// Raw terminal station input.
    pub destination: String,
    /// Raw departure time input, expected `HH:MM`.
    pub start_time: String,
    /// Raw arrival time input, expected `HH:MM`.
    pub reach_time: String,
    /// Raw total seats input.
    pub total_seats: String,
    /// Raw open-seat balance input.
    pub balance: String,
}

impl TrainRecordDraft {
    /// Validate every field and produce a typed record.
    ///
    /// Fails on the first offending field so the form can put the cursor
    /// back where the fix is needed.
    pub fn parse(&self) -> Result<TrainRecord, ValidationError> {
        Ok(TrainRecord {
            number: parse_count("train number", &self.number)?,
            name: required("name", &self.name)?,
            source: required("source", &self.source)?,
            destination: required("destination", &self.destination)?,
            start_time: ScheduleTime::parse(&self.start_time)
                .map_err(|err| err.with_field("start time"))?,
            reach_time: ScheduleTime::parse(&self.reach_time)
                .map_err(|err| err.with_field("reach time"))?,
            total_seats: parse_count("total seats", &self.total_seats)?,
            balance: parse_count("balance", &self.balance)?,
        })
    }
}

/// Travel class shown on the booking form.
///
/// Cosmetic: recorded on the booking line, never involved in seat
/// accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Division {
    /// `1st Class`.
    #[default]
    FirstClass,
    /// `2nd Class`.
    SecondClass,
    /// `3rd Class`.
    ThirdClass,
}

impl Division {
    /// Every division, in the order the selector cycles through them.
    pub const ALL: [Division; 3] = [
        Division::FirstClass,
        Division::SecondClass,
        Division::ThirdClass,
    ];

    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Division::FirstClass => "1st Class",
            Division::SecondClass => "2nd Class",
            Division::ThirdClass => "3rd Class",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Passenger entry on the booking form.
///
/// Age stays free text: the original form never parses it, only requires
/// that it be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Passenger name.
    pub name: String,
    /// Passenger age as entered.
    pub age: String,
}

impl Passenger {
    /// Convenience constructor, mostly for tests.
    pub fn new(name: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
        }
    }
}

fn parse_count(field: &'static str, input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::new(field, format!("'{trimmed}' is not a number")))
}

fn required(field: &'static str, input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> TrainRecordDraft {
        TrainRecordDraft {
            number: "12951".to_string(),
            name: "Rajdhani Express".to_string(),
            source: "Mumbai Central".to_string(),
            destination: "New Delhi".to_string(),
            start_time: "16:35".to_string(),
            reach_time: "08:35".to_string(),
            total_seats: "1200".to_string(),
            balance: "1200".to_string(),
        }
    }

    #[test]
    fn draft_parses_into_record() {
        let record = valid_draft().parse().unwrap();
        assert_eq!(record.number, 12951);
        assert_eq!(record.name, "Rajdhani Express");
        assert_eq!(record.start_time.to_string(), "16:35");
        assert_eq!(record.total_seats, 1200);
        assert_eq!(record.balance, 1200);
    }

    #[test]
    fn draft_trims_whitespace() {
        let mut draft = valid_draft();
        draft.name = "  Rajdhani Express  ".to_string();
        draft.number = " 12951 ".to_string();
        let record = draft.parse().unwrap();
        assert_eq!(record.name, "Rajdhani Express");
        assert_eq!(record.number, 12951);
    }

    #[test]
    fn draft_rejects_malformed_numbers() {
        let mut draft = valid_draft();
        draft.number = "12a51".to_string();
        assert!(draft.parse().is_err());

        let mut draft = valid_draft();
        draft.total_seats = "".to_string();
        assert!(draft.parse().is_err());

        let mut draft = valid_draft();
        draft.balance = "-3".to_string();
        assert!(draft.parse().is_err());
    }

    #[test]
    fn draft_rejects_empty_text_fields() {
        let mut draft = valid_draft();
        draft.source = "   ".to_string();
        let err = draft.parse().unwrap_err();
        assert_eq!(err.field, "source");
    }

    #[test]
    fn draft_rejects_malformed_times() {
        let mut draft = valid_draft();
        draft.reach_time = "8:35".to_string();
        let err = draft.parse().unwrap_err();
        assert_eq!(err.field, "reach time");
    }

    #[test]
    fn division_labels() {
        assert_eq!(Division::FirstClass.to_string(), "1st Class");
        assert_eq!(Division::SecondClass.to_string(), "2nd Class");
        assert_eq!(Division::ThirdClass.to_string(), "3rd Class");
        assert_eq!(Division::ALL.len(), 3);
    }

    #[test]
    fn train_record_display_line() {
        let record = valid_draft().parse().unwrap();
        assert_eq!(
            record.to_string(),
            "Train No: 12951, Name: Rajdhani Express, Source: Mumbai Central (Start: 16:35), \
             Destination: New Delhi (Reach: 08:35)"
        );
    }
}
