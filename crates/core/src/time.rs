//! Timetable clock times.
//!
//! The catalog carries departure and arrival as `"HH:MM"` wall-clock
//! strings. [`ScheduleTime`] parses that form strictly and renders it
//! back unchanged. Overnight runs simply show a reach time earlier than
//! the start time, matching the source timetable; no date arithmetic
//! happens here.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

static HHMM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("failed to compile HH:MM regex")
});

/// A wall-clock time in the 24-hour timetable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleTime {
    hour: u8,
    minute: u8,
}

impl ScheduleTime {
    /// Parse a strict `HH:MM` string.
    ///
    /// Leading and trailing whitespace is tolerated; anything else
    /// (missing zero-padding, out-of-range values, stray characters)
    /// is a validation failure attributed to the generic `time` field.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let caps = HHMM_RE.captures(trimmed).ok_or_else(|| {
            ValidationError::new("time", format!("'{trimmed}' is not in HH:MM form"))
        })?;
        // The pattern guarantees both groups are two in-range digits.
        let hour = caps[1].parse::<u8>().expect("regex-matched hour digits");
        let minute = caps[2].parse::<u8>().expect("regex-matched minute digits");
        Ok(Self { hour, minute })
    }

    /// Hour component, 0-23.
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute component, 0-59.
    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ScheduleTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = ScheduleTime::parse("00:00").unwrap();
        assert_eq!((t.hour(), t.minute()), (0, 0));

        let t = ScheduleTime::parse("23:59").unwrap();
        assert_eq!((t.hour(), t.minute()), (23, 59));

        let t = ScheduleTime::parse(" 16:35 ").unwrap();
        assert_eq!((t.hour(), t.minute()), (16, 35));
    }

    #[test]
    fn parse_invalid_times() {
        for input in ["", "1635", "16:3", "16:355", "24:00", "16:60", "ab:cd", "9:05"] {
            assert!(ScheduleTime::parse(input).is_err(), "accepted '{input}'");
        }
    }

    #[test]
    fn display_round_trips() {
        for input in ["00:00", "09:05", "16:35", "23:59"] {
            assert_eq!(ScheduleTime::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn ordering_follows_the_clock() {
        let early = ScheduleTime::parse("05:50").unwrap();
        let late = ScheduleTime::parse("21:45").unwrap();
        assert!(early < late);
        assert_eq!(early, ScheduleTime::parse("05:50").unwrap());
    }

    #[test]
    fn serde_uses_string_form() {
        let t = ScheduleTime::parse("08:35").unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"08:35\"");

        let back: ScheduleTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        assert!(serde_json::from_str::<ScheduleTime>("\"25:00\"").is_err());
    }
}
