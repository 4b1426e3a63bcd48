//! Booking ledger: the append-only record of confirmed reservations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BookingError, ValidationError};
use crate::models::{Division, Passenger, TrainRecord};

/// One booking transaction as submitted from the booking form.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// Seats to reserve.
    pub seats: u32,
    /// Travel class; recorded, never involved in seat accounting.
    pub division: Division,
    /// One entry per seat.
    pub passengers: Vec<Passenger>,
}

impl BookingRequest {
    /// Build a request; call [`BookingRequest::validate`] before use.
    pub fn new(seats: u32, division: Division, passengers: Vec<Passenger>) -> Self {
        Self {
            seats,
            division,
            passengers,
        }
    }

    /// Check the request shape before any balance is touched.
    ///
    /// One passenger entry per seat, and every name and age non-empty
    /// after trimming.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.passengers.len() as u32 != self.seats {
            return Err(ValidationError::new(
                "passengers",
                format!(
                    "{} seats requested but {} passenger entries provided",
                    self.seats,
                    self.passengers.len()
                ),
            ));
        }
        for (idx, passenger) in self.passengers.iter().enumerate() {
            if passenger.name.trim().is_empty() {
                return Err(ValidationError::new(
                    "passenger name",
                    format!("entry {} is empty", idx + 1),
                ));
            }
            if passenger.age.trim().is_empty() {
                return Err(ValidationError::new(
                    "passenger age",
                    format!("entry {} is empty", idx + 1),
                ));
            }
        }
        Ok(())
    }
}

/// A confirmed booking. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Passengers on the booking, in form order.
    pub passengers: Vec<Passenger>,
    /// Boarding station as booked.
    pub source: String,
    /// Destination station as booked.
    pub destination: String,
    /// Travel class.
    pub division: Division,
    /// Seats reserved.
    pub seats: u32,
    /// When the booking was recorded.
    pub booked_at: DateTime<Utc>,
}

impl fmt::Display for BookingRecord {
    /// Renders the classic one-line history form:
    /// `Name: X, Age: Y, ..., Source: S, Destination: D, Division: V, Seats: N`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for passenger in &self.passengers {
            write!(f, "Name: {}, Age: {}, ", passenger.name, passenger.age)?;
        }
        write!(
            f,
            "Source: {}, Destination: {}, Division: {}, Seats: {}",
            self.source, self.destination, self.division, self.seats
        )
    }
}

/// Append-only sequence of bookings, insertion order preserved.
#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    records: Vec<BookingRecord>,
}

impl BookingLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Book seats on `train` and record the transaction.
    ///
    /// The balance check runs before any mutation, and the decrement
    /// lands before the append, so no reader can observe a recorded
    /// booking without the matching seat reduction.
    pub fn book(
        &mut self,
        train: &mut TrainRecord,
        request: &BookingRequest,
    ) -> Result<&BookingRecord, BookingError> {
        if train.balance < request.seats {
            return Err(BookingError::InsufficientSeats {
                requested: request.seats,
                available: train.balance,
            });
        }
        request.validate()?;

        train.balance -= request.seats;
        self.records.push(BookingRecord {
            passengers: request.passengers.clone(),
            source: train.source.clone(),
            destination: train.destination.clone(),
            division: request.division,
            seats: request.seats,
            booked_at: Utc::now(),
        });
        info!(
            train = train.number,
            seats = request.seats,
            balance = train.balance,
            "booking recorded"
        );
        Ok(self.records.last().expect("record just appended"))
    }

    /// Full booking history, oldest first. Read-only.
    pub fn history(&self) -> &[BookingRecord] {
        &self.records
    }

    /// Number of recorded bookings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether any booking has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;

    fn passengers(count: usize) -> Vec<Passenger> {
        (0..count)
            .map(|idx| Passenger::new(format!("Passenger {}", idx + 1), "30"))
            .collect()
    }

    fn train() -> TrainRecord {
        let store = CatalogStore::seeded();
        store
            .list()
            .iter()
            .find(|record| record.number == 12081)
            .cloned()
            .unwrap()
    }

    #[test]
    fn booking_exact_balance_zeroes_it() {
        let mut ledger = BookingLedger::new();
        let mut record = train();
        assert_eq!(record.balance, 40);

        let request = BookingRequest::new(40, Division::SecondClass, passengers(40));
        ledger.book(&mut record, &request).unwrap();

        assert_eq!(record.balance, 0);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.history()[0].seats, 40);
        assert_eq!(ledger.history()[0].division, Division::SecondClass);
    }

    #[test]
    fn overbooking_changes_nothing() {
        let mut ledger = BookingLedger::new();
        let mut record = train();
        let request = BookingRequest::new(41, Division::FirstClass, passengers(41));

        let err = ledger.book(&mut record, &request).unwrap_err();
        assert_eq!(
            err,
            BookingError::InsufficientSeats {
                requested: 41,
                available: 40,
            }
        );
        assert_eq!(record.balance, 40);
        assert!(ledger.is_empty());
    }

    #[test]
    fn passenger_count_must_match_seats() {
        let mut ledger = BookingLedger::new();
        let mut record = train();
        let request = BookingRequest::new(3, Division::ThirdClass, passengers(2));

        let err = ledger.book(&mut record, &request).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert_eq!(record.balance, 40);
        assert!(ledger.is_empty());
    }

    #[test]
    fn empty_passenger_fields_are_rejected() {
        let mut ledger = BookingLedger::new();
        let mut record = train();

        let mut entries = passengers(2);
        entries[1].age = "  ".to_string();
        let request = BookingRequest::new(2, Division::FirstClass, entries);

        let err = ledger.book(&mut record, &request).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert_eq!(record.balance, 40);
    }

    #[test]
    fn zero_seat_booking_is_recorded() {
        // Matches the original form, which happily records a booking
        // with no passenger rows.
        let mut ledger = BookingLedger::new();
        let mut record = train();
        let request = BookingRequest::new(0, Division::FirstClass, Vec::new());

        ledger.book(&mut record, &request).unwrap();
        assert_eq!(record.balance, 40);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn history_preserves_insertion_order() {
        let mut ledger = BookingLedger::new();
        let mut record = train();

        for seats in [1u32, 2, 3] {
            let request =
                BookingRequest::new(seats, Division::FirstClass, passengers(seats as usize));
            ledger.book(&mut record, &request).unwrap();
        }

        let seats: Vec<u32> = ledger.history().iter().map(|entry| entry.seats).collect();
        assert_eq!(seats, vec![1, 2, 3]);
        assert_eq!(record.balance, 40 - 6);
    }

    #[test]
    fn display_matches_history_line_format() {
        let record = BookingRecord {
            passengers: vec![Passenger::new("Asha", "30"), Passenger::new("Ravi", "32")],
            source: "Madurai".to_string(),
            destination: "Chennai Egmore".to_string(),
            division: Division::SecondClass,
            seats: 2,
            booked_at: Utc::now(),
        };
        assert_eq!(
            record.to_string(),
            "Name: Asha, Age: 30, Name: Ravi, Age: 32, \
             Source: Madurai, Destination: Chennai Egmore, Division: 2nd Class, Seats: 2"
        );
    }
}
