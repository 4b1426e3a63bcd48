//! Domain error taxonomy.
//!
//! Three recoverable kinds: validation failures on free-text input,
//! lookups that match nothing, and bookings that exceed the remaining
//! seat balance. Every error is surfaced synchronously to the caller;
//! the core never logs-and-exits on a domain error.

use thiserror::Error;

/// Free-text input that could not be converted into a typed field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Name of the offending input field.
    pub field: &'static str,
    /// Human-readable cause.
    pub reason: String,
}

impl ValidationError {
    /// Build a validation error for the named field.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Re-attribute the error to a different field name.
    ///
    /// Shared parsers report a generic field; callers that know the
    /// concrete form field rename the error before surfacing it.
    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = field;
        self
    }
}

/// Errors raised by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A draft field failed to parse.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record carries the requested train number.
    #[error("no train with number {0}")]
    NumberNotFound(u32),

    /// No record serves the requested route exactly.
    #[error("no train runs from {origin} to {destination}")]
    RouteNotFound {
        /// Requested boarding station.
        origin: String,
        /// Requested destination station.
        destination: String,
    },
}

/// Errors raised while recording a booking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// The request shape is wrong (passenger count or empty fields).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request asks for more seats than the train has left.
    #[error("{requested} seats requested but only {available} available")]
    InsufficientSeats {
        /// Seats asked for.
        requested: u32,
        /// Seats the train still holds.
        available: u32,
    },
}

/// Top-level error for session operations that cross both components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The booking itself failed.
    #[error(transparent)]
    Booking(#[from] BookingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::new("total seats", "'abc' is not a number");
        assert_eq!(err.to_string(), "invalid total seats: 'abc' is not a number");

        let err = CatalogError::NumberNotFound(12345);
        assert_eq!(err.to_string(), "no train with number 12345");

        let err = CatalogError::RouteNotFound {
            origin: "Madurai".to_string(),
            destination: "Chennai Egmore".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no train runs from Madurai to Chennai Egmore"
        );

        let err = BookingError::InsufficientSeats {
            requested: 5,
            available: 2,
        };
        assert_eq!(err.to_string(), "5 seats requested but only 2 available");
    }

    #[test]
    fn transparent_wrapping_keeps_message() {
        let inner = ValidationError::new("balance", "'x' is not a number");
        let wrapped = CatalogError::from(inner.clone());
        assert_eq!(wrapped.to_string(), inner.to_string());

        let wrapped = SessionError::from(BookingError::from(inner.clone()));
        assert_eq!(wrapped.to_string(), inner.to_string());
    }

    #[test]
    fn with_field_renames() {
        let err = ValidationError::new("time", "'9:5' is not in HH:MM form").with_field("start time");
        assert_eq!(err.field, "start time");
    }
}
