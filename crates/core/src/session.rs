//! Application-lifetime session state.
//!
//! The original application shared two ambient lists across every
//! screen. Here the catalog store and booking ledger live behind one
//! explicit session object that UI components borrow; there is exactly
//! one writer, serialized through the event loop.

use crate::catalog::CatalogStore;
use crate::error::{CatalogError, SessionError};
use crate::ledger::{BookingLedger, BookingRecord, BookingRequest};

/// Owns the catalog store and booking ledger for one process lifetime.
#[derive(Debug, Clone, Default)]
pub struct RailwaySession {
    catalog: CatalogStore,
    ledger: BookingLedger,
}

impl RailwaySession {
    /// Session over the built-in seed timetable.
    pub fn seeded() -> Self {
        Self {
            catalog: CatalogStore::seeded(),
            ledger: BookingLedger::new(),
        }
    }

    /// Session over an explicit catalog (e.g. one loaded from a seed file).
    pub fn with_catalog(catalog: CatalogStore) -> Self {
        Self {
            catalog,
            ledger: BookingLedger::new(),
        }
    }

    /// Read access to the catalog.
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Mutable access to the catalog for admin operations.
    pub fn catalog_mut(&mut self) -> &mut CatalogStore {
        &mut self.catalog
    }

    /// Read access to the booking ledger.
    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    /// Resolve a route and book against the first matching train.
    ///
    /// The route match is exact and case-insensitive, the same lookup
    /// the booking form performs before committing anything.
    pub fn book_route(
        &mut self,
        source: &str,
        destination: &str,
        request: &BookingRequest,
    ) -> Result<&BookingRecord, SessionError> {
        let Some(record) = self.catalog.route_mut(source, destination) else {
            return Err(CatalogError::RouteNotFound {
                origin: source.trim().to_string(),
                destination: destination.trim().to_string(),
            }
            .into());
        };
        let booked = self.ledger.book(record, request)?;
        Ok(booked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use crate::models::{Division, Passenger};

    fn passengers(count: usize) -> Vec<Passenger> {
        (0..count)
            .map(|idx| Passenger::new(format!("Passenger {}", idx + 1), "28"))
            .collect()
    }

    #[test]
    fn book_route_decrements_first_match() {
        let mut session = RailwaySession::seeded();
        let request = BookingRequest::new(5, Division::FirstClass, passengers(5));

        session
            .book_route("Kannur", "Thiruvananthapuram", &request)
            .unwrap();

        let record = session
            .catalog()
            .find_exact_route("Kannur", "Thiruvananthapuram")
            .unwrap();
        assert_eq!(record.balance, 35);
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.ledger().history()[0].source, "Kannur");
    }

    #[test]
    fn book_route_unknown_route_is_not_found() {
        let mut session = RailwaySession::seeded();
        let request = BookingRequest::new(1, Division::FirstClass, passengers(1));

        let err = session
            .book_route("Atlantis", "El Dorado", &request)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Catalog(CatalogError::RouteNotFound { .. })
        ));
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn book_route_insufficient_seats_leaves_state_alone() {
        let mut session = RailwaySession::seeded();
        // Train 12081 Kannur -> Thiruvananthapuram has balance 40.
        let request = BookingRequest::new(100, Division::ThirdClass, passengers(100));

        let err = session
            .book_route("Kannur", "Thiruvananthapuram", &request)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Booking(BookingError::InsufficientSeats { .. })
        ));
        let record = session
            .catalog()
            .find_exact_route("Kannur", "Thiruvananthapuram")
            .unwrap();
        assert_eq!(record.balance, 40);
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn admin_mutations_flow_through_the_session() {
        let mut session = RailwaySession::seeded();
        let before = session.catalog().len();

        let removed = session.catalog_mut().delete(11078).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(session.catalog().len(), before - 2);
    }
}
