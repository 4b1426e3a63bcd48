#![warn(clippy::all, missing_docs)]

//! Core domain logic for the railway terminal application.
//!
//! This crate hosts the train catalog store, the booking ledger, the
//! session object owning both, the error taxonomy, configuration
//! handling, and the built-in seed timetable. The terminal UI (and any
//! future frontend) drives everything through these types; no domain
//! state is mutated anywhere else.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod session;
pub mod time;

pub use catalog::CatalogStore;
pub use config::AppConfig;
pub use error::{BookingError, CatalogError, SessionError, ValidationError};
pub use ledger::{BookingLedger, BookingRecord, BookingRequest};
pub use models::{Division, Passenger, TrainRecord, TrainRecordDraft};
pub use session::RailwaySession;
pub use time::ScheduleTime;
