// --- File: crates/slotwise_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod service;
pub mod time;
#[cfg(test)]
mod time_test;

pub use logic::{compute_availability, meeting_duration, scan_slots, AvailabilityError};
pub use service::{GcalServiceError, GoogleCalendarService};
