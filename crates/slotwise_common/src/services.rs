//! Service abstractions for external collaborators.
//!
//! These traits decouple the availability engine and the HTTP handlers from
//! the concrete calendar client and from the wall clock, so tests can swap in
//! in-memory calendars and fixed clocks.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

use crate::models::{BookedEvent, BusyInterval, CalendarEvent, CalendarEventResult, TimeWindow};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Source of busy intervals for the configured calendar.
pub trait BusyIntervalProvider: Send + Sync {
    /// Error type returned by the provider.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every busy interval intersecting `window`, in no guaranteed order.
    fn fetch_busy(&self, window: TimeWindow) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error>;
}

/// Event operations on the single configured calendar.
pub trait CalendarService: BusyIntervalProvider {
    /// Events intersecting `window`, sorted by start time.
    fn list_events(
        &self,
        window: TimeWindow,
        include_cancelled: bool,
    ) -> BoxFuture<'_, Vec<BookedEvent>, Self::Error>;

    /// Create an event; fails with a conflict when the time is already busy.
    fn create_event(&self, event: CalendarEvent) -> BoxFuture<'_, CalendarEventResult, Self::Error>;

    /// Move an existing event to `[start, end)`.
    fn reschedule_event(
        &self,
        event_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;

    /// Delete an event. Deleting a missing event succeeds.
    fn delete_event(&self, event_id: &str, notify_attendees: bool) -> BoxFuture<'_, (), Self::Error>;

    /// Mark an event as cancelled without deleting it.
    fn mark_event_cancelled(
        &self,
        event_id: &str,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
