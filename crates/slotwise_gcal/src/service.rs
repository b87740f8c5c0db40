// --- File: crates/slotwise_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! Implements [`BusyIntervalProvider`] and [`CalendarService`] on top of the
//! Google Calendar v3 API for one calendar id fixed at construction.

use chrono::{DateTime, Utc};
use google_calendar3::api::{
    Event, EventAttendee, EventDateTime, FreeBusyRequest, FreeBusyRequestItem, FreeBusyResponse,
};
use slotwise_common::{
    conflict, external_service_error, not_found, validation_error, BookedEvent, BoxFuture,
    BusyInterval, BusyIntervalProvider, CalendarEvent, CalendarEventResult, CalendarService,
    SlotwiseError, TimeWindow,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::HubType;
use crate::logic::parse_event_range;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Booking conflict")]
    Conflict,
    #[error("Event not found: {0}")]
    NotFound(String),
    #[error("Calendar authentication failed: {0}")]
    Auth(String),
    #[error("Calendar upstream failure: {0}")]
    Upstream(String),
}

impl From<GcalServiceError> for SlotwiseError {
    fn from(err: GcalServiceError) -> Self {
        match err {
            GcalServiceError::TimeParseError(_) | GcalServiceError::Validation(_) => {
                validation_error(err)
            }
            GcalServiceError::Conflict => conflict("requested time overlaps an existing booking"),
            GcalServiceError::NotFound(_) => not_found(err),
            GcalServiceError::ApiError(_)
            | GcalServiceError::Auth(_)
            | GcalServiceError::Upstream(_) => {
                external_service_error("google_calendar", err)
            }
        }
    }
}

fn is_not_found(err: &google_calendar3::Error) -> bool {
    err.to_string().contains("404")
}

fn send_updates(notify_attendees: bool) -> &'static str {
    if notify_attendees {
        "all"
    } else {
        "none"
    }
}

fn event_time(dt: DateTime<Utc>) -> EventDateTime {
    EventDateTime {
        date_time: Some(dt),
        time_zone: Some("UTC".to_string()),
        ..Default::default()
    }
}

fn format_event_bound(bound: Option<EventDateTime>, all_day_time: &str) -> String {
    match bound {
        Some(EventDateTime {
            date_time: Some(dt),
            ..
        }) => dt.to_rfc3339(),
        Some(EventDateTime { date: Some(d), .. }) => format!("{}T{}Z", d, all_day_time),
        _ => String::new(),
    }
}

fn to_booked_event(event: Event) -> BookedEvent {
    BookedEvent {
        event_id: event.id.unwrap_or_default(),
        summary: event.summary.unwrap_or_default(),
        description: event.description,
        start_time: format_event_bound(event.start, "00:00:00"),
        end_time: format_event_bound(event.end, "23:59:59"),
        status: event.status.unwrap_or_else(|| "confirmed".to_string()),
        created: event.created.map(|dt| dt.to_rfc3339()).unwrap_or_default(),
        updated: event.updated.map(|dt| dt.to_rfc3339()).unwrap_or_default(),
    }
}

/// Busy periods of `calendar_id` from a free/busy response.
///
/// A calendar missing from the response or reporting an error is an upstream failure.
fn busy_from_response(
    response: FreeBusyResponse,
    calendar_id: &str,
) -> Result<Vec<BusyInterval>, GcalServiceError> {
    let Some(cal_info) = response
        .calendars
        .and_then(|mut calendars| calendars.remove(calendar_id))
    else {
        return Err(GcalServiceError::Upstream(format!(
            "calendar {} missing from free/busy response",
            calendar_id
        )));
    };

    if let Some(reason) = cal_info
        .errors
        .unwrap_or_default()
        .into_iter()
        .find_map(|e| e.reason)
    {
        warn!("Free/busy query for {} failed: {}", calendar_id, reason);
        return Err(GcalServiceError::Upstream(format!(
            "calendar {}: {}",
            calendar_id, reason
        )));
    }

    let mut busy_periods = Vec::new();
    for period in cal_info.busy.unwrap_or_default() {
        match (period.start, period.end) {
            (Some(start), Some(end)) => busy_periods.push(BusyInterval::new(start, end)),
            _ => info!("Skipping busy period with missing start/end: {:?}", period),
        }
    }
    Ok(busy_periods)
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    calendar_id: String,
}

impl GoogleCalendarService {
    pub fn new(calendar_hub: Arc<HubType>, calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_hub,
            calendar_id: calendar_id.into(),
        }
    }

    /// Every event intersecting `window`, following result pages.
    async fn fetch_events(
        &self,
        window: TimeWindow,
        include_cancelled: bool,
    ) -> Result<Vec<Event>, GcalServiceError> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .calendar_hub
                .events()
                .list(&self.calendar_id)
                .time_min(window.start)
                .time_max(window.end)
                .single_events(true) // Expand recurring events
                .order_by("startTime")
                .show_deleted(include_cancelled);
            if let Some(token) = page_token.as_deref() {
                request = request.page_token(token);
            }

            let (_, page) = request.doit().await?;
            events.extend(page.items.unwrap_or_default());

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(events)
    }
}

impl BusyIntervalProvider for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Query the FreeBusy endpoint for the configured calendar.
    fn fetch_busy(&self, window: TimeWindow) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(window.start),
                time_max: Some(window.end),
                time_zone: Some("UTC".to_string()),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(self.calendar_id.clone()),
                    ..Default::default()
                }]),
                ..Default::default()
            };

            let (_response, freebusy_response) =
                self.calendar_hub.freebusy().query(req).doit().await?;

            let busy_periods = busy_from_response(freebusy_response, &self.calendar_id)?;
            debug!(
                "Calendar {} has {} busy periods in {} - {}",
                self.calendar_id,
                busy_periods.len(),
                window.start,
                window.end
            );
            Ok(busy_periods)
        })
    }
}

impl CalendarService for GoogleCalendarService {
    fn list_events(
        &self,
        window: TimeWindow,
        include_cancelled: bool,
    ) -> BoxFuture<'_, Vec<BookedEvent>, Self::Error> {
        Box::pin(async move {
            let events = self
                .fetch_events(window, include_cancelled)
                .await?
                .into_iter()
                .map(to_booked_event)
                .filter(|e| include_cancelled || e.status != "cancelled")
                .collect();
            Ok(events)
        })
    }

    /// Creates a new event after checking the requested time is free.
    fn create_event(&self, event: CalendarEvent) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        Box::pin(async move {
            let (start_dt, end_dt) = parse_event_range(&event.start_time, &event.end_time)?;
            let window = TimeWindow::new(start_dt, end_dt)
                .ok_or_else(|| GcalServiceError::Validation("empty event range".to_string()))?;

            let busy_times = self.fetch_busy(window).await?;
            if busy_times.iter().any(|b| b.overlaps(start_dt, end_dt)) {
                return Err(GcalServiceError::Conflict);
            }

            let has_attendee = event.attendee_email.is_some();
            let new_event = Event {
                summary: Some(event.summary),
                description: event.description,
                start: Some(event_time(start_dt)),
                end: Some(event_time(end_dt)),
                attendees: event.attendee_email.map(|email| {
                    vec![EventAttendee {
                        email: Some(email),
                        ..Default::default()
                    }]
                }),
                ..Default::default()
            };

            let (_response, created_event) = self
                .calendar_hub
                .events()
                .insert(new_event, &self.calendar_id)
                .send_updates(send_updates(has_attendee))
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }

    /// Moves an event, refusing when another live event occupies the new range.
    fn reschedule_event(
        &self,
        event_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let event_id = event_id.to_string();

        Box::pin(async move {
            let window = TimeWindow::new(start, end).ok_or_else(|| {
                GcalServiceError::Validation("end_time must be after start_time".to_string())
            })?;

            let existing = match self
                .calendar_hub
                .events()
                .get(&self.calendar_id, &event_id)
                .doit()
                .await
            {
                Ok((_, event)) => event,
                Err(e) if is_not_found(&e) => {
                    return Err(GcalServiceError::NotFound(event_id.clone()))
                }
                Err(e) => return Err(e.into()),
            };

            let clashes = self
                .fetch_events(window, false)
                .await?
                .into_iter()
                .map(to_booked_event)
                .filter(|e| e.event_id != event_id && e.status != "cancelled")
                .count();
            if clashes > 0 {
                return Err(GcalServiceError::Conflict);
            }

            let patch = Event {
                start: Some(event_time(start)),
                end: Some(event_time(end)),
                sequence: Some(existing.sequence.map(|n| n + 1).unwrap_or(1)),
                ..Default::default()
            };

            let (_response, updated) = self
                .calendar_hub
                .events()
                .patch(patch, &self.calendar_id, &event_id)
                .send_updates(send_updates(notify_attendees))
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: updated.id.or(Some(event_id)),
                status: updated.status.unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }

    /// Deletes an event; a missing event counts as deleted.
    ///
    /// Google refuses to delete some already-cancelled events, so those are
    /// restored to `confirmed` first and deleted again.
    fn delete_event(&self, event_id: &str, notify_attendees: bool) -> BoxFuture<'_, (), Self::Error> {
        let event_id = event_id.to_string();

        Box::pin(async move {
            let event = match self
                .calendar_hub
                .events()
                .get(&self.calendar_id, &event_id)
                .doit()
                .await
            {
                Ok((_, event)) => event,
                Err(e) if is_not_found(&e) => return Ok(()),
                Err(e) => return Err(e.into()),
            };
            let status = event.status.as_deref().unwrap_or("confirmed");

            let delete_result = self
                .calendar_hub
                .events()
                .delete(&self.calendar_id, &event_id)
                .send_updates(send_updates(notify_attendees))
                .doit()
                .await;

            let err = match delete_result {
                Ok(_) => return Ok(()),
                Err(e) if is_not_found(&e) => return Ok(()),
                Err(e) => e,
            };

            let message = err.to_string();
            if status != "cancelled" && !message.contains("403") && !message.contains("400") {
                return Err(err.into());
            }

            let restored = Event {
                status: Some("confirmed".to_string()),
                sequence: Some(event.sequence.map(|n| n + 1).unwrap_or(1)),
                ..Default::default()
            };
            self.calendar_hub
                .events()
                .patch(restored, &self.calendar_id, &event_id)
                .send_updates("none")
                .doit()
                .await?;

            self.calendar_hub
                .events()
                .delete(&self.calendar_id, &event_id)
                .send_updates(send_updates(notify_attendees))
                .doit()
                .await?;
            Ok(())
        })
    }

    fn mark_event_cancelled(
        &self,
        event_id: &str,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let event_id = event_id.to_string();

        Box::pin(async move {
            let event = match self
                .calendar_hub
                .events()
                .get(&self.calendar_id, &event_id)
                .doit()
                .await
            {
                Ok((_, event)) => event,
                Err(e) if is_not_found(&e) => {
                    return Err(GcalServiceError::NotFound(event_id.clone()))
                }
                Err(e) => return Err(e.into()),
            };

            let cancelled_event = Event {
                status: Some("cancelled".to_string()),
                sequence: Some(event.sequence.map(|n| n + 1).unwrap_or(1)),
                ..Default::default()
            };

            let (_response, updated) = self
                .calendar_hub
                .events()
                .patch(cancelled_event, &self.calendar_id, &event_id)
                .send_updates(send_updates(notify_attendees))
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: updated.id.or(Some(event_id)),
                status: updated.status.unwrap_or_else(|| "cancelled".to_string()),
            })
        })
    }
}

/// In-memory calendar for tests.
#[cfg(any(test, feature = "test-util"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct StoredEvent {
        id: String,
        summary: String,
        description: Option<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: String,
        sequence: i32,
    }

    impl StoredEvent {
        fn to_booked(&self) -> BookedEvent {
            BookedEvent {
                event_id: self.id.clone(),
                summary: self.summary.clone(),
                description: self.description.clone(),
                start_time: self.start.to_rfc3339(),
                end_time: self.end.to_rfc3339(),
                status: self.status.clone(),
                created: String::new(),
                updated: String::new(),
            }
        }

        fn is_live(&self) -> bool {
            self.status != "cancelled"
        }
    }

    /// Calendar backed by a `Mutex<Vec<_>>`. Can be switched to fail every
    /// call to simulate an unreachable provider.
    #[derive(Default)]
    pub struct MockCalendarService {
        events: Mutex<Vec<StoredEvent>>,
        extra_busy: Mutex<Vec<BusyInterval>>,
        unavailable: AtomicBool,
        calendar_error: Mutex<Option<String>>,
        busy_queries: AtomicUsize,
    }

    impl MockCalendarService {
        pub fn new() -> Self {
            Self::default()
        }

        /// Busy time not backed by any event (e.g. another calendar's block).
        pub fn add_busy(&self, start: DateTime<Utc>, end: DateTime<Utc>) {
            self.extra_busy
                .lock()
                .unwrap()
                .push(BusyInterval::new(start, end));
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Make free/busy queries report a per-calendar error such as `backendError`.
        pub fn set_calendar_error(&self, reason: Option<&str>) {
            *self.calendar_error.lock().unwrap() = reason.map(str::to_string);
        }

        /// Number of `fetch_busy` calls so far.
        pub fn busy_queries(&self) -> usize {
            self.busy_queries.load(Ordering::SeqCst)
        }

        pub fn status_of(&self, event_id: &str) -> Option<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == event_id)
                .map(|e| e.status.clone())
        }

        fn check_available(&self) -> Result<(), GcalServiceError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(GcalServiceError::ApiError(google_calendar3::Error::Io(
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "calendar offline"),
                )));
            }
            Ok(())
        }
    }

    impl BusyIntervalProvider for MockCalendarService {
        type Error = GcalServiceError;

        fn fetch_busy(&self, window: TimeWindow) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
            Box::pin(async move {
                self.busy_queries.fetch_add(1, Ordering::SeqCst);
                self.check_available()?;
                if let Some(reason) = self.calendar_error.lock().unwrap().clone() {
                    return Err(GcalServiceError::Upstream(format!("mock calendar: {}", reason)));
                }

                let mut busy: Vec<BusyInterval> = self
                    .events
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|e| e.is_live())
                    .map(|e| BusyInterval::new(e.start, e.end))
                    .collect();
                busy.extend(self.extra_busy.lock().unwrap().iter().copied());
                busy.retain(|b| b.overlaps(window.start, window.end));
                Ok(busy)
            })
        }
    }

    impl CalendarService for MockCalendarService {
        fn list_events(
            &self,
            window: TimeWindow,
            include_cancelled: bool,
        ) -> BoxFuture<'_, Vec<BookedEvent>, Self::Error> {
            Box::pin(async move {
                self.check_available()?;
                let mut events: Vec<StoredEvent> = self
                    .events
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|e| include_cancelled || e.is_live())
                    .filter(|e| e.start < window.end && window.start < e.end)
                    .cloned()
                    .collect();
                events.sort_by_key(|e| e.start);
                Ok(events.iter().map(StoredEvent::to_booked).collect())
            })
        }

        fn create_event(
            &self,
            event: CalendarEvent,
        ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
            Box::pin(async move {
                let (start, end) = parse_event_range(&event.start_time, &event.end_time)?;
                let window = TimeWindow::new(start, end)
                    .ok_or_else(|| GcalServiceError::Validation("empty event range".into()))?;

                let busy = self.fetch_busy(window).await?;
                if busy.iter().any(|b| b.overlaps(start, end)) {
                    return Err(GcalServiceError::Conflict);
                }

                let id = format!("mock-event-{}", uuid::Uuid::new_v4());
                self.events.lock().unwrap().push(StoredEvent {
                    id: id.clone(),
                    summary: event.summary,
                    description: event.description,
                    start,
                    end,
                    status: "confirmed".to_string(),
                    sequence: 0,
                });

                Ok(CalendarEventResult {
                    event_id: Some(id),
                    status: "confirmed".to_string(),
                })
            })
        }

        fn reschedule_event(
            &self,
            event_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            _notify_attendees: bool,
        ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
            let event_id = event_id.to_string();

            Box::pin(async move {
                self.check_available()?;
                if end <= start {
                    return Err(GcalServiceError::Validation(
                        "end_time must be after start_time".into(),
                    ));
                }

                let mut events = self.events.lock().unwrap();
                if !events.iter().any(|e| e.id == event_id) {
                    return Err(GcalServiceError::NotFound(event_id.clone()));
                }
                if events
                    .iter()
                    .any(|e| e.id != event_id && e.is_live() && e.start < end && start < e.end)
                {
                    return Err(GcalServiceError::Conflict);
                }

                let event = events
                    .iter_mut()
                    .find(|e| e.id == event_id)
                    .ok_or_else(|| GcalServiceError::NotFound(event_id.clone()))?;
                event.start = start;
                event.end = end;
                event.sequence += 1;

                Ok(CalendarEventResult {
                    event_id: Some(event.id.clone()),
                    status: event.status.clone(),
                })
            })
        }

        fn delete_event(
            &self,
            event_id: &str,
            _notify_attendees: bool,
        ) -> BoxFuture<'_, (), Self::Error> {
            let event_id = event_id.to_string();

            Box::pin(async move {
                self.check_available()?;
                self.events.lock().unwrap().retain(|e| e.id != event_id);
                Ok(())
            })
        }

        fn mark_event_cancelled(
            &self,
            event_id: &str,
            _notify_attendees: bool,
        ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
            let event_id = event_id.to_string();

            Box::pin(async move {
                self.check_available()?;
                let mut events = self.events.lock().unwrap();
                let event = events
                    .iter_mut()
                    .find(|e| e.id == event_id)
                    .ok_or_else(|| GcalServiceError::NotFound(event_id.clone()))?;
                event.status = "cancelled".to_string();
                event.sequence += 1;

                Ok(CalendarEventResult {
                    event_id: Some(event.id.clone()),
                    status: event.status.clone(),
                })
            })
        }
    }
}
