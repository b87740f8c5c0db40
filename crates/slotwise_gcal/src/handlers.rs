// File: crates/slotwise_gcal/src/handlers.rs
use crate::logic::{
    compute_availability, meeting_duration, parse_event_range, to_available_slots, AvailabilityQuery,
    AvailableSlotsResponse, BookSlotRequest, BookedEventsQuery, BookedEventsResponse,
    BookingResponse, CancelBookingRequest, CancellationResponse, RescheduleRequest,
};
use crate::service::GcalServiceError;
use crate::time::{normalize_range, parse_time_zone};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use slotwise_common::{
    log_result, map_json_error, CalendarEvent, CalendarService, Clock, SchedulingRules,
    SlotwiseError,
};
use std::sync::Arc;
use tracing::info;

/// Shared state for the availability and event handlers.
#[derive(Clone)]
pub struct GcalState {
    pub rules: Arc<SchedulingRules>,
    pub calendar: Arc<dyn CalendarService<Error = GcalServiceError>>,
    pub clock: Arc<dyn Clock>,
}

impl GcalState {
    fn time_zone_or_default(&self, requested: Option<String>) -> String {
        requested.unwrap_or_else(|| self.rules.time_zone.name().to_string())
    }
}

/// Handler to get bookable slots for one day.
#[axum::debug_handler]
pub async fn get_availability_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableSlotsResponse>, SlotwiseError> {
    let time_zone = state.time_zone_or_default(query.time_zone);

    let slots = compute_availability(
        &query.date,
        query.duration_minutes,
        &time_zone,
        &state.rules,
        state.clock.now(),
        state.calendar.as_ref(),
    )
    .await?;

    let tz = parse_time_zone(&time_zone)?;
    let duration = meeting_duration(query.duration_minutes)?;
    info!(
        "{} slots of {} min on {} ({})",
        slots.len(),
        query.duration_minutes,
        query.date,
        time_zone
    );

    Ok(Json(AvailableSlotsResponse {
        slots: to_available_slots(&slots, duration, &tz),
        date: query.date,
        time_zone,
        duration_minutes: query.duration_minutes,
    }))
}

/// Handler listing events in a date or timestamp range.
#[axum::debug_handler]
pub async fn list_events_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<BookedEventsQuery>,
) -> Result<Json<BookedEventsResponse>, SlotwiseError> {
    let tz = parse_time_zone(&state.time_zone_or_default(query.time_zone))?;
    let window = normalize_range(&query.start, &query.end, &tz)?;

    let result = state
        .calendar
        .list_events(window, query.include_cancelled.unwrap_or(false))
        .await
        .map(|events| BookedEventsResponse { events });

    map_json_error(result, SlotwiseError::from)
}

#[axum::debug_handler]
pub async fn create_event_handler(
    State(state): State<Arc<GcalState>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<BookingResponse>, SlotwiseError> {
    let event = CalendarEvent {
        start_time: payload.start_time,
        end_time: payload.end_time,
        summary: payload.summary,
        description: payload.description,
        attendee_email: payload.attendee_email,
    };

    let created = log_result(
        state.calendar.create_event(event).await,
        "Event created",
        "Failed to create event",
    )?;

    Ok(Json(BookingResponse {
        success: true,
        event_id: created.event_id,
        message: "Appointment booked successfully.".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn reschedule_event_handler(
    State(state): State<Arc<GcalState>>,
    Path(event_id): Path<String>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<Json<BookingResponse>, SlotwiseError> {
    let (start, end) = parse_event_range(&payload.start_time, &payload.end_time)?;

    let moved = log_result(
        state
            .calendar
            .reschedule_event(&event_id, start, end, payload.notify_attendees.unwrap_or(true))
            .await,
        &format!("Event {} rescheduled", event_id),
        &format!("Failed to reschedule event {}", event_id),
    )?;

    Ok(Json(BookingResponse {
        success: true,
        event_id: moved.event_id,
        message: "Appointment rescheduled successfully.".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn delete_event_handler(
    State(state): State<Arc<GcalState>>,
    Path(event_id): Path<String>,
    Query(query): Query<CancelBookingRequest>,
) -> Result<Json<CancellationResponse>, SlotwiseError> {
    log_result(
        state
            .calendar
            .delete_event(&event_id, query.notify_attendees.unwrap_or(true))
            .await,
        &format!("Event {} deleted", event_id),
        &format!("Failed to delete event {}", event_id),
    )?;

    Ok(Json(CancellationResponse {
        success: true,
        event_id,
        message: "Appointment deleted successfully.".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn cancel_event_handler(
    State(state): State<Arc<GcalState>>,
    Path(event_id): Path<String>,
    Query(query): Query<CancelBookingRequest>,
) -> Result<Json<CancellationResponse>, SlotwiseError> {
    let result = log_result(
        state
            .calendar
            .mark_event_cancelled(&event_id, query.notify_attendees.unwrap_or(true))
            .await,
        &format!("Event {} marked cancelled", event_id),
        &format!("Failed to cancel event {}", event_id),
    )?;

    Ok(Json(CancellationResponse {
        success: true,
        event_id: result.event_id.unwrap_or(event_id),
        message: "Appointment marked as cancelled successfully.".to_string(),
    }))
}
