// File: crates/slotwise_gcal/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AvailabilityQuery, AvailableSlot, AvailableSlotsResponse, BookSlotRequest,
    BookedEventsResponse, BookingResponse, CancellationResponse, RescheduleRequest,
};

#[utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Bookable slots for the day", body = AvailableSlotsResponse),
        (status = 400, description = "Invalid date, duration or time zone"),
        (status = 502, description = "Calendar provider unavailable")
    ),
    tag = "availability"
)]
fn doc_get_availability_handler() {}

#[utoipa::path(
    get,
    path = "/events",
    params(
        ("start" = String, Query, description = "YYYY-MM-DD or RFC 3339", example = "2025-05-15"),
        ("end" = String, Query, description = "YYYY-MM-DD or RFC 3339", example = "2025-05-20"),
        ("time_zone" = Option<String>, Query, description = "IANA time zone for date bounds", example = "Europe/Zurich"),
        ("include_cancelled" = Option<bool>, Query, description = "Include cancelled events", example = false)
    ),
    responses(
        (status = 200, description = "Events in the range", body = BookedEventsResponse),
        (status = 400, description = "Invalid range"),
        (status = 401, description = "Missing or invalid API key")
    ),
    security(("api_key" = [])),
    tag = "events"
)]
fn doc_list_events_handler() {}

#[utoipa::path(
    post,
    path = "/events",
    request_body(content = BookSlotRequest, example = json!({
        "start_time": "2025-05-15T10:00:00Z",
        "end_time": "2025-05-15T10:30:00Z",
        "summary": "Intro call",
        "description": "First conversation",
        "attendee_email": "guest@example.com"
    })),
    responses(
        (status = 200, description = "Event created", body = BookingResponse,
         example = json!({
             "success": true,
             "event_id": "abc123xyz456",
             "message": "Appointment booked successfully."
         })
        ),
        (status = 400, description = "Invalid times"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 409, description = "Time already booked")
    ),
    security(("api_key" = [])),
    tag = "events"
)]
fn doc_create_event_handler() {}

#[utoipa::path(
    patch,
    path = "/events/{event_id}",
    params(("event_id" = String, Path, description = "Event to move")),
    request_body = RescheduleRequest,
    responses(
        (status = 200, description = "Event moved", body = BookingResponse),
        (status = 404, description = "Event not found"),
        (status = 409, description = "New time overlaps another event")
    ),
    security(("api_key" = [])),
    tag = "events"
)]
fn doc_reschedule_event_handler() {}

#[utoipa::path(
    delete,
    path = "/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "Event to delete"),
        ("notify_attendees" = Option<bool>, Query, description = "Send cancellation emails (default true)")
    ),
    responses(
        (status = 200, description = "Event deleted or already gone", body = CancellationResponse)
    ),
    security(("api_key" = [])),
    tag = "events"
)]
fn doc_delete_event_handler() {}

#[utoipa::path(
    post,
    path = "/events/{event_id}/cancel",
    params(
        ("event_id" = String, Path, description = "Event to mark cancelled"),
        ("notify_attendees" = Option<bool>, Query, description = "Send cancellation emails (default true)")
    ),
    responses(
        (status = 200, description = "Event marked cancelled", body = CancellationResponse),
        (status = 404, description = "Event not found")
    ),
    security(("api_key" = [])),
    tag = "events"
)]
fn doc_cancel_event_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_availability_handler,
        doc_list_events_handler,
        doc_create_event_handler,
        doc_reschedule_event_handler,
        doc_delete_event_handler,
        doc_cancel_event_handler
    ),
    components(
        schemas(
            AvailableSlot,
            AvailableSlotsResponse,
            BookSlotRequest,
            RescheduleRequest,
            BookingResponse,
            CancellationResponse,
            BookedEventsResponse
        )
    ),
    tags(
        (name = "availability", description = "Bookable slots"),
        (name = "events", description = "Calendar event administration")
    ),
    servers(
        (url = "/api", description = "Slotwise API")
    )
)]
pub struct GcalApiDoc;
