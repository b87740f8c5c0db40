// --- File: crates/slotwise_gcal/src/logic.rs ---
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slotwise_common::{
    external_service_error, validation_error, BookedEvent, BusyInterval, BusyIntervalProvider,
    CandidateSlot, SchedulingRules, SlotwiseError, TimeWindow,
};
use tracing::{debug, error};

use crate::service::GcalServiceError;
use crate::time::build_work_window;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid duration: {0} minutes, must be positive")]
    InvalidDuration(i64),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Unknown time zone: {0}")]
    InvalidTimezone(String),
    #[error("Calendar provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl From<AvailabilityError> for SlotwiseError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::ProviderUnavailable(_) => {
                external_service_error("google_calendar", err)
            }
            _ => validation_error(err),
        }
    }
}

// --- Data Structures ---
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Day to search, YYYY-MM-DD
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-05-05"))]
    pub date: String,

    /// Meeting length in minutes
    #[cfg_attr(feature = "openapi", schema(example = 30))]
    pub duration_minutes: i64,

    /// IANA time zone; defaults to the configured one
    #[cfg_attr(feature = "openapi", schema(example = "Europe/Zurich"))]
    pub time_zone: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailableSlot {
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T07:00:00Z"))]
    pub start_time: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T07:30:00Z"))]
    pub end_time: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T09:00:00+02:00"))]
    pub local_start_time: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailableSlotsResponse {
    pub date: String,
    pub time_zone: String,
    pub duration_minutes: i64,
    pub slots: Vec<AvailableSlot>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookSlotRequest {
    pub start_time: String, // RFC 3339
    pub end_time: String,   // RFC 3339
    pub summary: String,
    pub description: Option<String>,
    pub attendee_email: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RescheduleRequest {
    pub start_time: String,
    pub end_time: String,
    pub notify_attendees: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub event_id: Option<String>,
    pub message: String,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct CancelBookingRequest {
    /// Send update emails to attendees (default true)
    pub notify_attendees: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CancellationResponse {
    pub success: bool,
    pub event_id: String,
    pub message: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct BookedEventsQuery {
    /// YYYY-MM-DD or RFC 3339
    pub start: String,
    /// YYYY-MM-DD or RFC 3339, same form as `start`
    pub end: String,
    pub time_zone: Option<String>,
    pub include_cancelled: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookedEventsResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub events: Vec<BookedEvent>,
}

// --- Availability Logic ---

/// Walk the grid over `window` and keep every start that survives the
/// notice, buffer and work-hour checks.
///
/// Pure: the result depends only on the arguments.
pub fn scan_slots(
    window: &TimeWindow,
    duration: Duration,
    tz: &Tz,
    rules: &SchedulingRules,
    now: DateTime<Utc>,
    busy: &[BusyInterval],
) -> Vec<CandidateSlot> {
    if duration > window.duration() {
        debug!(
            "{} min does not fit the {} min window",
            duration.num_minutes(),
            window.duration().num_minutes()
        );
        return Vec::new();
    }

    let earliest_start = now + rules.min_notice;
    let mut slots = Vec::new();
    let mut cursor = window.start;

    while let Some(slot_end) = cursor
        .checked_add_signed(duration)
        .filter(|end| *end <= window.end)
    {
        if cursor < earliest_start {
            cursor += rules.slot_interval;
            continue;
        }

        let padded_start = cursor - rules.buffer;
        let padded_end = slot_end + rules.buffer;
        if busy.iter().any(|b| b.overlaps(padded_start, padded_end)) {
            debug!("slot {} blocked by busy interval", cursor);
            cursor += rules.slot_interval;
            continue;
        }

        let local = cursor.with_timezone(tz);
        if !rules.is_work_day(local.weekday()) || !rules.is_work_hour(local.hour()) {
            debug!("slot {} outside local work hours ({})", cursor, local);
            cursor += rules.slot_interval;
            continue;
        }

        slots.push(CandidateSlot {
            start_instant: cursor,
        });
        cursor += rules.slot_interval;
    }

    slots
}

/// Meeting length from caller-supplied minutes.
///
/// Zero, negative and unrepresentable values are `InvalidDuration`.
pub fn meeting_duration(duration_minutes: i64) -> Result<Duration, AvailabilityError> {
    if duration_minutes <= 0 {
        return Err(AvailabilityError::InvalidDuration(duration_minutes));
    }
    Duration::try_minutes(duration_minutes).ok_or(AvailabilityError::InvalidDuration(duration_minutes))
}

/// Bookable start instants on `date` for a meeting of `duration_minutes`.
///
/// Caller errors are reported before the provider is contacted; the provider
/// is queried exactly once.
pub async fn compute_availability<P>(
    date: &str,
    duration_minutes: i64,
    time_zone: &str,
    rules: &SchedulingRules,
    now: DateTime<Utc>,
    provider: &P,
) -> Result<Vec<CandidateSlot>, AvailabilityError>
where
    P: BusyIntervalProvider + ?Sized,
{
    let (window, tz) = build_work_window(date, time_zone, rules)?;
    let duration = meeting_duration(duration_minutes)?;

    debug!(
        "Computing availability for {} in {} ({} - {}), {} min",
        date, tz, window.start, window.end, duration_minutes
    );

    let busy = provider.fetch_busy(window).await.map_err(|e| {
        error!("Failed to fetch busy intervals: {}", e);
        AvailabilityError::ProviderUnavailable(e.to_string())
    })?;
    debug!("Provider returned {} busy intervals", busy.len());

    let slots = scan_slots(&window, duration, &tz, rules, now, &busy);
    debug!("Found {} candidate slots", slots.len());
    Ok(slots)
}

/// Render candidates for the HTTP response.
pub fn to_available_slots(slots: &[CandidateSlot], duration: Duration, tz: &Tz) -> Vec<AvailableSlot> {
    slots
        .iter()
        .map(|slot| AvailableSlot {
            start_time: slot.start_instant.to_rfc3339(),
            end_time: (slot.start_instant + duration).to_rfc3339(),
            local_start_time: slot.start_instant.with_timezone(tz).to_rfc3339(),
        })
        .collect()
}

// --- Booking Logic ---

/// Parse and validate the RFC 3339 bounds of an event.
pub fn parse_event_range(
    start_time: &str,
    end_time: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), GcalServiceError> {
    let parse = |value: &str| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| GcalServiceError::TimeParseError(format!("'{}': {}", value, e)))
    };
    let start = parse(start_time)?;
    let end = parse(end_time)?;
    if end <= start {
        return Err(GcalServiceError::Validation(
            "end_time must be after start_time".to_string(),
        ));
    }
    Ok((start, end))
}
