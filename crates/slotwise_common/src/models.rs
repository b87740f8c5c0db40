// --- File: crates/slotwise_common/src/models.rs ---

// Data structures shared by the availability engine and its collaborators.

use chrono::{DateTime, Duration, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slotwise_config::SchedulingConfig;

use crate::error::{config_error, SlotwiseError};

/// An absolute span of time, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Returns `None` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A span reported as occupied by the external calendar.
///
/// Intervals arrive in no particular order and may overlap one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Open intersection with `[start, end)`; touching edges do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

/// A bookable start instant. The duration is the one the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start_instant: DateTime<Utc>,
}

/// Validated, immutable scheduling rules shared by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingRules {
    /// Timezone used when a request does not name one.
    pub time_zone: Tz,
    pub work_days: Vec<Weekday>,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub slot_interval: Duration,
    pub buffer: Duration,
    pub min_notice: Duration,
}

impl SchedulingRules {
    pub fn is_work_day(&self, weekday: Weekday) -> bool {
        self.work_days.contains(&weekday)
    }

    /// `true` when `hour` lies in `[work_start_hour, work_end_hour)`.
    pub fn is_work_hour(&self, hour: u32) -> bool {
        hour >= self.work_start_hour && hour < self.work_end_hour
    }
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            time_zone: Tz::Europe__Zurich,
            work_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            work_start_hour: 9,
            work_end_hour: 17,
            slot_interval: Duration::minutes(30),
            buffer: Duration::minutes(10),
            min_notice: Duration::minutes(120),
        }
    }
}

/// Maps a weekday index (0 = Sunday .. 6 = Saturday) to a chrono `Weekday`.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

impl TryFrom<&SchedulingConfig> for SchedulingRules {
    type Error = SlotwiseError;

    fn try_from(config: &SchedulingConfig) -> Result<Self, Self::Error> {
        let time_zone: Tz = config
            .time_zone
            .parse()
            .map_err(|_| config_error(format!("scheduling.time_zone: unknown timezone '{}'", config.time_zone)))?;

        let mut work_days = Vec::with_capacity(config.work_days.len());
        for &index in &config.work_days {
            let day = weekday_from_index(index).ok_or_else(|| {
                config_error(format!("scheduling.work_days: {} is not a weekday index (0-6)", index))
            })?;
            if !work_days.contains(&day) {
                work_days.push(day);
            }
        }

        if config.work_start_hour >= config.work_end_hour || config.work_end_hour > 24 {
            return Err(config_error(format!(
                "scheduling.work_start_hour/work_end_hour: need 0 <= start < end <= 24, got {}..{}",
                config.work_start_hour, config.work_end_hour
            )));
        }
        if config.slot_interval_minutes <= 0 {
            return Err(config_error("scheduling.slot_interval_minutes must be positive"));
        }
        if config.buffer_minutes < 0 {
            return Err(config_error("scheduling.buffer_minutes must not be negative"));
        }
        if config.min_notice_minutes < 0 {
            return Err(config_error("scheduling.min_notice_minutes must not be negative"));
        }

        Ok(Self {
            time_zone,
            work_days,
            work_start_hour: config.work_start_hour,
            work_end_hour: config.work_end_hour,
            slot_interval: Duration::minutes(config.slot_interval_minutes),
            buffer: Duration::minutes(config.buffer_minutes),
            min_notice: Duration::minutes(config.min_notice_minutes),
        })
    }
}

/// Payload for creating an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// RFC 3339 start.
    pub start_time: String,
    /// RFC 3339 end.
    pub end_time: String,
    pub summary: String,
    pub description: Option<String>,
    pub attendee_email: Option<String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    pub event_id: Option<String>,
    pub status: String,
}

/// An event read back from the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedEvent {
    pub event_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    /// "confirmed", "tentative" or "cancelled".
    pub status: String,
    pub created: String,
    pub updated: String,
}
