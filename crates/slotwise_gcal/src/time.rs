// --- File: crates/slotwise_gcal/src/time.rs ---

//! Local calendar dates to absolute UTC windows.
//!
//! Local wall-clock times that do not exist (spring-forward gap) resolve to
//! the first valid instant after the gap. Ambiguous times (fall-back overlap)
//! resolve to the earlier instant.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use slotwise_common::{SchedulingRules, TimeWindow};

use crate::logic::AvailabilityError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest DST gap we probe across, in minutes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

pub fn parse_time_zone(name: &str) -> Result<Tz, AvailabilityError> {
    name.parse::<Tz>()
        .map_err(|_| AvailabilityError::InvalidTimezone(name.to_string()))
}

pub fn parse_date(date: &str) -> Result<NaiveDate, AvailabilityError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| AvailabilityError::InvalidDate(date.to_string()))
}

/// Resolve a local wall-clock time in `tz` to an absolute instant.
pub fn local_to_utc(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            for step in 1..=MAX_GAP_MINUTES {
                let probe = local + Duration::minutes(step);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
            Utc.from_utc_datetime(&local)
        }
    }
}

fn hour_on(date: NaiveDate, hour: u32) -> Option<NaiveDateTime> {
    if hour == 24 {
        date.succ_opt()?.and_hms_opt(0, 0, 0)
    } else {
        date.and_hms_opt(hour, 0, 0)
    }
}

/// The work-hour window for `date` in `tz`, as absolute instants.
pub fn work_window(
    date: NaiveDate,
    tz: &Tz,
    rules: &SchedulingRules,
) -> Result<TimeWindow, AvailabilityError> {
    let invalid = || AvailabilityError::InvalidDate(date.format(DATE_FORMAT).to_string());

    let start_local = hour_on(date, rules.work_start_hour).ok_or_else(invalid)?;
    let end_local = hour_on(date, rules.work_end_hour).ok_or_else(invalid)?;

    TimeWindow::new(local_to_utc(tz, start_local), local_to_utc(tz, end_local))
        .ok_or_else(invalid)
}

/// Parse `date` and `time_zone` and build the work-hour window.
pub fn build_work_window(
    date: &str,
    time_zone: &str,
    rules: &SchedulingRules,
) -> Result<(TimeWindow, Tz), AvailabilityError> {
    let day = parse_date(date)?;
    let tz = parse_time_zone(time_zone)?;
    let window = work_window(day, &tz, rules)?;
    Ok((window, tz))
}

/// Normalize a pair of dates or a pair of RFC 3339 timestamps into a window.
///
/// A date pair covers the first day from midnight through the last
/// millisecond of the second day, local to `tz`.
pub fn normalize_range(start: &str, end: &str, tz: &Tz) -> Result<TimeWindow, AvailabilityError> {
    let (start, end) = match (parse_date(start), parse_date(end)) {
        (Ok(first), Ok(last)) => {
            let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
                .ok_or_else(|| AvailabilityError::InvalidRange("invalid end of day".into()))?;
            (
                local_to_utc(tz, first.and_time(NaiveTime::MIN)),
                local_to_utc(tz, last.and_time(last_ms)),
            )
        }
        _ => (parse_instant(start)?, parse_instant(end)?),
    };

    TimeWindow::new(start, end).ok_or_else(|| {
        AvailabilityError::InvalidRange(format!("start {} is not before end {}", start, end))
    })
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, AvailabilityError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AvailabilityError::InvalidRange(format!(
                "'{}' is neither a YYYY-MM-DD date nor an RFC 3339 timestamp",
                value
            ))
        })
}
