#[cfg(test)]
mod tests {
    use crate::logic::scan_slots;
    use crate::time::work_window;
    use chrono::{Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;
    use slotwise_common::{BusyInterval, SchedulingRules, TimeWindow};

    // Busy periods as (offset, length) in minutes from the window start.
    fn busy_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
        prop::collection::vec((-120i64..600, 5i64..180), 0..8)
    }

    fn to_busy(window: &TimeWindow, raw: &[(i64, i64)]) -> Vec<BusyInterval> {
        raw.iter()
            .map(|(offset, len)| {
                let start = window.start + Duration::minutes(*offset);
                BusyInterval::new(start, start + Duration::minutes(*len))
            })
            .collect()
    }

    fn setup(
        day_of_year: u32,
        interval: i64,
        buffer: i64,
        notice: i64,
    ) -> (SchedulingRules, TimeWindow) {
        let rules = SchedulingRules {
            slot_interval: Duration::minutes(interval),
            buffer: Duration::minutes(buffer),
            min_notice: Duration::minutes(notice),
            ..SchedulingRules::default()
        };
        let date = NaiveDate::from_yo_opt(2025, day_of_year).unwrap();
        let window = work_window(date, &rules.time_zone, &rules).unwrap();
        (rules, window)
    }

    proptest! {
        // Every candidate fits the window and keeps its padding clear of busy time.
        #[test]
        fn slots_fit_window_and_avoid_busy_time(
            day in 1u32..=365,
            interval in prop::sample::select(vec![5i64, 10, 15, 20, 30, 60]),
            duration_minutes in 15i64..120,
            buffer in 0i64..30,
            now_offset in -600i64..600,
            raw_busy in busy_strategy(),
        ) {
            let (rules, window) = setup(day, interval, buffer, 120);
            let busy = to_busy(&window, &raw_busy);
            let duration = Duration::minutes(duration_minutes);
            let now = window.start + Duration::minutes(now_offset);

            let slots = scan_slots(&window, duration, &rules.time_zone, &rules, now, &busy);

            for slot in &slots {
                let start = slot.start_instant;
                prop_assert!(start >= window.start);
                prop_assert!(start + duration <= window.end);
                prop_assert!(start >= now + rules.min_notice);
                let padded_start = start - rules.buffer;
                let padded_end = start + duration + rules.buffer;
                for b in &busy {
                    prop_assert!(!b.overlaps(padded_start, padded_end), "{:?} hits {:?}", slot, b);
                }
            }
        }

        // Output ascends strictly along the grid anchored at the window start.
        #[test]
        fn slots_are_ascending_on_the_grid(
            day in 1u32..=365,
            interval in prop::sample::select(vec![5i64, 10, 15, 20, 30, 45, 60]),
            duration_minutes in 10i64..90,
            raw_busy in busy_strategy(),
        ) {
            let (rules, window) = setup(day, interval, 10, 0);
            let busy = to_busy(&window, &raw_busy);
            let now = window.start - Duration::days(1);

            let slots = scan_slots(&window, Duration::minutes(duration_minutes), &rules.time_zone, &rules, now, &busy);

            for pair in slots.windows(2) {
                prop_assert!(pair[0].start_instant < pair[1].start_instant);
            }
            for slot in &slots {
                let offset = (slot.start_instant - window.start).num_minutes();
                prop_assert_eq!(offset % interval, 0);
            }
        }

        // Converted back to local time every start is on a work day, inside work hours.
        #[test]
        fn slots_fall_on_local_work_days_and_hours(
            day in 1u32..=365,
            duration_minutes in 15i64..60,
        ) {
            let (rules, window) = setup(day, 30, 0, 0);
            let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

            let slots = scan_slots(&window, Duration::minutes(duration_minutes), &rules.time_zone, &rules, now, &[]);

            for slot in &slots {
                let local = slot.start_instant.with_timezone(&rules.time_zone);
                prop_assert!(rules.is_work_day(local.weekday()));
                prop_assert!(local.hour() >= rules.work_start_hour && local.hour() < rules.work_end_hour);
            }
            let weekday = window.start.with_timezone(&rules.time_zone).weekday();
            prop_assert_eq!(slots.is_empty(), !rules.is_work_day(weekday));
        }

        // Same inputs, same answer.
        #[test]
        fn scan_is_idempotent(
            day in 1u32..=365,
            duration_minutes in 15i64..120,
            now_offset in -600i64..600,
            raw_busy in busy_strategy(),
        ) {
            let (rules, window) = setup(day, 15, 10, 120);
            let busy = to_busy(&window, &raw_busy);
            let now = window.start + Duration::minutes(now_offset);
            let duration = Duration::minutes(duration_minutes);

            let first = scan_slots(&window, duration, &rules.time_zone, &rules, now, &busy);
            let second = scan_slots(&window, duration, &rules.time_zone, &rules, now, &busy);
            prop_assert_eq!(first, second);
        }

        // The work window always spans the configured local hours, whatever the offset.
        #[test]
        fn work_window_spans_configured_local_hours(
            day in 1u32..=365,
            tz in prop::sample::select(vec![Tz::Europe__Zurich, Tz::America__New_York, Tz::Australia__Sydney, Tz::UTC]),
        ) {
            let rules = SchedulingRules { time_zone: tz, ..SchedulingRules::default() };
            let date = NaiveDate::from_yo_opt(2025, day).unwrap();
            let window = work_window(date, &tz, &rules).unwrap();

            let local_start = window.start.with_timezone(&tz);
            let local_end = window.end.with_timezone(&tz);
            prop_assert_eq!(local_start.date_naive(), date);
            prop_assert_eq!(local_start.hour(), 9);
            prop_assert_eq!(local_end.hour(), 17);
        }
    }
}
