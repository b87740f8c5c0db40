#[cfg(test)]
mod tests {
    use crate::logic::AvailabilityError;
    use crate::time::{build_work_window, local_to_utc, normalize_range, work_window};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;
    use slotwise_common::SchedulingRules;

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hours(start: u32, end: u32) -> SchedulingRules {
        SchedulingRules {
            work_start_hour: start,
            work_end_hour: end,
            ..SchedulingRules::default()
        }
    }

    #[test]
    fn summer_and_winter_offsets() {
        let rules = SchedulingRules::default();
        let zurich = Tz::Europe__Zurich;

        let summer = work_window(date(2025, 5, 5), &zurich, &rules).unwrap();
        assert_eq!(summer.start, instant("2025-05-05T07:00:00Z"));
        assert_eq!(summer.end, instant("2025-05-05T15:00:00Z"));

        let winter = work_window(date(2025, 1, 6), &zurich, &rules).unwrap();
        assert_eq!(winter.start, instant("2025-01-06T08:00:00Z"));
        assert_eq!(winter.end, instant("2025-01-06T16:00:00Z"));
    }

    #[test]
    fn transition_day_uses_that_days_offset() {
        let rules = SchedulingRules::default();
        let zurich = Tz::Europe__Zurich;

        let spring = work_window(date(2025, 3, 30), &zurich, &rules).unwrap();
        assert_eq!(spring.start, instant("2025-03-30T07:00:00Z"));

        let autumn = work_window(date(2025, 10, 26), &zurich, &rules).unwrap();
        assert_eq!(autumn.start, instant("2025-10-26T08:00:00Z"));
        assert_eq!(autumn.end, instant("2025-10-26T16:00:00Z"));
    }

    #[test]
    fn spring_forward_gap_resolves_after_the_gap() {
        let zurich = Tz::Europe__Zurich;
        let window = work_window(date(2025, 3, 30), &zurich, &hours(2, 10)).unwrap();
        // 02:00 does not exist; 03:00 CEST is 01:00 UTC.
        assert_eq!(window.start, instant("2025-03-30T01:00:00Z"));

        let new_york = Tz::America__New_York;
        let gap = date(2025, 3, 9).and_hms_opt(2, 30, 0).unwrap();
        assert_eq!(local_to_utc(&new_york, gap), instant("2025-03-09T07:00:00Z"));
    }

    #[test]
    fn fall_back_ambiguity_resolves_to_earlier_instant() {
        let zurich = Tz::Europe__Zurich;
        let ambiguous = date(2025, 10, 26).and_hms_opt(2, 30, 0).unwrap();
        assert_eq!(local_to_utc(&zurich, ambiguous), instant("2025-10-26T00:30:00Z"));
    }

    #[test]
    fn hour_24_means_next_midnight() {
        let window = work_window(date(2025, 5, 5), &Tz::UTC, &hours(0, 24)).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 5, 6, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_bad_date_and_zone() {
        let rules = SchedulingRules::default();
        assert!(matches!(
            build_work_window("2025-13-01", "UTC", &rules),
            Err(AvailabilityError::InvalidDate(_))
        ));
        assert!(matches!(
            build_work_window("05/05/2025", "UTC", &rules),
            Err(AvailabilityError::InvalidDate(_))
        ));
        assert!(matches!(
            build_work_window("2025-05-05", "Nowhere/City", &rules),
            Err(AvailabilityError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn date_pair_covers_whole_local_days() {
        let window = normalize_range("2025-05-05", "2025-05-06", &Tz::Europe__Zurich).unwrap();
        assert_eq!(window.start, instant("2025-05-04T22:00:00Z"));
        assert_eq!(window.end, instant("2025-05-06T21:59:59.999Z"));

        let single = normalize_range("2025-05-05", "2025-05-05", &Tz::UTC).unwrap();
        assert_eq!(single.start, instant("2025-05-05T00:00:00Z"));
        assert_eq!(single.end, instant("2025-05-05T23:59:59.999Z"));
    }

    #[test]
    fn timestamp_pair_is_taken_as_is() {
        let window = normalize_range(
            "2025-05-05T09:00:00+02:00",
            "2025-05-05T12:00:00Z",
            &Tz::Europe__Zurich,
        )
        .unwrap();
        assert_eq!(window.start, instant("2025-05-05T07:00:00Z"));
        assert_eq!(window.end, instant("2025-05-05T12:00:00Z"));
    }

    #[test]
    fn mixed_or_reversed_ranges_are_invalid() {
        let tz = Tz::UTC;
        let invalid = |start: &str, end: &str| {
            matches!(normalize_range(start, end, &tz), Err(AvailabilityError::InvalidRange(_)))
        };

        assert!(invalid("2025-05-05", "2025-05-06T00:00:00Z"));
        assert!(invalid("2025-05-06", "2025-05-05"));
        assert!(invalid("2025-05-05T12:00:00Z", "2025-05-05T09:00:00Z"));
        assert!(invalid("2025-05-05T09:00:00Z", "2025-05-05T09:00:00Z"));
        assert!(invalid("yesterday", "today"));
    }
}
