#[cfg(test)]
mod tests {
    use crate::handlers::VoiceState;
    use crate::routes::routes;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use slotwise_common::{FixedClock, SchedulingRules};
    use slotwise_config::VoiceConfig;
    use slotwise_gcal::handlers::GcalState;
    use slotwise_gcal::service::mock::MockCalendarService;
    use std::sync::Arc;
    use tower::ServiceExt;

    // Monday 2025-05-05, 06:00 UTC.
    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 6, 0, 0).unwrap()
    }

    fn app(calendar: Arc<MockCalendarService>, voice: VoiceConfig) -> Router {
        let gcal = Arc::new(GcalState {
            rules: Arc::new(SchedulingRules {
                time_zone: Tz::UTC,
                ..SchedulingRules::default()
            }),
            calendar,
            clock: Arc::new(FixedClock(monday_morning())),
        });
        routes(Arc::new(VoiceState {
            gcal,
            voice,
            base_path: "/api/voice".to_string(),
        }))
    }

    async fn post_form(app: Router, uri: &str, form: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn incoming_call_greets_and_offers_menu() {
        let voice = VoiceConfig {
            greeting: "Welcome to Smith & Sons.".to_string(),
            ..VoiceConfig::default()
        };
        let (status, xml) = post_form(
            app(Arc::new(MockCalendarService::new()), voice),
            "/voice/incoming",
            "CallSid=CA123&From=%2B41790000000",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(xml.contains("Welcome to Smith &amp; Sons."));
        assert!(xml.contains(r#"<Gather input="dtmf speech" numDigits="1" action="/api/voice/menu""#));
        assert!(xml.contains("Press 1 to hear today&apos;s openings."));
        assert!(xml.ends_with(r#"<Redirect method="POST">/api/voice/incoming</Redirect></Response>"#));
    }

    #[tokio::test]
    async fn digit_one_reads_todays_first_openings() {
        let calendar = Arc::new(MockCalendarService::new());
        calendar.add_busy(
            Utc.with_ymd_and_hms(2025, 5, 5, 9, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap(),
        );

        let (status, xml) = post_form(app(calendar, VoiceConfig::default()), "/voice/menu", "Digits=1").await;

        assert_eq!(status, StatusCode::OK);
        // 09:00 through 10:00 collide with the buffered busy block.
        assert!(
            xml.contains("The next openings today are at 10:30 AM, 11:00 AM and 11:30 AM."),
            "{}",
            xml
        );
        assert!(xml.ends_with("<Hangup/></Response>"));
    }

    #[tokio::test]
    async fn digit_two_reads_tomorrow_with_configured_limit() {
        let voice = VoiceConfig {
            max_slots_read: 2,
            ..VoiceConfig::default()
        };
        let (_, xml) = post_form(app(Arc::new(MockCalendarService::new()), voice), "/voice/menu", "Digits=2").await;

        assert!(xml.contains("The next openings tomorrow are at 9:00 AM and 9:30 AM."), "{}", xml);
    }

    #[tokio::test]
    async fn invalid_digit_redirects_to_menu() {
        let (_, xml) = post_form(
            app(Arc::new(MockCalendarService::new()), VoiceConfig::default()),
            "/voice/menu",
            "Digits=7",
        )
        .await;

        assert!(xml.contains("Sorry, that is not a valid option."));
        assert!(xml.contains(r#"<Redirect method="POST">/api/voice/incoming</Redirect>"#));
    }

    #[tokio::test]
    async fn provider_failure_apologises() {
        let calendar = Arc::new(MockCalendarService::new());
        calendar.set_unavailable(true);

        let (status, xml) = post_form(app(calendar, VoiceConfig::default()), "/voice/menu", "Digits=1").await;

        assert_eq!(status, StatusCode::OK);
        assert!(xml.contains("Sorry, we cannot check the calendar right now."));
        assert!(xml.contains("<Hangup/>"));
    }

    #[tokio::test]
    async fn speech_falls_back_to_keypad() {
        let calendar = Arc::new(MockCalendarService::new());
        for uri in ["/voice/speech", "/voice/menu"] {
            let (_, xml) = post_form(
                app(calendar.clone(), VoiceConfig::default()),
                uri,
                "SpeechResult=next+Tuesday+%3Cplease%3E",
            )
            .await;

            assert!(xml.contains("Please use the keypad."), "{}", xml);
            assert!(xml.contains("<Gather"));
        }
        assert_eq!(calendar.busy_queries(), 0);
    }
}
