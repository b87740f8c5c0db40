// --- File: crates/slotwise_voice/src/handlers.rs ---
use axum::extract::{Form, State};
use chrono::Days;
use serde::Deserialize;
use slotwise_config::VoiceConfig;
use slotwise_gcal::compute_availability;
use slotwise_gcal::handlers::GcalState;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::twiml::{Gather, VoiceResponse};

/// Shared state for the IVR webhooks.
#[derive(Clone)]
pub struct VoiceState {
    pub gcal: Arc<GcalState>,
    pub voice: VoiceConfig,
    /// Public path the voice routes are mounted under, e.g. `/api/voice`.
    pub base_path: String,
}

impl VoiceState {
    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), endpoint)
    }

    fn menu(&self) -> Gather {
        Gather {
            action: self.url("menu"),
            language: self.voice.language.clone(),
            num_digits: 1,
            prompts: vec![
                "Press 1 to hear today's openings.".to_string(),
                "Press 2 to hear tomorrow's openings.".to_string(),
            ],
        }
    }

    /// The keypad menu, repeated when the caller stays silent.
    fn menu_response(&self, intro: Option<&str>) -> VoiceResponse {
        let mut response = VoiceResponse::new();
        if let Some(intro) = intro {
            response = response.say(&self.voice.language, intro);
        }
        response
            .gather(self.menu())
            .redirect(self.url("incoming"))
    }
}

/// Fields Twilio posts to voice webhooks. Unknown fields are ignored.
#[derive(Deserialize, Debug, Default)]
pub struct CallForm {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
    #[serde(rename = "Digits")]
    pub digits: Option<String>,
    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,
}

/// Join spoken items: "a", "a and b", "a, b and c".
fn join_spoken(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

async fn read_openings(state: &VoiceState, days_ahead: u64, label: &str) -> VoiceResponse {
    let rules = &state.gcal.rules;
    let tz = rules.time_zone;
    let now = state.gcal.clock.now();
    let language = state.voice.language.as_str();

    let Some(day) = now
        .with_timezone(&tz)
        .date_naive()
        .checked_add_days(Days::new(days_ahead))
    else {
        return VoiceResponse::new()
            .say(language, "Sorry, that day is not available.")
            .hangup();
    };

    let result = compute_availability(
        &day.format("%Y-%m-%d").to_string(),
        state.voice.meeting_minutes,
        tz.name(),
        rules,
        now,
        state.gcal.calendar.as_ref(),
    )
    .await;

    let message = match result {
        Ok(slots) if slots.is_empty() => format!("There are no openings {}.", label),
        Ok(slots) => {
            let times: Vec<String> = slots
                .iter()
                .take(state.voice.max_slots_read.max(1))
                .map(|slot| {
                    slot.start_instant
                        .with_timezone(&tz)
                        .format("%-I:%M %p")
                        .to_string()
                })
                .collect();
            info!("Reading {} of {} openings for {}", times.len(), slots.len(), day);
            format!("The next openings {} are at {}.", label, join_spoken(&times))
        }
        Err(e) => {
            error!("IVR availability lookup for {} failed: {}", day, e);
            "Sorry, we cannot check the calendar right now. Please try again later.".to_string()
        }
    };

    VoiceResponse::new()
        .say(language, message)
        .say(language, "Goodbye.")
        .hangup()
}

fn speech_fallback(state: &VoiceState, utterance: &str) -> VoiceResponse {
    // No date understanding yet; every utterance goes back to the keypad.
    info!("Speech input not understood: {:?}", utterance);
    state.menu_response(Some("Sorry, I did not understand that. Please use the keypad."))
}

pub async fn incoming_handler(
    State(state): State<Arc<VoiceState>>,
    Form(form): Form<CallForm>,
) -> VoiceResponse {
    info!("Incoming call {}", form.call_sid.as_deref().unwrap_or("<unknown>"));
    state.menu_response(Some(state.voice.greeting.as_str()))
}

pub async fn menu_handler(
    State(state): State<Arc<VoiceState>>,
    Form(form): Form<CallForm>,
) -> VoiceResponse {
    match form.digits.as_deref().map(str::trim) {
        Some("1") => read_openings(&state, 0, "today").await,
        Some("2") => read_openings(&state, 1, "tomorrow").await,
        Some(other) => {
            warn!("Invalid menu option {:?}", other);
            VoiceResponse::new()
                .say(&state.voice.language, "Sorry, that is not a valid option.")
                .redirect(state.url("incoming"))
        }
        None => match form.speech_result.as_deref() {
            Some(utterance) => speech_fallback(&state, utterance),
            None => state.menu_response(None),
        },
    }
}

pub async fn speech_handler(
    State(state): State<Arc<VoiceState>>,
    Form(form): Form<CallForm>,
) -> VoiceResponse {
    speech_fallback(&state, form.speech_result.as_deref().unwrap_or_default())
}
