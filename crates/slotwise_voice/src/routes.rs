// --- File: crates/slotwise_voice/src/routes.rs ---
use axum::{routing::post, Router};
use std::sync::Arc;

use crate::handlers::{incoming_handler, menu_handler, speech_handler, VoiceState};

/// Creates a router containing the Twilio Voice webhooks.
pub fn routes(state: Arc<VoiceState>) -> Router {
    Router::new()
        .route("/voice/incoming", post(incoming_handler))
        .route("/voice/menu", post(menu_handler))
        .route("/voice/speech", post(speech_handler))
        .with_state(state)
}
