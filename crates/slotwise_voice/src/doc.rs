// --- File: crates/slotwise_voice/src/doc.rs ---

// Only compile this module if the 'openapi' feature is enabled
#![cfg(feature = "openapi")]
// Allow dead code for the dummy functions used by the macro
#![allow(dead_code)]

use utoipa::OpenApi;

#[utoipa::path(
    post,
    path = "/voice/incoming",
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "Twilio voice webhook form (CallSid, From, ...)"),
    responses(
        (status = 200, description = "TwiML greeting with the keypad menu", content_type = "application/xml", body = String)
    ),
    tag = "Voice"
)]
fn doc_incoming_handler() {}

#[utoipa::path(
    post,
    path = "/voice/menu",
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "Twilio Gather result (Digits or SpeechResult)"),
    responses(
        (status = 200, description = "TwiML reading the openings for the chosen day", content_type = "application/xml", body = String)
    ),
    tag = "Voice"
)]
fn doc_menu_handler() {}

#[utoipa::path(
    post,
    path = "/voice/speech",
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "Twilio speech result (SpeechResult)"),
    responses(
        (status = 200, description = "TwiML falling back to the keypad menu", content_type = "application/xml", body = String)
    ),
    tag = "Voice"
)]
fn doc_speech_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_incoming_handler, doc_menu_handler, doc_speech_handler),
    tags(
        (name = "Voice", description = "Twilio Voice IVR webhooks")
    )
)]
pub struct VoiceApiDoc;
