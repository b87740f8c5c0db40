// --- File: crates/slotwise_gcal/src/routes.rs ---

use crate::auth::create_calendar_hub;
use crate::handlers::{
    cancel_event_handler, create_event_handler, delete_event_handler, get_availability_handler,
    list_events_handler, reschedule_event_handler, GcalState,
};
use crate::service::GoogleCalendarService;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use slotwise_common::{
    api_key_middleware, config_error, ApiKeyAuthState, SchedulingRules, SlotwiseError, SystemClock,
};
use slotwise_config::AppConfig;
use std::sync::Arc;
use tracing::info;

/// Connect to Google Calendar and assemble handler state from configuration.
pub async fn build_state(config: &AppConfig) -> Result<Arc<GcalState>, SlotwiseError> {
    let gcal_config = config
        .gcal
        .as_ref()
        .ok_or_else(|| config_error("gcal section missing while use_gcal is set"))?;
    let calendar_id = gcal_config
        .calendar_id
        .as_deref()
        .ok_or_else(|| config_error("gcal.calendar_id missing"))?;

    let rules = SchedulingRules::try_from(&config.scheduling)?;
    let calendar_hub = create_calendar_hub(gcal_config)
        .await
        .map_err(config_error)?;

    info!(
        "GCal state ready for calendar {} in {}",
        calendar_id, rules.time_zone
    );
    Ok(Arc::new(GcalState {
        rules: Arc::new(rules),
        calendar: Arc::new(GoogleCalendarService::new(
            Arc::new(calendar_hub),
            calendar_id,
        )),
        clock: Arc::new(SystemClock),
    }))
}

/// Availability and event routes. Event routes require the API key.
pub fn routes(state: Arc<GcalState>, auth: Arc<ApiKeyAuthState>) -> Router {
    let events = Router::new()
        .route("/events", get(list_events_handler).post(create_event_handler))
        .route(
            "/events/{event_id}",
            patch(reschedule_event_handler).delete(delete_event_handler),
        )
        .route("/events/{event_id}/cancel", post(cancel_event_handler))
        .route_layer(middleware::from_fn_with_state(auth, api_key_middleware));

    Router::new()
        .route("/availability", get(get_availability_handler))
        .merge(events)
        .with_state(state)
}
