// --- File: crates/slotwise_common/src/lib.rs ---

pub mod auth; // API key middleware for admin routes
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod http; // HTTP response mapping
pub mod logging; // Logging utilities
pub mod models; // Shared data structures
pub mod routes; // Routes shared by every deployment
pub mod services; // Service abstractions

pub use routes::routes;

pub use auth::{api_key_middleware, ApiKeyAuthState, API_KEY_HEADER};

pub use error::{
    auth_error, config_error, conflict, external_service_error, internal_error, not_found,
    validation_error, Context, HttpStatusCode, SlotwiseError,
};

pub use http::{map_json_error, IntoHttpResponse};

pub use logging::{init, init_with_level, log_result};

pub use features::{is_feature_enabled, is_gcal_enabled, is_voice_enabled};

pub use models::{
    BookedEvent, BusyInterval, CalendarEvent, CalendarEventResult, CandidateSlot,
    SchedulingRules, TimeWindow,
};
pub use services::{
    BoxFuture, BusyIntervalProvider, CalendarService, Clock, FixedClock, SystemClock,
};
