// --- File: crates/slotwise_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Google Calendar Config ---
// Service account key file is read at startup; the calendar id is mandatory when use_gcal is set.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
}

// --- Scheduling Rules Config ---
// Raw values as they appear in the config file. Validation happens when
// slotwise_common::models::SchedulingRules is built from this.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday.
    #[serde(default = "default_work_days")]
    pub work_days: Vec<u8>,
    #[serde(default = "default_work_start_hour")]
    pub work_start_hour: u32,
    #[serde(default = "default_work_end_hour")]
    pub work_end_hour: u32,
    #[serde(default = "default_slot_interval_minutes")]
    pub slot_interval_minutes: i64,
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: i64,
    #[serde(default = "default_min_notice_minutes")]
    pub min_notice_minutes: i64,
}

fn default_time_zone() -> String {
    "Europe/Zurich".to_string()
}
fn default_work_days() -> Vec<u8> {
    vec![1, 2, 3, 4, 5]
}
fn default_work_start_hour() -> u32 {
    9
}
fn default_work_end_hour() -> u32 {
    17
}
fn default_slot_interval_minutes() -> i64 {
    30
}
fn default_buffer_minutes() -> i64 {
    10
}
fn default_min_notice_minutes() -> i64 {
    120
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            work_days: default_work_days(),
            work_start_hour: default_work_start_hour(),
            work_end_hour: default_work_end_hour(),
            slot_interval_minutes: default_slot_interval_minutes(),
            buffer_minutes: default_buffer_minutes(),
            min_notice_minutes: default_min_notice_minutes(),
        }
    }
}

// --- API Auth Config ---
// Set api_key to "secret_from_env" to read it from AUTH_API_KEY.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    pub api_key: Option<String>,
}

// --- Voice (IVR) Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VoiceConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Meeting length offered over the phone.
    #[serde(default = "default_meeting_minutes")]
    pub meeting_minutes: i64,
    #[serde(default = "default_max_slots_read")]
    pub max_slots_read: usize,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_greeting() -> String {
    "Thank you for calling.".to_string()
}
fn default_meeting_minutes() -> i64 {
    30
}
fn default_max_slots_read() -> usize {
    3
}
fn default_language() -> String {
    "en-US".to_string()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            meeting_minutes: default_meeting_minutes(),
            max_slots_read: default_max_slots_read(),
            language: default_language(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_voice: bool,

    // --- Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub voice: Option<VoiceConfig>,
}
