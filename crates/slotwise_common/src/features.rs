//! Feature flag handling for the Slotwise application.
//!
//! ## Available Features
//!
//! - `openapi`: Enables OpenAPI documentation generation (compile time)
//! - `gcal`: Google Calendar backed availability and event routes
//! - `voice`: Twilio Voice IVR webhooks
//!
//! Compile-time features decide which crates are linked into the backend.
//! The runtime checks below decide whether a linked feature is switched on,
//! which requires both its `use_*` flag and its configuration section.

use slotwise_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Google Calendar feature is enabled at runtime.
pub fn is_gcal_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_gcal, config.gcal.as_ref())
}

/// Check if the voice (IVR) feature is enabled at runtime.
///
/// The voice section is optional; its defaults apply when it is absent.
pub fn is_voice_enabled(config: &AppConfig) -> bool {
    config.use_voice && is_gcal_enabled(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotwise_config::GcalConfig;

    #[test]
    fn gcal_needs_flag_and_section() {
        let mut config = AppConfig::default();
        assert!(!is_gcal_enabled(&config));

        config.use_gcal = true;
        assert!(!is_gcal_enabled(&config));

        config.gcal = Some(GcalConfig::default());
        assert!(is_gcal_enabled(&config));
    }

    #[test]
    fn voice_depends_on_gcal() {
        let config = AppConfig {
            use_voice: true,
            ..Default::default()
        };
        assert!(!is_voice_enabled(&config));

        let config = AppConfig {
            use_voice: true,
            use_gcal: true,
            gcal: Some(GcalConfig::default()),
            ..Default::default()
        };
        assert!(is_voice_enabled(&config));
    }
}
