// File: crates/slotwise_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use slotwise_config::GcalConfig;
use std::path::Path;
use tracing::info;

use crate::service::GcalServiceError;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Build an authenticated Calendar hub from a service-account key file.
pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, GcalServiceError> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or_else(|| GcalServiceError::Auth("missing gcal.key_path".to_string()))?;

    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| GcalServiceError::Auth(format!("reading {}: {}", key_path, e)))?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| GcalServiceError::Auth(format!("building authenticator: {}", e)))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| GcalServiceError::Auth(format!("loading native TLS roots: {}", e)))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    info!("Google Calendar hub ready (key: {})", key_path);
    Ok(CalendarHub::new(client, auth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_path_is_auth_error() {
        let config = GcalConfig {
            key_path: None,
            calendar_id: Some("primary".to_string()),
        };
        let err = create_calendar_hub(&config).await.err();
        assert!(matches!(err, Some(GcalServiceError::Auth(_))));
    }

    #[tokio::test]
    async fn unreadable_key_file_is_auth_error() {
        let config = GcalConfig {
            key_path: Some("/nonexistent/slotwise-service-account.json".to_string()),
            calendar_id: None,
        };
        let err = create_calendar_hub(&config).await.err();
        assert!(matches!(err, Some(GcalServiceError::Auth(_))));
    }
}
