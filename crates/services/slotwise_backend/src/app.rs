// File: services/slotwise_backend/src/app.rs
use axum::Router;
use slotwise_common::SlotwiseError;
use slotwise_config::AppConfig;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
#[allow(unused_imports)]
use tracing::{info, warn};

#[cfg(feature = "gcal")]
use slotwise_common::ApiKeyAuthState;
#[cfg(feature = "gcal")]
use slotwise_gcal::handlers::GcalState;

/// Public prefix every feature router is nested under.
pub const API_PREFIX: &str = "/api";

#[cfg(feature = "gcal")]
fn auth_state(config: &AppConfig) -> Arc<ApiKeyAuthState> {
    Arc::new(ApiKeyAuthState {
        api_key: config.auth.as_ref().and_then(|auth| auth.api_key.clone()),
    })
}

/// Connect enabled features and assemble the full application router.
pub async fn build_app(config: &AppConfig) -> Result<Router, SlotwiseError> {
    #[cfg(feature = "gcal")]
    let gcal_state = if slotwise_common::is_gcal_enabled(config) {
        Some(slotwise_gcal::routes::build_state(config).await?)
    } else {
        info!("GCal disabled by configuration");
        None
    };

    #[cfg(feature = "gcal")]
    let api = api_router(config, gcal_state);
    #[cfg(not(feature = "gcal"))]
    let api = api_router(config);

    Ok(compose(api))
}

/// Feature routes relative to [`API_PREFIX`].
#[cfg(feature = "gcal")]
pub fn api_router(config: &AppConfig, gcal_state: Option<Arc<GcalState>>) -> Router {
    let mut router = slotwise_common::routes();

    if let Some(gcal_state) = gcal_state {
        router = router.merge(slotwise_gcal::routes::routes(
            gcal_state.clone(),
            auth_state(config),
        ));

        #[cfg(feature = "voice")]
        {
            if slotwise_common::is_voice_enabled(config) {
                let voice_state = slotwise_voice::handlers::VoiceState {
                    gcal: gcal_state,
                    voice: config.voice.clone().unwrap_or_default(),
                    base_path: format!("{}/voice", API_PREFIX),
                };
                router = router.merge(slotwise_voice::routes::routes(Arc::new(voice_state)));
            } else {
                info!("Voice IVR disabled by configuration");
            }
        }
    } else {
        #[cfg(feature = "voice")]
        {
            if slotwise_common::is_voice_enabled(config) {
                warn!("Voice IVR requires GCal; voice routes not mounted");
            }
        }
    }

    router
}

#[cfg(not(feature = "gcal"))]
pub fn api_router(_config: &AppConfig) -> Router {
    slotwise_common::routes()
}

/// Nest the API, add Swagger UI when built with `openapi`, and wrap in tracing and CORS layers.
pub fn compose(api: Router) -> Router {
    #[allow(unused_mut)]
    let mut app = Router::new().nest(API_PREFIX, api);

    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "gcal")]
        use slotwise_gcal::doc::GcalApiDoc;
        #[cfg(feature = "voice")]
        use slotwise_voice::doc::VoiceApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotwise API",
                version = "0.1.0",
                description = "Appointment availability and calendar administration",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Slotwise", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "gcal")]
        openapi_doc.merge(GcalApiDoc::openapi());
        #[cfg(feature = "voice")]
        openapi_doc.merge(VoiceApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
