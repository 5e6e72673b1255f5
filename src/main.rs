use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use hr_onboard::api::{HrApi, HttpHrApi};
use hr_onboard::config::ServiceConfig;
use hr_onboard::onboarding::{OnboardingRouteState, onboarding_routes};

const SESSION_REAP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env().context("loading configuration")?;

    eprintln!("HR Onboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   HR API: {}", config.api_base_url);
    eprintln!(
        "   Auth: {}",
        if config.api_token.is_some() {
            "bearer token"
        } else {
            "none"
        }
    );
    eprintln!("   Session TTL: {}s", config.session_ttl.as_secs());
    eprintln!("   Onboarding API: http://{}/api/onboarding/sessions\n", config.bind);

    let api: Arc<dyn HrApi> = Arc::new(HttpHrApi::from_config(&config));
    let state = OnboardingRouteState::with_session_ttl(api, config.session_ttl);
    Arc::clone(&state.sessions).spawn_reaper(SESSION_REAP_INTERVAL);

    let app = onboarding_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!(addr = %config.bind, "Onboarding server started");
    axum::serve(listener, app).await.context("serving onboarding API")?;

    Ok(())
}
