//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the resilient upstream clients from configuration
//! - Create the axum Router with all handlers
//! - Wire up middleware (request ID, access log, CORS, rate limit, timeout)
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use crate::config::GatewayConfig;
use crate::http::middleware::{access_log, propagate_request_id};
use crate::http::routes;
use crate::resilience::{BackoffPolicy, CircuitBreaker};
use crate::security::{rate_limit_middleware, RateLimiterState};
use crate::upstream::UpstreamClient;

/// Errors building the server out of a configuration.
///
/// `validate_config` catches these earlier with full reporting; the checks
/// here make a directly-constructed server safe too.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid {name} upstream url '{url}': {source}")]
    InvalidUpstreamUrl {
        name: &'static str,
        url: String,
        source: url::ParseError,
    },

    #[error("circuit_breaker.failure_threshold must be at least 1")]
    ZeroFailureThreshold,

    #[error("retries.max_attempts must be at least 1")]
    ZeroMaxAttempts,

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Application state injected into handlers: one resilient client per
/// upstream, constructed once and shared for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<UpstreamClient>,
    pub model: Arc<UpstreamClient>,
}

/// The gateway HTTP server.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    /// Build the server and its upstream clients from configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .build()?;

        let state = AppState {
            data: build_upstream("data", &config.upstreams.data.base_url, &http, &config)?,
            model: build_upstream("model", &config.upstreams.model.base_url, &http, &config)?,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(routes::health))
            .route("/scrape/excel", post(routes::scrape_excel))
            .route("/scrape/{team}/{year}", get(routes::scrape_team))
            .route("/scrape/{year}", get(routes::scrape_year))
            .route("/teams/{team}/stats", get(routes::team_stats))
            .route("/players", get(routes::players))
            .route("/games", get(routes::games))
            .route("/standings", get(routes::standings))
            .route("/odds/live", get(routes::live_odds))
            .route("/odds/history/{game_id}", get(routes::odds_history))
            .route("/odds/best", get(routes::best_odds))
            .route("/predictions/predict", get(routes::predict))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.gateway_secs,
            )))
            .layer(cors_layer(config));

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        router
            .layer(middleware::from_fn(access_log))
            .layer(middleware::from_fn(propagate_request_id))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn build_upstream(
    name: &'static str,
    base_url: &str,
    http: &reqwest::Client,
    config: &GatewayConfig,
) -> Result<Arc<UpstreamClient>, ServerError> {
    let base_url = Url::parse(base_url).map_err(|source| ServerError::InvalidUpstreamUrl {
        name,
        url: base_url.to_string(),
        source,
    })?;
    let threshold = NonZeroU32::new(config.circuit_breaker.failure_threshold)
        .ok_or(ServerError::ZeroFailureThreshold)?;
    let max_attempts =
        NonZeroU32::new(config.retries.max_attempts).ok_or(ServerError::ZeroMaxAttempts)?;

    Ok(Arc::new(UpstreamClient::new(
        name,
        base_url,
        http.clone(),
        CircuitBreaker::new(threshold, config.circuit_breaker.reset_timeout()),
        BackoffPolicy::new(config.retries.base_delay()),
        max_attempts,
    )))
}

fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    // validate_config already rejects these; the checks here keep a
    // directly-constructed server from panicking inside tower-http, which
    // refuses wildcard entries in an origin list.
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in &config.cors.allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(value) if origin != "*" => origins.push(value),
            _ => tracing::warn!(origin = %origin, "ignoring invalid CORS origin"),
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}
