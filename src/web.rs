use crate::{
    config::{Config, ResponseShape},
    errors::FeedError,
    feed::VideoFeed,
};
use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::signal;
use tower_http::set_header::SetResponseHeaderLayer;

pub struct SharedState {
    pub feed: VideoFeed,
    pub response_shape: ResponseShape,
}

impl SharedState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            feed: VideoFeed::new(config.upstream.clone())?,
            response_shape: config.response_shape,
        })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::warn!("shutting down");
}

pub fn router(state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/api/v2", get(health))
        .route("/api/v2/getVideos", get(get_videos))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(state)
}

async fn start_app(config: Config) -> anyhow::Result<()> {
    let shared_state = Arc::new(SharedState::new(&config)?);
    let app = router(shared_state);

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    log::info!("listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

pub fn start_daemon(config: Config) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(start_app(config))
}

#[derive(Debug)]
pub struct HttpError(FeedError);

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            FeedError::UpstreamStatus(code) => {
                log::warn!("{self:?}");
                StatusCode::from_u16(code)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY)
            }
            FeedError::Timeout => {
                log::error!("{self:?}");
                StatusCode::GATEWAY_TIMEOUT
            }
            FeedError::Transport(_) | FeedError::Body(_) => {
                log::error!("{self:?}");
                StatusCode::BAD_GATEWAY
            }
        };

        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<FeedError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

async fn health() {
    log::debug!("health check");
}

/// First `tag` value in the query string, or `""` when absent.
///
/// Repeated keys are not an error; later values are ignored.
pub fn first_tag(params: &[(String, String)]) -> String {
    params
        .iter()
        .find(|(name, _)| name == "tag")
        .map(|(_, value)| value.clone())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct VideosResponse {
    pub urls: Vec<String>,
}

/// Wraps `urls` the way the configured response shape asks for.
pub fn encode_videos(shape: ResponseShape, urls: Vec<String>) -> Value {
    match shape {
        ResponseShape::Named => json!(VideosResponse { urls }),
        ResponseShape::Bare => json!(urls),
    }
}

async fn get_videos(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, HttpError> {
    let tag = first_tag(&params);
    log::debug!("tag: {tag:?}");

    let urls = state.feed.videos(&tag).await?;

    Ok(Json(encode_videos(state.response_shape, urls)))
}
