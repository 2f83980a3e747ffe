use crate::cli::Args;
use crate::conversation::ConversationService;
use crate::error::{ ChatError, GENERIC_ERROR_BODY };
use std::error::Error;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    body::Bytes,
    extract::{ Path, State },
    response::{ IntoResponse, Response },
    http::{ header, StatusCode },
    Json,
};
use governor::{ DefaultDirectRateLimiter, Quota, RateLimiter };
use tower_http::cors::{ Any, CorsLayer };
use tower_http::services::ServeDir;
use log::{ info, warn, error };

#[derive(Clone)]
pub struct AppState {
    service: Arc<ConversationService>,
    generate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    /// `per_second == 0` turns the generate limit off.
    pub fn new(service: Arc<ConversationService>, per_second: u32) -> Self {
        let generate_limiter = NonZeroU32::new(per_second)
            .map(|n| Arc::new(RateLimiter::direct(Quota::per_second(n))));
        Self { service, generate_limiter }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        error!("Request failed ({} fault): {}", self.kind(), self);
        (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_BODY).into_response()
    }
}

pub fn build_router(state: AppState, static_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/{id}", get(history_handler).delete(delete_handler));

    if let Some(dir) = static_dir {
        info!("Serving static files from {}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).with_state(state)
}

pub async fn start_http_server(
    args: &Args,
    service: Arc<ConversationService>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;
    let app = build_router(
        AppState::new(service, args.generate_rate_limit),
        args.static_dir.as_deref(),
    );

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert), Some(key)) => (cert, key),
            _ => return Err("ENABLE_TLS requires both TLS_CERT_PATH and TLS_KEY_PATH".into()),
        };

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
        })?;
        info!("Starting HTTP server on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn history_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ChatError> {
    match state.service.history(&id).await? {
        Some(record) => Ok(([(header::CONTENT_TYPE, "application/json")], record).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ChatError> {
    state.service.delete(&id).await?;
    Ok(StatusCode::OK)
}

async fn generate_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ChatError> {
    if let Some(limiter) = &state.generate_limiter {
        if limiter.check().is_err() {
            warn!("Generate rate limit exceeded");
            return Ok((StatusCode::TOO_MANY_REQUESTS, "Too many requests").into_response());
        }
    }

    let text = state.service.generate(&body).await?;
    Ok(text.into_response())
}
