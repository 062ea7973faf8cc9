use crate::config::{Config, CorsConfig};
use crate::db::DatabaseGateway;
use crate::server::routes::{health, movies};
use crate::service::MovieService;

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, Method, StatusCode, Version, header},
    middleware::{self, Next},
    response::Response,
};
use base64::Engine as _;
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    normalize_path::NormalizePath,
};
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieService,
}

impl AppState {
    /// Wires the database gateway from configuration. Nothing remote is contacted here.
    pub fn new(cfg: &Config) -> Self {
        let gateway = Arc::new(DatabaseGateway::from_config(&cfg.supabase));
        Self::with_gateway(gateway, cfg.supabase.table.as_str())
    }

    pub fn with_gateway(gateway: Arc<DatabaseGateway>, table: &str) -> Self {
        Self {
            movies: MovieService::new(gateway, table),
        }
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(generate_request_id, str::to_string);

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status().as_u16();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let path = uri.path();
    let protocol = format_http_version(version);

    macro_rules! access_event {
        ($level:ident) => {
            $level!(
                event = "http.access",
                status,
                request_id = %request_id,
                method = %method,
                protocol,
                path,
                latency_ms,
                user_agent = %user_agent,
                "{} {} {}",
                method,
                path,
                status
            )
        };
    }

    if resp.status().is_server_error() {
        access_event!(error);
    } else if resp.status().is_client_error() {
        access_event!(warn);
    } else {
        access_event!(info);
    }

    resp
}

/// The served application: the router behind trailing-slash trimming, so `/api/movies/`
/// reaches the same handlers as `/api/movies`.
pub type MoviesApp = NormalizePath<Router>;

pub fn movies_router(state: AppState, cors: &CorsConfig) -> MoviesApp {
    let router = Router::new()
        .merge(health::router())
        .merge(movies::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(cors_layer(cors))
        .layer(middleware::from_fn(access_log));
    NormalizePath::trim_trailing_slash(router)
}
