use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::{ApiError, ErrorCode};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer token that [`require_bearer_auth`] accepted, stored as a request
/// extension. Absent when auth is disabled.
#[derive(Debug, Clone)]
pub struct VerifiedClient(pub String);

/// API key auth settings used by middleware.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from `HYPEWATCH_API_KEYS` (comma-separated bearer tokens).
    ///
    /// In development, empty/missing keys disable auth for local iteration.
    /// In non-development envs, empty/missing keys fail startup.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("HYPEWATCH_API_KEYS").unwrap_or_default();
        Self::from_keys(&raw, is_development)
    }

    pub fn from_keys(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        keys.dedup();

        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "HYPEWATCH_API_KEYS not set; bearer auth disabled in development environment"
                );
                return Ok(Self::disabled());
            }

            anyhow::bail!(
                "HYPEWATCH_API_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            api_keys: Arc::new(keys),
            enabled: true,
        })
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            api_keys: Arc::new(Vec::new()),
            enabled: false,
        }
    }

    /// Checks every key so timing does not reveal which one matched.
    fn allows(&self, token: &str) -> bool {
        let mut matched = subtle::Choice::from(0);
        for key in self.api_keys.iter() {
            matched |= key.as_bytes().ct_eq(token.as_bytes());
        }
        matched.into()
    }
}

#[derive(Debug, Clone, Copy)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

#[derive(Debug)]
struct RateLimitTable {
    windows: HashMap<String, RateLimitWindow>,
    last_sweep: Instant,
}

/// Fixed-window limiter keyed by client.
///
/// Only tokens verified by [`require_bearer_auth`] get their own bucket;
/// every other request shares one anonymous bucket, so the table never holds
/// more than one entry per configured key plus one.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<RateLimitTable>>,
}

/// Outcome of charging one request against a client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Allowed,
    Limited { retry_after_secs: u64 },
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(RateLimitTable {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    #[must_use]
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    async fn admit(&self, client: &str, now: Instant) -> Admission {
        let mut table = self.clients.lock().await;
        // Forget lapsed clients at most once per window.
        if now.duration_since(table.last_sweep) >= self.window {
            let window_len = self.window;
            table
                .windows
                .retain(|_, w| now.duration_since(w.started_at) < window_len);
            table.last_sweep = now;
        }

        let window = table
            .windows
            .entry(client.to_owned())
            .or_insert(RateLimitWindow {
                started_at: now,
                count: 0,
            });
        if now.duration_since(window.started_at) >= self.window {
            *window = RateLimitWindow {
                started_at: now,
                count: 0,
            };
        }

        if window.count >= self.max_requests {
            let remaining = self
                .window
                .saturating_sub(now.duration_since(window.started_at));
            return Admission::Limited {
                retry_after_secs: remaining.as_secs().max(1),
            };
        }

        window.count += 1;
        Admission::Allowed
    }
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<VerifiedClient>()
        .map_or_else(|| "anonymous".to_string(), |c| format!("token:{}", c.0))
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

const MAX_REQUEST_ID_LEN: usize = 128;

/// Caller-supplied ids are echoed into logs and JSON, so only short ids made
/// of visible ASCII are kept.
fn is_acceptable_request_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Axum middleware that extracts or generates a request ID.
///
/// An acceptable incoming `x-request-id` is reused; otherwise a new `UUIDv4`
/// is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_acceptable_request_id(v))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing Bearer token auth when enabled.
///
/// On success the token is recorded as a [`VerifiedClient`] extension.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    let token = extract_bearer_token(req.headers().get(AUTHORIZATION))
        .filter(|t| auth.allows(t))
        .map(ToOwned::to_owned);

    match token {
        Some(token) => {
            req.extensions_mut().insert(VerifiedClient(token));
            next.run(req).await
        }
        None => ApiError::new(
            request_id_of(&req),
            ErrorCode::Unauthorized,
            "missing or invalid bearer token",
        )
        .into_response(),
    }
}

/// Middleware enforcing a per-client request budget per window.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    match rate_limit.admit(&client, Instant::now()).await {
        Admission::Allowed => next.run(req).await,
        Admission::Limited { retry_after_secs } => {
            tracing::warn!(
                limit = rate_limit.max_requests,
                retry_after_secs,
                "rate limit exceeded"
            );
            let mut res = ApiError::new(
                request_id_of(&req),
                ErrorCode::RateLimited,
                "rate limit exceeded",
            )
            .into_response();
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
            res
        }
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
