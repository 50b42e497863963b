use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, error, warn};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Environment variable holding the auth provider's token signing secret.
pub const AUTH_SECRET_VAR: &str = "AUTH_JWT_SECRET";

/// Audience the auth provider stamps on tokens of signed-in users.
pub const AUDIENCE: &str = "authenticated";

static JWT_SECRET: OnceCell<String> = OnceCell::new();

static VALIDATION: Lazy<Validation> = Lazy::new(|| {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);
    validation
});

/// Claims of an access token issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The caller on routes where signing in is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer(pub Option<String>);

impl Viewer {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token signing secret is not configured")]
    MissingSecret,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::MissingSecret => {
                error!("{} is not set; rejecting authenticated request", AUTH_SECRET_VAR);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match status {
            StatusCode::UNAUTHORIZED => self.to_string(),
            _ => "Authentication is unavailable".to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Installs the signing secret once at startup. Later calls are ignored.
pub fn set_jwt_secret(secret: String) {
    if JWT_SECRET.set(secret).is_err() {
        debug!("JWT secret already initialised");
    }
}

fn jwt_secret() -> Result<String, AuthError> {
    JWT_SECRET
        .get()
        .cloned()
        .or_else(|| env::var(AUTH_SECRET_VAR).ok())
        .ok_or(AuthError::MissingSecret)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verifies a token and returns its claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &VALIDATION,
    )?;
    Ok(data.claims)
}

fn authenticate(token: &str) -> Result<String, AuthError> {
    let secret = jwt_secret()?;
    decode_token(token, &secret).map(|claims| claims.sub)
}

/// Requires a valid bearer token and exposes the user id as `Extension<String>`.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        warn!("Rejected {} {}: no bearer token", req.method(), req.uri());
        return AuthError::MissingToken.into_response();
    };

    match authenticate(token) {
        Ok(user_id) => {
            debug!("Authenticated user {}", user_id);
            req.extensions_mut().insert(user_id);
            next.run(req).await
        }
        Err(e) => {
            warn!("Rejected {} {}: {}", req.method(), req.uri(), e);
            e.into_response()
        }
    }
}

/// Like `auth_middleware`, but lets anonymous callers through as `Viewer(None)`.
/// A token that is present but invalid is still rejected.
pub async fn optional_auth_middleware(mut req: Request, next: Next) -> Response {
    let viewer = match bearer_token(req.headers()) {
        None => Viewer(None),
        Some(token) => match authenticate(token) {
            Ok(user_id) => Viewer(Some(user_id)),
            Err(e) => {
                warn!("Rejected {} {}: {}", req.method(), req.uri(), e);
                return e.into_response();
            }
        },
    };

    req.extensions_mut().insert(viewer);
    next.run(req).await
}

#[cfg(any(test, feature = "test_utils"))]
pub use test_support::*;

#[cfg(any(test, feature = "test_utils"))]
mod test_support {
    use super::*;
    use axum::body::Body;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

    /// Signs a token the middleware accepts when `AUTH_JWT_SECRET` is the test secret.
    pub fn create_test_token(user_id: &str) -> String {
        let secret = jwt_secret().unwrap_or_else(|_| TEST_JWT_SECRET.to_string());
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            aud: AUDIENCE.to_string(),
            email: Some(format!("{}@example.com", user_id)),
            role: Some(AUDIENCE.to_string()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("failed to sign test token")
    }

    /// Builds a request carrying a bearer token for `user_id` and an optional JSON body.
    pub fn create_test_request(
        method: &str,
        path: &str,
        user_id: &str,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let builder = axum::http::Request::builder()
            .method(method)
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {}", create_test_token(user_id)));
        with_json_body(builder, body)
    }

    /// Builds a request without credentials.
    pub fn create_anonymous_request(
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        with_json_body(
            axum::http::Request::builder().method(method).uri(path),
            body,
        )
    }

    fn with_json_body(
        builder: axum::http::request::Builder,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("failed to build test request"),
            None => builder
                .body(Body::empty())
                .expect("failed to build test request"),
        }
    }
}
