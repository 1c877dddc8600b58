//! Session extractors.
//!
//! The session token is a JWT carried in the [`AUTH_COOKIE`] cookie, or in an
//! `Authorization: Bearer` header for non-browser clients.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header, web};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use uuid::Uuid;

use yatube_core::ports::{AuthError, BaseRepository, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "yatube_session";

/// Where unauthenticated visitors of protected pages are sent.
pub const LOGIN_URL: &str = "/auth/login/";

/// Authenticated user identity extractor.
///
/// The token must be valid and its user must still exist in the store.
/// Handlers taking an `Identity` are login-gated:
/// ```ignore
/// async fn new_post(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

/// Rejection of [`Identity`]: redirects to the login page and back.
#[derive(Debug)]
pub struct LoginRequired {
    pub next: String,
    pub reason: AuthError,
}

impl std::fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "login required: {}", self.reason)
    }
}

impl actix_web::ResponseError for LoginRequired {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, login_redirect_url(&self.next)))
            .finish()
    }
}

/// Login page URL that returns to `next` afterwards.
pub fn login_redirect_url(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => format!("{}?{}", LOGIN_URL, query),
        Err(e) => {
            tracing::warn!(%next, "Dropping unencodable login target: {}", e);
            LOGIN_URL.to_string()
        }
    }
}

/// Accept only local absolute paths as post-login targets.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Session cookie carrying `token` for `max_age_secs` seconds.
pub fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// Cookie that clears the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(AUTH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AuthError> {
    req.app_data::<web::Data<AppState>>().cloned().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthError::InvalidToken("Server configuration error".to_string())
    })
}

fn session_claims(req: &HttpRequest, state: &AppState) -> Result<TokenClaims, AuthError> {
    let token = req
        .cookie(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| bearer_token(req))
        .ok_or(AuthError::MissingAuth)?;

    state.tokens.validate_token(&token)
}

fn login_required(req: &HttpRequest, reason: AuthError) -> actix_web::Error {
    let next = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();
    tracing::debug!(%next, %reason, "Redirecting to login");
    LoginRequired { next, reason }.into()
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = app_state(&req).map_err(|reason| login_required(&req, reason))?;
            let claims =
                session_claims(&req, &state).map_err(|reason| login_required(&req, reason))?;

            // Tokens outlive in-memory stores, so the user is looked up again
            match state.users.find_by_id(claims.user_id).await {
                Ok(Some(user)) => Ok(Identity {
                    user_id: user.id,
                    username: user.username,
                }),
                Ok(None) => {
                    tracing::info!(user_id = %claims.user_id, "Session for unknown user");
                    Err(login_required(&req, AuthError::UnknownUser))
                }
                Err(e) => Err(AppError::from(e).into()),
            }
        })
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    /// Username shown in the navigation bar.
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|identity| identity.username.clone())
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = app_state(req)
            .and_then(|state| session_claims(req, &state))
            .ok()
            .map(|claims| Identity {
                user_id: claims.user_id,
                username: claims.username,
            });
        ready(Ok(OptionalIdentity(identity)))
    }
}
