//! Sign-up, login and logout handlers.

use actix_web::{HttpResponse, http::header, web};

use yatube_core::domain::User;
use yatube_core::error::RepoError;
use yatube_core::forms::{FormErrors, SignupForm};
use yatube_core::ports::BaseRepository;
use yatube_shared::{LoginRequest, NextQuery, SignupRequest};

use super::{redirect, render};
use crate::middleware::auth::{removal_cookie, safe_next, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates::{LoginTemplate, SignupTemplate};

const BAD_CREDENTIALS: &str = "Please enter a correct username and password.";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Redirect to `location` while setting a fresh session for `user`.
fn start_session(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(session_cookie(token, state.tokens.expiration_seconds()))
        .finish())
}

/// GET /auth/signup/
pub async fn signup_form() -> AppResult<HttpResponse> {
    render(&SignupTemplate::new(String::new(), &FormErrors::default()))
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Form<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let form = SignupForm {
        username: req.username,
        password1: req.password1,
        password2: req.password2,
    };

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return render(&SignupTemplate::new(form.username, &errors)),
    };

    let mut taken = FormErrors::default();
    taken.add("username", USERNAME_TAKEN);

    if state.users.find_by_username(&draft.username).await?.is_some() {
        return render(&SignupTemplate::new(draft.username, &taken));
    }

    let password_hash = state
        .passwords
        .hash(&draft.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = match state
        .users
        .save(User::new(draft.username.clone(), password_hash))
        .await
    {
        Ok(user) => user,
        // Lost a race with a concurrent sign-up of the same name
        Err(RepoError::Constraint(_)) => {
            return render(&SignupTemplate::new(draft.username, &taken));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(username = %user.username, "User signed up");
    start_session(&state, &user, "/")
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> AppResult<HttpResponse> {
    render(&LoginTemplate {
        viewer: None,
        username: String::new(),
        next: safe_next(query.next.as_deref()).to_string(),
        error: None,
    })
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Form<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let next = safe_next(req.next.as_deref()).to_string();

    let user = state.users.find_by_username(req.username.trim()).await?;

    let verified = match &user {
        Some(user) => state
            .passwords
            .verify(&req.password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?,
        None => false,
    };

    match user {
        Some(user) if verified => {
            tracing::info!(username = %user.username, "User logged in");
            start_session(&state, &user, &next)
        }
        _ => {
            tracing::debug!(username = %req.username, "Login rejected");
            render(&LoginTemplate {
                viewer: None,
                username: req.username,
                next,
                error: Some(BAD_CREDENTIALS.to_string()),
            })
        }
    }
}

/// GET /auth/logout/
pub async fn logout() -> HttpResponse {
    let mut response = redirect("/");
    if let Err(e) = response.add_cookie(&removal_cookie()) {
        tracing::error!("Failed to clear session cookie: {}", e);
    }
    response
}
