//! Sign-up, login, logout and session handling.

#[macro_use]
mod common;

use actix_web::cookie::{Cookie, time::Duration};
use actix_web::http::{StatusCode, header};
use actix_web::test;

use yatube_core::domain::User;
use yatube_core::ports::BaseRepository;
use yatube_server::middleware::auth::AUTH_COOKIE;
use yatube_shared::{LoginRequest, SignupRequest};

use common::*;

const PASSWORD: &str = "correct-horse-1";

async fn user_with_password(state: &yatube_server::AppState, username: &str) -> User {
    let hash = state.passwords.hash(PASSWORD).unwrap();
    state
        .users
        .save(User::new(username.to_string(), hash))
        .await
        .unwrap()
}

fn session_of<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == AUTH_COOKIE)
        .map(|c| c.into_owned())
}

#[actix_web::test]
async fn test_signup_starts_session() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form(&SignupRequest {
            username: "leo".to_string(),
            password1: PASSWORD.to_string(),
            password2: PASSWORD.to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp).as_deref(), Some("/"));

    let cookie = session_of(&resp).unwrap();
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));

    let user = state.users.find_by_username("leo").await.unwrap().unwrap();
    assert!(state.passwords.verify(PASSWORD, &user.password_hash).unwrap());

    // The new session is usable right away
    let req = test::TestRequest::get().uri("/new/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_signup_rejects_taken_username() {
    let state = test_state();
    add_user(&state, "leo").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form(&SignupRequest {
            username: "leo".to_string(),
            password1: PASSWORD.to_string(),
            password2: PASSWORD.to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_of(&resp).is_none());
    assert!(body_text(resp).await.contains("A user with that username already exists."));
}

#[actix_web::test]
async fn test_signup_rejects_mismatched_passwords() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form(&SignupRequest {
            username: "leo".to_string(),
            password1: PASSWORD.to_string(),
            password2: "something-else-2".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("data-field=\"password2\""));
    assert!(state.users.find_by_username("leo").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_login_redirects_to_next() {
    let state = test_state();
    user_with_password(&state, "leo").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(&LoginRequest {
            username: "leo".to_string(),
            password: PASSWORD.to_string(),
            next: Some("/new/".to_string()),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp).as_deref(), Some("/new/"));
    assert!(session_of(&resp).is_some());
}

#[actix_web::test]
async fn test_login_ignores_foreign_next() {
    let state = test_state();
    user_with_password(&state, "leo").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(&LoginRequest {
            username: "leo".to_string(),
            password: PASSWORD.to_string(),
            next: Some("https://evil.example/".to_string()),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp).as_deref(), Some("/"));
}

#[actix_web::test]
async fn test_login_with_bad_password() {
    let state = test_state();
    user_with_password(&state, "leo").await;
    let app = init_app!(state);

    for username in ["leo", "ghost"] {
        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_form(&LoginRequest {
                username: username.to_string(),
                password: "wrong-password".to_string(),
                next: None,
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", username);
        assert!(session_of(&resp).is_none());
        assert!(
            body_text(resp)
                .await
                .contains("Please enter a correct username and password.")
        );
    }
}

#[actix_web::test]
async fn test_login_form_keeps_next() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/auth/login/?next=/new/")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("name=\"next\""));
    assert!(html.contains("new"));
}

#[actix_web::test]
async fn test_logout_clears_session() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::get()
        .uri("/auth/logout/")
        .cookie(login_as(&fx.state, &fx.user))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp).as_deref(), Some("/"));

    let cookie = session_of(&resp).unwrap();
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

#[actix_web::test]
async fn test_bearer_token_authenticates() {
    let fx = fixture().await;
    let app = init_app!(fx.state);
    let token = fx
        .state
        .tokens
        .generate_token(fx.user.id, &fx.user.username)
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/new/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_tampered_session_is_rejected() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::get()
        .uri("/new/")
        .cookie(Cookie::new(AUTH_COOKIE, "not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp).as_deref(),
        Some("/auth/login/?next=%2Fnew%2F")
    );
}

#[actix_web::test]
async fn test_login_round_trip_keeps_plus_in_username() {
    let state = test_state();
    let author = user_with_password(&state, "a+b").await;
    let post = add_post(&state, &author, None, "plus in the name", 5).await;
    let app = init_app!(state);
    let edit = format!("/a+b/{}/edit/?page=2", post.id);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&edit).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let next = login_target(&resp).unwrap();
    assert_eq!(next, edit);

    let form = test::call_service(
        &app,
        test::TestRequest::get().uri(&location(&resp).unwrap()).to_request(),
    )
    .await;
    let html = body_text(form).await;
    assert!(html.contains("a+b"));
    assert!(!html.contains("a b"));

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(&LoginRequest {
            username: "a+b".to_string(),
            password: PASSWORD.to_string(),
            next: Some(next),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), Some(edit.clone()));

    let req = test::TestRequest::get()
        .uri(&edit)
        .cookie(session_of(&resp).unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_session_of_deleted_account_is_rejected() {
    let state = test_state();
    let ghost = User::new("ghost".to_string(), "!".to_string());
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/new/")
        .cookie(login_as(&state, &ghost))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(login_target(&resp).as_deref(), Some("/new/"));
}

#[actix_web::test]
async fn test_health_check() {
    let state = test_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}
