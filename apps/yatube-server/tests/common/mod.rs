//! Shared fixtures for the handler tests.

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::{http::header, test};
use chrono::{Duration, Utc};

use yatube_core::Paginator;
use yatube_core::domain::{Group, NewPost, Post, PostFilter, User};
use yatube_core::ports::BaseRepository;
use yatube_infra::JwtConfig;
use yatube_server::AppState;
use yatube_server::middleware::auth::{LOGIN_URL, session_cookie};
use yatube_shared::NextQuery;

pub const PER_PAGE: u64 = 10;

/// Build the application service over `$state`.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(yatube_server::configure_routes),
        )
        .await
    };
}

pub struct Fixture {
    pub state: AppState,
    pub user: User,
    pub group: Group,
}

pub fn test_state() -> AppState {
    AppState::in_memory(
        Paginator::new(PER_PAGE),
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "yatube-tests".to_string(),
        },
    )
}

/// One author and one group, no posts.
pub async fn fixture() -> Fixture {
    let state = test_state();
    let user = add_user(&state, "StasBaretskiy").await;
    let group = add_group(&state, "Ремонт от Стаса", "remont_ot_stasa").await;
    Fixture { state, user, group }
}

pub async fn add_user(state: &AppState, username: &str) -> User {
    state
        .users
        .save(User::new(username.to_string(), "!unusable".to_string()))
        .await
        .unwrap()
}

pub async fn add_group(state: &AppState, title: &str, slug: &str) -> Group {
    state
        .groups
        .save(Group::new(title, slug, format!("About {}", slug)))
        .await
        .unwrap()
}

/// Store a post written `minutes_ago` minutes ago.
pub async fn add_post(
    state: &AppState,
    author: &User,
    group: Option<&Group>,
    text: &str,
    minutes_ago: i64,
) -> Post {
    state
        .posts
        .create(NewPost {
            author_id: author.id,
            group_id: group.map(|g| g.id),
            text: text.to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        })
        .await
        .unwrap()
}

pub async fn post_count(state: &AppState) -> u64 {
    state.posts.count(PostFilter::All).await.unwrap()
}

/// Session cookie logged in as `user`.
pub fn login_as(state: &AppState, user: &User) -> Cookie<'static> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .unwrap();
    session_cookie(token, 3600)
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Decoded `next` of a redirect to the login page.
pub fn login_target<B>(resp: &ServiceResponse<B>) -> Option<String> {
    let location = location(resp)?;
    let query = location.strip_prefix(LOGIN_URL)?.strip_prefix('?')?;
    serde_urlencoded::from_str::<NextQuery>(query).ok()?.next
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

/// Number of post cards rendered on a page.
pub fn card_count(html: &str) -> usize {
    html.matches("class=\"post\"").count()
}
