//! Post listing, detail, creation and editing handlers.

use actix_web::{HttpResponse, web};

use yatube_core::DomainError;
use yatube_core::domain::{NewPost, Post, PostFilter, User};
use yatube_core::forms::{FormErrors, PostForm};
use yatube_shared::{PageQuery, PostFormData};

use super::feed::{load_page, to_cards};
use super::{redirect, render};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates::{
    GroupTemplate, IndexTemplate, PostFormTemplate, PostTemplate, ProfileTemplate, post_url,
};

async fn find_author(state: &AppState, username: &str) -> AppResult<User> {
    state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", username).into())
}

/// Resolve a post by its author's username and its id.
async fn find_post(state: &AppState, username: &str, post_id: i64) -> AppResult<(User, Post)> {
    let author = find_author(state, username).await?;
    let post = state
        .posts
        .find_by_author(author.id, post_id)
        .await?
        .ok_or_else(|| AppError::from(DomainError::not_found("post", post_id)))?;
    Ok((author, post))
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = load_page(&state, PostFilter::All, query.page.as_deref()).await?;

    render(&IndexTemplate {
        viewer: viewer.username(),
        page,
    })
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("group", &slug))?;

    let page = load_page(&state, PostFilter::Group(group.id), query.page.as_deref()).await?;

    render(&GroupTemplate {
        viewer: viewer.username(),
        group,
        page,
    })
}

/// GET /{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &path.into_inner()).await?;
    let page = load_page(&state, PostFilter::Author(author.id), query.page.as_deref()).await?;

    render(&ProfileTemplate {
        viewer: viewer.username(),
        author: author.username,
        page,
    })
}

/// GET /{username}/{post_id}/
pub async fn post_view(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<(String, i64)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let (author, post) = find_post(&state, &username, post_id).await?;

    let author_post_count = state.posts.count(PostFilter::Author(author.id)).await?;
    let can_edit = viewer
        .0
        .as_ref()
        .is_some_and(|identity| identity.user_id == author.id);

    let card = to_cards(&state, vec![post])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("post card missing".to_string()))?;

    render(&PostTemplate {
        viewer: viewer.username(),
        post: card,
        author_post_count,
        can_edit,
    })
}

/// GET /new/
pub async fn new_post_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list_all().await?;

    render(&PostFormTemplate::new(
        Some(identity.username),
        "/new/".to_string(),
        false,
        &PostForm::default(),
        &FormErrors::default(),
        &groups,
    ))
}

/// POST /new/
pub async fn new_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let data = body.into_inner();
    let form = PostForm::new(data.text, data.group);
    let groups = state.groups.list_all().await?;

    match form.validate(&groups) {
        Ok(draft) => {
            let post = state
                .posts
                .create(NewPost::new(identity.user_id, draft.text, draft.group_id))
                .await?;

            tracing::info!(post_id = post.id, author = %identity.username, "Post created");
            Ok(redirect("/"))
        }
        Err(errors) => {
            tracing::debug!(author = %identity.username, ?errors, "Rejected new post");
            render(&PostFormTemplate::new(
                Some(identity.username),
                "/new/".to_string(),
                false,
                &form,
                &errors,
                &groups,
            ))
        }
    }
}

/// GET /{username}/{post_id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, i64)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let (author, post) = find_post(&state, &username, post_id).await?;

    if author.id != identity.user_id {
        return Ok(deny_edit(&identity, &author, post_id));
    }

    let groups = state.groups.list_all().await?;
    render(&PostFormTemplate::new(
        Some(identity.username),
        format!("{}edit/", post_url(&author.username, post_id)),
        true,
        &PostForm::from_post(&post),
        &FormErrors::default(),
        &groups,
    ))
}

/// POST /{username}/{post_id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, i64)>,
    body: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let (author, post) = find_post(&state, &username, post_id).await?;

    if author.id != identity.user_id {
        return Ok(deny_edit(&identity, &author, post_id));
    }

    let data = body.into_inner();
    let form = PostForm::new(data.text, data.group);
    let groups = state.groups.list_all().await?;

    match form.validate(&groups) {
        Ok(draft) => {
            state
                .posts
                .update(Post {
                    text: draft.text,
                    group_id: draft.group_id,
                    ..post
                })
                .await?;

            tracing::info!(post_id, author = %author.username, "Post edited");
            Ok(redirect(&post_url(&author.username, post_id)))
        }
        Err(errors) => render(&PostFormTemplate::new(
            Some(identity.username),
            format!("{}edit/", post_url(&author.username, post_id)),
            true,
            &form,
            &errors,
            &groups,
        )),
    }
}

/// Non-authors are sent back to the post without any change.
fn deny_edit(identity: &Identity, author: &User, post_id: i64) -> HttpResponse {
    tracing::info!(
        post_id,
        author = %author.username,
        requested_by = %identity.username,
        "Edit denied for non-author"
    );
    redirect(&post_url(&author.username, post_id))
}
