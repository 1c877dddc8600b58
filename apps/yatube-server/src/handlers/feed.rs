//! Loading posts for display.

use std::collections::HashMap;

use yatube_core::Page;
use yatube_core::domain::{Group, Post, PostFilter, User};
use yatube_core::ports::BaseRepository;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates::PostCard;

/// One page of the newest-first listing selected by `filter`.
pub async fn load_page(
    state: &AppState,
    filter: PostFilter,
    requested: Option<&str>,
) -> AppResult<Page<PostCard>> {
    let total = state.posts.count(filter).await?;
    let window = state.paginator.window(total, requested);

    let posts = state
        .posts
        .fetch(filter, window.offset(), window.limit())
        .await?;

    tracing::debug!(?filter, page = window.number, total, "Loaded post page");

    Ok(Page::new(to_cards(state, posts).await?, window))
}

/// Attach author names and group links to `posts`.
pub async fn to_cards(state: &AppState, posts: Vec<Post>) -> AppResult<Vec<PostCard>> {
    let mut author_ids: Vec<_> = posts.iter().map(|p| p.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut group_ids: Vec<_> = posts.iter().filter_map(|p| p.group_id).collect();
    group_ids.sort_unstable();
    group_ids.dedup();

    let authors: HashMap<_, User> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let groups: HashMap<_, Group> = state
        .groups
        .find_by_ids(&group_ids)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();

    posts
        .into_iter()
        .map(|post| {
            let author = authors.get(&post.author_id).ok_or_else(|| {
                AppError::Internal(format!("post {} has no author", post.id))
            })?;
            let group = post.group_id.and_then(|id| groups.get(&id));
            Ok(PostCard::new(post, author, group))
        })
        .collect()
}
