use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{NewPost, Post, PostFilter};
use yatube_core::error::RepoError;
use yatube_core::ports::PostRepository;

#[derive(Default)]
struct PostTable {
    last_id: i64,
    rows: Vec<Post>,
}

/// In-memory post store with sequential ids.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        table.last_id += 1;

        let stored = Post {
            id: table.last_id,
            author_id: post.author_id,
            group_id: post.group_id,
            text: post.text,
            created_at: post.created_at,
        };
        table.rows.push(stored.clone());

        Ok(stored)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;

        row.text = post.text;
        row.group_id = post.group_id;

        Ok(row.clone())
    }

    async fn find_by_author(&self, author_id: Uuid, id: i64) -> Result<Option<Post>, RepoError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|p| p.id == id && p.author_id == author_id)
            .cloned())
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn fetch(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let table = self.table.read().await;

        let mut matching: Vec<&Post> = table.rows.iter().filter(|p| filter.matches(p)).collect();
        matching.sort_by_key(|p| Reverse((p.created_at, p.id)));

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
