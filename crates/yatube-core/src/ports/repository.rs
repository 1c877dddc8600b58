use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, NewPost, Post, PostFilter, User};
use crate::error::RepoError;

/// Generic repository trait for entities with client-generated ids.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Find every entity whose ID is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[ID]) -> Result<Vec<T>, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Uuid> {
    /// Find a group by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title, used to offer choices in the post form.
    async fn list_all(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository.
///
/// Listings are always ordered newest first: `created_at` descending, then
/// `id` descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new post and return it with its assigned id.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite the text and group of an existing post.
    ///
    /// Returns [`RepoError::NotFound`] if the post does not exist.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Find a post by id, only if it was written by `author_id`.
    async fn find_by_author(&self, author_id: Uuid, id: i64) -> Result<Option<Post>, RepoError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    /// One window of the newest-first listing for `filter`.
    async fn fetch(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;
}
