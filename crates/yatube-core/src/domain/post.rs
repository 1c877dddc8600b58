use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a single authored text entry, optionally tagged with a group.
///
/// The id is assigned by the store on insert, so posts are created through
/// [`NewPost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        Self {
            author_id,
            group_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(Uuid),
    Author(Uuid),
}

impl PostFilter {
    /// Whether `post` belongs to the filtered collection.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Group(id) => post.group_id == Some(*id),
            PostFilter::Author(id) => post.author_id == *id,
        }
    }
}
