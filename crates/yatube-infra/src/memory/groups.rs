use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::Group;
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, GroupRepository};

/// In-memory group store keyed by id.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    store: RwLock<HashMap<Uuid, Group>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        let mut store = self.store.write().await;

        if store
            .values()
            .any(|g| g.slug == group.slug && g.id != group.id)
        {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                group.slug
            )));
        }

        store.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|g| g.slug == slug).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups: Vec<Group> = self.store.read().await.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}
