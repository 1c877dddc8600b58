use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

use yatube_core::domain::{Group, NewPost, Post, PostFilter};
use yatube_core::ports::{BaseRepository, GroupRepository, PostRepository};

use crate::database::entity::{group, post};
use crate::database::postgres_repo::{PostgresGroupRepository, PostgresPostRepository};

fn post_model(id: i64, author_id: Uuid, group_id: Option<Uuid>, text: &str) -> post::Model {
    post::Model {
        id,
        text: text.to_owned(),
        author_id,
        group_id,
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_find_group_by_slug() {
    let group_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![group::Model {
            id: group_id,
            title: "Test group".to_owned(),
            slug: "test_group".to_owned(),
            description: "Test description".to_owned(),
        }]])
        .into_connection();

    let repo = PostgresGroupRepository::new(db);

    let group: Group = repo.find_by_slug("test_group").await.unwrap().unwrap();

    assert_eq!(group.id, group_id);
    assert_eq!(group.title, "Test group");
}

#[tokio::test]
async fn test_find_group_by_id_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<group::Model>::new()])
        .into_connection();

    let repo = PostgresGroupRepository::new(db);

    let result: Option<Group> = repo.find_by_id(Uuid::new_v4()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_create_post_returns_generated_id() {
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(7, author_id, None, "Раз, два и три.")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let created: Post = repo
        .create(NewPost::new(author_id, "Раз, два и три.".to_owned(), None))
        .await
        .unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(created.author_id, author_id);
    assert_eq!(created.text, "Раз, два и три.");
}

#[tokio::test]
async fn test_fetch_maps_rows_in_order() {
    let author_id = Uuid::new_v4();
    let group_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            post_model(2, author_id, Some(group_id), "newer"),
            post_model(1, author_id, Some(group_id), "older"),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo.fetch(PostFilter::Group(group_id), 0, 10).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].text, "newer");
    assert_eq!(posts[1].group_id, Some(group_id));
}

#[tokio::test]
async fn test_count_posts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(3)),
        )])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.count(PostFilter::All).await.unwrap(), 3);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo
        .update(Post {
            id: 99,
            author_id: Uuid::new_v4(),
            group_id: None,
            text: "nothing".to_owned(),
            created_at: Utc::now(),
        })
        .await;

    assert!(matches!(result, Err(yatube_core::RepoError::NotFound)));
}
