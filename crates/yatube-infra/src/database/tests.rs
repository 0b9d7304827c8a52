use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use yatube_core::domain::{Follow, Post, User};
use yatube_core::pagination::PageRequest;
use yatube_core::ports::{BaseRepository, FollowRepository, PostRepository, UserRepository};

use crate::database::entity::{follow, post, user};
use crate::database::postgres_repo::{
    PostgresFollowRepository, PostgresPostRepository, PostgresUserRepository,
};

fn post_model(author_id: Uuid, text: &str) -> post::Model {
    post::Model {
        id: Uuid::new_v4(),
        author_id,
        group_id: None,
        text: text.to_owned(),
        image: None,
        pub_date: Utc::now().into(),
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author_id = Uuid::new_v4();
    let model = post_model(author_id, "Test post text");
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
    assert_eq!(post.text, "Test post text");
}

#[tokio::test]
async fn test_find_user_by_username() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id: Uuid::new_v4(),
            username: "leo".to_owned(),
            email: "leo@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user: Option<User> = repo.find_by_username("leo").await.unwrap();
    assert_eq!(user.unwrap().username, "leo");
}

#[tokio::test]
async fn test_list_resolves_page_against_count() {
    let author_id = Uuid::new_v4();
    let rows: Vec<post::Model> = (0..3)
        .map(|i| post_model(author_id, &format!("post {i}")))
        .collect();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(13)]])
        .append_query_results([rows])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    // Past the end clamps to the last page.
    let page = repo.list(&PageRequest::number(7)).await.unwrap();
    assert_eq!(page.number, 2);
    assert_eq!(page.num_pages, 2);
    assert_eq!(page.total, 13);
    assert_eq!(page.len(), 3);
}

#[tokio::test]
async fn test_find_by_ids_skips_query_when_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresUserRepository::new(db);

    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_pair_reports_removal() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresFollowRepository::new(db);
    let (user_id, author_id) = (Uuid::new_v4(), Uuid::new_v4());

    assert!(repo.delete_pair(user_id, author_id).await.unwrap());
    assert!(!repo.delete_pair(user_id, author_id).await.unwrap());
}

#[tokio::test]
async fn test_insert_follow_returns_stored_row() {
    let edge = Follow::new(Uuid::new_v4(), Uuid::new_v4());
    let stored = follow::Model {
        id: edge.id,
        user_id: edge.user_id,
        author_id: edge.author_id,
        created: edge.created.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored]])
        .into_connection();

    let repo = PostgresFollowRepository::new(db);

    let saved: Follow = repo.insert(edge.clone()).await.unwrap();
    assert_eq!(saved.id, edge.id);
    assert_eq!(saved.author_id, edge.author_id);
}
