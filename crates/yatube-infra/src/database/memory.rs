//! In-memory repositories for tests and database-less runs.
//!
//! Enforces the same uniqueness, foreign-key and cascade rules as the SQL schema.

use std::cmp::Reverse;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Comment, Follow, Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::pagination::{Page, PageRequest};
use yatube_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    Repositories, UserRepository,
};

/// Rows kept in insertion order.
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
}

impl Tables {
    fn has_user(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn has_group(&self, id: Uuid) -> bool {
        self.groups.iter().any(|g| g.id == id)
    }

    fn has_post(&self, id: Uuid) -> bool {
        self.posts.iter().any(|p| p.id == id)
    }

    /// Posts matching `filter`, newest first. Equal dates keep the later insert first.
    fn posts_newest_first(&self, filter: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.iter().rev().filter(|p| filter(p)).cloned().collect();
        posts.sort_by_key(|p| Reverse(p.pub_date));
        posts
    }
}

/// A row type stored in [`Tables`].
trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    fn rows(tables: &Tables) -> &Vec<Self>;

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;

    /// Uniqueness and reference checks against every other row.
    fn check(&self, tables: &Tables) -> Result<(), RepoError>;

    /// Apply the schema's `ON DELETE` rules for a removed row.
    fn cascade(_id: Uuid, _tables: &mut Tables) {}
}

fn missing(what: &str) -> RepoError {
    RepoError::Constraint(format!("{what} does not exist"))
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.users
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.users
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .users
            .iter()
            .any(|u| u.id != self.id && u.username == self.username)
        {
            return Err(RepoError::Constraint(format!(
                "username {} is taken",
                self.username
            )));
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        let removed: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|p| p.author_id != id);
        tables
            .comments
            .retain(|c| c.author_id != id && !removed.contains(&c.post_id));
        tables
            .follows
            .retain(|f| f.user_id != id && f.author_id != id);
    }
}

impl Record for Group {
    fn id(&self) -> Uuid {
        self.id
    }

    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.groups
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.groups
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .groups
            .iter()
            .any(|g| g.id != self.id && g.slug == self.slug)
        {
            return Err(RepoError::Constraint(format!("slug {} is taken", self.slug)));
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        for post in tables.posts.iter_mut().filter(|p| p.group_id == Some(id)) {
            post.group_id = None;
        }
    }
}

impl Record for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.posts
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.posts
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.has_user(self.author_id) {
            return Err(missing("author"));
        }
        if let Some(group_id) = self.group_id {
            if !tables.has_group(group_id) {
                return Err(missing("group"));
            }
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        tables.comments.retain(|c| c.post_id != id);
    }
}

impl Record for Comment {
    fn id(&self) -> Uuid {
        self.id
    }

    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.comments
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.comments
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.has_post(self.post_id) {
            return Err(missing("post"));
        }
        if !tables.has_user(self.author_id) {
            return Err(missing("author"));
        }
        Ok(())
    }
}

impl Record for Follow {
    fn id(&self) -> Uuid {
        self.id
    }

    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.follows
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.follows
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.has_user(self.user_id) || !tables.has_user(self.author_id) {
            return Err(missing("user"));
        }
        if tables.follows.iter().any(|f| {
            f.id != self.id && f.user_id == self.user_id && f.author_id == self.author_id
        }) {
            return Err(RepoError::Constraint("already following".to_string()));
        }
        Ok(())
    }
}

/// Shared in-memory tables. Cloning shares the data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositories backed by this store.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(InMemoryUserRepository::new(self.clone())),
            groups: Arc::new(InMemoryGroupRepository::new(self.clone())),
            posts: Arc::new(InMemoryPostRepository::new(self.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(self.clone())),
            follows: Arc::new(InMemoryFollowRepository::new(self.clone())),
        }
    }
}

/// Generic in-memory repository over one table.
pub struct InMemoryRepository<R> {
    store: InMemoryStore,
    _record: PhantomData<R>,
}

impl<R> InMemoryRepository<R> {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryGroupRepository = InMemoryRepository<Group>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;
pub type InMemoryFollowRepository = InMemoryRepository<Follow>;

#[async_trait]
impl<R: Record> BaseRepository<R, Uuid> for InMemoryRepository<R> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<R>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(R::rows(&tables).iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, entity: R) -> Result<R, RepoError> {
        let mut tables = self.store.tables.write().await;
        if R::rows(&tables).iter().any(|r| r.id() == entity.id()) {
            return Err(RepoError::Constraint(format!("id {} exists", entity.id())));
        }
        entity.check(&tables)?;

        R::rows_mut(&mut tables).push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: R) -> Result<R, RepoError> {
        let mut tables = self.store.tables.write().await;
        entity.check(&tables)?;

        let slot = R::rows_mut(&mut tables)
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        let rows = R::rows_mut(&mut tables);
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }

        R::cascade(id, &mut tables);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .groups
            .iter()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut groups = tables.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, page: &PageRequest) -> Result<Page<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(Page::from_ordered(page, tables.posts_newest_first(|_| true)))
    }

    async fn list_by_group(
        &self,
        group_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let posts = tables.posts_newest_first(|p| p.group_id == Some(group_id));
        Ok(Page::from_ordered(page, posts))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let posts = tables.posts_newest_first(|p| p.author_id == author_id);
        Ok(Page::from_ordered(page, posts))
    }

    async fn list_feed(
        &self,
        follower_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let followed: Vec<Uuid> = tables
            .follows
            .iter()
            .filter(|f| f.user_id == follower_id)
            .map(|f| f.author_id)
            .collect();

        let posts = tables.posts_newest_first(|p| followed.contains(&p.author_id));
        Ok(Page::from_ordered(page, posts))
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .count() as u64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| Reverse(c.created));
        Ok(comments)
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn find_pair(&self, user_id: Uuid, author_id: Uuid) -> Result<Option<Follow>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .find(|f| f.user_id == user_id && f.author_id == author_id)
            .cloned())
    }

    async fn delete_pair(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.store.tables.write().await;
        let before = tables.follows.len();
        tables
            .follows
            .retain(|f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(tables.follows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use yatube_core::DomainError;
    use yatube_core::forms::{CommentForm, INVALID_CHOICE, INVALID_IMAGE, ImageUpload, PostForm};
    use yatube_core::services::{CommentService, FollowService, PostService};

    use super::*;
    use crate::media::InMemoryMediaStorage;

    const SMALL_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";

    struct Fixture {
        repos: Repositories,
        media: Arc<InMemoryMediaStorage>,
        posts: PostService,
        comments: CommentService,
        follows: FollowService,
    }

    fn fixture() -> Fixture {
        let repos = InMemoryStore::new().repositories();
        let media = Arc::new(InMemoryMediaStorage::new());
        Fixture {
            posts: PostService::new(repos.clone(), media.clone()),
            comments: CommentService::new(repos.clone()),
            follows: FollowService::new(repos.clone()),
            repos,
            media,
        }
    }

    async fn user(repos: &Repositories, name: &str) -> User {
        repos
            .users
            .insert(User::new(
                name.to_string(),
                format!("{name}@example.com"),
                "hash".to_string(),
            ))
            .await
            .unwrap()
    }

    async fn group(repos: &Repositories, slug: &str) -> Group {
        repos
            .groups
            .insert(Group::new(format!("Group {slug}"), slug, "About").unwrap())
            .await
            .unwrap()
    }

    /// Insert posts with strictly increasing dates; the last one is newest.
    async fn posts(repos: &Repositories, author: &User, group: Option<&Group>, n: usize) {
        let start = Utc::now() - Duration::minutes(n as i64);
        for i in 0..n {
            let mut post = Post::new(
                author.id,
                format!("Post number {i}"),
                group.map(|g| g.id),
                None,
            );
            post.pub_date = start + Duration::seconds(i as i64);
            repos.posts.insert(post).await.unwrap();
        }
    }

    fn text_form(text: &str) -> PostForm {
        PostForm {
            text: text.to_string(),
            ..PostForm::default()
        }
    }

    #[tokio::test]
    async fn test_username_and_slug_are_unique() {
        let f = fixture();
        user(&f.repos, "leo").await;
        group(&f.repos, "cats").await;

        let dup = User::new("leo".into(), "other@example.com".into(), "h".into());
        assert!(matches!(
            f.repos.users.insert(dup).await,
            Err(RepoError::Constraint(_))
        ));

        let dup = Group::new("Other", "cats", "").unwrap();
        assert!(matches!(
            f.repos.groups.insert(dup).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let f = fixture();
        let post = Post::new(Uuid::new_v4(), "orphan".into(), None, None);
        assert!(matches!(
            f.repos.posts.insert(post).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_index_pages_newest_first() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        posts(&f.repos, &author, None, 13).await;

        let first = f.posts.index(&PageRequest::default()).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first.items[0].post.text, "Post number 12");
        assert_eq!(first.items[0].author.username, "leo");

        let second = f.posts.index(&PageRequest::number(2)).await.unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(second.items[2].post.text, "Post number 0");
    }

    #[tokio::test]
    async fn test_group_listing_only_has_group_posts() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let cats = group(&f.repos, "cats").await;
        let dogs = group(&f.repos, "dogs").await;
        posts(&f.repos, &author, Some(&cats), 2).await;
        posts(&f.repos, &author, Some(&dogs), 1).await;

        let listing = f
            .posts
            .group_posts("cats", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(listing.group.slug, "cats");
        assert_eq!(listing.page.total, 2);
        assert!(
            listing
                .page
                .items
                .iter()
                .all(|e| e.group.as_ref().map(|g| g.id) == Some(cats.id))
        );

        let missing = f.posts.group_posts("nope", &PageRequest::default()).await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_profile_counts_and_following_flag() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let reader = user(&f.repos, "ann").await;
        posts(&f.repos, &author, None, 3).await;

        let anonymous = f
            .posts
            .profile("leo", None, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(anonymous.post_count, 3);
        assert!(!anonymous.following);

        f.follows.follow(reader.id, "leo").await.unwrap();
        let listing = f
            .posts
            .profile("leo", Some(reader.id), &PageRequest::default())
            .await
            .unwrap();
        assert!(listing.following);
    }

    #[tokio::test]
    async fn test_create_with_group_and_image() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let cats = group(&f.repos, "cats").await;

        let form = PostForm {
            text: "With picture".into(),
            group: Some(cats.id.to_string()),
            image: Some(ImageUpload {
                file_name: "small.gif".into(),
                content_type: Some("image/gif".into()),
                bytes: SMALL_GIF.to_vec(),
            }),
        };
        let post = f.posts.create(author.id, form).await.unwrap();

        assert_eq!(post.group_id, Some(cats.id));
        assert_eq!(post.image.as_deref(), Some("posts/small.gif"));
        assert!(f.media.read("posts/small.gif").await.is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_group_and_bad_image() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;

        let form = PostForm {
            text: "Text".into(),
            group: Some(Uuid::new_v4().to_string()),
            image: None,
        };
        match f.posts.create(author.id, form).await {
            Err(DomainError::InvalidForm(errors)) => {
                assert_eq!(errors.get("group"), [INVALID_CHOICE])
            }
            other => panic!("expected invalid form, got {other:?}"),
        }

        let form = PostForm {
            text: "Text".into(),
            group: None,
            image: Some(ImageUpload {
                file_name: "notes.txt".into(),
                content_type: Some("image/gif".into()),
                bytes: b"plain text".to_vec(),
            }),
        };
        match f.posts.create(author.id, form).await {
            Err(DomainError::InvalidForm(errors)) => {
                assert_eq!(errors.get("image"), [INVALID_IMAGE])
            }
            other => panic!("expected invalid form, got {other:?}"),
        }

        assert_eq!(f.repos.posts.count_by_author(author.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_author_may_edit() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let stranger = user(&f.repos, "ann").await;
        let post = f
            .posts
            .create(author.id, text_form("Original"))
            .await
            .unwrap();

        let denied = f.posts.edit(stranger.id, post.id, text_form("Hijack")).await;
        assert!(matches!(denied, Err(DomainError::Forbidden)));

        let edited = f
            .posts
            .edit(author.id, post.id, text_form("Edited"))
            .await
            .unwrap();
        assert_eq!(edited.text, "Edited");
        assert_eq!(edited.id, post.id);
        assert_eq!(f.repos.posts.count_by_author(author.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_edit_keeps_image_without_new_upload() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let form = PostForm {
            text: "Picture".into(),
            group: None,
            image: Some(ImageUpload {
                file_name: "small.gif".into(),
                content_type: None,
                bytes: SMALL_GIF.to_vec(),
            }),
        };
        let post = f.posts.create(author.id, form).await.unwrap();

        let edited = f
            .posts
            .edit(author.id, post.id, text_form("New text"))
            .await
            .unwrap();
        assert_eq!(edited.image, post.image);
    }

    #[tokio::test]
    async fn test_comments_newest_first_on_detail() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let reader = user(&f.repos, "ann").await;
        let post = f.posts.create(author.id, text_form("Post")).await.unwrap();

        for text in ["first", "second"] {
            f.comments
                .add(
                    reader.id,
                    post.id,
                    CommentForm {
                        text: text.to_string(),
                    },
                )
                .await
                .unwrap();
        }

        let detail = f.posts.detail(post.id).await.unwrap();
        assert_eq!(detail.author_post_count, 1);
        assert_eq!(detail.comments.len(), 2);
        assert_eq!(detail.comments[0].comment.text, "second");
        assert_eq!(detail.comments[0].author.username, "ann");

        let empty = f
            .comments
            .add(reader.id, post.id, CommentForm::default())
            .await;
        assert!(matches!(empty, Err(DomainError::InvalidForm(_))));
    }

    #[tokio::test]
    async fn test_follow_is_idempotent_and_feeds_posts() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let reader = user(&f.repos, "ann").await;
        let bystander = user(&f.repos, "bob").await;

        f.follows.follow(reader.id, "leo").await.unwrap();
        f.follows.follow(reader.id, "leo").await.unwrap();
        assert!(
            f.repos
                .follows
                .find_pair(reader.id, author.id)
                .await
                .unwrap()
                .is_some()
        );

        f.posts
            .create(author.id, text_form("Fresh post"))
            .await
            .unwrap();

        let feed = f
            .follows
            .feed(reader.id, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.items[0].post.text, "Fresh post");

        let other = f
            .follows
            .feed(bystander.id, &PageRequest::default())
            .await
            .unwrap();
        assert!(other.is_empty());

        f.follows.unfollow(reader.id, "leo").await.unwrap();
        let feed = f
            .follows
            .feed(reader.id, &PageRequest::default())
            .await
            .unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_follow_unknown_author_is_not_found() {
        let f = fixture();
        let reader = user(&f.repos, "ann").await;
        let result = f.follows.follow(reader.id, "ghost").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let reader = user(&f.repos, "ann").await;
        let post = f.posts.create(author.id, text_form("Post")).await.unwrap();
        f.comments
            .add(reader.id, post.id, CommentForm { text: "hi".into() })
            .await
            .unwrap();
        f.follows.follow(reader.id, "leo").await.unwrap();

        f.repos.users.delete(author.id).await.unwrap();

        assert!(f.repos.posts.find_by_id(post.id).await.unwrap().is_none());
        assert!(f.repos.comments.list_for_post(post.id).await.unwrap().is_empty());
        assert!(
            f.repos
                .follows
                .find_pair(reader.id, author.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_deleting_group_keeps_posts() {
        let f = fixture();
        let author = user(&f.repos, "leo").await;
        let cats = group(&f.repos, "cats").await;
        posts(&f.repos, &author, Some(&cats), 1).await;

        f.repos.groups.delete(cats.id).await.unwrap();

        let page = f.repos.posts.list(&PageRequest::default()).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.items[0].group_id, None);
    }
}
