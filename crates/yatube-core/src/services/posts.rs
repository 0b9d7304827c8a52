use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Group, Post, User};
use crate::error::DomainError;
use crate::forms::{INVALID_CHOICE, PostForm};
use crate::pagination::{Page, PageRequest};
use crate::ports::{MediaStorage, Repositories};

/// Media directory for post images.
pub const POST_IMAGE_DIR: &str = "posts";

/// A post together with the rows it is displayed with.
#[derive(Debug, Clone)]
pub struct PostEntry {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

#[derive(Debug, Clone)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author: User,
}

#[derive(Debug, Clone)]
pub struct GroupListing {
    pub group: Group,
    pub page: Page<PostEntry>,
}

#[derive(Debug, Clone)]
pub struct ProfileListing {
    pub author: User,
    pub post_count: u64,
    /// Whether the viewer follows this author. Always false for anonymous viewers.
    pub following: bool,
    pub page: Page<PostEntry>,
}

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub entry: PostEntry,
    pub author_post_count: u64,
    pub comments: Vec<CommentEntry>,
}

/// Post listings and authoring.
#[derive(Clone)]
pub struct PostService {
    repos: Repositories,
    media: Arc<dyn MediaStorage>,
}

impl PostService {
    pub fn new(repos: Repositories, media: Arc<dyn MediaStorage>) -> Self {
        Self { repos, media }
    }

    /// Every post, newest first.
    pub async fn index(&self, page: &PageRequest) -> Result<Page<PostEntry>, DomainError> {
        let posts = self.repos.posts.list(page).await?;
        hydrate(&self.repos, posts).await
    }

    pub async fn group_posts(
        &self,
        slug: &str,
        page: &PageRequest,
    ) -> Result<GroupListing, DomainError> {
        let group = self
            .repos
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let posts = self.repos.posts.list_by_group(group.id, page).await?;
        Ok(GroupListing {
            group,
            page: hydrate(&self.repos, posts).await?,
        })
    }

    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<ProfileListing, DomainError> {
        let author = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let following = match viewer {
            Some(viewer) => self
                .repos
                .follows
                .find_pair(viewer, author.id)
                .await?
                .is_some(),
            None => false,
        };

        let posts = self.repos.posts.list_by_author(author.id, page).await?;
        Ok(ProfileListing {
            post_count: posts.total,
            following,
            page: hydrate(&self.repos, posts).await?,
            author,
        })
    }

    pub async fn detail(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.find(post_id).await?;
        let author_post_count = self.repos.posts.count_by_author(post.author_id).await?;

        let comments = self.repos.comments.list_for_post(post.id).await?;
        let author_ids: Vec<Uuid> = unique(comments.iter().map(|c| c.author_id));
        let authors: HashMap<Uuid, User> = self
            .repos
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let comments = comments
            .into_iter()
            .filter_map(|comment| {
                let author = authors.get(&comment.author_id)?.clone();
                Some(CommentEntry { comment, author })
            })
            .collect();

        let entry = hydrate_one(&self.repos, post).await?;
        Ok(PostDetail {
            entry,
            author_post_count,
            comments,
        })
    }

    /// Groups a post may be filed under, for form choices.
    pub async fn groups(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.repos.groups.list_all().await?)
    }

    pub async fn create(&self, author_id: Uuid, form: PostForm) -> Result<Post, DomainError> {
        let (text, group_id, image) = self.clean(form).await?;

        let post = Post::new(author_id, text, group_id, image);
        let post = self.repos.posts.insert(post).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// The post, if `editor_id` may edit it.
    ///
    /// `NotFound` for unknown posts, `Forbidden` when the editor is not the author.
    pub async fn editable(&self, editor_id: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self.find(post_id).await?;
        if !post.is_authored_by(editor_id) {
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    /// Replace text and group; keep the existing image unless a new one is uploaded.
    pub async fn edit(
        &self,
        editor_id: Uuid,
        post_id: Uuid,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        let mut post = self.editable(editor_id, post_id).await?;
        let (text, group_id, image) = self.clean(form).await?;

        post.text = text;
        post.group_id = group_id;
        if image.is_some() {
            post.image = image;
        }

        let post = self.repos.posts.update(post).await?;
        tracing::info!(post_id = %post.id, "Post edited");
        Ok(post)
    }

    async fn find(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Validate the form completely, then store the image.
    async fn clean(
        &self,
        form: PostForm,
    ) -> Result<(String, Option<Uuid>, Option<String>), DomainError> {
        let (cleaned, mut errors) = form.clean();

        if let Some(group_id) = cleaned.as_ref().and_then(|c| c.group_id) {
            if self.repos.groups.find_by_id(group_id).await?.is_none() {
                errors.add("group", INVALID_CHOICE);
            }
        }

        let cleaned = match cleaned {
            Some(cleaned) if errors.is_empty() => cleaned,
            _ => return Err(DomainError::InvalidForm(errors)),
        };

        let image = match cleaned.image {
            Some((upload, format)) => {
                let name = upload.storage_name(format);
                let path = self
                    .media
                    .save(POST_IMAGE_DIR, &name, &upload.bytes)
                    .await
                    .map_err(|e| DomainError::Storage(e.to_string()))?;
                Some(path)
            }
            None => None,
        };

        Ok((cleaned.text, cleaned.group_id, image))
    }
}

/// Attach authors and groups to a page of posts with one lookup each.
pub(crate) async fn hydrate(
    repos: &Repositories,
    page: Page<Post>,
) -> Result<Page<PostEntry>, DomainError> {
    let author_ids = unique(page.items.iter().map(|p| p.author_id));
    let group_ids = unique(page.items.iter().filter_map(|p| p.group_id));

    let authors: HashMap<Uuid, User> = repos
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let groups: HashMap<Uuid, Group> = if group_ids.is_empty() {
        HashMap::new()
    } else {
        repos
            .groups
            .find_by_ids(&group_ids)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect()
    };

    let window = page.window();
    let entries = page
        .items
        .into_iter()
        .filter_map(|post| {
            let Some(author) = authors.get(&post.author_id).cloned() else {
                tracing::warn!(post_id = %post.id, "Post author is missing, skipping");
                return None;
            };
            let group = post.group_id.and_then(|id| groups.get(&id).cloned());
            Some(PostEntry {
                post,
                author,
                group,
            })
        })
        .collect();

    Ok(Page::new(window, entries))
}

async fn hydrate_one(repos: &Repositories, post: Post) -> Result<PostEntry, DomainError> {
    let author = repos
        .users
        .find_by_id(post.author_id)
        .await?
        .ok_or_else(|| DomainError::Internal(format!("post {} has no author", post.id)))?;

    let group = match post.group_id {
        Some(group_id) => repos.groups.find_by_id(group_id).await?,
        None => None,
    };

    Ok(PostEntry {
        post,
        author,
        group,
    })
}

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
