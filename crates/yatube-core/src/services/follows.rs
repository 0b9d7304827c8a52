use uuid::Uuid;

use crate::domain::{Follow, User};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, PageRequest};
use crate::ports::Repositories;

use super::posts::{PostEntry, hydrate};

/// Follow edges and the follow-feed.
#[derive(Clone)]
pub struct FollowService {
    repos: Repositories,
}

impl FollowService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Follow `author_username`. Idempotent; self-follow is allowed.
    pub async fn follow(&self, user_id: Uuid, author_username: &str) -> Result<User, DomainError> {
        let author = self.author(author_username).await?;

        if self
            .repos
            .follows
            .find_pair(user_id, author.id)
            .await?
            .is_none()
        {
            match self.repos.follows.insert(Follow::new(user_id, author.id)).await {
                Ok(_) => {
                    tracing::info!(user_id = %user_id, author_id = %author.id, "Follow created");
                }
                // Lost a race against an identical request; the edge exists either way.
                Err(RepoError::Constraint(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(author)
    }

    /// Remove the edge to `author_username` if there is one.
    pub async fn unfollow(
        &self,
        user_id: Uuid,
        author_username: &str,
    ) -> Result<User, DomainError> {
        let author = self.author(author_username).await?;

        if self.repos.follows.delete_pair(user_id, author.id).await? {
            tracing::info!(user_id = %user_id, author_id = %author.id, "Follow removed");
        }

        Ok(author)
    }

    /// Posts by every author `user_id` follows, newest first.
    pub async fn feed(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<PostEntry>, DomainError> {
        let posts = self.repos.posts.list_feed(user_id, page).await?;
        hydrate(&self.repos, posts).await
    }

    async fn author(&self, username: &str) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }
}
