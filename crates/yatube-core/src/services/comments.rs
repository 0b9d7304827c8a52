use uuid::Uuid;

use crate::domain::Comment;
use crate::error::DomainError;
use crate::forms::CommentForm;
use crate::ports::Repositories;

/// Comment submission.
#[derive(Clone)]
pub struct CommentService {
    repos: Repositories,
}

impl CommentService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Attach a comment by `author_id` to a post.
    ///
    /// `NotFound` for unknown posts, `InvalidForm` for empty text.
    pub async fn add(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        form: CommentForm,
    ) -> Result<Comment, DomainError> {
        let post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let text = form.clean()?;
        let comment = self
            .repos
            .comments
            .insert(Comment::new(post.id, author_id, text))
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post.id, "Comment added");
        Ok(comment)
    }
}
