//! Comment submission.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use yatube_core::DomainError;
use yatube_core::forms::CommentForm;

use super::{post_url, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CommentFormData {
    #[serde(default)]
    pub text: String,
}

/// POST /posts/{post_id}/comment/ - back to the post whether or not the text was usable.
pub async fn add(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let form = CommentForm {
        text: form.into_inner().text,
    };

    match state.comments.add(identity.user_id, post_id, form).await {
        Ok(_) => {}
        Err(DomainError::InvalidForm(errors)) => {
            tracing::debug!(post_id = %post_id, errors = %errors, "Empty comment ignored");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(redirect(&post_url(post_id)))
}
