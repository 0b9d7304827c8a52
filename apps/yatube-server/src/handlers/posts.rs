//! Post listings, detail and authoring.

use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use actix_web::{Either, HttpRequest, HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use yatube_core::DomainError;
use yatube_core::forms::{FormErrors, ImageUpload, PostForm};
use yatube_shared::dto::{GroupPage, IndexPage, PostDetailPage, PostFormPage, ProfilePage};

use super::views::{self, PostFormValues};
use super::{PageQuery, json_page, post_url, profile_url, redirect, to_body};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Cache key prefix of rendered index pages.
const INDEX_CACHE_PREFIX: &str = "index_page:";

/// Url-encoded post form.
#[derive(Debug, Default, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub text: String,
    pub group: Option<String>,
}

/// Multipart post form; the only way to attach an image.
#[derive(MultipartForm)]
pub struct PostUpload {
    pub text: Option<Text<String>>,
    pub group: Option<Text<String>>,
    pub image: Option<Bytes>,
}

type PostInput = Either<web::Form<PostFormData>, MultipartForm<PostUpload>>;

fn into_post_form(input: PostInput) -> PostForm {
    match input {
        Either::Left(form) => {
            let data = form.into_inner();
            PostForm {
                text: data.text,
                group: data.group,
                image: None,
            }
        }
        Either::Right(upload) => {
            let upload = upload.into_inner();
            PostForm {
                text: upload.text.map(Text::into_inner).unwrap_or_default(),
                group: upload.group.map(Text::into_inner),
                image: upload.image.map(|file| ImageUpload {
                    file_name: file.file_name.unwrap_or_default(),
                    content_type: file.content_type.map(|mime| mime.to_string()),
                    bytes: file.data.to_vec(),
                }),
            }
        }
    }
}

/// GET / - every post, newest first. Rendered pages are cached per URL.
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let key = format!("{}{}", INDEX_CACHE_PREFIX, req.uri());
    if let Some(body) = state.cache.get(&key).await {
        tracing::debug!(key = %key, "Index page served from cache");
        return Ok(json_page(body));
    }

    let page = state.posts.index(&query.request()).await?;
    let body = to_body(&IndexPage {
        page_obj: views::page(&page),
    })?;

    if let Err(e) = state
        .cache
        .set(&key, &body, Some(state.site.index_cache_ttl))
        .await
    {
        tracing::warn!(key = %key, error = %e, "Failed to cache index page");
    }

    Ok(json_page(body))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state.posts.group_posts(&path, &query.request()).await?;

    Ok(HttpResponse::Ok().json(GroupPage {
        group: views::group(&listing.group),
        page_obj: views::page(&listing.page),
    }))
}

/// GET /profile/{username}/
pub async fn profile(
    viewer: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let viewer_id = viewer.0.map(|identity| identity.user_id);
    let listing = state
        .posts
        .profile(&path, viewer_id, &query.request())
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePage {
        author: views::author(&listing.author),
        post_count: listing.post_count,
        following: listing.following,
        page_obj: views::page(&listing.page),
    }))
}

/// GET /posts/{post_id}/
pub async fn detail(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = state.posts.detail(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostDetailPage {
        post: views::post(&detail.entry),
        author_post_count: detail.author_post_count,
        comments: detail.comments.iter().map(views::comment).collect(),
        form: views::comment_form(),
    }))
}

/// GET /create/
pub async fn create_form(
    _identity: Identity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    form_page(&state, None, PostFormValues::default(), FormErrors::new()).await
}

/// POST /create/ - redirects to the author's profile.
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    input: PostInput,
) -> AppResult<HttpResponse> {
    let form = into_post_form(input);
    let values = submitted_values(&form);

    match state.posts.create(identity.user_id, form).await {
        Ok(_) => Ok(redirect(&profile_url(&identity.username))),
        Err(DomainError::InvalidForm(errors)) => form_page(&state, None, values, errors).await,
        Err(e) => Err(e.into()),
    }
}

/// GET /posts/{post_id}/edit/ - only the author sees the form.
pub async fn edit_form(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    match state.posts.editable(identity.user_id, post_id).await {
        Ok(post) => {
            form_page(
                &state,
                Some(post_id),
                PostFormValues::from(&post),
                FormErrors::new(),
            )
            .await
        }
        Err(DomainError::Forbidden) => Ok(redirect(&post_url(post_id))),
        Err(e) => Err(e.into()),
    }
}

/// POST /posts/{post_id}/edit/ - redirects to the post.
pub async fn edit(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: PostInput,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let form = into_post_form(input);
    let values = submitted_values(&form);

    match state.posts.edit(identity.user_id, post_id, form).await {
        Ok(post) => Ok(redirect(&post_url(post.id))),
        Err(DomainError::Forbidden) => {
            tracing::info!(
                post_id = %post_id,
                user_id = %identity.user_id,
                "Edit by non-author refused"
            );
            Ok(redirect(&post_url(post_id)))
        }
        Err(DomainError::InvalidForm(errors)) => {
            form_page(&state, Some(post_id), values, errors).await
        }
        Err(e) => Err(e.into()),
    }
}

fn submitted_values(form: &PostForm) -> PostFormValues {
    PostFormValues {
        text: Some(form.text.clone()),
        group: form.group.clone(),
        image: None,
    }
}

async fn form_page(
    state: &AppState,
    post_id: Option<Uuid>,
    values: PostFormValues,
    errors: FormErrors,
) -> AppResult<HttpResponse> {
    let groups = state.posts.groups().await?;

    Ok(HttpResponse::Ok().json(PostFormPage {
        form: views::post_form(&groups, values, errors),
        is_edit: post_id.is_some(),
        post_id: post_id.map(|id| id.to_string()),
    }))
}
