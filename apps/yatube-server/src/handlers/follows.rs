//! Follow edges and the follow-feed.

use actix_web::{HttpResponse, web};

use yatube_shared::dto::FollowPage;

use super::{PageQuery, profile_url, redirect, views};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /follow/ - posts by every author the viewer follows.
pub async fn feed(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .follows
        .feed(identity.user_id, &query.request())
        .await?;

    Ok(HttpResponse::Ok().json(FollowPage {
        page_obj: views::page(&page),
    }))
}

/// GET /profile/{username}/follow/
pub async fn follow(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = state.follows.follow(identity.user_id, &path).await?;
    Ok(redirect(&profile_url(&author.username)))
}

/// GET /profile/{username}/unfollow/
pub async fn unfollow(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = state.follows.unfollow(identity.user_id, &path).await?;
    Ok(redirect(&profile_url(&author.username)))
}
