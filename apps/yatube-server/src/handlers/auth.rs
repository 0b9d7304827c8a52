//! Account handlers: signup, login and logout.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use yatube_core::domain::User;
use yatube_core::error::RepoError;
use yatube_core::forms::{FormErrors, NON_FIELD_ERRORS, SignupForm};
use yatube_shared::dto::{LoggedOutPage, LoginPage, SignupPage};

use super::views;
use crate::middleware::auth::{cleared_session_cookie, is_local_path, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const USERNAME_TAKEN: &str = "A user with that username already exists.";
const BAD_CREDENTIALS: &str = "Please enter a correct username and password. \
     Note that both fields may be case-sensitive.";

#[derive(Debug, Default, Deserialize)]
pub struct SignupData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// GET /auth/signup/
pub async fn signup_form() -> HttpResponse {
    HttpResponse::Ok().json(SignupPage {
        form: views::signup_form(None, None, Default::default()),
    })
}

/// POST /auth/signup/ - creates the account and logs it in.
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Form<SignupData>,
) -> AppResult<HttpResponse> {
    let data = body.into_inner();
    let form = SignupForm {
        username: data.username.trim().to_string(),
        email: data.email.trim().to_string(),
        password1: data.password1,
        password2: data.password2,
    };

    let mut errors = form.clean();
    if !errors.has("username")
        && state
            .users
            .find_by_username(&form.username)
            .await?
            .is_some()
    {
        errors.add("username", USERNAME_TAKEN);
    }
    if !errors.is_empty() {
        return Ok(signup_page(form, errors));
    }

    let password_hash = state
        .passwords
        .hash(&form.password1)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::new(form.username.clone(), form.email.clone(), password_hash);
    let user = match state.users.insert(user).await {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            return Ok(signup_page(
                form,
                FormErrors::new().with("username", USERNAME_TAKEN),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
    logged_in(&state, &user, "/")
}

fn signup_page(form: SignupForm, errors: FormErrors) -> HttpResponse {
    HttpResponse::Ok().json(SignupPage {
        form: views::signup_form(Some(form.username), Some(form.email), errors.into_inner()),
    })
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    HttpResponse::Ok().json(LoginPage {
        form: views::login_form(None, Default::default()),
        next: query.into_inner().next,
    })
}

/// POST /auth/login/ - sets the session cookie and follows `next` when it is local.
pub async fn login(
    state: web::Data<AppState>,
    query: web::Query<NextQuery>,
    body: web::Form<LoginData>,
) -> AppResult<HttpResponse> {
    let data = body.into_inner();
    let next = data.next.or(query.into_inner().next);

    let user = state.users.find_by_username(data.username.trim()).await?;
    let verified = match &user {
        Some(user) => state
            .passwords
            .verify(&data.password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?,
        None => false,
    };

    match user {
        Some(user) if verified => {
            tracing::info!(user_id = %user.id, "User logged in");
            let target = next
                .as_deref()
                .filter(|next| is_local_path(next))
                .unwrap_or("/");
            logged_in(&state, &user, target)
        }
        _ => {
            tracing::debug!(username = %data.username, "Login refused");
            let errors = FormErrors::new().with(NON_FIELD_ERRORS, BAD_CREDENTIALS);
            Ok(HttpResponse::Ok().json(LoginPage {
                form: views::login_form(Some(data.username), errors.into_inner()),
                next,
            }))
        }
    }
}

/// GET|POST /auth/logout/
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cleared_session_cookie())
        .json(LoggedOutPage { logged_out: true })
}

fn logged_in(state: &AppState, user: &User, target: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Found()
        .cookie(session_cookie(token, state.tokens.expiration_seconds()))
        .insert_header((actix_web::http::header::LOCATION, target))
        .finish())
}
