use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use headers::Cookie;
use serde::{Deserialize, Serialize};

use crate::database::{AccountRepository, SessionStore};
use crate::env;
use crate::error::{ServiceError, ServiceResult};
use crate::models::Account;
use crate::request_state::{
    expired_session_cookie, session_cookie, session_token, LOGIN_PAGE,
};
use crate::web::utils::{found, EmptyToNone, Page};
use crate::web::AppState;

const UNKNOWN_USER: &str = "The user does not exist";
const WRONG_PASSWORD: &str = "Incorrect password";
const USERNAME_TAKEN: &str = "The username already exists";
const PASSWORD_MISMATCH: &str = "The passwords do not match";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
    #[serde(alias = "imagen_url")]
    pub image_url: Option<String>,
}

fn login_error(state: &AppState, username: &str, error: &str) -> ServiceResult<Html<String>> {
    Page::new("login")
        .with_data("error", &error)
        .with_data("username", &username)
        .render(state)
}

/// GET route for `/login/`
pub async fn get_login(State(state): State<AppState>) -> ServiceResult<Html<String>> {
    Page::new("login").render(&state)
}

/// POST route for `/login/`
pub async fn post_login(
    State(state): State<AppState>,
    cookie: Option<TypedHeader<Cookie>>,
    Form(form): Form<LoginForm>,
) -> ServiceResult<Response> {
    let account = match state.db.get_account_by_username(&form.username).await? {
        Some(account) => account,
        None => {
            log::warn!("Login with unknown username '{}'", form.username);
            return Ok(login_error(&state, &form.username, UNKNOWN_USER)?.into_response());
        }
    };

    if account.password != form.password {
        log::warn!("Login with wrong password for '{}'", account.username);
        return Ok(login_error(&state, &form.username, WRONG_PASSWORD)?.into_response());
    }

    // a new login replaces whatever session the browser had before
    if let Some(previous) = session_token(&cookie) {
        state.db.delete_session(&previous).await?;
    }

    let valid_until = Utc::now() + Duration::minutes(*env::SESSION_VALIDITY_MINUTES);
    let session = state.db.create_session(&account, valid_until).await?;
    log::info!("Account '{}' logged in", account.username);

    Ok((
        [(header::SET_COOKIE, session_cookie(&session.token))],
        found("/dashboard/"),
    )
        .into_response())
}

/// GET route for `/logout/`
pub async fn get_logout(
    State(state): State<AppState>,
    cookie: Option<TypedHeader<Cookie>>,
) -> ServiceResult<Response> {
    if let Some(token) = session_token(&cookie) {
        state.db.delete_session(&token).await?;
    }

    Ok((
        [(header::SET_COOKIE, expired_session_cookie())],
        found("/"),
    )
        .into_response())
}

/// GET route for `/formulario/`
pub async fn get_register(State(state): State<AppState>) -> ServiceResult<Html<String>> {
    Page::new("register").render(&state)
}

/// POST route for `/formulario/`
pub async fn post_register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> ServiceResult<Response> {
    let register_error = |error: &str| -> ServiceResult<Response> {
        Ok(Page::new("register")
            .with_data("error", &error)
            .with_data("form", &form)
            .render(&state)?
            .into_response())
    };

    if state
        .db
        .get_account_by_username(&form.username)
        .await?
        .is_some()
    {
        return register_error(USERNAME_TAKEN);
    }

    if form.password1 != form.password2 {
        return register_error(PASSWORD_MISMATCH);
    }

    let account = Account {
        id: 0,
        username: form.username.clone(),
        password: form.password2.clone(),
        image_url: form.image_url.empty_to_none(),
    };

    match state.db.store_account(account).await {
        Ok(account) => {
            log::info!("Registered account '{}'", account.username);
            Ok(found(LOGIN_PAGE))
        }
        Err(ServiceError::Conflict(_)) => register_error(USERNAME_TAKEN),
        Err(e) => Err(e),
    }
}
