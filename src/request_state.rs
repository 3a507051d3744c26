use axum::extract::{FromRequestParts, Path, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use headers::Cookie;

use crate::database::SessionStore;
use crate::env;
use crate::error::ServiceError;
use crate::models::Session;
use crate::web::utils::found;
use crate::web::AppState;

pub const SESSION_COOKIE_NAME: &str = "session";

pub const LOGIN_PAGE: &str = "/login/";

/// The account behind the session of the current request.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedAccount {
    pub token: String,
    pub account_id: u64,
    pub username: String,
}

impl From<Session> for LoggedAccount {
    fn from(session: Session) -> Self {
        LoggedAccount {
            token: session.token,
            account_id: session.account_id,
            username: session.account_username,
        }
    }
}

/// `Set-Cookie` value that stores the session token in the browser.
pub fn session_cookie(token: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE_NAME,
        token,
        *env::SESSION_VALIDITY_MINUTES * 60
    );
    if *env::COOKIE_SECURE {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_session_cookie() -> String {
    format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        SESSION_COOKIE_NAME
    )
}

pub fn session_token(cookie: &Option<TypedHeader<Cookie>>) -> Option<String> {
    cookie
        .as_ref()
        .and_then(|TypedHeader(cookie)| cookie.get(SESSION_COOKIE_NAME))
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// Guard for every protected route.
///
/// Requests without a valid session are redirected to the login page before the handler runs.
pub async fn require_login(
    State(state): State<AppState>,
    cookie: Option<TypedHeader<Cookie>>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match session_token(&cookie) {
        Some(token) => match state.db.get_session_by_token(&token).await {
            Ok(session) => session,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    match session {
        Some(session) => {
            request
                .extensions_mut()
                .insert(LoggedAccount::from(session));
            next.run(request).await
        }
        None => {
            log::debug!("No active session for {}, redirect to login", request.uri());
            found(LOGIN_PAGE)
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for LoggedAccount
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<LoggedAccount>()
            .cloned()
            .ok_or_else(|| found(LOGIN_PAGE))
    }
}

/// Numeric record id from the url path. Anything else is answered with `404 Not Found`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordId(pub u64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ServiceError::NotFound)?;

        raw.parse::<u64>()
            .map(RecordId)
            .map_err(|_| ServiceError::NotFound)
    }
}
