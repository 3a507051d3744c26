use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

/// Represent errors in the application
///
/// All `ServiceError`s can be transformed to http errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    InternalServerError(String),
    NotFound,
    BadRequest(String),
    Validation(String),
    Conflict(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::InternalServerError(cause) => write!(f, "Internal server error: {cause}"),
            ServiceError::NotFound => write!(f, "Not found"),
            ServiceError::BadRequest(cause) => write!(f, "Bad request: {cause}"),
            ServiceError::Validation(cause) => write!(f, "{cause}"),
            ServiceError::Conflict(cause) => write!(f, "{cause}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Helper for `ServiceError` result
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_error) = error {
            if db_error.is_unique_violation() {
                return ServiceError::Conflict(db_error.message().to_owned());
            }
        }
        ServiceError::InternalServerError(format!("Database error: {error}"))
    }
}

impl From<sqlx::migrate::MigrateError> for ServiceError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        ServiceError::InternalServerError(format!("Migration error: {error}"))
    }
}

impl From<handlebars::RenderError> for ServiceError {
    fn from(error: handlebars::RenderError) -> Self {
        ServiceError::InternalServerError(format!("Template error: {error}"))
    }
}

impl From<handlebars::TemplateError> for ServiceError {
    fn from(error: handlebars::TemplateError) -> Self {
        ServiceError::InternalServerError(format!("Template error: {error}"))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(error: std::io::Error) -> Self {
        ServiceError::InternalServerError(format!("IO error: {error}"))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ServiceError::InternalServerError(ref cause) => {
                log::error!("{}", cause);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::BadRequest(_) | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
        };

        let message = match self {
            // internals stay in the log
            ServiceError::InternalServerError(_) => "Internal server error".to_owned(),
            other => other.to_string(),
        };

        (
            status,
            Html(format!(
                "<!DOCTYPE html><html><head><title>{code}</title></head>\
                 <body><h1>{code}</h1><p>{message}</p></body></html>",
                code = status.as_u16(),
                message = handlebars::html_escape(&message),
            )),
        )
            .into_response()
    }
}
