use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;

use crate::database::AccountRepository;
use crate::error::{ServiceError, ServiceResult};
use crate::request_state::{LoggedAccount, RecordId};
use crate::web::utils::{found, EmptyToNone, Page};
use crate::web::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormAccount {
    pub username: String,
    pub password: String,
    #[serde(alias = "imagen_url")]
    pub image_url: Option<String>,
}

/// GET route for `/usuarios/`
pub async fn get_accounts(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
) -> ServiceResult<Html<String>> {
    let accounts = state.db.get_all_accounts().await?;

    Page::new("accounts")
        .with_account(&logged_account)
        .with_data("accounts", &accounts)
        .render(&state)
}

/// GET route for `/actualizar/{id}/`
pub async fn get_account_edit(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
    RecordId(id): RecordId,
) -> ServiceResult<Html<String>> {
    let account = state
        .db
        .get_account_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Page::new("account_edit")
        .with_account(&logged_account)
        .with_data("account", &account)
        .render(&state)
}

/// POST route for `/actualizar/{id}/`
///
/// Overwrites all fields, a changed username is not checked for uniqueness up front.
pub async fn post_account_edit(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Form(form): Form<FormAccount>,
) -> ServiceResult<Response> {
    let mut account = state
        .db
        .get_account_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    account.username = form.username;
    account.password = form.password;
    account.image_url = form.image_url.empty_to_none();

    let account = state.db.store_account(account).await?;
    log::info!("Updated account {} '{}'", account.id, account.username);

    Ok(found("/usuarios/"))
}

/// GET route for `/eliminar/{id}/`
pub async fn get_account_delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ServiceResult<Response> {
    let account = state
        .db
        .get_account_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    state.db.delete_account(account.id).await?;
    log::info!("Deleted account {} '{}'", account.id, account.username);

    Ok(found("/usuarios/"))
}
