use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::{Deserialize, Serialize};

use crate::database::SupplyRepository;
use crate::error::{ServiceError, ServiceResult};
use crate::models::Supply;
use crate::request_state::{LoggedAccount, RecordId};
use crate::web::utils::{found, parse_date, EmptyToNone, Page, Search};
use crate::web::AppState;

/// Raw supply form fields, echoed back unchanged when a submission is rejected.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSupply {
    pub nombre: String,
    pub cantidad: String,
    pub ultima_info: String,
    pub fecha: String,
}

impl From<&Supply> for FormSupply {
    fn from(supply: &Supply) -> Self {
        FormSupply {
            nombre: supply.name.clone(),
            cantidad: supply.quantity.clone(),
            ultima_info: supply.last_update.clone().unwrap_or_default(),
            fecha: supply
                .date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

impl FormSupply {
    /// Copy the submitted values onto `supply`.
    fn apply_to(&self, supply: &mut Supply) -> ServiceResult<()> {
        supply.name = self.nombre.clone();
        supply.quantity = self.cantidad.clone();
        supply.last_update = self.ultima_info.empty_to_none();
        supply.date = parse_date(&self.fecha)?;
        Ok(())
    }
}

fn error_message(error: &ServiceError) -> String {
    match error {
        ServiceError::Validation(message) => format!("Validation error: {message}"),
        other => format!("Error: {other}"),
    }
}

fn supply_form(
    state: &AppState,
    logged_account: &LoggedAccount,
    title: &str,
    form: &FormSupply,
    error: Option<&ServiceError>,
) -> ServiceResult<Html<String>> {
    let mut page = Page::new("supply_form")
        .with_account(logged_account)
        .with_data("title", &title)
        .with_data("form", form);
    if let Some(error) = error {
        page = page.with_data("error", &error_message(error));
    }
    page.render(state)
}

/// GET route for `/inventario/`
pub async fn get_supplies(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
    Query(search): Query<Search>,
) -> ServiceResult<Html<String>> {
    let supplies = match search.term() {
        Some(term) => state.db.search_supplies(term).await?,
        None => state.db.get_all_supplies().await?,
    };

    Page::new("inventory")
        .with_account(&logged_account)
        .with_data("supplies", &supplies)
        .with_data("search", &search.term())
        .render(&state)
}

/// GET route for `/inventario/nuevo/`
pub async fn get_supply_create(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
) -> ServiceResult<Html<String>> {
    supply_form(
        &state,
        &logged_account,
        "New supply",
        &FormSupply::default(),
        None,
    )
}

/// POST route for `/inventario/nuevo/`
///
/// Fields are inserted as submitted, only [`Supply::validate`] on edit checks them.
pub async fn post_supply_create(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
    Form(form): Form<FormSupply>,
) -> ServiceResult<Response> {
    let mut supply = Supply {
        id: 0,
        name: String::new(),
        quantity: String::new(),
        last_update: None,
        date: None,
    };

    let stored = match form.apply_to(&mut supply) {
        Ok(()) => state.db.store_supply(supply).await,
        Err(e) => Err(e),
    };

    match stored {
        Ok(supply) => {
            log::info!("Created supply {} '{}'", supply.id, supply.name);
            Ok(found("/inventario/"))
        }
        Err(e) => {
            log::warn!("Rejected new supply: {}", e);
            Ok(supply_form(&state, &logged_account, "New supply", &form, Some(&e))?.into_response())
        }
    }
}

/// GET route for `/inventario/editar/{id}/`
pub async fn get_supply_edit(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
    RecordId(id): RecordId,
) -> ServiceResult<Html<String>> {
    let supply = state
        .db
        .get_supply_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    supply_form(
        &state,
        &logged_account,
        "Edit supply",
        &FormSupply::from(&supply),
        None,
    )
}

/// POST route for `/inventario/editar/{id}/`
pub async fn post_supply_edit(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
    RecordId(id): RecordId,
    Form(form): Form<FormSupply>,
) -> ServiceResult<Response> {
    let mut supply = state
        .db
        .get_supply_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let stored = match form.apply_to(&mut supply).and_then(|_| supply.validate()) {
        Ok(()) => state.db.store_supply(supply).await,
        Err(e) => Err(e),
    };

    match stored {
        Ok(supply) => {
            log::info!("Updated supply {} '{}'", supply.id, supply.name);
            Ok(found("/inventario/"))
        }
        // the record may have vanished in between
        Err(ServiceError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::warn!("Rejected update of supply {}: {}", id, e);
            Ok(supply_form(&state, &logged_account, "Edit supply", &form, Some(&e))?.into_response())
        }
    }
}

/// GET route for `/inventario/eliminar/{id}/`
pub async fn get_supply_delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ServiceResult<Response> {
    let supply = state
        .db
        .get_supply_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    state.db.delete_supply(supply.id).await?;
    log::info!("Deleted supply {} '{}'", supply.id, supply.name);

    Ok(found("/inventario/"))
}
