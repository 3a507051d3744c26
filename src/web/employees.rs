use axum::extract::{Query, State};
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;

use crate::database::EmployeeRepository;
use crate::error::{ServiceError, ServiceResult};
use crate::models::Employee;
use crate::request_state::{LoggedAccount, RecordId};
use crate::web::utils::{found, is_checked, EmptyToNone, Page, Search};
use crate::web::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormEmployee {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "foto_url")]
    pub photo_url: Option<String>,
    #[serde(rename = "rol")]
    pub role: String,
    #[serde(rename = "edad")]
    pub age: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "estado")]
    pub active: Option<String>,
}

impl FormEmployee {
    fn parse_age(&self) -> ServiceResult<i32> {
        self.age
            .trim()
            .parse::<i32>()
            .map_err(|_| ServiceError::BadRequest(format!("'{}' is not a valid age", self.age)))
    }
}

/// GET route for `/empleados/`
pub async fn get_employees(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
    Query(search): Query<Search>,
) -> ServiceResult<Html<String>> {
    let employees = match search.term() {
        Some(term) => state.db.search_employees(term).await?,
        None => state.db.get_all_employees().await?,
    };

    Page::new("employees")
        .with_account(&logged_account)
        .with_data("employees", &employees)
        .with_data("search", &search.term())
        .render(&state)
}

/// GET route for `/empleados/nuevo/`
pub async fn get_employee_create(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
) -> ServiceResult<Html<String>> {
    Page::new("employee_form")
        .with_account(&logged_account)
        .with_data("title", &"New employee")
        .render(&state)
}

/// POST route for `/empleados/nuevo/`
///
/// New employees always start out active.
pub async fn post_employee_create(
    State(state): State<AppState>,
    Form(form): Form<FormEmployee>,
) -> ServiceResult<Response> {
    let employee = Employee {
        id: 0,
        age: form.parse_age()?,
        name: form.name,
        photo_url: form.photo_url.empty_to_none(),
        role: form.role,
        phone: form.phone,
        active: true,
    };

    let employee = state.db.store_employee(employee).await?;
    log::info!("Created employee {} '{}'", employee.id, employee.name);

    Ok(found("/empleados/"))
}

/// GET route for `/empleados/editar/{id}/`
pub async fn get_employee_edit(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
    RecordId(id): RecordId,
) -> ServiceResult<Html<String>> {
    let employee = state
        .db
        .get_employee_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Page::new("employee_form")
        .with_account(&logged_account)
        .with_data("title", &"Edit employee")
        .with_data("employee", &employee)
        .render(&state)
}

/// POST route for `/empleados/editar/{id}/`
pub async fn post_employee_edit(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Form(form): Form<FormEmployee>,
) -> ServiceResult<Response> {
    let mut employee = state
        .db
        .get_employee_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    employee.age = form.parse_age()?;
    employee.active = is_checked(&form.active);
    employee.name = form.name;
    employee.photo_url = form.photo_url.empty_to_none();
    employee.role = form.role;
    employee.phone = form.phone;

    let employee = state.db.store_employee(employee).await?;
    log::info!("Updated employee {} '{}'", employee.id, employee.name);

    Ok(found("/empleados/"))
}

/// GET route for `/empleados/eliminar/{id}/`
pub async fn get_employee_delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ServiceResult<Response> {
    let employee = state
        .db
        .get_employee_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    state.db.delete_employee(employee.id).await?;
    log::info!("Deleted employee {} '{}'", employee.id, employee.name);

    Ok(found("/empleados/"))
}
