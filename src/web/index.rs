use axum::extract::State;
use axum::response::Html;
use serde::Serialize;

use crate::database::{EmployeeRepository, ProductRepository, SupplyRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::request_state::LoggedAccount;
use crate::web::utils::Page;
use crate::web::AppState;

#[derive(Debug, Serialize)]
struct Summary {
    products: usize,
    products_in_stock: usize,
    supplies: usize,
    employees: usize,
    active_employees: usize,
}

/// GET route for `/`
pub async fn get_welcome(State(state): State<AppState>) -> ServiceResult<Html<String>> {
    Page::new("welcome").render(&state)
}

/// GET route for `/home/`
pub async fn get_home() -> &'static str {
    "Hola mundo"
}

/// GET route for `/bye/`
pub async fn get_bye() -> &'static str {
    "Hasta luego"
}

/// GET route for `/dashboard/`
pub async fn get_dashboard(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
) -> ServiceResult<Html<String>> {
    let products = state.db.get_all_products().await?;
    let supplies = state.db.get_all_supplies().await?;
    let employees = state.db.get_all_employees().await?;

    let summary = Summary {
        products: products.len(),
        products_in_stock: products.iter().filter(|p| p.in_stock).count(),
        supplies: supplies.len(),
        employees: employees.len(),
        active_employees: employees.iter().filter(|e| e.active).count(),
    };

    Page::new("dashboard")
        .with_account(&logged_account)
        .with_data("summary", &summary)
        .render(&state)
}

pub async fn not_found() -> ServiceError {
    ServiceError::NotFound
}
