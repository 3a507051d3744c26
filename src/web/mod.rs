mod accounts;
mod employees;
mod index;
mod login;
mod products;
mod supplies;
pub mod utils;


use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use handlebars::Handlebars;

use crate::database::Storage;
use crate::error::ServiceResult;
use crate::request_state::require_login;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Storage>,
    pub templates: Arc<Handlebars<'static>>,
}

impl AppState {
    pub fn new(db: Arc<dyn Storage>) -> ServiceResult<AppState> {
        Ok(AppState {
            db,
            templates: Arc::new(load_templates()?),
        })
    }
}

macro_rules! template {
    ($name:literal) => {
        (
            $name,
            include_str!(concat!("../../templates/", $name, ".hbs")),
        )
    };
}

const PARTIALS: [(&str, &str); 2] = [template!("header"), template!("footer")];

const PAGES: [(&str, &str); 12] = [
    template!("welcome"),
    template!("login"),
    template!("register"),
    template!("dashboard"),
    template!("accounts"),
    template!("account_edit"),
    template!("menu"),
    template!("product_form"),
    template!("inventory"),
    template!("supply_form"),
    template!("employees"),
    template!("employee_form"),
];

/// Compile all page templates, they are embedded into the binary.
fn load_templates() -> ServiceResult<Handlebars<'static>> {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(false);

    for (name, source) in PARTIALS {
        hb.register_partial(name, source)?;
    }
    for (name, source) in PAGES {
        hb.register_template_string(name, source)?;
    }

    Ok(hb)
}

/// Setup all routes of the web ui
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard/", get(index::get_dashboard))
        // Setup account management related routes
        .route("/usuarios/", get(accounts::get_accounts))
        .route(
            "/actualizar/:id/",
            get(accounts::get_account_edit).post(accounts::post_account_edit),
        )
        .route("/eliminar/:id/", get(accounts::get_account_delete))
        // Setup menu related routes
        .route("/menu/", get(products::get_products))
        .route(
            "/menu/nuevo/",
            get(products::get_product_create).post(products::post_product_create),
        )
        .route(
            "/menu/editar/:id/",
            get(products::get_product_edit).post(products::post_product_edit),
        )
        .route("/menu/eliminar/:id/", get(products::get_product_delete))
        // Setup inventory related routes
        .route("/inventario/", get(supplies::get_supplies))
        .route(
            "/inventario/nuevo/",
            get(supplies::get_supply_create).post(supplies::post_supply_create),
        )
        .route(
            "/inventario/editar/:id/",
            get(supplies::get_supply_edit).post(supplies::post_supply_edit),
        )
        .route("/inventario/eliminar/:id/", get(supplies::get_supply_delete))
        // Setup employee related routes
        .route("/empleados/", get(employees::get_employees))
        .route(
            "/empleados/nuevo/",
            get(employees::get_employee_create).post(employees::post_employee_create),
        )
        .route(
            "/empleados/editar/:id/",
            get(employees::get_employee_edit).post(employees::post_employee_edit),
        )
        .route("/empleados/eliminar/:id/", get(employees::get_employee_delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route("/", get(index::get_welcome))
        .route("/home/", get(index::get_home))
        .route("/bye/", get(index::get_bye))
        .route("/login/", get(login::get_login).post(login::post_login))
        .route("/logout/", get(login::get_logout))
        .route(
            "/formulario/",
            get(login::get_register).post(login::post_register),
        )
        .merge(protected)
        .fallback(index::not_found)
        .with_state(state)
}
