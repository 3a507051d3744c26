use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};

/// Upper bound for menu prices.
pub const MAX_PRODUCT_PRICE: i64 = 1_000_000;

/// Image shown for products created without an image url.
pub const PRODUCT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    /// Stored and compared in cleartext.
    pub password: String,
    pub image_url: Option<String>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub in_stock: bool,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Supply {
    pub id: u64,
    pub name: String,
    /// Free form amount, e.g. "15 KG"
    pub quantity: String,
    pub last_update: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub photo_url: Option<String>,
    pub role: String,
    pub age: i32,
    pub phone: String,
    pub active: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Session {
    pub token: String,
    pub account_id: u64,
    pub account_username: String,
    pub valid_until: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.valid_until < Utc::now()
    }
}

const SUPPLY_NAME_MAX_LENGTH: usize = 100;
const SUPPLY_QUANTITY_MAX_LENGTH: usize = 50;
const SUPPLY_LAST_UPDATE_MAX_LENGTH: usize = 100;

impl Supply {
    /// Check all field constraints of a supply before it is written.
    pub fn validate(&self) -> ServiceResult<()> {
        let mut problems = Vec::<String>::new();

        check_text(&mut problems, "name", &self.name, SUPPLY_NAME_MAX_LENGTH, true);
        check_text(
            &mut problems,
            "quantity",
            &self.quantity,
            SUPPLY_QUANTITY_MAX_LENGTH,
            true,
        );
        if let Some(last_update) = &self.last_update {
            check_text(
                &mut problems,
                "last update",
                last_update,
                SUPPLY_LAST_UPDATE_MAX_LENGTH,
                false,
            );
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(problems.join("; ")))
        }
    }
}

fn check_text(problems: &mut Vec<String>, field: &str, value: &str, max: usize, required: bool) {
    if required && value.trim().is_empty() {
        problems.push(format!("{field}: this field cannot be blank"));
    }
    let length = value.chars().count();
    if length > max {
        problems.push(format!(
            "{field}: ensure this value has at most {max} characters (it has {length})"
        ));
    }
}
