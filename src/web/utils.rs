use std::collections::HashMap;
use std::num::IntErrorKind;

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ServiceError, ServiceResult};
use crate::models::MAX_PRODUCT_PRICE;
use crate::request_state::LoggedAccount;

use super::AppState;

/// Helper to convert empty strings to `None` values
pub trait EmptyToNone<T> {
    fn empty_to_none(&self) -> Option<T>;
}

impl EmptyToNone<String> for Option<String> {
    fn empty_to_none(&self) -> Option<String> {
        match self {
            None => None,
            Some(s) => s.empty_to_none(),
        }
    }
}

impl EmptyToNone<String> for String {
    fn empty_to_none(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.clone())
        }
    }
}

/// Helper to deserialize search queries
#[derive(Debug, Default, Deserialize)]
pub struct Search {
    pub q: Option<String>,
}

impl Search {
    /// The search term, if one was given.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

/// Template context builder.
///
/// Carries the name of the logged in account (if any) next to the page specific data.
#[derive(Serialize)]
pub struct Page {
    #[serde(skip)]
    template: &'static str,
    current_user: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

impl Page {
    pub fn new(template: &'static str) -> Self {
        Page {
            template,
            current_user: None,
            extra: HashMap::new(),
        }
    }

    pub fn with_account(mut self, account: &LoggedAccount) -> Self {
        self.current_user = Some(account.username.clone());
        self
    }

    pub fn with_data<T>(mut self, key: &str, value: &T) -> Self
    where
        T: Serialize,
    {
        self.extra.insert(key.to_owned(), json!(value));
        self
    }

    pub fn render(self, state: &AppState) -> ServiceResult<Html<String>> {
        Ok(Html(state.templates.render(self.template, &self)?))
    }
}

/// `302 Found` redirect.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Checkbox semantics: only the literal `"on"` counts as checked, a missing field is unchecked.
pub fn is_checked(value: &Option<String>) -> bool {
    value.as_deref() == Some("on")
}

/// Turn a raw price like `"20.000"` or `"1,500"` into an integer.
///
/// Thousands separators are dropped, anything unparsable becomes `0` and the result is capped
/// at [`MAX_PRODUCT_PRICE`]. There is no lower bound. Only `.` and `,` count as separators,
/// so `"1_000"` is unparsable and becomes `0`.
pub fn normalize_price(raw: &str) -> i64 {
    let digits: String = raw.chars().filter(|c| *c != '.' && *c != ',').collect();
    let price = match digits.trim().parse::<i64>() {
        Ok(price) => price,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => MAX_PRODUCT_PRICE,
        Err(_) => 0,
    };
    price.min(MAX_PRODUCT_PRICE)
}

/// Parse an optional `YYYY-MM-DD` form date, blank means no date.
pub fn parse_date(raw: &str) -> ServiceResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            ServiceError::Validation(format!(
                "date: '{raw}' has an invalid date format, it must be in YYYY-MM-DD format"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_separators_are_removed() {
        assert_eq!(normalize_price("20,000"), 20_000);
        assert_eq!(normalize_price("20.000"), 20_000);
        assert_eq!(normalize_price("2500"), 2500);
        assert_eq!(normalize_price(" 42 "), 42);
    }

    #[test]
    fn price_is_capped() {
        assert_eq!(normalize_price("1.500.000"), 1_000_000);
        assert_eq!(normalize_price("1000000"), 1_000_000);
        assert_eq!(normalize_price("99999999999999999999999"), 1_000_000);
    }

    #[test]
    fn price_falls_back_to_zero() {
        assert_eq!(normalize_price("abc"), 0);
        assert_eq!(normalize_price(""), 0);
        assert_eq!(normalize_price("12abc"), 0);
        assert_eq!(normalize_price("1_000"), 0);
    }

    #[test]
    fn negative_prices_pass_through() {
        assert_eq!(normalize_price("-5"), -5);
        assert_eq!(normalize_price("-1.000"), -1000);
    }

    #[test]
    fn checkbox_semantics() {
        assert!(is_checked(&Some("on".to_string())));
        assert!(!is_checked(&Some("off".to_string())));
        assert!(!is_checked(&Some("true".to_string())));
        assert!(!is_checked(&Some(String::new())));
        assert!(!is_checked(&None));
    }

    #[test]
    fn empty_strings_become_none() {
        assert_eq!(String::new().empty_to_none(), None);
        assert_eq!(Some(String::new()).empty_to_none(), None);
        assert_eq!(None::<String>.empty_to_none(), None);
        assert_eq!(
            Some("https://example.org/a.png".to_string()).empty_to_none(),
            Some("https://example.org/a.png".to_string())
        );
    }

    #[test]
    fn search_term_ignores_empty_query() {
        assert_eq!(Search { q: None }.term(), None);
        assert_eq!(Search { q: Some(String::new()) }.term(), None);
        assert_eq!(Search { q: Some("hari".to_string()) }.term(), Some("hari"));
    }

    #[test]
    fn dates() {
        assert_eq!(parse_date("").unwrap(), None);
        assert_eq!(
            parse_date("2025-08-27").unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 27)
        );
        assert!(matches!(
            parse_date("27/08/25"),
            Err(ServiceError::Validation(_))
        ));
    }
}
