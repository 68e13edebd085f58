//! Validation of create/update payloads and list query parameters.
//! Every check runs; all failures come back together, each naming its field.

use crate::error::ValidationErrors;
use crate::model::{DrugCreate, DrugFilter, DrugUpdate, Page, DEFAULT_LIMIT, MAX_LIMIT, MAX_SKIP};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::IntoParams;

/// Raw `GET /drugs` query string. Empty values count as absent.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring of the drug name.
    pub name: Option<String>,
    /// Case-insensitive substring of the category.
    pub category: Option<String>,
    /// Substring of the active ingredient list.
    pub ingredient: Option<String>,
    /// Inclusive lower bound on creation time: `YYYY-MM-DD` or RFC 3339.
    pub created_after: Option<String>,
    /// Inclusive upper bound on creation time: `YYYY-MM-DD` (whole day) or RFC 3339.
    pub created_before: Option<String>,
    /// Rows to skip, default 0.
    pub skip: Option<String>,
    /// Page size 1..=1000, default 100.
    pub limit: Option<String>,
}

const TEXT_FIELDS: [&str; 3] = ["name", "category", "description"];
const REQUIRED_LISTS: [&str; 2] = ["active_ingredients", "dosage_forms"];
const OPTIONAL_LISTS: [&str; 2] = ["side_effects", "contraindications"];

fn as_object(body: Value) -> Result<Map<String, Value>, ValidationErrors> {
    match body {
        Value::Object(m) => Ok(m),
        _ => {
            let mut errors = ValidationErrors::default();
            errors.push("body", "body must be a JSON object");
            Err(errors)
        }
    }
}

/// Trimmed non-empty string.
fn text(field: &str, v: &Value, errors: &mut ValidationErrors) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::String(_) => {
            errors.push(field, format!("{field} cannot be empty"));
            None
        }
        _ => {
            errors.push(field, format!("{field} must be a string"));
            None
        }
    }
}

fn string_list(field: &str, v: &Value, errors: &mut ValidationErrors) -> Option<Vec<String>> {
    let items = match v {
        Value::Array(items) => items,
        _ => {
            errors.push(field, format!("{field} must be a list of strings"));
            return None;
        }
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => out.push(s.clone()),
            _ => {
                errors.push(format!("{field}[{i}]"), format!("{field} must be a list of strings"));
                return None;
            }
        }
    }
    Some(out)
}

/// Present and non-null, or a "field required" error.
fn required<'a>(map: &'a Map<String, Value>, field: &str, errors: &mut ValidationErrors) -> Option<&'a Value> {
    match map.get(field) {
        None | Some(Value::Null) => {
            errors.push(field, format!("{field} is required"));
            None
        }
        Some(v) => Some(v),
    }
}

/// Validate a create body. `id` is optional; blank ids are treated as absent by the store.
pub fn validate_create(body: Value) -> Result<DrugCreate, ValidationErrors> {
    let map = as_object(body)?;
    let mut errors = ValidationErrors::default();

    let id = match map.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push("id", "id must be a string");
            None
        }
    };

    let [name, category, description] = TEXT_FIELDS.map(|field| {
        required(&map, field, &mut errors).and_then(|v| text(field, v, &mut errors))
    });
    let [active_ingredients, dosage_forms] = REQUIRED_LISTS.map(|field| {
        required(&map, field, &mut errors).and_then(|v| string_list(field, v, &mut errors))
    });
    let [side_effects, contraindications] = OPTIONAL_LISTS.map(|field| match map.get(field) {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(v) => string_list(field, v, &mut errors),
    });

    errors.into_result(DrugCreate {
        id,
        name: name.unwrap_or_default(),
        category: category.unwrap_or_default(),
        description: description.unwrap_or_default(),
        active_ingredients: active_ingredients.unwrap_or_default(),
        dosage_forms: dosage_forms.unwrap_or_default(),
        side_effects: side_effects.unwrap_or_default(),
        contraindications: contraindications.unwrap_or_default(),
    })
}

/// Validate a sparse update body: absent fields stay `None`. `id` is ignored.
pub fn validate_update(body: Value) -> Result<DrugUpdate, ValidationErrors> {
    let map = as_object(body)?;
    let mut errors = ValidationErrors::default();

    let [name, category, description] = TEXT_FIELDS.map(|field| match map.get(field) {
        None => None,
        Some(Value::Null) => {
            errors.push(field, format!("{field} cannot be null"));
            None
        }
        Some(v) => text(field, v, &mut errors),
    });
    let [active_ingredients, dosage_forms] = REQUIRED_LISTS.map(|field| match map.get(field) {
        None => None,
        Some(Value::Null) => {
            errors.push(field, format!("{field} cannot be null"));
            None
        }
        Some(v) => string_list(field, v, &mut errors),
    });
    // null clears an optional list
    let [side_effects, contraindications] = OPTIONAL_LISTS.map(|field| match map.get(field) {
        None => None,
        Some(Value::Null) => Some(Vec::new()),
        Some(v) => string_list(field, v, &mut errors),
    });

    errors.into_result(DrugUpdate {
        name,
        category,
        description,
        active_ingredients,
        dosage_forms,
        side_effects,
        contraindications,
    })
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

/// `YYYY-MM-DD` expands to the start (or, for an upper bound, the last microsecond) of that UTC day.
fn time_bound(field: &str, raw: &str, end_of_day: bool, errors: &mut ValidationErrors) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    let day = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            errors.push(field, format!("{field} must be a date (YYYY-MM-DD) or RFC 3339 timestamp"));
            return None;
        }
    };
    let t = if end_of_day {
        day.and_hms_micro_opt(23, 59, 59, 999_999)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    t.map(|t| t.and_utc())
}

/// Validate list query parameters into a filter and a page.
pub fn validate_list_params(raw: ListParams) -> Result<(DrugFilter, Page), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let created_after = non_empty(raw.created_after)
        .and_then(|s| time_bound("created_after", &s, false, &mut errors));
    let created_before = non_empty(raw.created_before)
        .and_then(|s| time_bound("created_before", &s, true, &mut errors));

    let mut page = Page::default();
    if let Some(s) = non_empty(raw.skip) {
        if s.bytes().all(|b| b.is_ascii_digit()) {
            // Past MAX_SKIP every page is empty anyway.
            page.skip = s.parse::<u64>().map_or(MAX_SKIP, |n| n.min(MAX_SKIP));
        } else {
            errors.push("skip", "skip must be a non-negative integer");
        }
    }
    if let Some(s) = non_empty(raw.limit) {
        match s.parse::<i64>() {
            Ok(n) if (1..=MAX_LIMIT as i64).contains(&n) => page.limit = n as u32,
            _ => errors.push(
                "limit",
                format!("limit must be an integer between 1 and {MAX_LIMIT} (default {DEFAULT_LIMIT})"),
            ),
        }
    }

    let filter = DrugFilter {
        name: non_empty(raw.name),
        category: non_empty(raw.category),
        ingredient: non_empty(raw.ingredient),
        created_after,
        created_before,
    };
    errors.into_result((filter, page))
}
