//! Drug records: API model, validated inputs, storage row, and list parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

/// Default and maximum page sizes for `GET /drugs`.
pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1000;
/// Largest offset PostgreSQL accepts (`bigint`).
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// A drug as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Drug {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub active_ingredients: Vec<String>,
    pub dosage_forms: Vec<String>,
    pub side_effects: Vec<String>,
    pub contraindications: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated create payload. `id` is optional; when absent the store generates one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DrugCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub description: String,
    pub active_ingredients: Vec<String>,
    pub dosage_forms: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
}

/// Validated sparse update. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DrugUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage_forms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contraindications: Option<Vec<String>>,
}

impl DrugUpdate {
    pub fn is_empty(&self) -> bool {
        *self == DrugUpdate::default()
    }
}

/// Row of the `drugs` table. List columns are JSONB arrays.
#[derive(Debug, sqlx::FromRow)]
pub struct DrugRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub active_ingredients: Json<Vec<String>>,
    pub dosage_forms: Json<Vec<String>>,
    pub side_effects: Json<Vec<String>>,
    pub contraindications: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DrugRow> for Drug {
    fn from(row: DrugRow) -> Self {
        Drug {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            active_ingredients: row.active_ingredients.0,
            dosage_forms: row.dosage_forms.0,
            side_effects: row.side_effects.0,
            contraindications: row.contraindications.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// List filters; every field is optional and present ones are ANDed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrugFilter {
    /// Case-insensitive substring of `name`.
    pub name: Option<String>,
    /// Case-insensitive substring of `category`.
    pub category: Option<String>,
    /// Substring of the serialized `active_ingredients` array.
    pub ingredient: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub created_before: Option<DateTime<Utc>>,
}

/// Offset pagination applied after filtering and ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn update_is_empty_only_without_fields() {
        assert!(DrugUpdate::default().is_empty());
        let change = DrugUpdate {
            side_effects: Some(vec![]),
            ..Default::default()
        };
        assert!(!change.is_empty());
    }

    #[test]
    fn row_maps_json_columns_to_lists() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let row = DrugRow {
            id: "amoxicillin-123".into(),
            name: "Amoxicillin".into(),
            category: "Antibiotics".into(),
            description: "A penicillin antibiotic".into(),
            active_ingredients: Json(vec!["Amoxicillin Trihydrate".into()]),
            dosage_forms: Json(vec!["Capsule".into(), "Tablet".into()]),
            side_effects: Json(vec![]),
            contraindications: Json(vec!["Penicillin allergy".into()]),
            created_at: at,
            updated_at: at,
        };
        let drug = Drug::from(row);
        assert_eq!(drug.dosage_forms, vec!["Capsule", "Tablet"]);
        assert!(drug.side_effects.is_empty());
        assert_eq!(drug.created_at, at);
    }
}
