//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the `drugs` table.

use crate::model::{DrugCreate, DrugFilter, DrugUpdate, Page, MAX_LIMIT, MAX_SKIP};
use crate::sql::params::{bind_all, BindValue};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

pub const DRUGS_TABLE: &str = "drugs";

/// Column list in `DrugRow` order; used for SELECT and RETURNING.
pub const DRUG_COLUMNS: &str = "id, name, category, description, active_ingredients, dosage_forms, \
     side_effects, contraindications, created_at, updated_at";

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<BindValue>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }

    /// `query_as` over this SQL with all params bound.
    pub fn query_as<O>(&self) -> QueryAs<'_, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        bind_all(sqlx::query_as::<_, O>(&self.sql), &self.params)
    }
}

/// Escape LIKE metacharacters so user input matches literally (backslash is the default escape).
fn like_contains(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('%');
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// SELECT by primary key.
pub fn select_by_id(id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!("SELECT {} FROM {} WHERE id = ${}", DRUG_COLUMNS, DRUGS_TABLE, n);
    q
}

/// SELECT with optional filters (ANDed), ORDER BY name then id, LIMIT/OFFSET.
pub fn select_list(filter: &DrugFilter, page: Page) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();

    if let Some(name) = &filter.name {
        let n = q.push_param(like_contains(name));
        where_parts.push(format!("name ILIKE ${}", n));
    }
    if let Some(category) = &filter.category {
        let n = q.push_param(like_contains(category));
        where_parts.push(format!("category ILIKE ${}", n));
    }
    if let Some(ingredient) = &filter.ingredient {
        let n = q.push_param(like_contains(ingredient));
        where_parts.push(format!("active_ingredients::text LIKE ${}", n));
    }
    if let Some(after) = filter.created_after {
        let n = q.push_param(after);
        where_parts.push(format!("created_at >= ${}", n));
    }
    if let Some(before) = filter.created_before {
        let n = q.push_param(before);
        where_parts.push(format!("created_at <= ${}", n));
    }

    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY name ASC, id ASC LIMIT {} OFFSET {}",
        DRUG_COLUMNS,
        DRUGS_TABLE,
        where_clause,
        page.limit.min(MAX_LIMIT),
        page.skip.min(MAX_SKIP)
    );
    q
}

/// SELECT DISTINCT category, sorted.
pub fn select_categories() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT DISTINCT category FROM {} ORDER BY category", DRUGS_TABLE);
    q
}

pub fn count() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", DRUGS_TABLE);
    q
}

/// INSERT one drug with `id`; a row already holding `id` wins and nothing is returned.
pub fn insert(id: &str, drug: &DrugCreate, now: DateTime<Utc>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values = [
        q.push_param(id),
        q.push_param(drug.name.as_str()),
        q.push_param(drug.category.as_str()),
        q.push_param(drug.description.as_str()),
        q.push_param(BindValue::text_list(&drug.active_ingredients)),
        q.push_param(BindValue::text_list(&drug.dosage_forms)),
        q.push_param(BindValue::text_list(&drug.side_effects)),
        q.push_param(BindValue::text_list(&drug.contraindications)),
        q.push_param(now),
    ];
    let mut placeholders: Vec<String> = values.iter().map(|n| format!("${}", n)).collect();
    // updated_at starts equal to created_at
    placeholders.push(format!("${}", values[8]));
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT (id) DO NOTHING RETURNING {}",
        DRUGS_TABLE,
        DRUG_COLUMNS,
        placeholders.join(", "),
        DRUG_COLUMNS
    );
    q
}

/// UPDATE by id: SET only fields present in `changes`, always bump updated_at.
/// updated_at never moves backwards or stays equal, even if the clock reads the same.
pub fn update(id: &str, changes: &DrugUpdate, now: DateTime<Utc>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();

    let text_fields = [
        ("name", &changes.name),
        ("category", &changes.category),
        ("description", &changes.description),
    ];
    for (col, value) in text_fields {
        if let Some(v) = value {
            let n = q.push_param(v.as_str());
            sets.push(format!("{} = ${}", col, n));
        }
    }
    let list_fields = [
        ("active_ingredients", &changes.active_ingredients),
        ("dosage_forms", &changes.dosage_forms),
        ("side_effects", &changes.side_effects),
        ("contraindications", &changes.contraindications),
    ];
    for (col, value) in list_fields {
        if let Some(v) = value {
            let n = q.push_param(BindValue::text_list(v));
            sets.push(format!("{} = ${}", col, n));
        }
    }
    let now_param = q.push_param(now);
    sets.push(format!(
        "updated_at = GREATEST(${}, updated_at + INTERVAL '1 microsecond')",
        now_param
    ));

    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
        DRUGS_TABLE,
        sets.join(", "),
        id_param,
        DRUG_COLUMNS
    );
    q
}

/// DELETE by id, returning the removed id.
pub fn delete(id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!("DELETE FROM {} WHERE id = ${} RETURNING id", DRUGS_TABLE, n);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn list_without_filters_orders_by_name_and_paginates() {
        let q = select_list(&DrugFilter::default(), Page { skip: 4, limit: 2 });
        assert!(q.params.is_empty());
        assert!(!q.sql.contains("WHERE"));
        assert!(q.sql.ends_with("ORDER BY name ASC, id ASC LIMIT 2 OFFSET 4"));
    }

    #[test]
    fn list_filters_are_anded_in_order() {
        let filter = DrugFilter {
            name: Some("amox".into()),
            ingredient: Some("Trihydrate".into()),
            created_before: Some(now()),
            ..Default::default()
        };
        let q = select_list(&filter, Page::default());
        assert!(q.sql.contains(
            "WHERE name ILIKE $1 AND active_ingredients::text LIKE $2 AND created_at <= $3"
        ));
        assert_eq!(q.params[0], BindValue::Text("%amox%".into()));
        assert_eq!(q.params[1], BindValue::Text("%Trihydrate%".into()));
        assert_eq!(q.params[2], BindValue::Timestamp(now()));
    }

    #[test]
    fn list_limit_is_capped() {
        let q = select_list(&DrugFilter::default(), Page { skip: 0, limit: 50_000 });
        assert!(q.sql.contains("LIMIT 1000 "));
    }

    #[test]
    fn list_offset_stays_within_bigint() {
        let q = select_list(&DrugFilter::default(), Page { skip: u64::MAX, limit: 10 });
        assert!(q.sql.ends_with(&format!("OFFSET {}", i64::MAX)));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_contains("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn insert_sets_both_timestamps_from_one_param() {
        let drug = DrugCreate {
            id: None,
            name: "Foo".into(),
            category: "Bar".into(),
            description: "d".into(),
            active_ingredients: vec!["a".into()],
            dosage_forms: vec!["tablet".into()],
            side_effects: vec![],
            contraindications: vec![],
        };
        let q = insert("x-1", &drug, now());
        assert_eq!(q.params.len(), 9);
        assert!(q.sql.contains("VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)"));
        assert!(q.sql.contains("ON CONFLICT (id) DO NOTHING"));
        assert_eq!(q.params[4], BindValue::Json(serde_json::json!(["a"])));
    }

    #[test]
    fn update_sets_only_present_fields() {
        let changes = DrugUpdate {
            description: Some("new".into()),
            side_effects: Some(vec![]),
            ..Default::default()
        };
        let q = update("x-1", &changes, now());
        assert!(q.sql.starts_with(
            "UPDATE drugs SET description = $1, side_effects = $2, updated_at = GREATEST($3, updated_at + INTERVAL '1 microsecond') WHERE id = $4"
        ));
        assert!(!q.sql.contains("name ="));
        assert_eq!(q.params.len(), 4);
        assert_eq!(q.params[3], BindValue::Text("x-1".into()));
    }

    #[test]
    fn empty_update_still_touches_updated_at() {
        let q = update("x-1", &DrugUpdate::default(), now());
        assert!(q.sql.starts_with("UPDATE drugs SET updated_at = GREATEST($1"));
        assert_eq!(q.params.len(), 2);
    }
}
