//! Typed query parameters and binding onto sqlx queries.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

/// A value bound to a `$n` placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Text(String),
    Json(Value),
    Timestamp(DateTime<Utc>),
}

impl BindValue {
    pub fn text_list(items: &[String]) -> Self {
        BindValue::Json(Value::from(items.to_vec()))
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Text(s)
    }
}

impl From<DateTime<Utc>> for BindValue {
    fn from(t: DateTime<Utc>) -> Self {
        BindValue::Timestamp(t)
    }
}

/// Bind `params` in order onto a `query_as` built from the same SQL.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    for p in params {
        query = match p {
            BindValue::Text(s) => query.bind(s.clone()),
            BindValue::Json(v) => query.bind(sqlx::types::Json(v.clone())),
            BindValue::Timestamp(t) => query.bind(*t),
        };
    }
    query
}
