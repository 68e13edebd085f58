//! In-memory `DrugStore` and request helpers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use drug_registry::store::resolve_id;
use drug_registry::{app, AppError, AppState, Drug, DrugCreate, DrugFilter, DrugStore, DrugUpdate, Page, Settings};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// `active_ingredients::text` as PostgreSQL prints a JSONB string array: `["a", "b"]`.
/// String escaping follows serde_json, which agrees with JSONB for quotes and backslashes.
pub fn jsonb_text(items: &[String]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|s| serde_json::to_string(s).unwrap())
        .collect();
    format!("[{}]", parts.join(", "))
}

/// In-memory rendition of the list WHERE clause.
pub fn filter_matches(filter: &DrugFilter, drug: &Drug) -> bool {
    fn contains_ci(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
    filter.name.as_ref().map_or(true, |n| contains_ci(&drug.name, n))
        && filter.category.as_ref().map_or(true, |c| contains_ci(&drug.category, c))
        && filter
            .ingredient
            .as_ref()
            .map_or(true, |i| jsonb_text(&drug.active_ingredients).contains(i.as_str()))
        && filter.created_after.map_or(true, |t| drug.created_at >= t)
        && filter.created_before.map_or(true, |t| drug.created_at <= t)
}

/// Copy the present fields of `changes` onto `drug`; timestamps are left alone.
pub fn apply_update(changes: &DrugUpdate, drug: &mut Drug) {
    let text = [
        (&changes.name, &mut drug.name),
        (&changes.category, &mut drug.category),
        (&changes.description, &mut drug.description),
    ];
    for (change, field) in text {
        if let Some(v) = change {
            *field = v.clone();
        }
    }
    let lists = [
        (&changes.active_ingredients, &mut drug.active_ingredients),
        (&changes.dosage_forms, &mut drug.dosage_forms),
        (&changes.side_effects, &mut drug.side_effects),
        (&changes.contraindications, &mut drug.contraindications),
    ];
    for (change, field) in lists {
        if let Some(v) = change {
            *field = v.clone();
        }
    }
}

/// Map-backed store with the same contract as the PostgreSQL store.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<String, Drug>>,
}

#[async_trait]
impl DrugStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Drug>, AppError> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn list(&self, filter: &DrugFilter, page: Page) -> Result<Vec<Drug>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<Drug> = rows.values().filter(|d| filter_matches(filter, d)).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(out
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<String> = rows.values().map(|d| d.category.clone()).collect();
        out.sort();
        out.dedup();
        Ok(out)
    }

    async fn create(&self, drug: DrugCreate) -> Result<Drug, AppError> {
        let id = resolve_id(drug.id.as_deref());
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.get(&id) {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let created = Drug {
            id: id.clone(),
            name: drug.name,
            category: drug.category,
            description: drug.description,
            active_ingredients: drug.active_ingredients,
            dosage_forms: drug.dosage_forms,
            side_effects: drug.side_effects,
            contraindications: drug.contraindications,
            created_at: now,
            updated_at: now,
        };
        rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, changes: &DrugUpdate) -> Result<Option<Drug>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(drug) = rows.get_mut(id) else {
            return Ok(None);
        };
        apply_update(changes, drug);
        drug.updated_at = Utc::now().max(drug.updated_at + Duration::microseconds(1));
        Ok(Some(drug.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.rows.lock().unwrap().remove(id).is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Store whose every call fails like a dropped database connection.
pub struct BrokenStore;

#[async_trait]
impl DrugStore for BrokenStore {
    async fn get(&self, _id: &str) -> Result<Option<Drug>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolClosed))
    }

    async fn list(&self, _filter: &DrugFilter, _page: Page) -> Result<Vec<Drug>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolClosed))
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolClosed))
    }

    async fn create(&self, _drug: DrugCreate) -> Result<Drug, AppError> {
        Err(AppError::Db(sqlx::Error::PoolClosed))
    }

    async fn update(&self, _id: &str, _changes: &DrugUpdate) -> Result<Option<Drug>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolClosed))
    }

    async fn delete(&self, _id: &str) -> Result<bool, AppError> {
        Err(AppError::Db(sqlx::Error::PoolClosed))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(AppError::Db(sqlx::Error::PoolClosed))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Db(sqlx::Error::PoolClosed))
    }
}

pub fn test_settings() -> Settings {
    Settings {
        seed_database: false,
        ..Settings::default()
    }
}

pub fn router_with(store: Arc<dyn DrugStore>, settings: Settings) -> Router {
    app(AppState::new(store, settings))
}

pub fn router(store: Arc<MemoryStore>) -> Router {
    router_with(store, test_settings())
}

/// Send one request; returns status and parsed JSON body (`Value::Null` when empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn drug_body(id: &str, name: &str) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "category": "Test",
        "description": "d",
        "active_ingredients": ["a"],
        "dosage_forms": ["tablet"]
    })
}
