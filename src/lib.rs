//! Drug registry: REST service for drug reference records backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod routes;
pub mod seed;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{CorsOrigins, Settings};
pub use error::{AppError, ConfigError, FieldError, ValidationErrors};
pub use migration::{apply_migrations, ensure_database_exists, schema_sql};
pub use model::{Drug, DrugCreate, DrugFilter, DrugUpdate, Page};
pub use routes::app;
pub use seed::{sample_drugs, seed_if_empty};
pub use state::AppState;
pub use store::{DrugStore, PgDrugStore};
