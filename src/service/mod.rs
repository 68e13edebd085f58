//! Request validation: raw JSON and query strings into validated drug inputs.

mod validation;
pub use validation::{validate_create, validate_list_params, validate_update, ListParams};
