//! HTTP handlers for drug CRUD and service info.

pub mod drug;
pub mod info;
