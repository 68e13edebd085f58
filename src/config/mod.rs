//! Service settings: loaded once at startup, read-only afterwards.

pub mod settings;
pub mod validator;

pub use settings::*;
pub use validator::*;
