//! Backend security settings.

pub mod model;

pub use model::SecuritySetting;
