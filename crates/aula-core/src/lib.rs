//! # aula-core
//!
//! Core crate for the Aula client runtime. Contains capability traits,
//! configuration schemas, typed identifiers, domain events, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Aula crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
