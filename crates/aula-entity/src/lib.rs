//! # aula-entity
//!
//! Domain entity models for the Aula client. Every struct in this crate
//! represents a backend row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod notification;
pub mod settings;
pub mod user;
