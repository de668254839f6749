//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the create/update payloads the API accepts

pub mod booking;
pub mod notification;
pub mod part;
pub mod service;
pub mod user;
pub mod vehicle;
