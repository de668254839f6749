//! HTTP handler implementations, one module per resource.

pub mod auth;
pub mod bookings;
pub mod chat;
pub mod dashboard;
pub mod notifications;
pub mod parts;
pub mod services;
pub mod users;
