//! Motoshop domain primitives.
//!
//! Pure, database-free building blocks shared by the rest of the
//! workspace:
//!
//! - [`types`] -- primary key / timestamp aliases.
//! - [`roles`] -- well-known role name constants.
//! - [`booking`] -- booking status machine and payment methods.
//! - [`slots`] -- the half-hour business-hours slot grid.
//! - [`messages`] -- user-facing notification and error copy.
//! - [`error`] -- the shared domain error enum.

pub mod booking;
pub mod error;
pub mod messages;
pub mod roles;
pub mod slots;
pub mod types;
