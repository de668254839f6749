//! Data access layer.
//!
//! Each repository is a zero-sized struct with async methods taking a
//! `&PgPool` (or a transaction where atomicity matters). Queries live
//! here; handlers never write SQL.

pub mod booking_repo;
pub mod dashboard_repo;
pub mod notification_repo;
pub mod part_repo;
pub mod service_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use booking_repo::BookingRepo;
pub use dashboard_repo::DashboardRepo;
pub use notification_repo::NotificationRepo;
pub use part_repo::PartRepo;
pub use service_repo::ServiceRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;
