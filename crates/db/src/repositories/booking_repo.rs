//! Booking repository.
//!
//! Creation and status changes run inside a single transaction so that the
//! slot-exclusivity check, the stock reservation, and every notification
//! insert commit or roll back together.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::PgPool;

use motoshop_core::booking::{BookingStatus, TransitionPlan, PAYMENT_PAID, PAYMENT_PENDING};
use motoshop_core::messages;
use motoshop_core::roles::ROLE_ADMIN;
use motoshop_core::types::DbId;

use crate::models::booking::{
    Booking, BookingDetail, CreateBooking, CreateBookingError, VehicleRef,
};
use crate::models::notification::NewNotification;
use crate::repositories::NotificationRepo;

const BOOKING_COLUMNS: &str = "id, user_id, vehicle_id, booking_date, booking_time, \
     status, total_price, notes, requested_service, cancel_reason, previous_status, \
     payment_method, payment_status, slip_image, created_at, updated_at";

/// Detail projection: booking + customer + vehicle + aggregated line items.
const DETAIL_QUERY: &str = "SELECT b.id, b.user_id, b.vehicle_id, b.booking_date, \
         b.booking_time, b.status, b.total_price, b.notes, b.requested_service, \
         b.cancel_reason, b.previous_status, b.payment_method, b.payment_status, \
         b.slip_image, b.created_at, b.updated_at, \
         u.username, u.email, u.first_name, u.last_name, u.phone, \
         v.brand AS vehicle_brand, v.model AS vehicle_model, \
         v.license_plate AS vehicle_license_plate, v.color AS vehicle_color, \
         v.year AS vehicle_year, \
         (SELECT json_agg(json_build_object('id', s.id, 'name', s.name, 'price', s.price)) \
            FROM booking_services bs JOIN services s ON s.id = bs.service_id \
            WHERE bs.booking_id = b.id) AS services_data, \
         (SELECT json_agg(json_build_object('id', p.id, 'name', p.name, 'price', p.selling_price)) \
            FROM booking_parts bp JOIN parts p ON p.id = bp.part_id \
            WHERE bp.booking_id = b.id) AS parts_data \
     FROM bookings b \
     LEFT JOIN users u ON u.id = b.user_id \
     LEFT JOIN vehicles v ON v.id = b.vehicle_id";

/// Filters for the booking list.
#[derive(Debug, Default)]
pub struct BookingFilter {
    /// Restrict to one customer's bookings (set for non-staff callers).
    pub user_id: Option<DbId>,
    pub status: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Result of the admin purge of one user's booking history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResult {
    pub deleted_bookings: u64,
    pub deleted_notifications: u64,
    pub next_booking_id: i64,
}

pub struct BookingRepo;

impl BookingRepo {
    /// Creates a booking atomically.
    ///
    /// One transaction covers the slot-conflict check, the per-part
    /// `SELECT ... FOR UPDATE` stock reservation (each selected part needs
    /// quantity >= 1 and is decremented by one), the optional inline vehicle
    /// insert, the booking and line-item inserts, and the customer's
    /// booking-created notification. Any failure rolls everything back with
    /// stock untouched.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateBooking,
    ) -> Result<BookingDetail, CreateBookingError> {
        let mut tx = pool.begin().await?;

        // Slot exclusivity. The partial unique index on (booking_date,
        // booking_time) backs this up against concurrent inserts.
        let conflict: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM bookings \
             WHERE booking_date = $1 AND booking_time = $2 AND status <> 'cancelled' \
             LIMIT 1",
        )
        .bind(input.booking_date)
        .bind(input.booking_time)
        .fetch_optional(&mut *tx)
        .await?;
        if conflict.is_some() {
            return Err(CreateBookingError::SlotTaken);
        }

        // Lock and validate every requested part before touching stock.
        let mut reserved: Vec<(DbId, f64)> = Vec::with_capacity(input.part_ids.len());
        for &part_id in &input.part_ids {
            let part: Option<(DbId, String, i32, f64)> = sqlx::query_as(
                "SELECT id, name, quantity, selling_price FROM parts WHERE id = $1 FOR UPDATE",
            )
            .bind(part_id)
            .fetch_optional(&mut *tx)
            .await?;
            let (id, name, quantity, price) = match part {
                Some(row) => row,
                None => return Err(CreateBookingError::PartNotFound(part_id)),
            };
            if quantity < 1 {
                return Err(CreateBookingError::OutOfStock(messages::out_of_stock(&name)));
            }
            reserved.push((id, price));
        }

        let vehicle_id = match &input.vehicle {
            Some(VehicleRef::Existing(id)) => Some(*id),
            Some(VehicleRef::New(vehicle)) => {
                let (id,): (DbId,) = sqlx::query_as(
                    "INSERT INTO vehicles (user_id, brand, model, year, license_plate, color) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
                )
                .bind(user_id)
                .bind(&vehicle.brand)
                .bind(&vehicle.model)
                .bind(vehicle.year)
                .bind(&vehicle.license_plate)
                .bind(&vehicle.color)
                .fetch_one(&mut *tx)
                .await?;
                Some(id)
            }
            None => None,
        };

        let mut total = 0.0_f64;
        let mut services: Vec<(DbId, f64)> = Vec::with_capacity(input.service_ids.len());
        for &service_id in &input.service_ids {
            let service: Option<(DbId, f64)> =
                sqlx::query_as("SELECT id, price FROM services WHERE id = $1")
                    .bind(service_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let (id, price) = match service {
                Some(row) => row,
                None => return Err(CreateBookingError::ServiceNotFound(service_id)),
            };
            total += price;
            services.push((id, price));
        }
        for &(_, price) in &reserved {
            total += price;
        }

        // PromptPay with an uploaded slip counts as paid up front; everything
        // else awaits payment at the shop.
        let method = input.payment_method.as_deref().unwrap_or("shop");
        let payment_status = if method == "promptpay" && input.slip_image.is_some() {
            PAYMENT_PAID
        } else {
            PAYMENT_PENDING
        };

        let insert = sqlx::query_as::<_, (DbId,)>(
            "INSERT INTO bookings (user_id, vehicle_id, booking_date, booking_time, \
                 status, total_price, notes, requested_service, payment_method, \
                 payment_status, slip_image) \
             VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8, $9, $10) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(vehicle_id)
        .bind(input.booking_date)
        .bind(input.booking_time)
        .bind(total)
        .bind(&input.notes)
        .bind(&input.requested_service)
        .bind(method)
        .bind(payment_status)
        .bind(&input.slip_image)
        .fetch_one(&mut *tx)
        .await;

        let (booking_id,) = match insert {
            Ok(row) => row,
            // Lost a race on the slot index: same answer as the explicit check.
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("uq_bookings_slot") =>
            {
                return Err(CreateBookingError::SlotTaken);
            }
            Err(err) => return Err(err.into()),
        };

        for &(service_id, _) in &services {
            sqlx::query("INSERT INTO booking_services (booking_id, service_id) VALUES ($1, $2)")
                .bind(booking_id)
                .bind(service_id)
                .execute(&mut *tx)
                .await?;
        }
        for &(part_id, _) in &reserved {
            sqlx::query("INSERT INTO booking_parts (booking_id, part_id) VALUES ($1, $2)")
                .bind(booking_id)
                .bind(part_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE parts SET quantity = quantity - 1, updated_at = NOW() WHERE id = $1")
                .bind(part_id)
                .execute(&mut *tx)
                .await?;
        }

        NotificationRepo::create_in_tx(
            &mut tx,
            &NewNotification {
                user_id,
                title: messages::TITLE_BOOKING_CREATED.to_string(),
                message: messages::booking_created(input.booking_date, input.booking_time),
                kind: "booking".to_string(),
                related_booking_id: Some(booking_id),
            },
        )
        .await?;

        tx.commit().await?;

        let detail = Self::find_detail(pool, booking_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(detail)
    }

    /// Applies a validated transition plan and its notifications in one
    /// transaction.
    ///
    /// Writes the new status (saving or clearing `previous_status` and
    /// `cancel_reason` per the plan), notifies the booking's owner when the
    /// new status has customer-facing copy, and alerts every admin when a
    /// cancellation request comes in.
    pub async fn apply_transition(
        pool: &PgPool,
        booking: &Booking,
        plan: &TransitionPlan,
        cancel_reason: Option<&str>,
    ) -> Result<Booking, sqlx::Error> {
        let previous_status = if plan.clear_cancel_request {
            None
        } else if let Some(saved) = plan.save_previous {
            Some(saved.as_str().to_string())
        } else {
            booking.previous_status.clone()
        };
        let cancel_reason = if plan.clear_cancel_request {
            None
        } else if plan.new_status == BookingStatus::CancelRequested {
            cancel_reason.map(str::to_string)
        } else {
            booking.cancel_reason.clone()
        };

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE bookings SET status = $2, previous_status = $3, \
                 cancel_reason = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        );
        let updated: Booking = sqlx::query_as(&query)
            .bind(booking.id)
            .bind(plan.new_status.as_str())
            .bind(&previous_status)
            .bind(&cancel_reason)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(body) = messages::status_changed(plan.new_status) {
            NotificationRepo::create_in_tx(
                &mut tx,
                &NewNotification {
                    user_id: booking.user_id,
                    title: messages::TITLE_STATUS_UPDATE.to_string(),
                    message: body.to_string(),
                    kind: "booking".to_string(),
                    related_booking_id: Some(booking.id),
                },
            )
            .await?;
        }

        if plan.new_status == BookingStatus::CancelRequested {
            let admin_ids: Vec<(DbId,)> =
                sqlx::query_as("SELECT id FROM users WHERE role = $1")
                    .bind(ROLE_ADMIN)
                    .fetch_all(&mut *tx)
                    .await?;
            let body = messages::admin_cancel_request(booking.id, cancel_reason.as_deref());
            for (admin_id,) in admin_ids {
                NotificationRepo::create_in_tx(
                    &mut tx,
                    &NewNotification {
                        user_id: admin_id,
                        title: messages::TITLE_CANCEL_REQUEST.to_string(),
                        message: body.clone(),
                        kind: "booking".to_string(),
                        related_booking_id: Some(booking.id),
                    },
                )
                .await?;
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingDetail>, sqlx::Error> {
        let query = format!("{DETAIL_QUERY} WHERE b.id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    /// Lists bookings with their joined detail rows, newest slot first.
    pub async fn list(
        pool: &PgPool,
        filter: &BookingFilter,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let mut query = format!("{DETAIL_QUERY} WHERE 1=1");
        let mut bind_idx = 0;

        if filter.user_id.is_some() {
            bind_idx += 1;
            query.push_str(&format!(" AND b.user_id = ${bind_idx}"));
        }
        if filter.status.is_some() {
            bind_idx += 1;
            query.push_str(&format!(" AND b.status = ${bind_idx}"));
        }
        if filter.date.is_some() {
            bind_idx += 1;
            query.push_str(&format!(" AND b.booking_date = ${bind_idx}"));
        }
        query.push_str(" ORDER BY b.booking_date DESC, b.booking_time DESC");

        let mut q = sqlx::query_as(&query);
        if let Some(user_id) = filter.user_id {
            q = q.bind(user_id);
        }
        if let Some(status) = &filter.status {
            q = q.bind(status.clone());
        }
        if let Some(date) = filter.date {
            q = q.bind(date);
        }
        q.fetch_all(pool).await
    }

    /// Times already taken on a date (non-cancelled bookings only).
    pub async fn booked_times(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, sqlx::Error> {
        let rows: Vec<(NaiveTime,)> = sqlx::query_as(
            "SELECT booking_time FROM bookings \
             WHERE booking_date = $1 AND status <> 'cancelled' \
             ORDER BY booking_time",
        )
        .bind(date)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(t,)| t).collect())
    }

    /// Admin purge: deletes one user's booking notifications and bookings
    /// and compacts the bookings id sequence, all in one transaction.
    pub async fn purge_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<PurgeResult, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let notifications =
            sqlx::query("DELETE FROM notifications WHERE user_id = $1 AND type = 'booking'")
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        let bookings = sqlx::query("DELETE FROM bookings WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        // Compact the id sequence so the next booking continues from the
        // current maximum.
        let (max_id,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(id), 0) FROM bookings")
                .fetch_one(&mut *tx)
                .await?;
        sqlx::query("SELECT setval(pg_get_serial_sequence('bookings', 'id'), $1, true)")
            .bind(max_id.max(1))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(PurgeResult {
            deleted_bookings: bookings,
            deleted_notifications: notifications,
            next_booking_id: max_id + 1,
        })
    }
}
