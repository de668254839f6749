//! Booking status machine and payment methods.
//!
//! The status graph and the dual-path cancellation policy live here as pure
//! logic so handlers and repositories never compare raw status strings.
//!
//! Cancellation policy: a customer's cancellation is applied directly only
//! while the booking is still `pending`. From any later active state it is
//! recorded as `cancel_requested` (with the prior status saved), and staff
//! either finalize the cancellation or revert the booking to that saved
//! status.

use serde::{Deserialize, Serialize};

use crate::roles::is_staff;

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    CancelRequested,
}

impl BookingStatus {
    /// The database representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::CancelRequested => "cancel_requested",
        }
    }

    /// Parse a status string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "cancel_requested" => Some(BookingStatus::CancelRequested),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether the status graph has an edge `from -> to`.
    ///
    /// Reverting a `cancel_requested` booking to its saved previous status
    /// is handled separately by [`plan_transition`]; the graph itself only
    /// knows the forward edges.
    pub fn can_transition(from: Self, to: Self) -> bool {
        use BookingStatus::*;
        matches!(
            (from, to),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Pending, CancelRequested)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (Confirmed, CancelRequested)
                | (InProgress, Completed)
                | (InProgress, CancelRequested)
                | (CancelRequested, Cancelled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PaymentMethod
// ---------------------------------------------------------------------------

/// How the customer pays: cash at the shop, or PromptPay transfer up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Shop,
    Promptpay,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Shop => "shop",
            PaymentMethod::Promptpay => "promptpay",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "shop" => Some(PaymentMethod::Shop),
            "promptpay" => Some(PaymentMethod::Promptpay),
            _ => None,
        }
    }
}

/// Payment not yet received.
pub const PAYMENT_PENDING: &str = "pending";
/// Payment slip uploaded (still requires staff confirmation of the booking).
pub const PAYMENT_PAID: &str = "paid";

// ---------------------------------------------------------------------------
// Transition planning
// ---------------------------------------------------------------------------

/// The outcome of a validated status-transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    /// The status to write.
    pub new_status: BookingStatus,
    /// When entering `cancel_requested`: the active status to restore if
    /// staff reject the request.
    pub save_previous: Option<BookingStatus>,
    /// Whether to clear `previous_status` and `cancel_reason` (set when a
    /// cancel request is finalized or reverted).
    pub clear_cancel_request: bool,
}

/// Why a requested transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Cannot change status from '{from}' to '{to}'")]
    NotAllowed {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("A cancellation request is already pending for this booking")]
    AlreadyRequested,
    #[error("Customers can only cancel their bookings")]
    CustomerNotCancelling,
}

/// Validate a status-transition request and plan its effects.
///
/// `previous` is the booking's stored `previous_status` column, consulted
/// only when staff revert a `cancel_requested` booking. Ownership must be
/// checked by the caller; this function assumes a non-staff `role` belongs
/// to the booking's owner.
pub fn plan_transition(
    role: &str,
    current: BookingStatus,
    requested: BookingStatus,
    previous: Option<BookingStatus>,
) -> Result<TransitionPlan, TransitionError> {
    if !is_staff(role) {
        // Customers only ever ask for "cancelled"; the dual-path policy
        // decides whether that lands directly or as a request.
        if requested != BookingStatus::Cancelled {
            return Err(TransitionError::CustomerNotCancelling);
        }
        return match current {
            BookingStatus::Pending => Ok(TransitionPlan {
                new_status: BookingStatus::Cancelled,
                save_previous: None,
                clear_cancel_request: false,
            }),
            BookingStatus::Confirmed | BookingStatus::InProgress => Ok(TransitionPlan {
                new_status: BookingStatus::CancelRequested,
                save_previous: Some(current),
                clear_cancel_request: false,
            }),
            BookingStatus::CancelRequested => Err(TransitionError::AlreadyRequested),
            _ => Err(TransitionError::NotAllowed {
                from: current,
                to: requested,
            }),
        };
    }

    // Staff revert: a cancel_requested booking may go back to exactly the
    // status it held before the request.
    if current == BookingStatus::CancelRequested && previous == Some(requested) {
        return Ok(TransitionPlan {
            new_status: requested,
            save_previous: None,
            clear_cancel_request: true,
        });
    }

    if !BookingStatus::can_transition(current, requested) {
        return Err(TransitionError::NotAllowed {
            from: current,
            to: requested,
        });
    }

    Ok(TransitionPlan {
        new_status: requested,
        save_previous: (requested == BookingStatus::CancelRequested).then_some(current),
        clear_cancel_request: current == BookingStatus::CancelRequested,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
