//! User-facing notification and error copy.
//!
//! All customer-visible strings live here so handlers and repositories never
//! embed copy inline. The product copy is Thai; API error messages that the
//! frontend matches on are kept byte-identical to what it expects.

use chrono::{NaiveDate, NaiveTime};

use crate::booking::BookingStatus;
use crate::slots::format_slot;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Notification titles
// ---------------------------------------------------------------------------

pub const TITLE_BOOKING_CREATED: &str = "การจองสำเร็จ";
pub const TITLE_STATUS_UPDATE: &str = "อัปเดตสถานะการจอง";
pub const TITLE_CANCEL_REQUEST: &str = "คำขอยกเลิกการจอง";

// ---------------------------------------------------------------------------
// Notification bodies
// ---------------------------------------------------------------------------

/// Body of the notification inserted when a booking is created.
pub fn booking_created(date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "การจองของคุณสำหรับวันที่ {date} เวลา {time} ถูกสร้างเรียบร้อยแล้ว สถานะ: รอดำเนินการ",
        date = date.format("%Y-%m-%d"),
        time = format_slot(time),
    )
}

/// Owner-facing body for a status change, or `None` when the status has no
/// customer-visible message (e.g. back to `pending` after a revert).
pub fn status_changed(status: BookingStatus) -> Option<&'static str> {
    match status {
        BookingStatus::Confirmed => Some("การจองของคุณได้รับการยืนยันแล้ว"),
        BookingStatus::InProgress => Some("รถของคุณกำลังอยู่ระหว่างการซ่อม"),
        BookingStatus::Completed => {
            Some("การซ่อมเสร็จสิ้นแล้ว! คุณสามารถมารับรถได้เลย")
        }
        BookingStatus::Cancelled => Some("การจองของคุณถูกยกเลิก"),
        BookingStatus::CancelRequested => {
            Some("คำขอยกเลิกการจองของคุณถูกส่งแล้ว รอการยืนยันจากทางร้าน")
        }
        BookingStatus::Pending => None,
    }
}

/// Body of the alert sent to every admin when a customer requests a
/// cancellation.
pub fn admin_cancel_request(booking_id: DbId, reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.is_empty() => format!(
            "ลูกค้าขอยกเลิกการจอง #{booking_id} เหตุผล: {reason}"
        ),
        _ => format!("ลูกค้าขอยกเลิกการจอง #{booking_id}"),
    }
}

// ---------------------------------------------------------------------------
// API error copy
// ---------------------------------------------------------------------------

/// Slot-conflict message; the frontend matches on this string.
pub const MSG_SLOT_TAKEN: &str =
    "This time slot is already booked. Please choose another time.";

/// A part referenced by a booking request does not exist.
pub fn part_not_found(part_id: DbId) -> String {
    format!("Part ID {part_id} not found")
}

/// A service referenced by a booking request does not exist.
pub fn service_not_found(service_id: DbId) -> String {
    format!("Service ID {service_id} not found")
}

/// A requested part has no stock left.
pub fn out_of_stock(part_name: &str) -> String {
    format!("สินค้า {part_name} หมดแล้ว (Out of Stock)")
}

// ---------------------------------------------------------------------------
// Chat copy
// ---------------------------------------------------------------------------

/// Reply returned by the chat proxy when no automation webhook is configured.
pub const CHAT_FALLBACK_REPLY: &str =
    "ระบบยังไม่ได้เชื่อมต่อกับระบบตอบกลับอัตโนมัติ กรุณาตั้งค่า CHAT_WEBHOOK_URL ในไฟล์ .env ของเซิร์ฟเวอร์ครับ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_created_embeds_slot() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let msg = booking_created(date, time);
        assert!(msg.contains("2025-06-01"));
        assert!(msg.contains("10:00"));
        assert!(!msg.contains("10:00:00"), "seconds must not leak into copy");
    }

    #[test]
    fn every_visible_status_has_copy() {
        for status in [
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::CancelRequested,
        ] {
            assert!(status_changed(status).is_some(), "missing copy for {status}");
        }
        assert!(status_changed(BookingStatus::Pending).is_none());
    }

    #[test]
    fn admin_alert_mentions_reason_when_given() {
        let msg = admin_cancel_request(7, Some("เปลี่ยนแผน"));
        assert!(msg.contains("#7"));
        assert!(msg.contains("เปลี่ยนแผน"));

        let msg = admin_cancel_request(7, None);
        assert!(msg.contains("#7"));
        assert!(!msg.contains("เหตุผล"));
    }

    #[test]
    fn out_of_stock_names_the_part() {
        assert!(out_of_stock("น้ำมันเครื่อง").contains("น้ำมันเครื่อง"));
    }
}
