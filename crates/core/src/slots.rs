//! The half-hour business-hours slot grid.
//!
//! The shop takes bookings on a fixed grid of half-hour slots between
//! opening and closing. The grid is advisory for the availability endpoint;
//! the authoritative conflict check happens inside the booking-creation
//! transaction.

use chrono::NaiveTime;

/// First bookable hour (09:00).
pub const OPENING_HOUR: u32 = 9;
/// Slots run up to, but not including, this hour (18:00).
pub const CLOSING_HOUR: u32 = 18;

/// All bookable slots for one day, as "HH:MM" strings ("09:00" .. "17:30").
pub fn business_hour_slots() -> Vec<String> {
    let mut slots = Vec::with_capacity(((CLOSING_HOUR - OPENING_HOUR) * 2) as usize);
    for hour in OPENING_HOUR..CLOSING_HOUR {
        slots.push(format!("{hour:02}:00"));
        slots.push(format!("{hour:02}:30"));
    }
    slots
}

/// Format a time as the "HH:MM" slot label used throughout the API.
pub fn format_slot(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_covers_business_hours() {
        let slots = business_hour_slots();
        assert_eq!(slots.len(), 18);
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.last().map(String::as_str), Some("17:30"));
        assert!(slots.contains(&"12:30".to_string()));
        assert!(!slots.contains(&"18:00".to_string()));
    }

    #[test]
    fn slot_formatting_drops_seconds() {
        let t = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert_eq!(format_slot(t), "10:00");
        let t = NaiveTime::from_hms_opt(17, 30, 0).unwrap();
        assert_eq!(format_slot(t), "17:30");
    }
}
