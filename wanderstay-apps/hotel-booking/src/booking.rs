//!  Wanderstay Hotel Booking
//!
//!  Copyright (C) 2026  Wanderstay contributors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Booking Desk
//!
//! Fabricated booking confirmations, held in memory only. Nothing survives
//! the process; this is the mock checkout backend, not a reservation
//! system.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::models::{Booking, BookingRequest};

pub const STATUS_CONFIRMED: &str = "confirmed";

#[derive(Debug, Default)]
pub struct BookingDesk {
    bookings: Mutex<HashMap<String, Booking>>,
}

impl BookingDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fabricate a confirmation for a booking payload.
    ///
    /// Ids are `BK` plus a millisecond timestamp, bumped forward if two
    /// bookings land on the same millisecond. Payment details from the
    /// request are dropped, never echoed.
    pub fn confirm(&self, request: BookingRequest) -> Booking {
        // A poisoned ledger still holds valid bookings; recover the guard.
        let mut bookings = self.bookings.lock().unwrap_or_else(|e| e.into_inner());

        let mut millis = Utc::now().timestamp_millis();
        let mut id = format!("BK{millis}");
        while bookings.contains_key(&id) {
            millis += 1;
            id = format!("BK{millis}");
        }

        let booking = Booking {
            id: id.clone(),
            hotel_id: request.hotel_id,
            room_key: request.room_key,
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            guest_info: request.guest_info,
            total_price: request.total_price,
            status: STATUS_CONFIRMED.to_string(),
            booking_date: Utc::now().to_rfc3339(),
        };
        bookings.insert(id, booking.clone());

        tracing::info!(booking_id = %booking.id, hotel_id = %booking.hotel_id, "Booking confirmed");
        booking
    }

    /// Look up a previously fabricated confirmation.
    pub fn find(&self, id: &str) -> Option<Booking> {
        self.bookings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.bookings.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GuestInfo;

    fn request() -> BookingRequest {
        BookingRequest {
            hotel_id: "h1".to_string(),
            room_key: "r1".to_string(),
            check_in: "2026-09-10".to_string(),
            check_out: "2026-09-14".to_string(),
            guests: "2".to_string(),
            guest_info: GuestInfo {
                first_name: "Ada".to_string(),
                last_name: "Ng".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+65 8000 0000".to_string(),
                special_requests: None,
            },
            total_price: 480.0,
            payment_info: None,
        }
    }

    #[test]
    fn confirmation_has_reference_and_status() {
        let desk = BookingDesk::new();
        let booking = desk.confirm(request());

        assert!(booking.id.starts_with("BK"));
        assert_eq!(booking.status, STATUS_CONFIRMED);
        assert!(!booking.booking_date.is_empty());
        assert_eq!(booking.hotel_id, "h1");
    }

    #[test]
    fn same_millisecond_bookings_get_distinct_ids() {
        let desk = BookingDesk::new();
        let first = desk.confirm(request());
        let second = desk.confirm(request());
        assert_ne!(first.id, second.id);
        assert_eq!(desk.len(), 2);
    }

    #[test]
    fn poisoned_ledger_still_serves_bookings() {
        let desk = std::sync::Arc::new(BookingDesk::new());
        let booking = desk.confirm(request());

        let poisoner = std::sync::Arc::clone(&desk);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.bookings.lock().unwrap();
            panic!("poison the ledger mutex");
        })
        .join();

        assert!(desk.find(&booking.id).is_some());
        let second = desk.confirm(request());
        assert_eq!(desk.len(), 2);
        assert!(desk.find(&second.id).is_some());
    }

    #[test]
    fn confirmed_bookings_are_findable() {
        let desk = BookingDesk::new();
        let booking = desk.confirm(request());

        let found = desk.find(&booking.id).expect("booking should be stored");
        assert_eq!(found.room_key, "r1");
        assert!(desk.find("BK0").is_none());
    }
}
