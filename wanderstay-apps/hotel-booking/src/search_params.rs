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

//! # Stay Search Parameters
//!
//! Side-effect free parameter validation and encoding for pricing API
//! queries: destination, dates, party size, and the pipe-delimited `guests`
//! value the upstream expects.

use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StaySearchParams {
    pub destination_id: String,
    pub checkin_date: String,
    pub checkout_date: String,
    pub adults: u32,
    pub children: u32,
    pub rooms: u32,
    pub lang: String,
    pub currency: String,
    pub country_code: String,
    pub partner_id: u32,
}

impl StaySearchParams {
    pub fn builder(
        destination_id: String,
        checkin_date: NaiveDate,
        checkout_date: NaiveDate,
        adults: u32,
        children: u32,
    ) -> StaySearchParamsBuilder {
        StaySearchParamsBuilder {
            destination_id,
            checkin_date,
            checkout_date,
            adults,
            children,
            rooms: 1,
            lang: None,
            currency: None,
            country_code: None,
            partner_id: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.destination_id.is_empty(), "Destination is required");
        ensure!(self.adults >= 1, "At least one adult is required");
        // Widened so absurd party sizes fail the cap instead of wrapping.
        ensure!(
            self.adults as u64 + self.children as u64 <= 6,
            "Maximum 6 guests allowed"
        );
        ensure!(
            (1..=5).contains(&self.rooms),
            "Rooms must be between 1 and 5"
        );

        let checkin = NaiveDate::parse_from_str(&self.checkin_date, "%Y-%m-%d")
            .context("Invalid checkin date")?;
        let checkout = NaiveDate::parse_from_str(&self.checkout_date, "%Y-%m-%d")
            .context("Invalid checkout date")?;

        ensure!(checkout > checkin, "Checkout must be after check-in");
        ensure!(
            checkout - checkin <= chrono::Duration::days(30),
            "Stay must be 30 nights or fewer"
        );
        Ok(())
    }

    pub fn nights(&self) -> Result<i64> {
        let checkin = NaiveDate::parse_from_str(&self.checkin_date, "%Y-%m-%d")
            .context("Invalid checkin date")?;
        let checkout = NaiveDate::parse_from_str(&self.checkout_date, "%Y-%m-%d")
            .context("Invalid checkout date")?;
        Ok((checkout - checkin).num_days())
    }

    /// Upstream `guests` value: guests-per-room repeated once per room,
    /// joined with `|` (e.g. 2 rooms for 3 adults and 1 child is `2|2`).
    pub fn guests_param(&self) -> String {
        let rooms = self.rooms.max(1);
        let per_room = (self.adults as u64 + self.children as u64).div_ceil(rooms as u64);
        vec![per_room.to_string(); rooms as usize].join("|")
    }

    /// Query pairs for the pricing endpoints.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("destination_id".into(), self.destination_id.clone()),
            ("checkin".into(), self.checkin_date.clone()),
            ("checkout".into(), self.checkout_date.clone()),
            ("lang".into(), self.lang.clone()),
            ("currency".into(), self.currency.clone()),
            ("country_code".into(), self.country_code.clone()),
            ("guests".into(), self.guests_param()),
            ("partner_id".into(), self.partner_id.to_string()),
        ]
    }
}

#[derive(Clone)]
pub struct StaySearchParamsBuilder {
    destination_id: String,
    checkin_date: NaiveDate,
    checkout_date: NaiveDate,
    adults: u32,
    children: u32,
    rooms: u32,
    lang: Option<String>,
    currency: Option<String>,
    country_code: Option<String>,
    partner_id: Option<u32>,
}

impl StaySearchParamsBuilder {
    pub fn rooms(mut self, rooms: u32) -> Self {
        self.rooms = rooms;
        self
    }

    pub fn lang(mut self, lang: String) -> Self {
        self.lang = Some(lang);
        self
    }

    pub fn currency(mut self, currency: String) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn country_code(mut self, country_code: String) -> Self {
        self.country_code = Some(country_code);
        self
    }

    pub fn partner_id(mut self, partner_id: u32) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn build(self) -> Result<StaySearchParams> {
        let params = StaySearchParams {
            destination_id: self.destination_id,
            checkin_date: self.checkin_date.format("%Y-%m-%d").to_string(),
            checkout_date: self.checkout_date.format("%Y-%m-%d").to_string(),
            adults: self.adults,
            children: self.children,
            rooms: self.rooms,
            lang: self.lang.unwrap_or_else(|| "en_US".to_string()),
            currency: self.currency.unwrap_or_else(|| "SGD".to_string()),
            country_code: self.country_code.unwrap_or_else(|| "SG".to_string()),
            partner_id: self.partner_id.unwrap_or(1),
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn builder_defaults() {
        let params = StaySearchParams::builder(
            "RsBU".to_string(),
            date("2026-09-10"),
            date("2026-09-14"),
            2,
            0,
        )
        .build()
        .unwrap();

        assert_eq!(params.currency, "SGD");
        assert_eq!(params.lang, "en_US");
        assert_eq!(params.partner_id, 1);
        assert_eq!(params.nights().unwrap(), 4);
    }

    #[test]
    fn checkout_must_follow_checkin() {
        let err = StaySearchParams::builder(
            "RsBU".to_string(),
            date("2026-09-14"),
            date("2026-09-10"),
            2,
            0,
        )
        .build()
        .unwrap_err();
        assert!(err.to_string().contains("after check-in"));
    }

    #[test]
    fn party_size_is_bounded() {
        let err = StaySearchParams::builder(
            "RsBU".to_string(),
            date("2026-09-10"),
            date("2026-09-12"),
            5,
            3,
        )
        .build()
        .unwrap_err();
        assert!(err.to_string().contains("Maximum 6 guests"));
    }

    #[test]
    fn guest_cap_survives_huge_party_sizes() {
        let params = StaySearchParams {
            destination_id: "RsBU".to_string(),
            checkin_date: "2026-09-10".to_string(),
            checkout_date: "2026-09-12".to_string(),
            adults: u32::MAX,
            children: 1,
            rooms: 1,
            lang: "en_US".to_string(),
            currency: "SGD".to_string(),
            country_code: "SG".to_string(),
            partner_id: 1,
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("Maximum 6 guests"));
    }

    #[test]
    fn guests_param_splits_party_across_rooms() {
        let params = StaySearchParams::builder(
            "RsBU".to_string(),
            date("2026-09-10"),
            date("2026-09-12"),
            3,
            1,
        )
        .rooms(2)
        .build()
        .unwrap();
        assert_eq!(params.guests_param(), "2|2");

        let single = StaySearchParams::builder(
            "RsBU".to_string(),
            date("2026-09-10"),
            date("2026-09-12"),
            2,
            0,
        )
        .build()
        .unwrap();
        assert_eq!(single.guests_param(), "2");
    }
}
