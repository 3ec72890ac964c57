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

//! # Models
//!
//! One validated entity type per upstream concept. The remote pricing API is
//! loose about shape (missing fields, `null`s, casing drift between
//! `room_normalized_description` and `roomNormalizedDescription`, price feeds
//! that are sometimes a bare array and sometimes an envelope); everything is
//! normalized here so the rest of the crate never inspects raw JSON.

use serde::{Deserialize, Deserializer, Serialize};

/// A searchable place entity used to scope hotel search.
///
/// Loaded once from a static catalog and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Destination {
    pub uid: String,
    pub term: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "type", default)]
    pub kind: DestinationKind,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    City,
    Airport,
    District,
    Region,
    #[default]
    #[serde(other)]
    Other,
}

impl DestinationKind {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            DestinationKind::City => "city",
            DestinationKind::Airport => "airport",
            DestinationKind::District => "district",
            DestinationKind::Region => "region",
            DestinationKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ImageDetails {
    pub prefix: String,
    pub suffix: String,
    #[serde(default)]
    pub count: u32,
}

/// A hotel as listed for one destination. Read-only within the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    /// Star class, 0-5. Upstream occasionally reports half stars; they are
    /// rounded to the nearest whole star at the boundary.
    #[serde(default, deserialize_with = "de_star_rating")]
    pub rating: u8,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_details: Option<ImageDetails>,
}

fn de_star_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(raw.clamp(0.0, 5.0).round() as u8)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketRate {
    pub supplier: String,
    pub price: f64,
}

/// Per-hotel nightly price from the pricing feed.
///
/// `id` is a foreign key into [`Hotel::id`]; the feed is not guaranteed to
/// carry an entry for every hotel, nor to be free of duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HotelPrice {
    pub id: String,
    #[serde(default, alias = "searchRank")]
    pub search_rank: f64,
    pub price: f64,
    #[serde(default)]
    pub market_rates: Vec<MarketRate>,
}

/// A bookable room for one hotel.
///
/// The upstream exposes the normalized description under two different
/// casings across near-duplicate detail endpoints; the alias collapses them
/// into this single type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Room {
    pub key: String,
    #[serde(default, alias = "roomNormalizedDescription")]
    pub room_normalized_description: Option<String>,
    #[serde(default)]
    pub free_cancellation: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub market_rates: Vec<MarketRate>,
}

/// Tolerant decoder for the hotel price feed.
///
/// The feed arrives either as a bare JSON array or wrapped in an envelope
/// with a `hotels` key. Anything else is treated as an empty feed, never as
/// an error: a missing price means "price unknown", not a failed search.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceFeed {
    List(Vec<HotelPrice>),
    Envelope {
        #[serde(default)]
        hotels: Vec<HotelPrice>,
    },
}

pub fn prices_from_value(value: serde_json::Value) -> Vec<HotelPrice> {
    match serde_json::from_value::<PriceFeed>(value) {
        Ok(PriceFeed::List(prices)) => prices,
        Ok(PriceFeed::Envelope { hotels }) => hotels,
        Err(e) => {
            tracing::warn!("Malformed price feed, treating as empty: {e}");
            Vec::new()
        }
    }
}

/// Same tolerance for the per-hotel room feed (`{"rooms": [...]}` or a bare
/// array).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoomFeed {
    List(Vec<Room>),
    Envelope {
        #[serde(default)]
        rooms: Vec<Room>,
    },
}

pub fn rooms_from_value(value: serde_json::Value) -> Vec<Room> {
    match serde_json::from_value::<RoomFeed>(value) {
        Ok(RoomFeed::List(rooms)) => rooms,
        Ok(RoomFeed::Envelope { rooms }) => rooms,
        Err(e) => {
            tracing::warn!("Malformed room feed, treating as empty: {e}");
            Vec::new()
        }
    }
}

/// Booking payload submitted by the checkout flow. The booking wire format
/// is camelCase, unlike the hotel API entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub hotel_id: String,
    pub room_key: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: String,
    pub guest_info: GuestInfo,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<PaymentInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub billing_address: BillingAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Fabricated booking acknowledgment. Payment details are never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub hotel_id: String,
    pub room_key: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: String,
    pub guest_info: GuestInfo,
    pub total_price: f64,
    pub status: String,
    pub booking_date: String,
}
