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

// Library for wanderstay-hotel-booking
// Hotel search pipeline, pricing API gateway, and mock booking desk.

mod booking;
mod destination_matcher;
mod gateway;
mod models;
mod results_pipeline;
mod search_params;

#[cfg(feature = "server")]
pub mod server;

// Re-export models
pub use models::{
    BillingAddress, Booking, BookingRequest, Destination, DestinationKind, GuestInfo, Hotel,
    HotelPrice, ImageDetails, MarketRate, PaymentInfo, Room, prices_from_value, rooms_from_value,
};

// Re-export the destination matcher
pub use destination_matcher::DestinationCatalog;

// Re-export the results pipeline
pub use results_pipeline::{
    FilterOptions, PAGE_SIZE, RatedHotel, ResultsPage, SortKey, build_results_page,
    compose_prices, guest_rating_estimate, page_slice, passes_filters, sort_results, total_pages,
};

// Re-export search parameters
pub use search_params::{StaySearchParams, StaySearchParamsBuilder};

// Re-export the gateway
pub use gateway::{
    DEFAULT_UPSTREAM, GatewayError, HotelApiClient, StaySearchSnapshot, UPSTREAM_ENV,
};

// Re-export the booking desk
pub use booking::{BookingDesk, STATUS_CONFIRMED};
