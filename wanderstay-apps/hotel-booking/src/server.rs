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

//! # Proxy Server
//!
//! Thin HTTP layer over the gateway and the booking desk: forwards hotel
//! and price queries upstream (re-encoded through the normalized entity
//! types), serves destination matching, and fabricates bookings. No state
//! beyond the in-memory booking ledger.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::booking::BookingDesk;
use crate::destination_matcher::DestinationCatalog;
use crate::gateway::{GatewayError, HotelApiClient};
use crate::models::{Booking, BookingRequest, Destination, Hotel, HotelPrice};

#[derive(Clone)]
pub struct AppState {
    pub client: HotelApiClient,
    pub desk: Arc<BookingDesk>,
    pub catalog: Arc<DestinationCatalog>,
}

impl AppState {
    pub fn new(
        client: HotelApiClient,
        desk: Arc<BookingDesk>,
        catalog: Arc<DestinationCatalog>,
    ) -> Self {
        Self {
            client,
            desk,
            catalog,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/destinations/search", get(search_destinations))
        .route("/api/hotels", get(list_hotels))
        .route("/api/hotels/prices", get(hotel_prices))
        .route("/api/hotels/:id", get(hotel_details))
        .route("/api/hotels/:id/prices", get(room_prices))
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/:id", get(get_booking))
        .with_state(state)
}

/// JSON error body in the shape the frontend expects:
/// `{"error": ..., "details": ...}`.
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

impl ApiError {
    fn upstream(what: &str, e: GatewayError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            error: format!("Failed to fetch {what}"),
            details: Some(e.to_string()),
        }
    }

    fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: format!("{what} not found"),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "details": self.details,
        });
        (self.status, Json(body)).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct DestinationQuery {
    #[serde(default)]
    q: String,
}

async fn search_destinations(
    State(state): State<AppState>,
    Query(query): Query<DestinationQuery>,
) -> Json<Vec<Destination>> {
    let matches: Vec<Destination> = state
        .catalog
        .search(&query.q)
        .into_iter()
        .cloned()
        .collect();
    Json(matches)
}

#[derive(Debug, Deserialize)]
struct HotelsQuery {
    #[serde(default)]
    destination_id: String,
}

async fn list_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelsQuery>,
) -> Result<Json<Vec<Hotel>>, ApiError> {
    let hotels = state
        .client
        .list_hotels(&query.destination_id)
        .await
        .map_err(|e| ApiError::upstream("hotels", e))?;
    Ok(Json(hotels))
}

async fn hotel_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Hotel>, ApiError> {
    let hotel = state
        .client
        .hotel_details(&id)
        .await
        .map_err(|e| ApiError::upstream("hotel details", e))?;
    Ok(Json(hotel))
}

async fn hotel_prices(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<HotelPrice>>, ApiError> {
    let prices = state
        .client
        .hotel_prices_query(query.into_iter().collect())
        .await
        .map_err(|e| ApiError::upstream("hotel prices", e))?;
    Ok(Json(prices))
}

async fn room_prices(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rooms = state
        .client
        .room_prices_query(&id, query.into_iter().collect())
        .await
        .map_err(|e| ApiError::upstream("hotel price", e))?;
    Ok(Json(json!({ "rooms": rooms })))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Json<serde_json::Value> {
    let booking = state.desk.confirm(request);
    Json(json!({ "success": true, "booking": booking }))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    state
        .desk
        .find(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Booking"))
}
