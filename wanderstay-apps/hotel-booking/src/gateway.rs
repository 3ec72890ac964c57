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

//! # Pricing API Gateway
//!
//! Effectful (network) operations against the remote hotel pricing API.
//! Retries and concurrency limits live here, behind the query queue; the
//! results pipeline itself never retries. Each search runs under a ticket
//! from the search sequencer so a slow response from a superseded search is
//! discarded instead of overwriting fresher results.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use wanderstay_query_queues::{QueryQueue, SearchSequencer};

use crate::models::{Hotel, HotelPrice, Room, prices_from_value, rooms_from_value};
use crate::search_params::StaySearchParams;

pub const DEFAULT_UPSTREAM: &str = "https://hotelapi.loyalty.dev";

/// Environment override for the upstream base URL.
pub const UPSTREAM_ENV: &str = "WANDERSTAY_UPSTREAM";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Distinguishable upstream failure signal surfaced to callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("upstream request failed")]
    Transport(#[source] anyhow::Error),
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),
    #[error("failed to decode upstream response")]
    Decode(#[source] anyhow::Error),
    #[error("search superseded by a newer request")]
    Superseded,
}

/// Hotels and prices fetched under one search generation.
#[derive(Debug, Clone)]
pub struct StaySearchSnapshot {
    pub hotels: Vec<Hotel>,
    pub prices: Vec<HotelPrice>,
    pub generation: u64,
}

#[derive(Clone)]
pub struct HotelApiClient {
    client: Arc<reqwest::Client>,
    base_url: String,
    query_queue: QueryQueue,
    sequencer: SearchSequencer,
}

impl HotelApiClient {
    /// Client against the default upstream (or `WANDERSTAY_UPSTREAM`).
    pub fn new(max_concurrent: u64) -> Result<Self, GatewayError> {
        let base_url =
            std::env::var(UPSTREAM_ENV).unwrap_or_else(|_| DEFAULT_UPSTREAM.to_string());
        Self::with_base_url(base_url, max_concurrent)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        max_concurrent: u64,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Transport(anyhow::anyhow!(e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: Arc::new(client),
            base_url,
            query_queue: QueryQueue::with_max_concurrent(max_concurrent),
            sequencer: SearchSequencer::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let client = Arc::clone(&self.client);

        let response = self
            .query_queue
            .with_retry(move || {
                let client = Arc::clone(&client);
                let url = url.clone();
                let query = query.clone();
                async move {
                    tracing::info!(%url, "Fetching upstream");
                    let resp = client.get(&url).query(&query).send().await?;
                    Ok(resp)
                }
            })
            .await
            .map_err(|e| GatewayError::Transport(anyhow::anyhow!(e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "Upstream rejected request");
            return Err(GatewayError::UpstreamStatus(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(anyhow::anyhow!(e)))
    }

    /// List hotels for a destination.
    pub async fn list_hotels(&self, destination_id: &str) -> Result<Vec<Hotel>, GatewayError> {
        let value = self
            .get_json(
                "/api/hotels",
                vec![("destination_id".into(), destination_id.into())],
            )
            .await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Decode(anyhow::anyhow!(e)))
    }

    /// Fetch one hotel's details.
    pub async fn hotel_details(&self, hotel_id: &str) -> Result<Hotel, GatewayError> {
        let value = self
            .get_json(&format!("/api/hotels/{hotel_id}"), Vec::new())
            .await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Decode(anyhow::anyhow!(e)))
    }

    /// Fetch per-hotel prices for a destination search. A malformed feed is
    /// an empty price list, not an error.
    pub async fn hotel_prices(
        &self,
        params: &StaySearchParams,
    ) -> Result<Vec<HotelPrice>, GatewayError> {
        self.hotel_prices_query(params.query_pairs()).await
    }

    /// Price fetch with caller-supplied query pairs (proxy passthrough).
    pub async fn hotel_prices_query(
        &self,
        query: Vec<(String, String)>,
    ) -> Result<Vec<HotelPrice>, GatewayError> {
        let value = self.get_json("/api/hotels/prices", query).await?;
        Ok(prices_from_value(value))
    }

    /// Fetch room-level prices for one hotel.
    pub async fn room_prices(
        &self,
        hotel_id: &str,
        params: &StaySearchParams,
    ) -> Result<Vec<Room>, GatewayError> {
        self.room_prices_query(hotel_id, params.query_pairs()).await
    }

    /// Room price fetch with caller-supplied query pairs (proxy
    /// passthrough).
    pub async fn room_prices_query(
        &self,
        hotel_id: &str,
        query: Vec<(String, String)>,
    ) -> Result<Vec<Room>, GatewayError> {
        let value = self
            .get_json(&format!("/api/hotels/{hotel_id}/prices"), query)
            .await?;
        Ok(rooms_from_value(value))
    }

    /// Run a full destination search: hotels and prices fetched
    /// concurrently under one search generation.
    ///
    /// If a newer search begins while this one is in flight, the result is
    /// dropped with [`GatewayError::Superseded`] so stale data can never
    /// overwrite a fresher snapshot.
    pub async fn search_stay(
        &self,
        params: &StaySearchParams,
    ) -> Result<StaySearchSnapshot, GatewayError> {
        let ticket = self.sequencer.begin();

        let (hotels, prices) = tokio::join!(
            self.list_hotels(&params.destination_id),
            self.hotel_prices(params),
        );

        if !ticket.is_current() {
            tracing::info!(
                generation = ticket.generation(),
                "Discarding superseded search response"
            );
            return Err(GatewayError::Superseded);
        }

        Ok(StaySearchSnapshot {
            hotels: hotels?,
            prices: prices?,
            generation: ticket.generation(),
        })
    }
}
