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

//! # Proxy Server Entry Point
//!
//! Serves the booking frontend's API: upstream pass-through for hotels and
//! prices, destination matching, and in-memory booking fabrication.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wanderstay_hotel_booking::server::{AppState, router};
use wanderstay_hotel_booking::{BookingDesk, DestinationCatalog, HotelApiClient};

#[derive(Parser, Debug)]
#[command(name = "wanderstay-server")]
#[command(author, version, about = "Proxy server for the Wanderstay booking frontend")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value = "3001")]
    port: u16,

    #[arg(long, help = "Override the upstream pricing API base URL")]
    upstream: Option<String>,

    #[arg(long, help = "Path to a destination catalog JSON file")]
    destinations: Option<std::path::PathBuf>,

    #[arg(long, default_value = "4")]
    max_concurrent: u64,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".to_string().into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let client = match &args.upstream {
        Some(base) => HotelApiClient::with_base_url(base.clone(), args.max_concurrent)?,
        None => HotelApiClient::new(args.max_concurrent)?,
    };
    tracing::info!(upstream = client.base_url(), "Gateway client ready");

    let catalog = match &args.destinations {
        Some(path) => Arc::new(DestinationCatalog::from_json_file(path).await?),
        None => Arc::new(DestinationCatalog::builtin().clone()),
    };
    tracing::info!(destinations = catalog.len(), "Destination catalog loaded");

    let state = AppState::new(client, Arc::new(BookingDesk::new()), catalog);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host:port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
