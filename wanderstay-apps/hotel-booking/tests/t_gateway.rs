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

//! Gateway tests against a local stub upstream. The stub answers every
//! request with an empty JSON array after a fixed delay, which is enough to
//! hold a search in flight while a newer one begins.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wanderstay_hotel_booking::{GatewayError, HotelApiClient, StaySearchParams};

async fn spawn_stub(delay: Duration) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub addr");

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(delay).await;

                let body = "[]";
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    addr
}

fn params() -> StaySearchParams {
    StaySearchParams::builder(
        "RsBU".to_string(),
        chrono::NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
        2,
        0,
    )
    .build()
    .expect("valid params")
}

#[tokio::test]
async fn newer_search_discards_the_older_in_flight_one() {
    let addr = spawn_stub(Duration::from_millis(400)).await;
    let client = HotelApiClient::with_base_url(format!("http://{addr}"), 8).expect("client");
    let params = params();

    let first = {
        let client = client.clone();
        let params = params.clone();
        tokio::spawn(async move { client.search_stay(&params).await })
    };

    // Let the first search reach the stub before starting the second.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = client.search_stay(&params).await;

    let first = first.await.expect("first search task");
    assert!(
        matches!(first, Err(GatewayError::Superseded)),
        "stale search must be discarded, got {first:?}"
    );

    let snapshot = second.expect("fresh search succeeds");
    assert_eq!(snapshot.generation, 2);
    assert!(snapshot.hotels.is_empty());
    assert!(snapshot.prices.is_empty());
}

#[tokio::test]
async fn uncontested_search_completes_normally() {
    let addr = spawn_stub(Duration::from_millis(10)).await;
    let client = HotelApiClient::with_base_url(format!("http://{addr}"), 4).expect("client");

    let snapshot = client.search_stay(&params()).await.expect("search");
    assert_eq!(snapshot.generation, 1);
    assert!(snapshot.hotels.is_empty());
}
