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
//!
//! # Examples
//!
//! ## Basic search
//!
//! ```bash
//! wanderstay-hotels -d "Singapore" -i 2026-09-10 -o 2026-09-14
//! ```
//!
//! ## Search with filters
//!
//! ```bash
//! # 4-5 star hotels between $100 and $300/night, cheapest first
//! wanderstay-hotels -d "Tokyo" -i 2026-10-01 -o 2026-10-05 -s 4,5 --min-price 100 --max-price 300
//! ```
//!
//! ## Typo-tolerant destination match only
//!
//! ```bash
//! wanderstay-hotels -d "singpore" --match-only
//! ```
//!
//! ## Sorted and paged
//!
//! ```bash
//! wanderstay-hotels -d "Paris" -i 2026-11-02 -o 2026-11-06 -S rating-high -p 2
//! ```
//!
//! # Output
//!
//! The tool prints the matched destination and search parameters followed by
//! one page (12 entries) of matching hotels with name, star class, nightly
//! price (or "unavailable"), and address.

use anyhow::{Context, Result, bail};
use clap::Parser;
use wanderstay_hotel_booking::{
    DestinationCatalog, FilterOptions, HotelApiClient, SortKey, StaySearchParams,
    build_results_page, guest_rating_estimate,
};

#[derive(Parser, Debug)]
#[command(name = "wanderstay-hotels")]
#[command(version = "0.1.0")]
#[command(about = "Search hotels via the Wanderstay pricing gateway")]
struct Args {
    #[arg(short = 'd', long, help = "Destination query (typo tolerant)")]
    destination: String,
    #[arg(long, help = "Skip matching and use this destination uid directly")]
    destination_id: Option<String>,
    #[arg(short = 'i', long)]
    checkin: Option<String>,
    #[arg(short = 'o', long)]
    checkout: Option<String>,
    #[arg(short = 'a', long, default_value = "2")]
    adults: u32,
    #[arg(short = 'c', long, default_value = "0")]
    children: u32,
    #[arg(short = 'r', long, default_value = "1")]
    rooms: u32,
    #[arg(short = 'C', long, default_value = "SGD")]
    currency: String,
    #[arg(short = 's', long, help = "Star ratings (comma-separated, e.g., 4,5)")]
    stars: Option<String>,
    #[arg(
        short = 'g',
        long,
        help = "Guest rating thresholds 0-10 (comma-separated; any satisfied keeps a hotel)"
    )]
    guest_rating: Option<String>,
    #[arg(long, help = "Minimum price per night")]
    min_price: Option<f64>,
    #[arg(long, help = "Maximum price per night")]
    max_price: Option<f64>,
    #[arg(
        short = 'S',
        long,
        default_value = "price-asc",
        help = "Sort: price-asc, price-high, rating-high, rating-low, name"
    )]
    sort: String,
    #[arg(short = 'p', long, default_value = "1")]
    page: i64,
    #[arg(long, help = "Path to a destination catalog JSON file")]
    destinations: Option<std::path::PathBuf>,
    #[arg(long, help = "Print destination matches without searching")]
    match_only: bool,
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date: {}", s))
}

fn parse_stars(s: &str) -> Result<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|a| {
            let v: u8 = a
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid star rating: {}", a.trim()))?;
            if (1..=5).contains(&v) {
                Ok(v)
            } else {
                Err(anyhow::anyhow!("Star rating out of range (1-5): {}", v))
            }
        })
        .collect()
}

fn parse_guest_ratings(s: &str) -> Result<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|a| {
            let v: u8 = a
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid guest rating: {}", a.trim()))?;
            if v <= 10 {
                Ok(v)
            } else {
                Err(anyhow::anyhow!("Guest rating out of range (0-10): {}", v))
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file_catalog;
    let catalog: &DestinationCatalog = match &args.destinations {
        Some(path) => {
            file_catalog = DestinationCatalog::from_json_file(path).await?;
            &file_catalog
        }
        None => DestinationCatalog::builtin(),
    };

    let destination = match &args.destination_id {
        Some(uid) => catalog
            .get(uid)
            .with_context(|| format!("Unknown destination uid: {uid}"))?
            .clone(),
        None => {
            let matches = catalog.search(&args.destination);
            if matches.is_empty() {
                bail!("No destination matches \"{}\"", args.destination);
            }
            if args.match_only || matches.len() > 1 {
                println!("\n📍 Destination matches for \"{}\":", args.destination);
                for (i, d) in matches.iter().enumerate() {
                    let state = if d.state.is_empty() {
                        String::new()
                    } else {
                        format!(" — {}", d.state)
                    };
                    println!("{}. {}{} [{}] ({})", i + 1, d.term, state, d.kind.as_str_name(), d.uid);
                }
            }
            matches[0].clone()
        }
    };

    if args.match_only {
        return Ok(());
    }

    let checkin = parse_date(
        args.checkin
            .as_deref()
            .context("--checkin is required unless --match-only")?,
    )?;
    let checkout = parse_date(
        args.checkout
            .as_deref()
            .context("--checkout is required unless --match-only")?,
    )?;

    let star_filter = args
        .stars
        .as_deref()
        .map(parse_stars)
        .transpose()?
        .unwrap_or_default();
    let guest_rating_filter = args
        .guest_rating
        .as_deref()
        .map(parse_guest_ratings)
        .transpose()?
        .unwrap_or_default();

    let params = StaySearchParams::builder(
        destination.uid.clone(),
        checkin,
        checkout,
        args.adults,
        args.children,
    )
    .rooms(args.rooms)
    .currency(args.currency.clone())
    .build()?;

    let filters = FilterOptions {
        star_rating: star_filter,
        guest_rating: guest_rating_filter,
        ..Default::default()
    }
    .price_range(
        args.min_price.unwrap_or(0.0),
        args.max_price.unwrap_or(f64::INFINITY),
    );
    let sort = SortKey::parse_or_default(&args.sort);

    println!("\n🏨 Wanderstay Hotel Search");
    println!("==========================");
    println!("Destination: {} ({})", destination.term, destination.uid);
    println!("Dates: {} to {}", checkin, checkout);
    println!(
        "Guests: {} adults, {} children in {} room(s)",
        args.adults, args.children, args.rooms
    );
    if let Some(s) = &args.stars {
        println!("Stars: {}", s);
    }
    if let Some(g) = &args.guest_rating {
        println!("Guest rating: {}+", g);
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        println!(
            "Price: {} to {}",
            args.min_price.map_or("-".to_string(), |p| p.to_string()),
            args.max_price.map_or("-".to_string(), |p| p.to_string()),
        );
    }
    println!("Sort: {}", sort.as_str_name());
    println!("==========================\n");

    const MAX_CONCURRENT_REQUESTS: u64 = 4;
    let client = HotelApiClient::new(MAX_CONCURRENT_REQUESTS)?;

    let snapshot = match client.search_stay(&params).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Search failed: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    };

    let results = build_results_page(snapshot.hotels, &snapshot.prices, &filters, sort, args.page);

    if results.total_matches == 0 {
        println!("No hotels match your filters.");
        return Ok(());
    }

    println!(
        "Found {} hotel(s) — page {} of {}",
        results.total_matches, results.page, results.total_pages
    );
    if results.hotels.is_empty() {
        println!("(page out of range)");
        return Ok(());
    }
    println!();

    let offset = (results.page - 1) * wanderstay_hotel_booking::PAGE_SIZE as i64;
    for (i, entry) in results.hotels.iter().enumerate() {
        let hotel = &entry.hotel;
        println!("{}. {}", offset + i as i64 + 1, hotel.name);
        if hotel.rating > 0 {
            println!(
                "   {} stars (guest rating ~{}/10)",
                hotel.rating,
                guest_rating_estimate(hotel)
            );
        }
        match &entry.price {
            Some(p) => println!("   Price: {} {:.2}/night", args.currency, p.price),
            None => println!("   Price: unavailable"),
        }
        if !hotel.address.is_empty() {
            println!("   Address: {}", hotel.address);
        }
        if !hotel.amenities.is_empty() {
            let shown: Vec<&str> = hotel.amenities.iter().take(6).map(|a| a.as_str()).collect();
            println!("   Amenities: {}", shown.join(", "));
        }
        println!();
    }

    Ok(())
}
