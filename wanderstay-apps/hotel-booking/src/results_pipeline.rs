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

//! # Results Pipeline
//!
//! Pure stages composed in fixed order: compose -> filter -> sort ->
//! paginate. Each stage is independently testable; recomputing a page after
//! a filter/sort/page change is just calling [`build_results_page`] again on
//! the same in-memory snapshot.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Hotel, HotelPrice};

/// Fixed page size of the results grid.
pub const PAGE_SIZE: usize = 12;

/// A hotel joined with its (possibly unknown) nightly price.
///
/// An unknown price means the feed had no entry for this hotel. It is never
/// coerced to zero and never grounds for exclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RatedHotel {
    pub hotel: Hotel,
    pub price: Option<HotelPrice>,
}

/// Join hotels with their prices by id, preserving hotel order.
///
/// One output entry per hotel. If the feed carries duplicate entries for an
/// id, the first in feed order wins. An empty feed composes every hotel
/// with an unknown price.
pub fn compose_prices(hotels: Vec<Hotel>, prices: &[HotelPrice]) -> Vec<RatedHotel> {
    hotels
        .into_iter()
        .map(|hotel| {
            let price = prices.iter().find(|p| p.id == hotel.id).cloned();
            RatedHotel { hotel, price }
        })
        .collect()
}

/// Guest rating proxy in absence of real review data: twice the star class,
/// capped at 10.
pub fn guest_rating_estimate(hotel: &Hotel) -> u8 {
    (hotel.rating.saturating_mul(2)).min(10)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterOptions {
    /// Exact star classes to keep. Empty means no constraint.
    #[serde(default)]
    pub star_rating: Vec<u8>,
    /// Guest-rating thresholds; keeping requires meeting ANY of them.
    /// Empty means no constraint.
    #[serde(default)]
    pub guest_rating: Vec<u8>,
    /// Inclusive nightly price bounds. Items with unknown price always pass.
    #[serde(default = "unbounded_price_range")]
    pub price_range: (f64, f64),
}

fn unbounded_price_range() -> (f64, f64) {
    (0.0, f64::INFINITY)
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            star_rating: Vec::new(),
            guest_rating: Vec::new(),
            price_range: unbounded_price_range(),
        }
    }
}

impl FilterOptions {
    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = (min, max);
        self
    }
}

/// Keep/drop predicate over one composed pair. AND across the three filter
/// categories, OR within the guest-rating thresholds.
pub fn passes_filters(entry: &RatedHotel, filters: &FilterOptions) -> bool {
    if !filters.star_rating.is_empty() && !filters.star_rating.contains(&entry.hotel.rating) {
        return false;
    }

    if let Some(price) = &entry.price {
        let (min, max) = filters.price_range;
        if price.price < min || price.price > max {
            return false;
        }
    }

    if !filters.guest_rating.is_empty() {
        let estimate = guest_rating_estimate(&entry.hotel);
        if !filters.guest_rating.iter().any(|&t| estimate >= t) {
            return false;
        }
    }

    true
}

/// Closed set of orderings selectable in the results view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    PriceAscending,
    PriceDescending,
    RatingDescending,
    RatingAscending,
    Name,
}

impl SortKey {
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "price-asc" | "price-low" | "price_asc" => Some(SortKey::PriceAscending),
            "price-high" | "price_high" => Some(SortKey::PriceDescending),
            "rating-high" | "rating_high" => Some(SortKey::RatingDescending),
            "rating-low" | "rating_low" => Some(SortKey::RatingAscending),
            "name" => Some(SortKey::Name),
            _ => None,
        }
    }

    pub fn as_str_name(&self) -> &'static str {
        match self {
            SortKey::PriceAscending => "price-asc",
            SortKey::PriceDescending => "price-high",
            SortKey::RatingDescending => "rating-high",
            SortKey::RatingAscending => "rating-low",
            SortKey::Name => "name",
        }
    }

    /// Unknown sort keys fall back to the default order instead of erroring.
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str_name(s).unwrap_or_default()
    }
}

fn price_order(a: &RatedHotel, b: &RatedHotel, descending: bool) -> Ordering {
    match (&a.price, &b.price) {
        // Unknown prices sort after all known prices in both directions.
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.price.partial_cmp(&y.price).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
    }
}

/// Stable total order over the filtered sequence.
pub fn sort_results(entries: &mut [RatedHotel], sort: SortKey) {
    match sort {
        SortKey::PriceAscending => entries.sort_by(|a, b| price_order(a, b, false)),
        SortKey::PriceDescending => entries.sort_by(|a, b| price_order(a, b, true)),
        SortKey::RatingDescending => entries.sort_by(|a, b| b.hotel.rating.cmp(&a.hotel.rating)),
        SortKey::RatingAscending => entries.sort_by(|a, b| a.hotel.rating.cmp(&b.hotel.rating)),
        SortKey::Name => entries.sort_by(|a, b| {
            a.hotel
                .name
                .to_lowercase()
                .cmp(&b.hotel.name.to_lowercase())
        }),
    }
}

/// 1-based page slice. Page 0, negative pages, and pages past the end all
/// yield an empty slice rather than an error.
pub fn page_slice<T>(items: &[T], page: i64) -> &[T] {
    if page < 1 {
        return &[];
    }
    let start = (page as usize - 1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `len` items; 0 for an empty sequence.
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// One rendered page of results plus the totals the view needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResultsPage {
    pub hotels: Vec<RatedHotel>,
    pub page: i64,
    pub total_matches: usize,
    pub total_pages: usize,
}

/// Full pipeline run over one in-memory snapshot of hotels and prices.
pub fn build_results_page(
    hotels: Vec<Hotel>,
    prices: &[HotelPrice],
    filters: &FilterOptions,
    sort: SortKey,
    page: i64,
) -> ResultsPage {
    let mut entries = compose_prices(hotels, prices);
    entries.retain(|entry| passes_filters(entry, filters));
    sort_results(&mut entries, sort);

    let total_matches = entries.len();
    let hotels = page_slice(&entries, page).to_vec();

    ResultsPage {
        hotels,
        page,
        total_matches,
        total_pages: total_pages(total_matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(id: &str, name: &str, rating: u8) -> Hotel {
        Hotel {
            id: id.to_string(),
            name: name.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            address: String::new(),
            rating,
            categories: Vec::new(),
            amenities: Vec::new(),
            description: String::new(),
            image_details: None,
        }
    }

    fn price(id: &str, price: f64) -> HotelPrice {
        HotelPrice {
            id: id.to_string(),
            search_rank: 0.0,
            price,
            market_rates: Vec::new(),
        }
    }

    fn ids(entries: &[RatedHotel]) -> Vec<&str> {
        entries.iter().map(|e| e.hotel.id.as_str()).collect()
    }

    #[test]
    fn compose_keeps_every_hotel_once() {
        let hotels = vec![hotel("a", "A", 4), hotel("b", "B", 2), hotel("c", "C", 5)];
        let prices = vec![price("a", 100.0), price("c", 50.0)];

        let composed = compose_prices(hotels, &prices);
        assert_eq!(ids(&composed), vec!["a", "b", "c"]);
        assert_eq!(composed[0].price.as_ref().map(|p| p.price), Some(100.0));
        assert!(composed[1].price.is_none());
        assert_eq!(composed[2].price.as_ref().map(|p| p.price), Some(50.0));
    }

    #[test]
    fn duplicate_price_entries_first_wins() {
        let hotels = vec![hotel("a", "A", 3)];
        let prices = vec![price("a", 80.0), price("a", 200.0)];

        let composed = compose_prices(hotels, &prices);
        assert_eq!(composed[0].price.as_ref().map(|p| p.price), Some(80.0));
    }

    #[test]
    fn empty_price_feed_means_all_unknown() {
        let hotels = vec![hotel("a", "A", 3), hotel("b", "B", 4)];
        let composed = compose_prices(hotels, &[]);
        assert_eq!(composed.len(), 2);
        assert!(composed.iter().all(|e| e.price.is_none()));
    }

    #[test]
    fn empty_filter_sets_are_identity() {
        let hotels = vec![hotel("a", "A", 4), hotel("b", "B", 2), hotel("c", "C", 5)];
        let prices = vec![price("a", 100.0), price("c", 50.0)];
        let composed = compose_prices(hotels, &prices);

        let filters = FilterOptions::default().price_range(0.0, 1000.0);
        let kept: Vec<_> = composed
            .iter()
            .filter(|e| passes_filters(e, &filters))
            .collect();
        assert_eq!(kept.len(), 3, "b has no price and must not be dropped");
    }

    #[test]
    fn star_filter_is_exact_membership() {
        let hotels = vec![hotel("a", "A", 4), hotel("b", "B", 2), hotel("c", "C", 5)];
        let composed = compose_prices(hotels, &[]);

        let filters = FilterOptions {
            star_rating: vec![5],
            ..Default::default()
        };
        let kept: Vec<_> = composed
            .iter()
            .filter(|e| passes_filters(e, &filters))
            .collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].hotel.id, "c");
    }

    #[test]
    fn price_filter_never_drops_unknown_price() {
        let entry = RatedHotel {
            hotel: hotel("x", "X", 3),
            price: None,
        };
        let filters = FilterOptions::default().price_range(500.0, 600.0);
        assert!(passes_filters(&entry, &filters));

        let priced = RatedHotel {
            hotel: hotel("y", "Y", 3),
            price: Some(price("y", 100.0)),
        };
        assert!(!passes_filters(&priced, &filters));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filters = FilterOptions::default().price_range(100.0, 200.0);
        for (value, keep) in [(100.0, true), (200.0, true), (99.99, false), (200.01, false)] {
            let entry = RatedHotel {
                hotel: hotel("x", "X", 3),
                price: Some(price("x", value)),
            };
            assert_eq!(passes_filters(&entry, &filters), keep, "price {value}");
        }
    }

    #[test]
    fn guest_rating_is_or_across_thresholds() {
        // 3 stars estimates to 6.
        let entry = RatedHotel {
            hotel: hotel("x", "X", 3),
            price: None,
        };

        let loose = FilterOptions {
            guest_rating: vec![9, 6],
            ..Default::default()
        };
        assert!(passes_filters(&entry, &loose), "meets the 6 threshold");

        let strict = FilterOptions {
            guest_rating: vec![9, 8],
            ..Default::default()
        };
        assert!(!passes_filters(&entry, &strict));
    }

    #[test]
    fn guest_rating_estimate_caps_at_ten() {
        assert_eq!(guest_rating_estimate(&hotel("x", "X", 5)), 10);
        assert_eq!(guest_rating_estimate(&hotel("x", "X", 2)), 4);
        assert_eq!(guest_rating_estimate(&hotel("x", "X", 0)), 0);
    }

    #[test]
    fn price_sorts_reverse_known_and_pin_unknown_last() {
        let hotels = vec![hotel("a", "A", 4), hotel("b", "B", 2), hotel("c", "C", 5)];
        let prices = vec![price("a", 100.0), price("c", 50.0)];

        let mut asc = compose_prices(hotels.clone(), &prices);
        sort_results(&mut asc, SortKey::PriceAscending);
        assert_eq!(ids(&asc), vec!["c", "a", "b"]);

        let mut desc = compose_prices(hotels, &prices);
        sort_results(&mut desc, SortKey::PriceDescending);
        assert_eq!(ids(&desc), vec!["a", "c", "b"]);
    }

    #[test]
    fn rating_sorts_both_directions() {
        let hotels = vec![hotel("a", "A", 4), hotel("b", "B", 2), hotel("c", "C", 5)];
        let mut entries = compose_prices(hotels.clone(), &[]);
        sort_results(&mut entries, SortKey::RatingDescending);
        assert_eq!(ids(&entries), vec!["c", "a", "b"]);

        let mut entries = compose_prices(hotels, &[]);
        sort_results(&mut entries, SortKey::RatingAscending);
        assert_eq!(ids(&entries), vec!["b", "a", "c"]);
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let hotels = vec![
            hotel("a", "zenith Suites", 3),
            hotel("b", "Astoria", 3),
            hotel("c", "marina Bay", 3),
        ];
        let mut entries = compose_prices(hotels, &[]);
        sort_results(&mut entries, SortKey::Name);
        assert_eq!(ids(&entries), vec!["b", "c", "a"]);
    }

    #[test]
    fn equal_keys_preserve_input_order() {
        let hotels = vec![
            hotel("first", "F", 3),
            hotel("second", "S", 3),
            hotel("third", "T", 3),
        ];
        let mut entries = compose_prices(hotels, &[]);
        sort_results(&mut entries, SortKey::RatingDescending);
        assert_eq!(ids(&entries), vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_sort_key_defaults_to_price_ascending() {
        assert_eq!(SortKey::parse_or_default("price-high"), SortKey::PriceDescending);
        assert_eq!(SortKey::parse_or_default("bogus"), SortKey::PriceAscending);
        assert_eq!(SortKey::parse_or_default(""), SortKey::PriceAscending);
    }

    #[test]
    fn pagination_concatenation_reproduces_sequence() {
        let items: Vec<u32> = (0..30).collect();
        let mut rebuilt = Vec::new();
        for page in 1..=(total_pages(items.len()) as i64) {
            rebuilt.extend_from_slice(page_slice(&items, page));
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<u32> = (0..5).collect();
        assert!(page_slice(&items, 0).is_empty());
        assert!(page_slice(&items, -3).is_empty());
        assert!(page_slice(&items, 2).is_empty());
        assert_eq!(page_slice(&items, 1).len(), 5);
    }

    #[test]
    fn total_pages_rounds_up_and_handles_empty() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(12), 1);
        assert_eq!(total_pages(13), 2);
        assert_eq!(total_pages(24), 2);
    }

    #[test]
    fn full_pipeline_small_snapshot() {
        let hotels = vec![hotel("a", "A", 4), hotel("b", "B", 2), hotel("c", "C", 5)];
        let prices = vec![price("a", 100.0), price("c", 50.0)];

        let page = build_results_page(
            hotels,
            &prices,
            &FilterOptions::default().price_range(0.0, 1000.0),
            SortKey::PriceAscending,
            1,
        );

        assert_eq!(page.total_matches, 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(ids(&page.hotels), vec!["c", "a", "b"]);
    }
}
