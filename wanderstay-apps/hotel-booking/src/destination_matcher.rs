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

//! # Destination Matcher
//!
//! Typo-tolerant search over the static destination catalog. Pure function
//! of (query, catalog): scores each destination against `term` and `state`,
//! keeps everything above a similarity floor, and returns the top matches
//! best first. Ties keep catalog order.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::path::Path;

use crate::models::Destination;

/// Result cap, matching the suggestion dropdown.
const MAX_MATCHES: usize = 5;

/// Minimum blended similarity for a destination to count as a match.
/// Jaro-Winkler is generous with unrelated words of similar length, so the
/// floor sits high; prefix and substring boosts clear it on purpose.
const SCORE_FLOOR: f64 = 0.8;

static BUILTIN: Lazy<DestinationCatalog> = Lazy::new(|| {
    let destinations: Vec<Destination> =
        serde_json::from_str(include_str!("destinations.json"))
            .expect("embedded destination catalog is valid JSON");
    DestinationCatalog::new(destinations)
});

#[derive(Clone, Debug)]
pub struct DestinationCatalog {
    destinations: Vec<Destination>,
}

impl DestinationCatalog {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> &'static DestinationCatalog {
        &BUILTIN
    }

    /// Load a catalog from an external JSON file (same shape as the
    /// embedded one).
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read destination catalog {}", path.display()))?;
        let destinations: Vec<Destination> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid destination catalog {}", path.display()))?;
        Ok(Self::new(destinations))
    }

    pub fn get(&self, uid: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.uid == uid)
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Top matches for a free-text query, best first, capped at 5.
    ///
    /// An empty or whitespace query returns no matches rather than the whole
    /// catalog. Never fails: an unmatchable query is an empty result.
    pub fn search(&self, query: &str) -> Vec<&Destination> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = self
            .destinations
            .iter()
            .enumerate()
            .filter_map(|(idx, dest)| {
                let score = similarity(&query, &dest.term).max(similarity(&query, &dest.state));
                (score >= SCORE_FLOOR).then_some((idx, score))
            })
            .collect();

        // Stable sort: equal scores keep catalog order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(MAX_MATCHES);
        scored
            .into_iter()
            .map(|(idx, _)| &self.destinations[idx])
            .collect()
    }
}

/// Blend of Jaro-Winkler and normalized Levenshtein against the full field,
/// with a substring boost so a short query still finds a long field it
/// appears in (`"kuala"` against `"Kuala Lumpur"`).
fn similarity(query: &str, field: &str) -> f64 {
    let field = field.trim().to_lowercase();
    if field.is_empty() {
        return 0.0;
    }

    let jw = strsim::jaro_winkler(query, &field);
    let lev = strsim::normalized_levenshtein(query, &field);
    let mut score = jw.max(lev);

    if field.starts_with(query) {
        score = score.max(0.9);
    } else if field.contains(query) && query.len() >= 3 {
        score = score.max(0.82);
    }

    score
}
