//! In-memory rate tables for both pricing plans.
//!
//! Tables are built once from the loaded rate files and are read-only
//! afterwards. When a key appears more than once the first row wins.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{DayBucket, DecasRoomType, Season};

/// Hotel preselected when the rate table lists it.
pub const DEFAULT_HOTEL: &str = "Isleño";

/// One row of the Decas rate file: the decas price of each room type for a
/// hotel and day bucket. An empty cell is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecasRateEntry {
    pub hotel: String,
    pub day_bucket: DayBucket,
    pub double: Option<Decimal>,
    pub triple: Option<Decimal>,
    pub quadruple: Option<Decimal>,
}

impl DecasRateEntry {
    pub fn price(
        &self,
        room_type: DecasRoomType,
    ) -> Option<Decimal> {
        match room_type {
            DecasRoomType::Double => self.double,
            DecasRoomType::Triple => self.triple,
            DecasRoomType::Quadruple => self.quadruple,
        }
    }
}

/// Decas rates keyed by (hotel, day bucket).
#[derive(Debug, Clone, Default)]
pub struct DecasRateTable {
    entries: BTreeMap<String, HashMap<DayBucket, DecasRateEntry>>,
}

impl DecasRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row. Returns `false` and keeps the existing row when the
    /// (hotel, bucket) key is already present.
    pub fn insert(
        &mut self,
        entry: DecasRateEntry,
    ) -> bool {
        let buckets = self.entries.entry(entry.hotel.clone()).or_default();
        if buckets.contains_key(&entry.day_bucket) {
            warn!(
                hotel = %entry.hotel,
                bucket = entry.day_bucket.as_str(),
                "duplicate decas rate row ignored"
            );
            return false;
        }
        buckets.insert(entry.day_bucket, entry);
        true
    }

    pub fn get(
        &self,
        hotel: &str,
        bucket: DayBucket,
    ) -> Option<&DecasRateEntry> {
        self.entries.get(hotel).and_then(|buckets| buckets.get(&bucket))
    }

    /// Hotel names in sorted order.
    pub fn hotels(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn contains_hotel(
        &self,
        hotel: &str,
    ) -> bool {
        self.entries.contains_key(hotel)
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<DecasRateEntry> for DecasRateTable {
    fn from_iter<I: IntoIterator<Item = DecasRateEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

/// One row of the All-Inclusive rate file: the per-person nightly price of a
/// room type in each season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllInclusiveRateEntry {
    pub hotel: String,
    pub room_type: String,
    pub day_bucket: DayBucket,
    pub low: Option<Decimal>,
    pub medium: Option<Decimal>,
    pub high: Option<Decimal>,
}

impl AllInclusiveRateEntry {
    pub fn price(
        &self,
        season: Season,
    ) -> Option<Decimal> {
        match season {
            Season::Low => self.low,
            Season::Medium => self.medium,
            Season::High => self.high,
        }
    }
}

type RoomBuckets = BTreeMap<String, HashMap<DayBucket, AllInclusiveRateEntry>>;

/// All-Inclusive rates keyed by (hotel, room type, day bucket).
#[derive(Debug, Clone, Default)]
pub struct AllInclusiveRateTable {
    entries: BTreeMap<String, RoomBuckets>,
}

impl AllInclusiveRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row. Returns `false` and keeps the existing row when the
    /// (hotel, room type, bucket) key is already present.
    pub fn insert(
        &mut self,
        entry: AllInclusiveRateEntry,
    ) -> bool {
        let buckets = self
            .entries
            .entry(entry.hotel.clone())
            .or_default()
            .entry(entry.room_type.clone())
            .or_default();
        if buckets.contains_key(&entry.day_bucket) {
            warn!(
                hotel = %entry.hotel,
                room_type = %entry.room_type,
                bucket = entry.day_bucket.as_str(),
                "duplicate all-inclusive rate row ignored"
            );
            return false;
        }
        buckets.insert(entry.day_bucket, entry);
        true
    }

    pub fn get(
        &self,
        hotel: &str,
        room_type: &str,
        bucket: DayBucket,
    ) -> Option<&AllInclusiveRateEntry> {
        self.entries
            .get(hotel)
            .and_then(|rooms| rooms.get(room_type))
            .and_then(|buckets| buckets.get(&bucket))
    }

    /// Nightly per-person rate, or `None` when either the row or the season
    /// cell is missing.
    pub fn rate(
        &self,
        hotel: &str,
        room_type: &str,
        bucket: DayBucket,
        season: Season,
    ) -> Option<Decimal> {
        self.get(hotel, room_type, bucket)
            .and_then(|entry| entry.price(season))
    }

    /// Hotel names in sorted order.
    pub fn hotels(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Room types offered by `hotel`, in sorted order. Empty for an unknown hotel.
    pub fn room_types(
        &self,
        hotel: &str,
    ) -> Vec<&str> {
        self.entries
            .get(hotel)
            .map(|rooms| rooms.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains_hotel(
        &self,
        hotel: &str,
    ) -> bool {
        self.entries.contains_key(hotel)
    }

    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(BTreeMap::values)
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<AllInclusiveRateEntry> for AllInclusiveRateTable {
    fn from_iter<I: IntoIterator<Item = AllInclusiveRateEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

/// Picks the hotel a fresh session starts on: `preferred` when listed,
/// otherwise the first hotel in sorted order.
pub fn pick_default_hotel<'a>(
    hotels: &[&'a str],
    preferred: &str,
) -> Option<&'a str> {
    hotels
        .iter()
        .copied()
        .find(|hotel| *hotel == preferred)
        .or_else(|| hotels.first().copied())
}
