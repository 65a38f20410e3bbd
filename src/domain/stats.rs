// src/domain/stats.rs

use crate::domain::listing::Listing;
use crate::domain::metrics::price_per_area;
use crate::domain::normalize::{NormalizedListing, Normalizer};
use std::collections::BTreeMap;

/// Aggregates for one room count.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomStats {
    pub rooms: u32,
    pub count: usize,
    pub average_price: f64,
    pub average_surface: f64,
    /// Total price over total surface, not the mean of per-listing ratios.
    pub price_per_area: f64,
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingStats {
    pub count: usize,
    pub priced_count: usize,
    pub average_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub average_price_per_area: Option<f64>,
    pub by_rooms: Vec<RoomStats>,
}

#[derive(Default)]
struct RoomAccumulator {
    count: usize,
    total_price: f64,
    total_surface: f64,
    min_price: f64,
    max_price: f64,
}

/// Summary of a (possibly filtered) listing view.
///
/// Listings without a positive price are counted but left out of the price
/// figures; the per-room breakdown only keeps listings that have an integral
/// room count, a price and a surface.
pub fn summarize<'a, I>(listings: I, normalizer: &Normalizer) -> ListingStats
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut stats = ListingStats::default();
    let mut total_price = 0.0;
    let mut ratios = Vec::new();
    let mut rooms: BTreeMap<u32, RoomAccumulator> = BTreeMap::new();

    for listing in listings {
        stats.count += 1;

        let price = normalizer.price(listing);
        if !(price > 0.0) {
            continue;
        }

        stats.priced_count += 1;
        total_price += price;
        stats.min_price = Some(stats.min_price.map_or(price, |m| m.min(price)));
        stats.max_price = Some(stats.max_price.map_or(price, |m| m.max(price)));

        let surface = normalizer.surface_m2(listing);
        let Some(ratio) = price_per_area(price, surface) else {
            continue;
        };
        ratios.push(ratio);

        let room_count = normalizer.rooms(listing);
        if room_count.is_finite() && room_count >= 0.0 && room_count.fract() == 0.0 {
            let acc = rooms.entry(room_count as u32).or_insert_with(|| RoomAccumulator {
                min_price: f64::INFINITY,
                ..Default::default()
            });
            acc.count += 1;
            acc.total_price += price;
            acc.total_surface += surface;
            acc.min_price = acc.min_price.min(price);
            acc.max_price = acc.max_price.max(price);
        }
    }

    if stats.priced_count > 0 {
        stats.average_price = Some(total_price / stats.priced_count as f64);
    }
    if !ratios.is_empty() {
        stats.average_price_per_area = Some(ratios.iter().sum::<f64>() / ratios.len() as f64);
    }

    stats.by_rooms = rooms
        .into_iter()
        .map(|(rooms, acc)| RoomStats {
            rooms,
            count: acc.count,
            average_price: acc.total_price / acc.count as f64,
            average_surface: acc.total_surface / acc.count as f64,
            price_per_area: acc.total_price / acc.total_surface,
            min_price: acc.min_price,
            max_price: acc.max_price,
        })
        .collect();

    stats
}

/// Average monthly rent per room count, taken from the rental listings of
/// a collection. Sale listings are compared against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentByRooms(BTreeMap<u32, f64>);

impl RentByRooms {
    pub fn from_listings<'a, I>(listings: I, normalizer: &Normalizer) -> Self
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        let rentals = listings
            .into_iter()
            .filter(|listing| normalizer.normalize(listing).is_rental());
        let stats = summarize(rentals, normalizer);

        Self(
            stats
                .by_rooms
                .into_iter()
                .map(|r| (r.rooms, r.average_price))
                .collect(),
        )
    }

    pub fn for_rooms(&self, rooms: f64) -> Option<f64> {
        if !(rooms.is_finite() && rooms >= 0.0 && rooms.fract() == 0.0) {
            return None;
        }
        self.0.get(&(rooms as u32)).copied()
    }

    /// A rental's own price, otherwise the reference rent for its room count.
    pub fn monthly_rent(&self, listing: &NormalizedListing) -> Option<f64> {
        if listing.is_rental() {
            (listing.price > 0.0).then_some(listing.price)
        } else {
            self.for_rooms(listing.rooms)
        }
    }
}
