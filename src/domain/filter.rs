// src/domain/filter.rs

use crate::domain::listing::{value_to_string, Listing};
use crate::domain::normalize::{Normalizer, Presence, DESCRIPTION, ID, LOCATION};
use std::collections::BTreeSet;
use url::form_urlencoded;

/// Labels offered by the room dropdown, in display order.
pub const ROOM_LABELS: [&str; 5] = ["1", "2", "3", "4", "5+"];

/// One checked entry of the room dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomSelection {
    Exactly(u32),
    FiveOrMore,
}

impl RoomSelection {
    /// Only the dropdown labels are accepted; anything else is ignored.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if !ROOM_LABELS.contains(&label) {
            return None;
        }
        match label {
            "5+" => Some(RoomSelection::FiveOrMore),
            other => other.parse::<u32>().ok().map(RoomSelection::Exactly),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RoomSelection::Exactly(n) => n.to_string(),
            RoomSelection::FiveOrMore => "5+".to_string(),
        }
    }

    pub fn matches(&self, rooms: f64) -> bool {
        match self {
            RoomSelection::Exactly(n) => rooms == f64::from(*n),
            RoomSelection::FiveOrMore => rooms >= 5.0,
        }
    }
}

/// Filter state, rebuilt from the query string on every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub rooms: BTreeSet<RoomSelection>,
    pub surface_min: Option<f64>,
    pub surface_max: Option<f64>,
}

impl FilterCriteria {
    /// Reads `q`, `pieces` (repeatable), `surface_min` and `surface_max`.
    /// Blank or unparseable bounds and unknown room labels are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut criteria = FilterCriteria::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" => criteria.search_term = value.into_owned(),
                "pieces" => {
                    if let Some(selection) = RoomSelection::parse(&value) {
                        criteria.rooms.insert(selection);
                    }
                }
                "surface_min" => criteria.surface_min = parse_bound(&value),
                "surface_max" => criteria.surface_max = parse_bound(&value),
                _ => {}
            }
        }

        criteria
    }

    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.search_term.is_empty() {
            serializer.append_pair("q", &self.search_term);
        }
        for selection in &self.rooms {
            serializer.append_pair("pieces", &selection.label());
        }
        if let Some(min) = self.surface_min {
            serializer.append_pair("surface_min", &min.to_string());
        }
        if let Some(max) = self.surface_max {
            serializer.append_pair("surface_max", &max.to_string());
        }
        serializer.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
            && self.rooms.is_empty()
            && self.surface_min.is_none()
            && self.surface_max.is_none()
    }

    pub fn has_room(&self, label: &str) -> bool {
        RoomSelection::parse(label).is_some_and(|s| self.rooms.contains(&s))
    }

    pub fn matches(&self, listing: &Listing, normalizer: &Normalizer) -> bool {
        self.matches_search(listing)
            && self.matches_rooms(listing, normalizer)
            && self.matches_surface(listing, normalizer)
    }

    fn matches_search(&self, listing: &Listing) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();

        // Every location key is searched, not only the one the table shows.
        let mut haystacks = ID
            .candidates
            .iter()
            .chain(LOCATION.candidates)
            .chain(DESCRIPTION.candidates)
            .filter_map(|key| listing.get(key))
            .filter(|value| Presence::Truthy.accepts(value))
            .map(value_to_string);

        haystacks.any(|text| text.to_lowercase().contains(&needle))
    }

    fn matches_rooms(&self, listing: &Listing, normalizer: &Normalizer) -> bool {
        if self.rooms.is_empty() {
            return true;
        }
        let rooms = normalizer.rooms(listing);
        self.rooms.iter().any(|selection| selection.matches(rooms))
    }

    fn matches_surface(&self, listing: &Listing, normalizer: &Normalizer) -> bool {
        if self.surface_min.is_none() && self.surface_max.is_none() {
            return true;
        }
        let surface = normalizer.surface_m2(listing);
        self.surface_min.map_or(true, |min| surface >= min)
            && self.surface_max.map_or(true, |max| surface <= max)
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Listings matching `criteria` together with their position in the
/// collection, in the original order.
pub fn filter_indexed<'a>(
    listings: &'a [Listing],
    criteria: &FilterCriteria,
    normalizer: &Normalizer,
) -> Vec<(usize, &'a Listing)> {
    listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| criteria.matches(listing, normalizer))
        .collect()
}

pub fn filter<'a>(
    listings: &'a [Listing],
    criteria: &FilterCriteria,
    normalizer: &Normalizer,
) -> Vec<&'a Listing> {
    filter_indexed(listings, criteria, normalizer)
        .into_iter()
        .map(|(_, listing)| listing)
        .collect()
}
