// src/domain/normalize.rs

use crate::domain::listing::{is_truthy, to_number, value_to_string, Listing};
use crate::domain::metrics::price_per_area;
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";
pub const LOCATION_FALLBACK: &str = "Non spécifiée";
pub const KIND_FALLBACK: &str = "Non spécifié";
pub const DESCRIPTION_FALLBACK: &str = "Aucune description disponible";

/// Decides whether a candidate value counts as "there".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Skips null, false, 0, NaN and "". This is how the feeds have always
    /// been read, so a real `0` surface or price is treated as missing.
    Truthy,
    /// Anything but null is present, `0` and `""` included.
    Defined,
}

impl Presence {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Presence::Truthy => is_truthy(value),
            Presence::Defined => !value.is_null(),
        }
    }
}

/// A canonical field and the source keys it may come from, highest priority first.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub candidates: &'static [&'static str],
    pub numeric: bool,
}

pub const ID: Field = Field {
    candidates: &["id"],
    numeric: false,
};

pub const LOCATION: Field = Field {
    candidates: &["localisation", "ville", "adresse"],
    numeric: false,
};

pub const ROOMS: Field = Field {
    candidates: &["pieces", "nb_pieces", "nombre_pieces"],
    numeric: true,
};

pub const SURFACE: Field = Field {
    candidates: &["surface_m2", "surface", "superficie"],
    numeric: true,
};

pub const PRICE: Field = Field {
    candidates: &["prix", "loyer"],
    numeric: true,
};

pub const URL: Field = Field {
    candidates: &["url", "lien", "link"],
    numeric: false,
};

pub const KIND: Field = Field {
    candidates: &["type", "category"],
    numeric: false,
};

pub const DESCRIPTION: Field = Field {
    candidates: &["description"],
    numeric: false,
};

/// First candidate accepted by `presence`, in declared order.
pub fn resolve<'a>(
    listing: &'a Listing,
    candidates: &[&str],
    presence: Presence,
) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|key| listing.get(key))
        .find(|value| presence.accepts(value))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizerOptions {
    /// Count a literal `0`/`""` as a real value for rooms, surface and price.
    pub zero_is_present: bool,
}

/// Reads canonical fields out of loosely-shaped listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn presence_for(&self, field: &Field) -> Presence {
        if field.numeric && self.options.zero_is_present {
            Presence::Defined
        } else {
            Presence::Truthy
        }
    }

    pub fn resolve<'a>(&self, listing: &'a Listing, field: &Field) -> Option<&'a Value> {
        resolve(listing, field.candidates, self.presence_for(field))
    }

    fn text_or(&self, listing: &Listing, field: &Field, fallback: &str) -> String {
        self.resolve(listing, field)
            .map(value_to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    fn number_or_zero(&self, listing: &Listing, field: &Field) -> f64 {
        self.resolve(listing, field).map(to_number).unwrap_or(0.0)
    }

    pub fn id(&self, listing: &Listing) -> String {
        self.text_or(listing, &ID, NOT_AVAILABLE)
    }

    pub fn location(&self, listing: &Listing) -> String {
        self.text_or(listing, &LOCATION, LOCATION_FALLBACK)
    }

    /// Room count used for filtering; absent means 0.
    pub fn rooms(&self, listing: &Listing) -> f64 {
        self.number_or_zero(listing, &ROOMS)
    }

    pub fn surface_m2(&self, listing: &Listing) -> f64 {
        self.number_or_zero(listing, &SURFACE)
    }

    pub fn price(&self, listing: &Listing) -> f64 {
        self.number_or_zero(listing, &PRICE)
    }

    pub fn url(&self, listing: &Listing) -> Option<String> {
        self.resolve(listing, &URL).map(value_to_string)
    }

    pub fn kind(&self, listing: &Listing) -> String {
        self.text_or(listing, &KIND, KIND_FALLBACK)
    }

    pub fn description(&self, listing: &Listing) -> String {
        self.text_or(listing, &DESCRIPTION, DESCRIPTION_FALLBACK)
    }

    pub fn normalize(&self, listing: &Listing) -> NormalizedListing {
        NormalizedListing {
            id: self.id(listing),
            location: self.location(listing),
            rooms_label: self.text_or(listing, &ROOMS, NOT_AVAILABLE),
            rooms: self.rooms(listing),
            surface_m2: self.surface_m2(listing),
            price: self.price(listing),
            url: self.url(listing),
            kind: self.kind(listing),
            description: self.description(listing),
        }
    }
}

/// Display view of a listing, computed on demand for each render.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedListing {
    pub id: String,
    pub location: String,
    pub rooms_label: String,
    pub rooms: f64,
    pub surface_m2: f64,
    pub price: f64,
    pub url: Option<String>,
    pub kind: String,
    pub description: String,
}

impl NormalizedListing {
    pub fn price_per_area(&self) -> Option<f64> {
        price_per_area(self.price, self.surface_m2)
    }

    pub fn is_sale(&self) -> bool {
        self.kind.to_lowercase() == "vente"
    }

    pub fn is_rental(&self) -> bool {
        self.kind.to_lowercase() == "location"
    }
}
