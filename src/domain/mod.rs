pub mod filter;
pub mod format;
pub mod listing;
pub mod metrics;
pub mod normalize;
pub mod stats;

pub use filter::{filter, filter_indexed, FilterCriteria, ROOM_LABELS};
pub use listing::Listing;
pub use normalize::{NormalizedListing, Normalizer, NormalizerOptions};
pub use stats::{summarize, ListingStats, RentByRooms};
