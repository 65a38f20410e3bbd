pub mod connection;
pub mod loads;
pub mod settings;

pub use connection::{init_db, Database};
