pub mod connector;
pub mod models;
pub mod schema;

// Re-export the primary DB types and connect helpers for convenient access as `database::connect_from_url()`
#[allow(unused_imports)]
pub use connector::{connect_from_url, connect_with_settings, ping, DB};
