/// Catalog API access
///
/// - `client.rs` - reqwest client and endpoint URLs
/// - `wire.rs` - response parsing with defaults for missing fields

pub mod client;
pub mod wire;

pub use client::CatalogClient;
