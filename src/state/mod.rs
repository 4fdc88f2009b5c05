/// State management module
///
/// This module holds all storefront state that outlives a single frame:
/// - Catalog data structures (data.rs)
/// - Facet option lists loaded at startup (options.rs)
/// - Facet selections and the product listing (filter.rs)
/// - Big image and thumbnail carousel on the detail page (gallery.rs)
/// - Per-product detail page state (detail.rs)
/// - Tops, edges and finishes for the product on display (variants.rs)

pub mod data;
pub mod detail;
pub mod filter;
pub mod gallery;
pub mod options;
pub mod variants;
