/// Faceted filter engine for the product listing
///
/// The manager owns three pieces of state:
/// - the current `FilterSet` (one selected option per facet at most)
/// - which facet dropdown is open (never more than one)
/// - the rendered product listing, guarded by a generation counter so a
///   slow response for an old filter combination can never overwrite the
///   result of a newer one

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::data::{Facet, FilterOption, Product};
use super::options::{AttributeOptionsCache, ALL_OPTION};

/// Selected option id per facet. Absent facets are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    selections: BTreeMap<Facet, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `value` for `facet`. A blank value removes the facet instead.
    pub fn set(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.selections.remove(&facet);
        } else {
            self.selections.insert(facet, value);
        }
    }

    pub fn get(&self, facet: Facet) -> Option<&str> {
        self.selections.get(&facet).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Selections in facet order
    pub fn iter(&self) -> impl Iterator<Item = (Facet, &str)> {
        self.selections
            .iter()
            .map(|(facet, value)| (*facet, value.as_str()))
    }
}

/// A listing query: the fixed category plus every non-blank facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: String,
    pub facets: Vec<(Facet, String)>,
}

impl CatalogQuery {
    /// The unfiltered listing for a category
    pub fn unfiltered(category: &str) -> Self {
        Self {
            category: category.to_string(),
            facets: Vec::new(),
        }
    }

    /// Build a query from a filter set, dropping anything blank.
    ///
    /// The category key belongs to the fixed category, so a `Category`
    /// selection is never sent as a second `category` pair.
    pub fn compose(category: &str, filters: &FilterSet) -> Self {
        let facets = filters
            .iter()
            .filter(|(facet, value)| *facet != Facet::Category && !value.trim().is_empty())
            .map(|(facet, value)| (facet, value.to_string()))
            .collect();

        Self {
            category: category.to_string(),
            facets,
        }
    }

    /// Key/value pairs in request order, category first
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::with_capacity(self.facets.len() + 1);
        pairs.push(("category", self.category.as_str()));
        for (facet, value) in &self.facets {
            pairs.push((facet.key(), value.as_str()));
        }
        pairs
    }

    /// Form-urlencoded query string, e.g. `category=Dining+Table&topmaterial=oak`
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// A composed query stamped with the generation it was issued under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: u64,
    pub query: CatalogQuery,
}

/// What the listing currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    /// No response has been applied yet
    Loading,
    /// Latest response, possibly empty
    Loaded(Vec<Product>),
    /// Latest request failed; nothing is shown
    Failed(String),
}

/// Owns the facet selections and the product listing they produce
#[derive(Debug)]
pub struct FilterStateManager {
    options: Arc<AttributeOptionsCache>,
    category: String,
    filters: FilterSet,
    open_dropdown: Option<Facet>,
    /// Filter set of the most recently issued query
    last_issued: Option<FilterSet>,
    generation: u64,
    listing: ListingState,
}

impl FilterStateManager {
    /// Create a manager with an empty filter set.
    /// Nothing is issued until the first `sync()`.
    pub fn new(options: Arc<AttributeOptionsCache>, category: impl Into<String>) -> Self {
        Self {
            options,
            category: category.into(),
            filters: FilterSet::new(),
            open_dropdown: None,
            last_issued: None,
            generation: 0,
            listing: ListingState::Loading,
        }
    }

    // ========== Dropdowns ==========

    /// Open the dropdown for `label`, or close it if it is already open.
    /// Opening one dropdown closes any other.
    pub fn toggle_dropdown(&mut self, label: &str) {
        let Some(facet) = Facet::from_label(label) else {
            log::warn!("Ignoring toggle for unknown facet label {label:?}");
            return;
        };

        self.open_dropdown = if self.open_dropdown == Some(facet) {
            None
        } else {
            Some(facet)
        };
    }

    pub fn close_dropdown(&mut self) {
        self.open_dropdown = None;
    }

    pub fn open_dropdown(&self) -> Option<Facet> {
        self.open_dropdown
    }

    /// Options to render under `facet`, only while it is open and has any
    pub fn visible_options(&self, facet: Facet) -> Option<&[FilterOption]> {
        if self.open_dropdown != Some(facet) {
            return None;
        }
        let options = self.options.options(facet);
        (!options.is_empty()).then_some(options)
    }

    pub fn options(&self) -> &AttributeOptionsCache {
        &self.options
    }

    // ========== Selections ==========

    /// Handle a click on an option.
    ///
    /// The "all" sentinel clears every facet and returns the unfiltered
    /// query to run right away. Any other option only updates the filter
    /// set; the matching query comes out of the next `sync()`.
    pub fn select_option(&mut self, label: &str, option_id: &str) -> Option<QueryTicket> {
        self.open_dropdown = None;

        if option_id == ALL_OPTION {
            self.filters.clear();
            log::debug!("🧹 Filters cleared, reloading {}", self.category);
            return Some(self.issue(CatalogQuery::unfiltered(&self.category)));
        }

        match Facet::from_label(label) {
            Some(facet) => {
                self.filters.set(facet, option_id);
                log::debug!("Filter {} = {:?}", facet.key(), option_id);
            }
            None => log::warn!("Ignoring option for unknown facet label {label:?}"),
        }

        None
    }

    /// Compose a query if the filter set changed since the last one issued.
    ///
    /// Call once after handling each event: however many mutations
    /// happened, at most one ticket comes out, built from the latest state.
    pub fn sync(&mut self) -> Option<QueryTicket> {
        if self.last_issued.as_ref() == Some(&self.filters) {
            return None;
        }
        let query = self.composed_query();
        Some(self.issue(query))
    }

    /// Start over as if the listing page had just been opened: no filters,
    /// no open dropdown, nothing shown, and the unfiltered query pending
    /// for the next `sync()`.
    ///
    /// The generation keeps counting so responses to queries issued before
    /// the remount can never be mistaken for current ones.
    pub fn remount(&mut self) {
        self.filters.clear();
        self.open_dropdown = None;
        self.last_issued = None;
        self.listing = ListingState::Loading;
        log::debug!("Listing remounted at #{}", self.generation);
    }

    fn issue(&mut self, query: CatalogQuery) -> QueryTicket {
        self.generation = self.generation.wrapping_add(1);
        self.last_issued = Some(self.filters.clone());
        log::debug!("🔎 Listing query #{}: {}", self.generation, query);
        QueryTicket {
            generation: self.generation,
            query,
        }
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Query for the current filter set
    pub fn composed_query(&self) -> CatalogQuery {
        CatalogQuery::compose(&self.category, &self.filters)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    // ========== Listing ==========

    /// Apply the outcome of a listing query.
    ///
    /// Returns false when the response belongs to a superseded ticket and
    /// was discarded. A current response replaces the listing in full.
    pub fn apply_results<E: fmt::Display>(
        &mut self,
        generation: u64,
        result: Result<Vec<Product>, E>,
    ) -> bool {
        if !self.is_current(generation) {
            log::debug!(
                "Discarding listing response #{} (current is #{})",
                generation,
                self.generation
            );
            return false;
        }

        self.listing = match result {
            Ok(products) => {
                log::debug!("📦 Listing #{} returned {} products", generation, products.len());
                ListingState::Loaded(products)
            }
            Err(error) => {
                log::warn!("⚠️  Listing #{} failed: {}", generation, error);
                ListingState::Failed(error.to_string())
            }
        };
        true
    }

    pub fn listing(&self) -> &ListingState {
        &self.listing
    }

    /// Products to render. Empty while loading or after a failure.
    pub fn products(&self) -> &[Product] {
        match &self.listing {
            ListingState::Loaded(products) => products,
            ListingState::Loading | ListingState::Failed(_) => &[],
        }
    }

    /// Whether the "no products" message should replace the grid
    pub fn shows_no_products(&self) -> bool {
        !matches!(self.listing, ListingState::Loading) && self.products().is_empty()
    }
}
