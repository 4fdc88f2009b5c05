use std::collections::HashMap;

use super::data::{Facet, FilterOption};

/// Reserved option id meaning "clear every facet and show everything"
pub const ALL_OPTION: &str = "all";

/// Available option lists per facet.
///
/// Filled once at startup and then shared read-only with the filter
/// manager. `Category` and `KnockedDown` are never fetched: each only
/// offers the "all" sentinel.
#[derive(Debug, Clone)]
pub struct AttributeOptionsCache {
    fetched: HashMap<Facet, Vec<FilterOption>>,
    category_option: [FilterOption; 1],
    knocked_down_option: [FilterOption; 1],
}

impl AttributeOptionsCache {
    /// Create a cache with no fetched options for the given category
    pub fn new(category: &str) -> Self {
        Self {
            fetched: HashMap::new(),
            category_option: [FilterOption {
                id: ALL_OPTION.to_string(),
                name: category.to_string(),
            }],
            knocked_down_option: [FilterOption {
                id: ALL_OPTION.to_string(),
                name: "All Products".to_string(),
            }],
        }
    }

    /// Attach the option list for one facet.
    /// Lists for the two synthesized facets are ignored.
    pub fn with_options(mut self, facet: Facet, options: Vec<FilterOption>) -> Self {
        match facet {
            Facet::Category | Facet::KnockedDown => {
                log::warn!("Ignoring option list for synthesized facet {}", facet.key());
            }
            _ => {
                self.fetched.insert(facet, options);
            }
        }
        self
    }

    /// Options offered for a facet, empty if none were loaded
    pub fn options(&self, facet: Facet) -> &[FilterOption] {
        match facet {
            Facet::Category => &self.category_option,
            Facet::KnockedDown => &self.knocked_down_option,
            _ => self.fetched.get(&facet).map(Vec::as_slice).unwrap_or(&[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, name: &str) -> FilterOption {
        FilterOption {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_synthesized_facets_only_offer_all() {
        let cache = AttributeOptionsCache::new("Dining Table");

        let category = cache.options(Facet::Category);
        assert_eq!(category, &[option("all", "Dining Table")]);

        let knocked_down = cache.options(Facet::KnockedDown);
        assert_eq!(knocked_down, &[option("all", "All Products")]);
    }

    #[test]
    fn test_missing_lists_are_empty() {
        let cache = AttributeOptionsCache::new("Dining Table");
        assert!(cache.options(Facet::TopFinish).is_empty());
    }

    #[test]
    fn test_with_options() {
        let cache = AttributeOptionsCache::new("Dining Table")
            .with_options(Facet::TopMaterial, vec![option("oak", "Oak"), option("ash", "Ash")])
            .with_options(Facet::Category, vec![option("x", "Ignored")]);

        assert_eq!(cache.options(Facet::TopMaterial).len(), 2);
        assert_eq!(cache.options(Facet::Category)[0].id, ALL_OPTION);
    }
}
