use super::data::{Product, VariantKind};
use super::gallery::GalleryController;
use super::variants::VariantAggregator;

/// Where the product record for the detail page stands
#[derive(Debug, Clone, PartialEq)]
pub enum ProductSlot {
    Loading,
    Loaded(Product),
    /// Lookup failed or the product does not exist
    Unavailable,
}

/// Everything shown on one product's detail page.
///
/// Created fresh for every product id, so nothing from a previously
/// viewed product can leak in. Responses carry the product id they were
/// requested for and are dropped if it no longer matches.
#[derive(Debug, Clone)]
pub struct DetailPage {
    product_id: String,
    product: ProductSlot,
    gallery: GalleryController,
    variants: VariantAggregator,
}

impl DetailPage {
    pub fn new(product_id: impl Into<String>) -> Self {
        let product_id = product_id.into();
        Self {
            variants: VariantAggregator::new(product_id.clone()),
            product_id,
            product: ProductSlot::Loading,
            gallery: GalleryController::new(),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Apply the detail lookup.
    /// Returns false if it was for another product.
    pub fn apply_product(&mut self, product_id: &str, result: Result<Option<Product>, String>) -> bool {
        if product_id != self.product_id {
            log::debug!("Discarding detail for {} (showing {})", product_id, self.product_id);
            return false;
        }

        self.product = match result {
            Ok(Some(product)) => {
                self.gallery.load_product(&product);
                ProductSlot::Loaded(product)
            }
            Ok(None) => {
                log::warn!("⚠️  Product {} not found", product_id);
                self.gallery.reset();
                ProductSlot::Unavailable
            }
            Err(e) => {
                log::warn!("⚠️  Product {} failed to load: {}", product_id, e);
                self.gallery.reset();
                ProductSlot::Unavailable
            }
        };
        true
    }

    /// Show a variant's first image as the big image.
    /// A variant without images clears the big image.
    pub fn select_variant(&mut self, kind: VariantKind, index: usize) {
        if index >= self.variants.collection(kind).len() {
            return;
        }
        match self.variants.thumbnail_image(kind, index) {
            Some(image_id) => self.gallery.select_image(image_id),
            None => self.gallery.clear_selection(),
        }
    }

    pub fn product(&self) -> &ProductSlot {
        &self.product
    }

    pub fn gallery(&self) -> &GalleryController {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut GalleryController {
        &mut self.gallery
    }

    pub fn variants(&self) -> &VariantAggregator {
        &self.variants
    }

    pub fn variants_mut(&mut self) -> &mut VariantAggregator {
        &mut self.variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Variant;

    fn product(id: &str, images: &[&str]) -> Product {
        Product {
            id: id.to_string(),
            name: "Counter Stool".to_string(),
            images: images.iter().map(|i| i.to_string()).collect(),
            ..Product::default()
        }
    }

    #[test]
    fn test_loading_until_product_arrives() {
        let page = DetailPage::new("s1");
        assert_eq!(page.product(), &ProductSlot::Loading);
        assert_eq!(page.gallery().selected_image(), None);
    }

    #[test]
    fn test_product_selects_first_image() {
        let mut page = DetailPage::new("s1");
        assert!(page.apply_product("s1", Ok(Some(product("s1", &["a.jpg", "b.jpg"])))));
        assert_eq!(page.gallery().selected_image(), Some("a.jpg"));
        assert!(matches!(page.product(), ProductSlot::Loaded(_)));
    }

    #[test]
    fn test_stale_product_is_dropped() {
        let mut page = DetailPage::new("s2");
        assert!(!page.apply_product("s1", Ok(Some(product("s1", &["old.jpg"])))));
        assert_eq!(page.product(), &ProductSlot::Loading);
        assert_eq!(page.gallery().selected_image(), None);
    }

    #[test]
    fn test_failure_is_unavailable() {
        let mut page = DetailPage::new("s1");
        page.apply_product("s1", Err("timed out".to_string()));
        assert_eq!(page.product(), &ProductSlot::Unavailable);

        let mut missing = DetailPage::new("s9");
        missing.apply_product("s9", Ok(None));
        assert_eq!(missing.product(), &ProductSlot::Unavailable);
    }

    #[test]
    fn test_variant_click_swaps_big_image_only() {
        let mut page = DetailPage::new("s1");
        page.apply_product("s1", Ok(Some(product("s1", &["a.jpg", "b.jpg", "c.jpg", "d.jpg"]))));
        page.gallery_mut().advance();

        let finish = Variant {
            id: "f1".to_string(),
            name: "Walnut".to_string(),
            images: vec!["walnut.jpg".to_string()],
        };
        page.variants_mut()
            .apply::<String>("s1", VariantKind::Finish, Ok(vec![finish]));
        page.select_variant(VariantKind::Finish, 0);

        assert_eq!(page.gallery().selected_image(), Some("walnut.jpg"));
        assert_eq!(page.gallery().window().start, 1);
        assert_eq!(page.variants().collection(VariantKind::Finish).len(), 1);
    }

    #[test]
    fn test_variant_without_images_clears_selection() {
        let mut page = DetailPage::new("s1");
        page.apply_product("s1", Ok(Some(product("s1", &["a.jpg"]))));
        page.variants_mut()
            .apply::<String>("s1", VariantKind::Top, Ok(vec![Variant::default()]));
        page.select_variant(VariantKind::Top, 0);

        assert_eq!(page.gallery().selected_image(), None);
    }

    #[test]
    fn test_out_of_range_variant_keeps_selection() {
        let mut page = DetailPage::new("s1");
        page.apply_product("s1", Ok(Some(product("s1", &["a.jpg"]))));
        page.select_variant(VariantKind::Edge, 4);

        assert_eq!(page.gallery().selected_image(), Some("a.jpg"));
    }
}
