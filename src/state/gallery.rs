/// Image gallery for the product detail page
///
/// Tracks which image is shown large and which 3-wide slice of the
/// product's image sequence is visible as thumbnails. A controller is
/// bound to one product; loading another product resets everything.

use super::data::Product;

/// Number of thumbnails visible at once
pub const WINDOW_SIZE: usize = 3;

/// Visible range over an image sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselWindow {
    pub start: usize,
    pub size: usize,
    pub total: usize,
}

impl CarouselWindow {
    pub fn new(total: usize) -> Self {
        Self {
            start: 0,
            size: WINDOW_SIZE,
            total,
        }
    }

    /// Largest valid start index
    pub fn max_start(&self) -> usize {
        self.total.saturating_sub(self.size)
    }

    pub fn can_advance(&self) -> bool {
        self.start < self.max_start()
    }

    pub fn can_retreat(&self) -> bool {
        self.start > 0
    }

    /// Move one image forward; no-op at the end
    pub fn advance(&mut self) {
        if self.can_advance() {
            self.start += 1;
        }
    }

    /// Move one image back; no-op at the start
    pub fn retreat(&mut self) {
        if self.can_retreat() {
            self.start -= 1;
        }
    }

    /// Index range of the visible slice, clipped to the sequence
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.start.min(self.total);
        let end = (self.start + self.size).min(self.total);
        start..end
    }
}

impl Default for CarouselWindow {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Selected-image and carousel state for one product
#[derive(Debug, Clone, Default)]
pub struct GalleryController {
    product_id: Option<String>,
    images: Vec<String>,
    selected: Option<String>,
    window: CarouselWindow,
}

impl GalleryController {
    /// An empty gallery with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_product(product: &Product) -> Self {
        let mut gallery = Self::new();
        gallery.load_product(product);
        gallery
    }

    /// Bind to `product`: select its first image and rewind the carousel
    pub fn load_product(&mut self, product: &Product) {
        self.product_id = Some(product.id.clone());
        self.images = product.images.clone();
        self.selected = product.first_image().map(str::to_string);
        self.window = CarouselWindow::new(self.images.len());
    }

    /// Drop everything from the previous product
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Show `image_id` as the big image.
    /// Works for the product's own images and for variant thumbnails.
    pub fn select_image(&mut self, image_id: impl Into<String>) {
        self.selected = Some(image_id.into());
    }

    /// Show nothing large; the view falls back to the placeholder
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn advance(&mut self) {
        self.window.advance();
    }

    pub fn retreat(&mut self) {
        self.window.retreat();
    }

    pub fn can_advance(&self) -> bool {
        self.window.can_advance()
    }

    pub fn can_retreat(&self) -> bool {
        self.window.can_retreat()
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn window(&self) -> CarouselWindow {
        self.window
    }

    /// Thumbnails currently in the window
    pub fn visible_images(&self) -> &[String] {
        &self.images[self.window.range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: &str, images: usize) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Stool {id}"),
            images: (0..images).map(|i| format!("{id}-{i}.jpg")).collect(),
            ..Product::default()
        }
    }

    #[test]
    fn test_load_selects_first_image() {
        let gallery = GalleryController::for_product(&product("a", 4));
        assert_eq!(gallery.selected_image(), Some("a-0.jpg"));
        assert_eq!(gallery.window().start, 0);
        assert_eq!(gallery.visible_images(), &["a-0.jpg", "a-1.jpg", "a-2.jpg"]);
    }

    #[test]
    fn test_advance_clamps_at_end() {
        let mut gallery = GalleryController::for_product(&product("a", 5));
        gallery.advance();
        gallery.advance();
        gallery.advance();

        assert_eq!(gallery.window().start, 2);
        assert!(!gallery.can_advance());
        assert!(gallery.can_retreat());
        assert_eq!(gallery.visible_images(), &["a-2.jpg", "a-3.jpg", "a-4.jpg"]);
    }

    #[test]
    fn test_retreat_clamps_at_start() {
        let mut gallery = GalleryController::for_product(&product("a", 5));
        gallery.retreat();
        assert_eq!(gallery.window().start, 0);
        assert!(!gallery.can_retreat());

        gallery.advance();
        gallery.retreat();
        gallery.retreat();
        assert_eq!(gallery.window().start, 0);
    }

    #[test]
    fn test_short_sequences_never_move() {
        for total in 0..=WINDOW_SIZE {
            let mut gallery = GalleryController::for_product(&product("a", total));
            assert!(!gallery.can_advance());
            assert!(!gallery.can_retreat());
            gallery.advance();
            assert_eq!(gallery.window().start, 0);
            assert_eq!(gallery.visible_images().len(), total);
        }
    }

    #[test]
    fn test_empty_product_has_no_selection() {
        let gallery = GalleryController::for_product(&product("a", 0));
        assert_eq!(gallery.selected_image(), None);
        assert!(gallery.visible_images().is_empty());
    }

    #[test]
    fn test_select_image_keeps_window() {
        let mut gallery = GalleryController::for_product(&product("a", 6));
        gallery.advance();
        gallery.select_image("edge-bullnose.jpg");

        assert_eq!(gallery.selected_image(), Some("edge-bullnose.jpg"));
        assert_eq!(gallery.window().start, 1);
    }

    #[test]
    fn test_product_switch_resets_state() {
        let mut gallery = GalleryController::for_product(&product("a", 6));
        gallery.advance();
        gallery.advance();
        gallery.select_image("a-4.jpg");

        gallery.load_product(&product("b", 2));
        assert_eq!(gallery.product_id(), Some("b"));
        assert_eq!(gallery.selected_image(), Some("b-0.jpg"));
        assert_eq!(gallery.window().start, 0);
        assert_eq!(gallery.window().total, 2);

        gallery.load_product(&product("c", 0));
        assert_eq!(gallery.selected_image(), None);
    }

    #[test]
    fn test_reset() {
        let mut gallery = GalleryController::for_product(&product("a", 6));
        gallery.advance();
        gallery.reset();
        assert_eq!(gallery.product_id(), None);
        assert_eq!(gallery.selected_image(), None);
        assert_eq!(gallery.window(), CarouselWindow::new(0));
    }

    proptest! {
        #[test]
        fn window_start_stays_in_bounds(
            total in 0usize..12,
            moves in prop::collection::vec(any::<bool>(), 0..50),
        ) {
            let mut gallery = GalleryController::for_product(&product("p", total));
            let max_start = total.saturating_sub(WINDOW_SIZE);

            for forward in moves {
                if forward {
                    gallery.advance();
                } else {
                    gallery.retreat();
                }
                let window = gallery.window();
                prop_assert!(window.start <= max_start);
                prop_assert_eq!(gallery.can_retreat(), window.start > 0);
                prop_assert_eq!(gallery.can_advance(), window.start < max_start);
                prop_assert_eq!(gallery.visible_images().len(), total.min(WINDOW_SIZE));
            }
        }
    }
}
