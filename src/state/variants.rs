use std::fmt;

use super::data::{Variant, VariantKind};

/// Tops, edges and finishes offered for one product.
///
/// The three collections are filled by independent requests. A failed or
/// empty response only affects its own collection, and responses for any
/// other product are dropped.
#[derive(Debug, Clone)]
pub struct VariantAggregator {
    product_id: String,
    tops: Vec<Variant>,
    edges: Vec<Variant>,
    finishes: Vec<Variant>,
}

impl VariantAggregator {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            tops: Vec::new(),
            edges: Vec::new(),
            finishes: Vec::new(),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Store the response for one collection.
    /// Returns false if the response was for another product.
    pub fn apply<E: fmt::Display>(
        &mut self,
        product_id: &str,
        kind: VariantKind,
        result: Result<Vec<Variant>, E>,
    ) -> bool {
        if product_id != self.product_id {
            log::debug!(
                "Discarding {:?} variants for {} (showing {})",
                kind,
                product_id,
                self.product_id
            );
            return false;
        }

        let variants = match result {
            Ok(variants) => variants,
            Err(error) => {
                log::warn!("⚠️  {:?} variants for {} failed: {}", kind, product_id, error);
                Vec::new()
            }
        };
        *self.slot_mut(kind) = variants;
        true
    }

    fn slot_mut(&mut self, kind: VariantKind) -> &mut Vec<Variant> {
        match kind {
            VariantKind::Top => &mut self.tops,
            VariantKind::Edge => &mut self.edges,
            VariantKind::Finish => &mut self.finishes,
        }
    }

    pub fn collection(&self, kind: VariantKind) -> &[Variant] {
        match kind {
            VariantKind::Top => &self.tops,
            VariantKind::Edge => &self.edges,
            VariantKind::Finish => &self.finishes,
        }
    }

    /// Whether the variants section should be shown at all
    pub fn has_any(&self) -> bool {
        VariantKind::ALL
            .iter()
            .any(|kind| !self.collection(*kind).is_empty())
    }

    /// Non-empty collections in display order
    pub fn strips(&self) -> impl Iterator<Item = (VariantKind, &[Variant])> {
        VariantKind::ALL
            .into_iter()
            .map(|kind| (kind, self.collection(kind)))
            .filter(|(_, variants)| !variants.is_empty())
    }

    /// Image to show large when the thumbnail at `index` is clicked
    pub fn thumbnail_image(&self, kind: VariantKind, index: usize) -> Option<String> {
        self.collection(kind)
            .get(index)
            .and_then(Variant::first_image)
            .map(str::to_string)
    }
}
