/// Shared data structures for the application state
///
/// These structs represent the catalog data model after it has crossed
/// the API boundary. Everything here is already normalized: missing
/// fields from the server have been replaced with empty values by
/// `api::wire`, so the UI never has to deal with partial records.

use std::fmt;

/// A filterable product attribute dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    TopMaterial,
    LegMaterial,
    TopFinish,
    LegFinish,
    Category,
    KnockedDown,
}

impl Facet {
    /// All facets in display order
    pub const ALL: [Facet; 6] = [
        Facet::TopMaterial,
        Facet::LegMaterial,
        Facet::TopFinish,
        Facet::LegFinish,
        Facet::Category,
        Facet::KnockedDown,
    ];

    /// Human readable label shown on the dropdown button
    pub fn label(self) -> &'static str {
        match self {
            Facet::TopMaterial => "Top Material",
            Facet::LegMaterial => "Leg Material",
            Facet::TopFinish => "Top Finish",
            Facet::LegFinish => "Leg Finish",
            Facet::Category => "Category",
            Facet::KnockedDown => "Knocked Down",
        }
    }

    /// Query-string key used by the filter endpoint
    pub fn key(self) -> &'static str {
        match self {
            Facet::TopMaterial => "topmaterial",
            Facet::LegMaterial => "legmaterial",
            Facet::TopFinish => "topfinish",
            Facet::LegFinish => "legfinish",
            Facet::Category => "category",
            Facet::KnockedDown => "knockeddown",
        }
    }

    /// Resolve a facet from either its label or its key.
    ///
    /// The input is normalized by lower-casing it and removing spaces, so
    /// "Top Material", "top material" and "topmaterial" all resolve to
    /// `Facet::TopMaterial`.
    pub fn from_label(label: &str) -> Option<Facet> {
        let normalized = normalize_label(label);
        Facet::ALL
            .into_iter()
            .find(|facet| facet.key() == normalized)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower-case a facet label and strip its spaces
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One selectable value of a facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
}

/// A named reference to a material or finish record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeRef {
    pub id: String,
    /// Empty when the server only sent the id
    pub name: String,
}

/// Represents a single product in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Ordered image ids, relative to the uploads folder
    pub images: Vec<String>,
    pub top_material: Option<AttributeRef>,
    pub leg_material: Option<AttributeRef>,
    pub top_finish: Option<AttributeRef>,
}

impl Product {
    /// The image shown on product cards and as the default big image
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Which variant collection a variant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Top,
    Edge,
    Finish,
}

impl VariantKind {
    /// Order in which the strips are displayed
    pub const ALL: [VariantKind; 3] = [VariantKind::Top, VariantKind::Edge, VariantKind::Finish];

    /// Display name used when a variant has no name of its own
    pub fn fallback_name(self) -> &'static str {
        match self {
            VariantKind::Top => "Top Name",
            VariantKind::Edge => "Edge Name",
            VariantKind::Finish => "Finish Name",
        }
    }
}

/// A top, edge or finish offered for one product
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub images: Vec<String>,
}

impl Variant {
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Name to display, falling back to a per-kind placeholder
    pub fn display_name(&self, kind: VariantKind) -> &str {
        if self.name.is_empty() {
            kind.fallback_name()
        } else {
            &self.name
        }
    }
}
