use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use super::wire;
use crate::config::Config;
use crate::error::CatalogError;
use crate::state::data::{Facet, FilterOption, Product, Variant, VariantKind};
use crate::state::filter::CatalogQuery;
use crate::state::options::AttributeOptionsCache;

/// HTTP client for the furniture catalog API
#[derive(Clone, Debug)]
pub struct CatalogClient {
    client: Client,
    /// `<base_url>/api/`
    api_base: Url,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let api_base = Url::parse(&format!("{}/api/", config.base_url.trim_end_matches('/')))?;
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        log::info!("🛋️  Catalog client for {}", api_base);

        Ok(Self { client, api_base })
    }

    /// Build `<api_base>/<segments...>`, escaping each segment
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Listing URL for a composed query
    pub fn filter_url(&self, query: &CatalogQuery) -> Url {
        let mut url = self.endpoint(&["products", "filter"]);
        url.set_query(Some(&query.encode()));
        url
    }

    pub fn product_url(&self, product_id: &str) -> Url {
        self.endpoint(&["products", product_id])
    }

    /// Lookup URL for one variant collection of a product
    pub fn variants_url(&self, product_id: &str, kind: VariantKind) -> Url {
        let path: &[&str] = match kind {
            VariantKind::Top => &["producttop", "producttops"],
            VariantKind::Edge => &["productedge", "productedges"],
            VariantKind::Finish => &["productfinish", "productfinishes"],
        };
        let mut url = self.endpoint(path);
        url.query_pairs_mut().append_pair("productId", product_id);
        url
    }

    pub fn options_url(&self, facet: Facet) -> Url {
        self.endpoint(&[facet.key()])
    }

    /// GET a URL and parse the body as JSON
    async fn get_json(&self, url: Url) -> Result<Value, CatalogError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        match response.status() {
            status if status.is_success() => {
                let text = response.text().await?;
                serde_json::from_str(&text).map_err(|source| CatalogError::Decode {
                    url: url.to_string(),
                    source,
                })
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(CatalogError::Status {
                    url: url.to_string(),
                    status,
                    body,
                })
            }
        }
    }

    /// Run a listing query
    pub async fn filter_products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        let body = self.get_json(self.filter_url(query)).await?;
        Ok(wire::products_from(&body))
    }

    /// Full product record. `Ok(None)` when the server has no such product.
    pub async fn product(&self, product_id: &str) -> Result<Option<Product>, CatalogError> {
        match self.get_json(self.product_url(product_id)).await {
            Ok(body) => Ok(wire::product_from(&body)),
            Err(CatalogError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// One variant collection for a product
    pub async fn variants(&self, product_id: &str, kind: VariantKind) -> Result<Vec<Variant>, CatalogError> {
        let body = self.get_json(self.variants_url(product_id, kind)).await?;
        Ok(wire::variants_from(&body, kind))
    }

    /// Option list for a fetchable facet
    pub async fn facet_options(&self, facet: Facet) -> Result<Vec<FilterOption>, CatalogError> {
        let body = self.get_json(self.options_url(facet)).await?;
        Ok(wire::options_from(&body))
    }

    /// Load every fetchable facet's options. A facet that fails to load
    /// simply has no options.
    pub async fn load_options(&self, category: &str) -> AttributeOptionsCache {
        let (top_material, leg_material, top_finish, leg_finish) = tokio::join!(
            self.facet_options(Facet::TopMaterial),
            self.facet_options(Facet::LegMaterial),
            self.facet_options(Facet::TopFinish),
            self.facet_options(Facet::LegFinish),
        );

        let results = [
            (Facet::TopMaterial, top_material),
            (Facet::LegMaterial, leg_material),
            (Facet::TopFinish, top_finish),
            (Facet::LegFinish, leg_finish),
        ];

        results
            .into_iter()
            .fold(AttributeOptionsCache::new(category), |cache, (facet, result)| {
                match result {
                    Ok(options) => {
                        log::debug!("Loaded {} {} options", options.len(), facet.key());
                        cache.with_options(facet, options)
                    }
                    Err(e) => {
                        log::warn!("⚠️  Could not load {} options: {}", facet.key(), e);
                        cache
                    }
                }
            })
    }

    /// Download raw image bytes
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let url = Url::parse(url)?;
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: response.status(),
                body: String::new(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::filter::FilterSet;

    fn client(base_url: &str) -> CatalogClient {
        let config = Config {
            base_url: base_url.to_string(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        CatalogClient::new(&config).unwrap()
    }

    #[test]
    fn test_filter_url() {
        let client = client("http://localhost:3000");
        let mut filters = FilterSet::new();
        filters.set(Facet::TopMaterial, "oak");
        filters.set(Facet::LegFinish, "matte");

        let url = client.filter_url(&CatalogQuery::compose("Dining Table", &filters));
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/products/filter?category=Dining+Table&topmaterial=oak&legfinish=matte"
        );
    }

    #[test]
    fn test_trailing_slash_and_path_prefix() {
        let client = client("https://shop.example.com/store/");
        assert_eq!(
            client.product_url("abc123").as_str(),
            "https://shop.example.com/store/api/products/abc123"
        );
    }

    #[test]
    fn test_product_id_is_escaped() {
        let client = client("http://localhost:3000");
        assert_eq!(
            client.product_url("a/b c").as_str(),
            "http://localhost:3000/api/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_variant_urls() {
        let client = client("http://localhost:3000");
        assert_eq!(
            client.variants_url("p1", VariantKind::Top).as_str(),
            "http://localhost:3000/api/producttop/producttops?productId=p1"
        );
        assert_eq!(
            client.variants_url("p1", VariantKind::Edge).as_str(),
            "http://localhost:3000/api/productedge/productedges?productId=p1"
        );
        assert_eq!(
            client.variants_url("p1", VariantKind::Finish).as_str(),
            "http://localhost:3000/api/productfinish/productfinishes?productId=p1"
        );
    }

    #[test]
    fn test_options_url() {
        let client = client("http://localhost:3000");
        assert_eq!(
            client.options_url(Facet::LegMaterial).as_str(),
            "http://localhost:3000/api/legmaterial"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(CatalogClient::new(&config), Err(CatalogError::Url(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        // Port 9 (discard) is closed on any sane test machine
        let client = client("http://127.0.0.1:9");
        let result = client.filter_products(&CatalogQuery::unfiltered("Dining Table")).await;
        assert!(matches!(result, Err(CatalogError::Http(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_yields_empty_options() {
        let client = client("http://127.0.0.1:9");
        let cache = client.load_options("Dining Table").await;
        assert!(cache.options(Facet::TopMaterial).is_empty());
        assert_eq!(cache.options(Facet::Category).len(), 1);
    }
}
