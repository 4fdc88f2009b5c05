use iced::widget::{container, scrollable};
use iced::{Element, Length, Task, Theme};
use std::sync::Arc;

use env_logger::{Builder, Target};
use log::LevelFilter;

mod api;
mod config;
mod error;
mod images;
mod state;
mod ui;

use api::CatalogClient;
use config::Config;
use error::CatalogError;
use images::{ImageCache, ImageResolver, ImageSource};
use state::data::{Facet, Product, Variant, VariantKind};
use state::detail::{DetailPage, ProductSlot};
use state::filter::{FilterStateManager, QueryTicket};
use state::options::AttributeOptionsCache;

/// Which page is on screen
enum Page {
    Listing,
    Detail(DetailPage),
}

/// Main application state
struct Storefront {
    client: CatalogClient,
    resolver: ImageResolver,
    images: ImageCache,
    listing: FilterStateManager,
    page: Page,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Facet button clicked
    ToggleDropdown(Facet),
    /// Option clicked inside an open dropdown
    SelectOption(Facet, String),
    /// A listing query finished
    ProductsLoaded {
        generation: u64,
        result: Result<Vec<Product>, String>,
    },
    /// Product card clicked
    OpenProduct(String),
    BackToListing,
    ProductLoaded {
        product_id: String,
        result: Result<Option<Product>, String>,
    },
    VariantsLoaded {
        product_id: String,
        kind: VariantKind,
        result: Result<Vec<Variant>, String>,
    },
    /// Thumbnail from the product's own images clicked
    SelectImage(String),
    /// Variant thumbnail clicked
    SelectVariant(VariantKind, usize),
    CarouselNext,
    CarouselPrevious,
    ImageLoaded {
        url: String,
        result: Result<Vec<u8>, String>,
    },
}

impl Storefront {
    /// Create the storefront on its listing page and issue the first query
    fn new(config: Config, client: CatalogClient, options: AttributeOptionsCache) -> (Self, Task<Message>) {
        let mut storefront = Storefront {
            resolver: ImageResolver::from_config(&config),
            images: ImageCache::new(config.placeholder_image.clone()),
            listing: FilterStateManager::new(Arc::new(options), config.category),
            client,
            page: Page::Listing,
        };

        let task = storefront.after_update(Task::none());
        (storefront, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::ToggleDropdown(facet) => {
                self.listing.toggle_dropdown(facet.label());
                Task::none()
            }
            Message::SelectOption(facet, option_id) => {
                match self.listing.select_option(facet.label(), &option_id) {
                    Some(ticket) => self.run_query(ticket),
                    None => Task::none(),
                }
            }
            Message::ProductsLoaded { generation, result } => {
                self.listing.apply_results(generation, result);
                Task::none()
            }
            Message::OpenProduct(product_id) => self.open_product(product_id),
            Message::BackToListing => {
                self.listing.remount();
                self.images.forget_failures();
                self.page = Page::Listing;
                Task::none()
            }
            Message::ProductLoaded { product_id, result } => {
                if let Page::Detail(page) = &mut self.page {
                    page.apply_product(&product_id, result);
                }
                Task::none()
            }
            Message::VariantsLoaded {
                product_id,
                kind,
                result,
            } => {
                if let Page::Detail(page) = &mut self.page {
                    page.variants_mut().apply(&product_id, kind, result);
                }
                Task::none()
            }
            Message::SelectImage(image_id) => {
                if let Page::Detail(page) = &mut self.page {
                    page.gallery_mut().select_image(image_id);
                }
                Task::none()
            }
            Message::SelectVariant(kind, index) => {
                if let Page::Detail(page) = &mut self.page {
                    page.select_variant(kind, index);
                }
                Task::none()
            }
            Message::CarouselNext => {
                if let Page::Detail(page) = &mut self.page {
                    page.gallery_mut().advance();
                }
                Task::none()
            }
            Message::CarouselPrevious => {
                if let Page::Detail(page) = &mut self.page {
                    page.gallery_mut().retreat();
                }
                Task::none()
            }
            Message::ImageLoaded { url, result } => {
                self.images.complete(url, result);
                Task::none()
            }
        };

        self.after_update(task)
    }

    /// Run once per update: recompose the listing query from the latest
    /// filter set and download any image that just became visible
    fn after_update(&mut self, task: Task<Message>) -> Task<Message> {
        let mut tasks = vec![task];

        if matches!(self.page, Page::Listing) {
            if let Some(ticket) = self.listing.sync() {
                tasks.push(self.run_query(ticket));
            }
        }

        let sources = self.visible_images();
        let downloads: Vec<String> = sources
            .iter()
            .filter_map(|source| self.images.request(source))
            .collect();
        tasks.extend(downloads.into_iter().map(|url| self.fetch_image(url)));

        Task::batch(tasks)
    }

    fn run_query(&self, ticket: QueryTicket) -> Task<Message> {
        let client = self.client.clone();
        let QueryTicket { generation, query } = ticket;

        Task::perform(
            async move { client.filter_products(&query).await.map_err(|e| e.to_string()) },
            move |result| Message::ProductsLoaded { generation, result },
        )
    }

    /// Show a fresh detail page and start its four independent lookups
    fn open_product(&mut self, product_id: String) -> Task<Message> {
        log::info!("🪑 Opening product {}", product_id);
        self.page = Page::Detail(DetailPage::new(product_id.clone()));

        let client = self.client.clone();
        let id = product_id.clone();
        let loaded_id = product_id.clone();
        let product = Task::perform(
            async move { client.product(&id).await.map_err(|e| e.to_string()) },
            move |result| Message::ProductLoaded {
                product_id: loaded_id.clone(),
                result,
            },
        );

        let variants = VariantKind::ALL.into_iter().map(|kind| {
            let client = self.client.clone();
            let id = product_id.clone();
            let loaded_id = product_id.clone();
            Task::perform(
                async move { client.variants(&id, kind).await.map_err(|e| e.to_string()) },
                move |result| Message::VariantsLoaded {
                    product_id: loaded_id.clone(),
                    kind,
                    result,
                },
            )
        });

        Task::batch(std::iter::once(product).chain(variants))
    }

    fn fetch_image(&self, url: String) -> Task<Message> {
        let client = self.client.clone();
        let target = url.clone();
        Task::perform(
            async move { client.fetch_image(&target).await.map_err(|e| e.to_string()) },
            move |result| Message::ImageLoaded {
                url: url.clone(),
                result,
            },
        )
    }

    /// Every image the current page draws
    fn visible_images(&self) -> Vec<ImageSource> {
        match &self.page {
            Page::Listing => self
                .listing
                .products()
                .iter()
                .map(|product| self.resolver.resolve(product.first_image()))
                .collect(),
            Page::Detail(page) => {
                let mut sources = Vec::new();
                if let ProductSlot::Loaded(_) = page.product() {
                    let gallery = page.gallery();
                    sources.push(self.resolver.resolve(gallery.selected_image()));
                    sources.extend(
                        gallery
                            .visible_images()
                            .iter()
                            .map(|id| self.resolver.resolve(Some(id))),
                    );
                }
                for (_, variants) in page.variants().strips() {
                    sources.extend(
                        variants
                            .iter()
                            .map(|variant| self.resolver.resolve(variant.first_image())),
                    );
                }
                sources
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let page = match &self.page {
            Page::Listing => ui::listing::view(&self.listing, &self.resolver, &self.images),
            Page::Detail(page) => ui::detail::view(page, &self.resolver, &self.images),
        };

        container(scrollable(page))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("furniture_storefront", LevelFilter::Debug)
        .init();
}

/// Fetch facet option lists before the UI starts so the filter manager
/// can be built with them. Any failure leaves that facet empty.
fn load_startup_options(config: &Config) -> AttributeOptionsCache {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::warn!("⚠️  No runtime for loading filter options: {e}");
            return AttributeOptionsCache::new(&config.category);
        }
    };

    // Separate client: its connection pool dies with this runtime
    match catalog_client(config) {
        Ok(client) => runtime.block_on(client.load_options(&config.category)),
        Err(e) => {
            log::warn!("⚠️  {e}");
            AttributeOptionsCache::new(&config.category)
        }
    }
}

/// Client for the configured catalog, or for the default one if the
/// configured URL is rejected
fn catalog_client(config: &Config) -> Result<CatalogClient, CatalogError> {
    match CatalogClient::new(config) {
        Err(CatalogError::Url(e)) => {
            log::warn!("⚠️  Invalid catalog base_url {:?}: {e}", config.base_url);
            CatalogClient::new(&Config::default())
        }
        result => result,
    }
}

fn main() -> iced::Result {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let config = Config::load();

    let client = match catalog_client(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Cannot create the catalog client: {e}");
            return Ok(());
        }
    };

    let options = load_startup_options(&config);
    log::info!("🎨 Storefront starting against {}", config.base_url);

    iced::application("Furniture Storefront", Storefront::update, Storefront::view)
        .theme(Storefront::theme)
        .centered()
        .run_with(move || Storefront::new(config, client, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storefront() -> Storefront {
        let config = Config::default();
        let client = CatalogClient::new(&config).unwrap();
        let options = AttributeOptionsCache::new(&config.category);
        let (storefront, _initial) = Storefront::new(config, client, options);
        storefront
    }

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Table {id}"),
            ..Product::default()
        }
    }

    #[test]
    fn test_startup_issues_the_unfiltered_query() {
        let storefront = storefront();
        assert_eq!(storefront.listing.generation(), 1);
        assert!(storefront.listing.filters().is_empty());
    }

    #[test]
    fn test_each_option_click_issues_one_query() {
        let mut storefront = storefront();

        let _ = storefront.update(Message::SelectOption(Facet::TopMaterial, "oak".to_string()));
        assert_eq!(storefront.listing.generation(), 2);

        let _ = storefront.update(Message::SelectOption(Facet::KnockedDown, "all".to_string()));
        assert_eq!(storefront.listing.generation(), 3);
        assert!(storefront.listing.filters().is_empty());

        // Dropdown toggles never query
        let _ = storefront.update(Message::ToggleDropdown(Facet::LegFinish));
        assert_eq!(storefront.listing.generation(), 3);
    }

    #[test]
    fn test_back_to_listing_remounts_and_drops_old_results() {
        let mut storefront = storefront();
        let _ = storefront.update(Message::SelectOption(Facet::TopMaterial, "oak".to_string()));
        let in_flight = storefront.listing.generation();

        let _ = storefront.update(Message::OpenProduct("p1".to_string()));
        assert_eq!(storefront.listing.generation(), in_flight);

        let _ = storefront.update(Message::BackToListing);
        assert!(matches!(storefront.page, Page::Listing));
        assert!(storefront.listing.filters().is_empty());
        let remounted = storefront.listing.generation();
        assert_eq!(remounted, in_flight + 1);

        let _ = storefront.update(Message::ProductsLoaded {
            generation: in_flight,
            result: Ok(vec![product("oak-only")]),
        });
        assert!(storefront.listing.products().is_empty());

        let _ = storefront.update(Message::ProductsLoaded {
            generation: remounted,
            result: Ok(vec![product("a"), product("b")]),
        });
        assert_eq!(storefront.listing.products(), &[product("a"), product("b")]);
    }

    #[test]
    fn test_detail_responses_for_another_product_are_ignored() {
        let mut storefront = storefront();
        let _ = storefront.update(Message::OpenProduct("p1".to_string()));
        let _ = storefront.update(Message::OpenProduct("p2".to_string()));

        let _ = storefront.update(Message::ProductLoaded {
            product_id: "p1".to_string(),
            result: Ok(Some(product("p1"))),
        });
        let _ = storefront.update(Message::VariantsLoaded {
            product_id: "p1".to_string(),
            kind: VariantKind::Top,
            result: Ok(vec![Variant::default()]),
        });

        let Page::Detail(page) = &storefront.page else {
            panic!("still on the detail page");
        };
        assert_eq!(page.product_id(), "p2");
        assert_eq!(page.product(), &ProductSlot::Loading);
        assert!(!page.variants().has_any());
    }

    #[test]
    fn test_detail_responses_after_leaving_are_ignored() {
        let mut storefront = storefront();
        let _ = storefront.update(Message::OpenProduct("p1".to_string()));
        let _ = storefront.update(Message::BackToListing);

        let _ = storefront.update(Message::ProductLoaded {
            product_id: "p1".to_string(),
            result: Ok(Some(product("p1"))),
        });
        assert!(matches!(storefront.page, Page::Listing));
    }

    #[test]
    fn test_malformed_base_url_falls_back_to_default_client() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(catalog_client(&config).is_ok());
    }
}
