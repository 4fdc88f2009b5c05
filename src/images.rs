/// Product image resolution and download cache
///
/// Image ids from the catalog are file names inside the server's uploads
/// folder. `ImageResolver` turns an id into something displayable and
/// `ImageCache` keeps downloaded images around for the lifetime of the app.

use iced::widget::image::Handle;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::config::Config;

/// Where an image should come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    Placeholder(PathBuf),
}

/// Maps image ids to URLs
#[derive(Debug, Clone)]
pub struct ImageResolver {
    uploads_base: String,
    placeholder: PathBuf,
}

impl ImageResolver {
    pub fn new(uploads_base: impl Into<String>, placeholder: impl Into<PathBuf>) -> Self {
        Self {
            uploads_base: uploads_base.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.uploads_url(), config.placeholder_image.clone())
    }

    /// `uploads_base + id`, or the placeholder for a missing or blank id
    pub fn resolve(&self, image_id: Option<&str>) -> ImageSource {
        match image_id.map(str::trim) {
            Some(id) if !id.is_empty() => ImageSource::Remote(format!("{}{}", self.uploads_base, id)),
            _ => ImageSource::Placeholder(self.placeholder.clone()),
        }
    }
}

/// Downloaded image handles keyed by URL
#[derive(Debug)]
pub struct ImageCache {
    loaded: HashMap<String, Handle>,
    pending: HashSet<String>,
    failed: HashSet<String>,
    placeholder: Handle,
}

impl ImageCache {
    pub fn new(placeholder: PathBuf) -> Self {
        Self {
            loaded: HashMap::new(),
            pending: HashSet::new(),
            failed: HashSet::new(),
            placeholder: Handle::from_path(placeholder),
        }
    }

    /// Mark a remote image as wanted.
    /// Returns the URL to download if nobody has asked for it yet.
    pub fn request(&mut self, source: &ImageSource) -> Option<String> {
        let ImageSource::Remote(url) = source else {
            return None;
        };

        if self.loaded.contains_key(url) || self.failed.contains(url) {
            return None;
        }
        self.pending.insert(url.clone()).then(|| url.clone())
    }

    /// Store the outcome of a download
    pub fn complete(&mut self, url: String, result: Result<Vec<u8>, String>) {
        self.pending.remove(&url);
        match result {
            Ok(bytes) => {
                self.loaded.insert(url, Handle::from_bytes(bytes));
            }
            Err(e) => {
                log::warn!("🖼️  Image {} unavailable: {}", url, e);
                self.failed.insert(url);
            }
        }
    }

    /// Handle to draw for `source`, the placeholder until it has loaded
    pub fn handle(&self, source: &ImageSource) -> Handle {
        match source {
            ImageSource::Remote(url) => self
                .loaded
                .get(url)
                .cloned()
                .unwrap_or_else(|| self.placeholder.clone()),
            ImageSource::Placeholder(path) => Handle::from_path(path.clone()),
        }
    }

    /// Allow images that failed earlier to be downloaded again
    pub fn forget_failures(&mut self) {
        if !self.failed.is_empty() {
            log::debug!("Retrying {} failed images on next request", self.failed.len());
            self.failed.clear();
        }
    }

    pub fn is_loaded(&self, url: &str) -> bool {
        self.loaded.contains_key(url)
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }
}
