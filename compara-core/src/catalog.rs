//! Product catalog read API.
//!
//! The comparison engine never owns product data; it asks a [`Catalog`] for
//! the hydrated items behind a list of ids. Implementations:
//! - `JsonFileCatalog`: a JSON array of products on disk.
//! - `HttpCatalog`: the hosted backend's PostgREST-style REST endpoint.
//! - `InMemoryCatalog`: fixed item list for tests.
//!
//! Every implementation returns items in requested-id order and silently drops
//! ids it does not know.

use crate::config::{CatalogConfig, CatalogSource};
use crate::error::CatalogError;
use crate::types::{ComparableItem, ItemId};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Items for `ids`, in the order requested. Unknown ids are skipped.
    async fn fetch_items(&self, ids: &[ItemId]) -> Result<Vec<ComparableItem>, CatalogError>;

    /// Every product the catalog exposes.
    async fn list_items(&self) -> Result<Vec<ComparableItem>, CatalogError>;
}

/// Pick `ids` out of `items`, keeping request order and dropping duplicates.
fn select_in_order(items: Vec<ComparableItem>, ids: &[ItemId]) -> Vec<ComparableItem> {
    let mut by_id: HashMap<ItemId, ComparableItem> =
        items.into_iter().map(|item| (item.id.clone(), item)).collect();
    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            continue;
        }
        match by_id.remove(id) {
            Some(item) => selected.push(item),
            None => warn!(%id, "Catalog has no item with this id"),
        }
    }
    selected
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: Vec<ComparableItem>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<ComparableItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn fetch_items(&self, ids: &[ItemId]) -> Result<Vec<ComparableItem>, CatalogError> {
        Ok(select_in_order(self.items.clone(), ids))
    }

    async fn list_items(&self) -> Result<Vec<ComparableItem>, CatalogError> {
        Ok(self.items.clone())
    }
}

/// Catalog read from a JSON file holding an array of products.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<ComparableItem>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CatalogError::Load {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        let items: Vec<ComparableItem> =
            serde_json::from_str(&raw).map_err(|e| CatalogError::Load {
                path: self.path.clone(),
                message: format!("invalid catalog JSON: {e}"),
            })?;
        debug!(path = %self.path.display(), count = items.len(), "Loaded catalog file");
        Ok(items)
    }
}

#[async_trait]
impl Catalog for JsonFileCatalog {
    async fn fetch_items(&self, ids: &[ItemId]) -> Result<Vec<ComparableItem>, CatalogError> {
        Ok(select_in_order(self.load().await?, ids))
    }

    async fn list_items(&self) -> Result<Vec<ComparableItem>, CatalogError> {
        self.load().await
    }
}

/// Catalog served by the hosted backend's REST interface.
///
/// Issues `GET {base_url}/rest/v1/{table}?select=*&id=in.(..)` with the API
/// key in both the `apikey` and bearer `Authorization` headers.
pub struct HttpCatalog {
    client: Client,
    base_url: Url,
    table: String,
    api_key: Option<String>,
}

impl HttpCatalog {
    pub fn new(
        base_url: &str,
        table: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CatalogError::Request {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Self::with_client(client, base_url, table, api_key)
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(
        client: Client,
        base_url: &str,
        table: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, CatalogError> {
        let mut base_url = Url::parse(base_url).map_err(|e| CatalogError::Request {
            message: format!("Invalid catalog base URL '{base_url}': {e}"),
        })?;
        // join() replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client,
            base_url,
            table: table.into(),
            api_key,
        })
    }

    /// Build from configuration, resolving the API key from the environment
    /// when it is not set inline.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| CatalogError::Request {
                message: "catalog.base_url is not configured".into(),
            })?;
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(&config.api_key_env).ok());
        Self::new(
            base_url,
            config.table.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Query URL for `ids`, or for the whole table when `ids` is `None`.
    pub fn items_url(&self, ids: Option<&[ItemId]>) -> Result<Url, CatalogError> {
        let mut url = self
            .base_url
            .join(&format!("rest/v1/{}", self.table))
            .map_err(|e| CatalogError::Request {
                message: format!("Invalid catalog table path: {e}"),
            })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(ids) = ids {
                query.append_pair("id", &in_filter(ids));
            }
        }
        Ok(url)
    }

    async fn get_items(&self, url: Url) -> Result<Vec<ComparableItem>, CatalogError> {
        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }
        let response = request.send().await.map_err(|e| CatalogError::Request {
            message: format!("Request to {url} failed: {e}"),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CatalogError::ResponseParse {
            message: format!("Failed to read response body: {e}"),
        })?;
        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
                message: body,
            });
        }
        serde_json::from_str(&body).map_err(|e| CatalogError::ResponseParse {
            message: format!("Invalid product JSON: {e}"),
        })
    }
}

/// PostgREST `in.(..)` filter. Text ids are double-quoted.
fn in_filter(ids: &[ItemId]) -> String {
    let values: Vec<String> = ids
        .iter()
        .map(|id| match id {
            ItemId::Number(n) => n.to_string(),
            ItemId::Text(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        })
        .collect();
    format!("in.({})", values.join(","))
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn fetch_items(&self, ids: &[ItemId]) -> Result<Vec<ComparableItem>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.items_url(Some(ids))?;
        Ok(select_in_order(self.get_items(url).await?, ids))
    }

    async fn list_items(&self) -> Result<Vec<ComparableItem>, CatalogError> {
        let url = self.items_url(None)?;
        self.get_items(url).await
    }
}

/// Build the catalog named by configuration.
pub fn build_catalog(config: &CatalogConfig) -> Result<Arc<dyn Catalog>, CatalogError> {
    let catalog: Arc<dyn Catalog> = match config.source {
        CatalogSource::File => Arc::new(JsonFileCatalog::new(config.path.clone())),
        CatalogSource::Http => Arc::new(HttpCatalog::from_config(config)?),
    };
    Ok(catalog)
}
