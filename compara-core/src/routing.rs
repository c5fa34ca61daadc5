//! Detail-page links for compared items.

use crate::types::ComparableItem;

pub const DEFAULT_DETAIL_BASE: &str = "/product";

/// Resolves item detail pages by slug.
#[derive(Debug, Clone)]
pub struct Router {
    base: String,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_BASE)
    }
}

impl Router {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/{slug}`, using the id when an item has no slug.
    pub fn detail_path(&self, item: &ComparableItem) -> String {
        let slug = item.slug.trim().trim_matches('/');
        if slug.is_empty() {
            format!("{}/{}", self.base, item.id)
        } else {
            format!("{}/{}", self.base, slug)
        }
    }
}
