use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing order for the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSort {
    /// Favorite count descending, ties broken by id ascending.
    #[default]
    Popularity,
    /// Most recently created first.
    Newest,
}

// ---------------------------------------------------------------------------
// Query DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    /// Zero-based page index.
    #[serde(default)]
    pub page: u64,
    /// Items per page. Falls back to the configured default when absent.
    pub page_size: Option<u64>,
    #[serde(default)]
    pub sort: CatalogSort,
    /// Requesting viewer; only used to compute `is_favorited`.
    pub viewer_email: Option<String>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// One catalog entry as seen by a particular viewer.
#[derive(Debug, Clone, Serialize)]
pub struct AssetView {
    /// Signed read URL, or the fallback path when signing is unavailable.
    pub display_url: String,
    /// Raw locator usable when `display_url` cannot be loaded.
    pub fallback_path: String,
    pub blob_key: String,
    pub prompt: String,
    pub creator_email: Option<String>,
    pub favorite_count: u64,
    pub is_favorited: bool,
    pub created_at: DateTime<Utc>,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current page index (0-based).
    pub page: u64,
    pub page_size: u64,
    /// Total number of assets across all pages.
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// One entry of the visible page-number strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Zero-based index to request.
    pub page_index: u64,
    /// One-based number to show.
    pub display_number: u64,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    pub items: Vec<AssetView>,
    pub pagination: Pagination,
    pub page_window: Vec<PageLink>,
}

/// Blob bytes with an inferred content type.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub content_type: String,
}
