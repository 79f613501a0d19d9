//! Offline asset gateway.
//!
//! Every non-API request falls through to this module, which routes it
//! through a versioned in-memory cache in front of a [`Fetcher`]:
//!
//! - static assets (scripts, styles, images, fonts) are cache-first: a
//!   cached copy is served without consulting the fetcher again;
//! - navigations are network-first: the fetcher is tried on every request,
//!   the cache absorbs failures, and when neither has the page the
//!   precached offline page is served instead;
//! - `/api/` paths bypass the cache entirely.
//!
//! The cache is keyed by a version number. Activating a new version drops
//! every entry from older versions, so stale assets cannot outlive a
//! deploy; install warms the configured precache list so the offline page
//! is available before the first request.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

use crate::embed::AppAssets;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CachePolicy
// ---------------------------------------------------------------------------

/// How a request path interacts with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve from cache when present; populate it on first fetch.
    CacheFirst,
    /// Always try the fetcher; fall back to cache, then the offline page.
    NetworkFirst,
    /// Never cached.
    Bypass,
}

const ASSET_EXTENSIONS: &[&str] = &[
    ".css",
    ".js",
    ".mjs",
    ".png",
    ".jpg",
    ".svg",
    ".ico",
    ".woff",
    ".woff2",
    ".webmanifest",
];

/// Classify a request path. Navigations (anything without an asset
/// extension) are network-first so users see fresh content when online.
pub fn classify(path: &str) -> CachePolicy {
    if path.starts_with("/api/") {
        return CachePolicy::Bypass;
    }
    if ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return CachePolicy::CacheFirst;
    }
    CachePolicy::NetworkFirst
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Source of truth behind the cache. Production uses the embedded assets;
/// tests swap in fetchers that fail on demand.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, path: &str) -> Option<Asset>;
}

/// Fetcher over the assets compiled into the binary.
pub struct EmbeddedFetcher;

impl Fetcher for EmbeddedFetcher {
    fn fetch(&self, path: &str) -> Option<Asset> {
        // Unknown API routes must 404, not resolve to the app shell.
        if path.starts_with("/api/") {
            return None;
        }
        let trimmed = path.trim_start_matches('/');
        // Root and extensionless navigations resolve to the app shell.
        let key = if trimmed.is_empty() || !trimmed.contains('.') {
            "index.html"
        } else {
            trimmed
        };
        let content = <AppAssets as Embed>::get(key)?;
        let mime = mime_guess::from_path(key).first_or_octet_stream();
        Some(Asset {
            content_type: mime.to_string(),
            body: content.data.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// CacheStorage
// ---------------------------------------------------------------------------

/// Where a gateway response came from; exposed in a header for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    Network,
    Cache,
    OfflinePage,
}

impl Served {
    pub fn as_str(&self) -> &'static str {
        match self {
            Served::Network => "network",
            Served::Cache => "cache",
            Served::OfflinePage => "offline-page",
        }
    }
}

#[derive(Debug)]
pub struct GatewayResponse {
    pub status: u16,
    pub asset: Option<Asset>,
    pub served: Served,
}

/// Versioned asset cache. A single instance lives in [`AppState`] behind a
/// lock; entries from older versions are discarded on [`activate`].
///
/// [`activate`]: CacheStorage::activate
pub struct CacheStorage {
    version: u32,
    offline_page: String,
    entries: HashMap<String, Asset>,
}

impl CacheStorage {
    pub fn new(version: u32, offline_page: impl Into<String>) -> Self {
        Self {
            version,
            offline_page: offline_page.into(),
            entries: HashMap::new(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Warm the cache with the precache list. Missing assets are skipped
    /// with a warning; returns how many were cached.
    pub fn install(&mut self, precache: &[String], fetcher: &dyn Fetcher) -> usize {
        let mut cached = 0;
        for path in precache {
            match fetcher.fetch(path) {
                Some(asset) => {
                    self.entries.insert(path.clone(), asset);
                    cached += 1;
                }
                None => tracing::warn!(%path, "precache asset not found"),
            }
        }
        tracing::info!(version = self.version, cached, "asset cache installed");
        cached
    }

    /// Switch to `version`, dropping every entry if it differs from the
    /// current one.
    pub fn activate(&mut self, version: u32) {
        if version != self.version {
            let dropped = self.entries.len();
            self.entries.clear();
            tracing::info!(
                old_version = self.version,
                new_version = version,
                dropped,
                "asset cache activated"
            );
            self.version = version;
        }
    }

    fn offline_fallback(&self, fetcher: &dyn Fetcher) -> GatewayResponse {
        let asset = self
            .entries
            .get(&self.offline_page)
            .cloned()
            .or_else(|| fetcher.fetch(&self.offline_page));
        match asset {
            Some(asset) => GatewayResponse {
                status: 200,
                asset: Some(asset),
                served: Served::OfflinePage,
            },
            None => GatewayResponse {
                status: 404,
                asset: None,
                served: Served::OfflinePage,
            },
        }
    }

    /// Resolve one request through the cache according to its policy.
    pub fn handle(&mut self, path: &str, fetcher: &dyn Fetcher) -> GatewayResponse {
        match classify(path) {
            CachePolicy::Bypass => match fetcher.fetch(path) {
                Some(asset) => GatewayResponse {
                    status: 200,
                    asset: Some(asset),
                    served: Served::Network,
                },
                None => GatewayResponse {
                    status: 404,
                    asset: None,
                    served: Served::Network,
                },
            },
            CachePolicy::CacheFirst => {
                if let Some(asset) = self.entries.get(path) {
                    return GatewayResponse {
                        status: 200,
                        asset: Some(asset.clone()),
                        served: Served::Cache,
                    };
                }
                match fetcher.fetch(path) {
                    Some(asset) => {
                        self.entries.insert(path.to_string(), asset.clone());
                        GatewayResponse {
                            status: 200,
                            asset: Some(asset),
                            served: Served::Network,
                        }
                    }
                    None => GatewayResponse {
                        status: 404,
                        asset: None,
                        served: Served::Network,
                    },
                }
            }
            CachePolicy::NetworkFirst => {
                if let Some(asset) = fetcher.fetch(path) {
                    self.entries.insert(path.to_string(), asset.clone());
                    return GatewayResponse {
                        status: 200,
                        asset: Some(asset),
                        served: Served::Network,
                    };
                }
                if let Some(asset) = self.entries.get(path) {
                    return GatewayResponse {
                        status: 200,
                        asset: Some(asset.clone()),
                        served: Served::Cache,
                    };
                }
                self.offline_fallback(fetcher)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Axum handler
// ---------------------------------------------------------------------------

/// Fallback handler: everything that is not an API route goes through the
/// gateway. Only GETs are cacheable; other methods skip the cache and 404.
pub async fn gateway(State(app): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }
    let path = uri.path().to_string();
    let result = {
        let mut cache = app.cache.write().await;
        cache.handle(&path, app.fetcher.as_ref())
    };

    let status = StatusCode::from_u16(result.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match result.asset {
        Some(asset) => (
            status,
            [
                (header::CONTENT_TYPE, asset.content_type),
                (
                    header::HeaderName::from_static("x-lodestar-served"),
                    result.served.as_str().to_string(),
                ),
            ],
            asset.body,
        )
            .into_response(),
        None => (status, "not found").into_response(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
