use std::sync::Arc;

use lodestar_core::config::OfflineConfig;
use lodestar_core::store::Store;
use muse_client::MuseClient;
use tokio::sync::{broadcast, RwLock};

use crate::error::AppError;
use crate::offline::{CacheStorage, EmbeddedFetcher, Fetcher};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    /// Absent when the deployment runs without a text backend.
    pub muse: Option<Arc<MuseClient>>,
    pub event_tx: broadcast::Sender<()>,
    pub cache: Arc<RwLock<CacheStorage>>,
    pub fetcher: Arc<dyn Fetcher>,
}

impl AppState {
    pub fn new(store: Store, muse: Option<MuseClient>, offline: &OfflineConfig) -> Self {
        Self::with_fetcher(store, muse, offline, Arc::new(EmbeddedFetcher))
    }

    /// Like [`new`], with a caller-supplied asset fetcher. Tests use this
    /// to simulate the fetcher going away.
    ///
    /// [`new`]: AppState::new
    pub fn with_fetcher(
        store: Store,
        muse: Option<MuseClient>,
        offline: &OfflineConfig,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let (tx, _) = broadcast::channel(64);

        let mut cache = CacheStorage::new(offline.cache_version, offline.offline_page.clone());
        cache.install(&offline.precache, fetcher.as_ref());

        Self {
            store: Arc::new(store),
            muse: muse.map(Arc::new),
            event_tx: tx,
            cache: Arc::new(RwLock::new(cache)),
            fetcher,
        }
    }

    /// The text client, or a 503 for endpoints that cannot work without
    /// one.
    pub fn muse_required(&self) -> Result<Arc<MuseClient>, AppError> {
        self.muse
            .clone()
            .ok_or_else(|| AppError::unavailable("text generation is not configured"))
    }

    /// Notify SSE subscribers that state changed. Send errors just mean
    /// nobody is listening.
    pub fn notify(&self) {
        let _ = self.event_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_state_installs_precache() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.redb")).unwrap();
        let state = AppState::new(store, None, &OfflineConfig::default());
        assert!(!state.cache.blocking_read().is_empty());
    }

    #[test]
    fn muse_required_without_client_is_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.redb")).unwrap();
        let state = AppState::new(store, None, &OfflineConfig::default());
        assert!(state.muse_required().is_err());
    }
}
