use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::loader::{CachedLoad, LoadCache, LoadError, LoadOutcome, Loader, SheetRequest};

/// The load a request should be answered from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub outcome: Arc<LoadOutcome>,
    pub loaded_at: DateTime<Utc>,
    /// Set when a reload failed and an older load is being served instead.
    pub stale: Option<String>,
}

impl Snapshot {
    fn fresh(entry: CachedLoad) -> Self {
        Self {
            outcome: entry.outcome,
            loaded_at: entry.stored_at,
            stale: None,
        }
    }

    fn stale(entry: CachedLoad, warning: String) -> Self {
        Self {
            outcome: entry.outcome,
            loaded_at: entry.stored_at,
            stale: Some(warning),
        }
    }
}

/// Read-through cache in front of the [`Loader`] for one configured sheet.
pub struct DashboardService {
    loader: Loader,
    cache: Arc<LoadCache>,
    request: SheetRequest,
}

impl DashboardService {
    pub fn new(loader: Loader, cache: Arc<LoadCache>, request: SheetRequest) -> Self {
        Self {
            loader,
            cache,
            request,
        }
    }

    /// Serves the cached load while it is fresh, reloading otherwise. When
    /// the reload fails the last good load is served marked stale; the
    /// error only surfaces if there has never been a successful load.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Snapshot, LoadError> {
        if let Some(entry) = self.cache.get(&self.request).await {
            debug!("Serving cached load");
            return Ok(Snapshot::fresh(entry));
        }

        match self.reload().await {
            Ok(snapshot) => Ok(snapshot),
            Err(load_error) => match self.cache.last_good(&self.request).await {
                Some(previous) => {
                    warn!(
                        error = %load_error,
                        loaded_at = %previous.stored_at,
                        "Reload failed, serving last good load"
                    );
                    Ok(Snapshot::stale(previous, load_error.to_string()))
                }
                None => {
                    error!(error = %load_error, "Reload failed and no previous load exists");
                    Err(load_error)
                }
            },
        }
    }

    /// Manual refresh: reloads regardless of TTL. A failure is returned to
    /// the caller so it can offer a retry; the cached load is left intact
    /// for subsequent snapshots.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Snapshot, LoadError> {
        info!("Manual refresh requested");
        self.reload().await
    }

    async fn reload(&self) -> Result<Snapshot, LoadError> {
        let outcome = self.loader.load(&self.request).await?;
        let entry = self.cache.put(self.request.clone(), outcome).await;
        Ok(Snapshot::fresh(entry))
    }
}
