//! In-memory doubles shared by the unit tests.

use crate::domain::model::{ReleaseItem, SourceAvailability, TitleDetails};
use crate::domain::ports::{CatalogApi, Storage};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned()
    }
}

impl Storage for MockStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}

fn unavailable(endpoint: &str) -> EtlError {
    EtlError::UpstreamStatusError {
        endpoint: endpoint.to_string(),
        status: 500,
    }
}

/// Catalog backed by maps; a missing entry behaves like a failed call.
#[derive(Default)]
pub struct MockCatalog {
    pub releases: Option<Vec<ReleaseItem>>,
    pub sources: HashMap<u64, Vec<u32>>,
    pub details: HashMap<u64, TitleDetails>,
    pub source_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
}

impl MockCatalog {
    pub fn with_releases(releases: Vec<ReleaseItem>) -> Self {
        Self {
            releases: Some(releases),
            ..Self::default()
        }
    }

    pub fn source(mut self, title_id: u64, provider_ids: &[u32]) -> Self {
        self.sources.insert(title_id, provider_ids.to_vec());
        self
    }

    pub fn detail(mut self, title_id: u64, details: TitleDetails) -> Self {
        self.details.insert(title_id, details);
        self
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn recent_releases(&self) -> Result<Vec<ReleaseItem>> {
        self.releases.clone().ok_or_else(|| unavailable("releases"))
    }

    async fn title_sources(&self, title_id: u64) -> Result<SourceAvailability> {
        self.source_calls.fetch_add(1, Ordering::SeqCst);
        self.sources
            .get(&title_id)
            .map(|ids| SourceAvailability {
                title_id,
                provider_ids: ids.clone(),
            })
            .ok_or_else(|| unavailable("title sources"))
    }

    async fn title_details(&self, title_id: u64) -> Result<TitleDetails> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .get(&title_id)
            .cloned()
            .ok_or_else(|| unavailable("title details"))
    }
}

pub fn release(id: u64, title: &str) -> ReleaseItem {
    ReleaseItem {
        id: Some(id),
        title: title.to_string(),
        imdb_id: Some(format!("tt{:07}", id)),
        kind: Some("movie".to_string()),
        poster_url: None,
    }
}
