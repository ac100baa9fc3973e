use crate::core::filter::match_services;
use crate::domain::model::{OutputRecord, ReleaseItem, SourceAvailability};
use crate::domain::ports::{CatalogApi, ConfigProvider, Emitter, Pipeline};
use crate::utils::error::Result;

/// Fetch → enrich & filter → emit, one upstream call at a time.
///
/// Upstream failures never abort the run: a failed release fetch becomes an
/// empty release list, a failed source lookup drops that title, and a failed
/// details lookup only leaves the rating fields empty.
pub struct ReleasePipeline<A: CatalogApi, E: Emitter, C: ConfigProvider> {
    catalog: A,
    emitter: E,
    config: C,
}

impl<A: CatalogApi, E: Emitter, C: ConfigProvider> ReleasePipeline<A, E, C> {
    pub fn new(catalog: A, emitter: E, config: C) -> Self {
        Self {
            catalog,
            emitter,
            config,
        }
    }

    async fn resolve_sources(&self, title_id: u64) -> SourceAvailability {
        match self.catalog.title_sources(title_id).await {
            Ok(availability) => availability,
            Err(e) => {
                tracing::warn!("⚠️ Could not resolve sources for title {}: {}", title_id, e);
                SourceAvailability::empty(title_id)
            }
        }
    }

    async fn enrich(&self, title_id: u64, record: OutputRecord) -> OutputRecord {
        if !self.config.fetch_details() {
            return record;
        }

        match self.catalog.title_details(title_id).await {
            Ok(details) => record.with_details(details),
            Err(e) => {
                tracing::warn!("⚠️ Could not fetch details for title {}: {}", title_id, e);
                record
            }
        }
    }
}

#[async_trait::async_trait]
impl<A: CatalogApi, E: Emitter, C: ConfigProvider> Pipeline for ReleasePipeline<A, E, C> {
    async fn extract(&self) -> Result<Vec<ReleaseItem>> {
        tracing::info!(
            "🚀 Fetching up to {} releases for region {}",
            self.config.release_limit(),
            self.config.region()
        );

        match self.catalog.recent_releases().await {
            Ok(releases) => Ok(releases),
            Err(e) => {
                tracing::warn!("⚠️ Release fetch failed, continuing with no releases: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn transform(&self, releases: Vec<ReleaseItem>) -> Result<Vec<OutputRecord>> {
        let registry = self.config.services();
        let mut records = Vec::new();

        for release in releases {
            let Some(title_id) = release.id else {
                tracing::debug!("Skipping '{}' without a title id", release.title);
                continue;
            };

            let availability = self.resolve_sources(title_id).await;
            let Some(services) = match_services(&availability, registry) else {
                tracing::debug!("'{}' is not on any tracked service", release.title);
                continue;
            };

            tracing::debug!("'{}' available on {} service(s)", release.title, services.len());
            let record = OutputRecord::new(&release, services);
            records.push(self.enrich(title_id, record).await);
        }

        Ok(records)
    }

    async fn load(&self, records: Vec<OutputRecord>) -> Result<String> {
        self.emitter.emit(self.config.run_date(), &records).await
    }
}
