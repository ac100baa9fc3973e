use crate::domain::model::{OutputRecord, ReleaseItem, SourceAvailability, TitleDetails};
use crate::domain::services::ServiceRegistry;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn region(&self) -> &str;
    fn sort_by(&self) -> &str;
    fn release_limit(&self) -> usize;
    fn fetch_details(&self) -> bool;
    fn services(&self) -> &ServiceRegistry;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn run_date(&self) -> NaiveDate;
}

/// Read-only view of the upstream release catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn recent_releases(&self) -> Result<Vec<ReleaseItem>>;
    async fn title_sources(&self, title_id: u64) -> Result<SourceAvailability>;
    async fn title_details(&self, title_id: u64) -> Result<TitleDetails>;
}

/// Final stage of a run. Returns a human readable description of where the
/// output went.
#[async_trait]
pub trait Emitter: Send + Sync {
    async fn emit(&self, date: NaiveDate, records: &[OutputRecord]) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ReleaseItem>>;
    async fn transform(&self, releases: Vec<ReleaseItem>) -> Result<Vec<OutputRecord>>;
    async fn load(&self, records: Vec<OutputRecord>) -> Result<String>;
}
