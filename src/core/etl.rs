use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub releases_fetched: usize,
    pub records_emitted: usize,
    pub destination: String,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!("Starting release run...");

        let releases = self.pipeline.extract().await?;
        tracing::info!("Fetched {} releases", releases.len());
        let releases_fetched = releases.len();

        let records = self.pipeline.transform(releases).await?;
        tracing::info!(
            "{} of {} releases are on tracked services",
            records.len(),
            releases_fetched
        );
        let records_emitted = records.len();

        let destination = self.pipeline.load(records).await?;
        tracing::info!("Run finished in {:?}", started.elapsed());

        Ok(RunSummary {
            releases_fetched,
            records_emitted,
            destination,
        })
    }
}
