use crate::domain::model::{
    ReleaseItem, ReleasesResponse, SourceAvailability, SourceRow, TitleDetails,
};
use crate::domain::ports::{CatalogApi, ConfigProvider};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.watchmode.com/v1";

/// Watchmode v1 client. Every request carries the API key and region as
/// query parameters; one call is made per method invocation.
pub struct WatchmodeClient {
    client: Client,
    base_url: String,
    api_key: String,
    region: String,
    sort_by: String,
    limit: usize,
}

impl WatchmodeClient {
    pub fn new<C: ConfigProvider>(
        config: &C,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            region: config.region().to_string(),
            sort_by: config.sort_by().to_string(),
            limit: config.release_limit(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status for {}: {}", endpoint, status);

        if !status.is_success() {
            return Err(EtlError::UpstreamStatusError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogApi for WatchmodeClient {
    async fn recent_releases(&self) -> Result<Vec<ReleaseItem>> {
        let params = [
            ("regions", self.region.clone()),
            ("sort_by", self.sort_by.clone()),
            ("limit", self.limit.to_string()),
        ];
        let response: ReleasesResponse = self.get_json("releases", "/releases/", &params).await?;

        let mut releases = response.into_items();
        releases.truncate(self.limit);
        Ok(releases)
    }

    async fn title_sources(&self, title_id: u64) -> Result<SourceAvailability> {
        let params = [("regions", self.region.clone())];
        let rows: Vec<SourceRow> = self
            .get_json(
                "title sources",
                &format!("/title/{}/sources/", title_id),
                &params,
            )
            .await?;

        Ok(SourceAvailability::from_rows(title_id, rows))
    }

    async fn title_details(&self, title_id: u64) -> Result<TitleDetails> {
        let params = [("regions", self.region.clone())];
        self.get_json(
            "title details",
            &format!("/title/{}/details/", title_id),
            &params,
        )
        .await
    }
}
