use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

const UNKNOWN_TITLE: &str = "Desconhecido";
const IMDB_TITLE_URL: &str = "https://www.imdb.com/title";

fn unknown_title() -> String {
    UNKNOWN_TITLE.to_string()
}

// `"title": null` 與缺少欄位同樣視為未知
fn title_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_title))
}

/// A title reported by the releases endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default = "unknown_title", deserialize_with = "title_or_unknown")]
    pub title: String,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl ReleaseItem {
    /// 沒有 IMDb id 時回傳 None
    pub fn imdb_link(&self) -> Option<String> {
        self.imdb_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}/{}", IMDB_TITLE_URL, id))
    }
}

/// Rows are kept raw so that one malformed release does not cost the others.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReleasesResponse {
    #[serde(default)]
    pub releases: Vec<serde_json::Value>,
}

impl ReleasesResponse {
    /// Decodes each row on its own, skipping the ones that do not fit.
    pub(crate) fn into_items(self) -> Vec<ReleaseItem> {
        self.releases
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value::<ReleaseItem>(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping release row {}: {}", index, e);
                    None
                }
            })
            .collect()
    }
}

/// One row of the per-title sources endpoint. A title usually has several
/// rows per provider (subscription, rent, buy, different resolutions).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SourceRow {
    #[serde(default)]
    pub source_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAvailability {
    pub title_id: u64,
    pub provider_ids: Vec<u32>,
}

impl SourceAvailability {
    pub fn empty(title_id: u64) -> Self {
        Self {
            title_id,
            provider_ids: Vec::new(),
        }
    }

    pub(crate) fn from_rows(title_id: u64, rows: Vec<SourceRow>) -> Self {
        Self {
            title_id,
            provider_ids: rows.into_iter().filter_map(|row| row.source_id).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TitleDetails {
    #[serde(default)]
    pub critic_score: Option<u32>,
    #[serde(default)]
    pub user_rating: Option<f64>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A release that is available on at least one tracked service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(
        serialize_with = "serialize_services",
        deserialize_with = "deserialize_services"
    )]
    pub services: BTreeSet<String>,
    pub imdb_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critic_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl OutputRecord {
    pub fn new(release: &ReleaseItem, services: BTreeSet<String>) -> Self {
        Self {
            title: release.title.clone(),
            kind: release.kind.clone(),
            services,
            imdb_link: release.imdb_link().unwrap_or_default(),
            critic_score: None,
            user_rating: None,
            poster_url: release.poster_url.clone().filter(|url| !url.is_empty()),
        }
    }

    /// 合併詳細資料：評分一律採用 details，海報優先使用 details，類型以 release 為主
    pub fn with_details(mut self, details: TitleDetails) -> Self {
        self.critic_score = details.critic_score;
        self.user_rating = details.user_rating;
        if let Some(poster) = details.poster.filter(|url| !url.is_empty()) {
            self.poster_url = Some(poster);
        }
        if self.kind.is_none() {
            self.kind = details.kind;
        }
        self
    }

    pub fn services_label(&self) -> String {
        join_services(&self.services)
    }
}

fn join_services(services: &BTreeSet<String>) -> String {
    services
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn serialize_services<S: Serializer>(
    services: &BTreeSet<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&join_services(services))
}

fn deserialize_services<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeSet<String>, D::Error> {
    let joined = String::deserialize(deserializer)?;
    Ok(joined
        .split(", ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

/// The document written by the snapshot emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub items: Vec<OutputRecord>,
}

impl Snapshot {
    pub fn new(date: NaiveDate, items: Vec<OutputRecord>) -> Self {
        Self { date, items }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, Vec::new())
    }
}
