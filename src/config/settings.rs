use crate::adapters::telegram::DEFAULT_TELEGRAM_API_URL;
use crate::adapters::watchmode::DEFAULT_API_BASE_URL;
use crate::domain::ports::ConfigProvider;
use crate::domain::services::ServiceRegistry;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

pub const API_KEY_VAR: &str = "WATCHMODE_API_KEY";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_REGION: &str = "BR";
pub const DEFAULT_SORT_BY: &str = "date_desc";
pub const DEFAULT_RELEASE_LIMIT: usize = 20;
pub const DEFAULT_OUTPUT_PATH: &str = "data";
pub const DEFAULT_OUTPUT_FILE: &str = "releases.json";

const MAX_RELEASE_LIMIT: usize = 250;

/// Which emitter a run uses. Exactly one runs per invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum EmitMode {
    #[default]
    Snapshot,
    Telegram,
}

/// 空字串或未替換的 `${VAR}` 視為未設定
pub(crate) fn usable(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !(v.starts_with("${") && v.ends_with('}')))
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_key: usable(lookup(API_KEY_VAR)),
            telegram_token: usable(lookup(TELEGRAM_TOKEN_VAR)),
            telegram_chat_id: usable(lookup(TELEGRAM_CHAT_ID_VAR)),
        }
    }

    /// Fills only the values this set is missing.
    pub fn or(self, fallback: Credentials) -> Self {
        Self {
            api_key: self.api_key.or(fallback.api_key),
            telegram_token: self.telegram_token.or(fallback.telegram_token),
            telegram_chat_id: self.telegram_chat_id.or(fallback.telegram_chat_id),
        }
    }
}

// Secrets stay out of `--verbose` output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("telegram_token", &mask(&self.telegram_token))
            .field("telegram_chat_id", &mask(&self.telegram_chat_id))
            .finish()
    }
}

/// Fully resolved run configuration, validated once before any network call.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub region: String,
    pub sort_by: String,
    pub release_limit: usize,
    pub fetch_details: bool,
    pub request_timeout_seconds: Option<u64>,
    pub services: ServiceRegistry,
    pub emit: EmitMode,
    pub output_path: String,
    pub output_file: String,
    pub telegram_api_url: String,
    pub credentials: Credentials,
    pub run_date: NaiveDate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            release_limit: DEFAULT_RELEASE_LIMIT,
            fetch_details: true,
            request_timeout_seconds: None,
            services: ServiceRegistry::builtin(),
            emit: EmitMode::Snapshot,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            credentials: Credentials::default(),
            run_date: chrono::Local::now().date_naive(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }

    pub fn api_key(&self) -> Result<&str> {
        validation::validate_required_field(API_KEY_VAR, &self.credentials.api_key)
            .map(String::as_str)
    }

    /// Bot token and chat id, both required by the Telegram emitter.
    pub fn telegram_credentials(&self) -> Result<(&str, &str)> {
        let token = validation::validate_required_field(
            TELEGRAM_TOKEN_VAR,
            &self.credentials.telegram_token,
        )?;
        let chat_id = validation::validate_required_field(
            TELEGRAM_CHAT_ID_VAR,
            &self.credentials.telegram_chat_id,
        )?;
        Ok((token.as_str(), chat_id.as_str()))
    }

    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        Self {
            credentials: Credentials {
                api_key: Some("secret".to_string()),
                telegram_token: None,
                telegram_chat_id: None,
            },
            run_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default(),
            ..Self::default()
        }
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn sort_by(&self) -> &str {
        &self.sort_by
    }

    fn release_limit(&self) -> usize {
        self.release_limit
    }

    fn fetch_details(&self) -> bool {
        self.fetch_details
    }

    fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn run_date(&self) -> NaiveDate {
        self.run_date
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_region_code("region", &self.region)?;
        validation::validate_non_empty_string("sort_by", &self.sort_by)?;
        validation::validate_range("limit", self.release_limit, 1, MAX_RELEASE_LIMIT)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_path("output_file", &self.output_file)?;

        if let Some(timeout) = self.request_timeout_seconds {
            validation::validate_range("request_timeout_seconds", timeout, 1, 600)?;
        }

        if self.services.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "services".to_string(),
                message: "At least one tracked service is required".to_string(),
            });
        }

        if self.emit == EmitMode::Telegram {
            validation::validate_url("telegram_api_url", &self.telegram_api_url)?;
        }

        Ok(())
    }
}
