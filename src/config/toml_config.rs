use crate::config::settings::{usable, Credentials, EmitMode, Settings};
use crate::domain::services::ServiceRegistry;
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Optional config file. Every section and key may be omitted; present
/// values override the CLI defaults.
///
/// ```toml
/// [source]
/// base_url = "https://api.watchmode.com/v1"
/// api_key = "${WATCHMODE_API_KEY}"
/// region = "BR"
/// limit = 20
///
/// [services]
/// 203 = "Netflix"
/// 444 = "Mubi"
///
/// [load]
/// emit = "snapshot"
/// output_path = "data"
///
/// [notify]
/// bot_token = "${TELEGRAM_TOKEN}"
/// chat_id = "${TELEGRAM_CHAT_ID}"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub source: Option<SourceConfig>,
    pub services: Option<HashMap<String, String>>,
    pub load: Option<LoadConfig>,
    pub notify: Option<NotifyConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub region: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<usize>,
    pub fetch_details: Option<bool>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadConfig {
    pub emit: Option<EmitMode>,
    pub output_path: Option<String>,
    pub output_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    pub api_url: Option<String>,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，`${VAR}` 以環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse_with(content, |name| std::env::var(name).ok())
    }

    pub fn parse_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = substitute_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// The `[services]` table as a registry; keys must be provider ids.
    pub fn service_registry(&self) -> Result<Option<ServiceRegistry>> {
        let Some(services) = &self.services else {
            return Ok(None);
        };

        let mut entries = Vec::with_capacity(services.len());
        for (key, name) in services {
            let id = key
                .trim()
                .parse::<u32>()
                .map_err(|_| EtlError::InvalidConfigValueError {
                    field: "services".to_string(),
                    value: key.clone(),
                    reason: "Service keys must be numeric provider ids".to_string(),
                })?;
            entries.push((id, name.clone()));
        }

        Ok(Some(ServiceRegistry::from_entries(entries)))
    }

    pub fn credentials(&self) -> Credentials {
        let source = self.source.clone().unwrap_or_default();
        let notify = self.notify.clone().unwrap_or_default();
        Credentials {
            api_key: usable(source.api_key),
            telegram_token: usable(notify.bot_token),
            telegram_chat_id: usable(notify.chat_id),
        }
    }

    /// Overrides settings with the values present in the file. Credentials
    /// already set (from the environment) are kept.
    pub fn apply_to(&self, settings: &mut Settings) -> Result<()> {
        if let Some(source) = &self.source {
            if let Some(base_url) = &source.base_url {
                settings.api_base_url = base_url.clone();
            }
            if let Some(region) = &source.region {
                settings.region = region.clone();
            }
            if let Some(sort_by) = &source.sort_by {
                settings.sort_by = sort_by.clone();
            }
            if let Some(limit) = source.limit {
                settings.release_limit = limit;
            }
            if let Some(fetch_details) = source.fetch_details {
                settings.fetch_details = fetch_details;
            }
            if source.request_timeout_seconds.is_some() {
                settings.request_timeout_seconds = source.request_timeout_seconds;
            }
        }

        if let Some(registry) = self.service_registry()? {
            settings.services = registry;
        }

        if let Some(load) = &self.load {
            if let Some(emit) = load.emit {
                settings.emit = emit;
            }
            if let Some(output_path) = &load.output_path {
                settings.output_path = output_path.clone();
            }
            if let Some(output_file) = &load.output_file {
                settings.output_file = output_file.clone();
            }
        }

        if let Some(api_url) = self.notify.as_ref().and_then(|n| n.api_url.as_ref()) {
            settings.telegram_api_url = api_url.clone();
        }

        settings.credentials = settings.credentials.clone().or(self.credentials());
        Ok(())
    }
}

/// 未設定的變數保留原樣 `${VAR}`，之後會被視為缺少
fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
        message: format!("Invalid placeholder pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
