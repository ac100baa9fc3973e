use crate::adapters::telegram::DEFAULT_TELEGRAM_API_URL;
use crate::adapters::watchmode::DEFAULT_API_BASE_URL;
use crate::config::settings::{
    Credentials, EmitMode, Settings, DEFAULT_OUTPUT_FILE, DEFAULT_OUTPUT_PATH, DEFAULT_REGION,
    DEFAULT_RELEASE_LIMIT, DEFAULT_SORT_BY,
};
use crate::config::toml_config::TomlConfig;
use crate::domain::services::ServiceRegistry;
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::collections::BTreeSet;
use std::ffi::OsString;

#[derive(Debug, Clone, Parser)]
#[command(name = "streaming-news")]
#[command(about = "Daily streaming releases on tracked services, as a JSON snapshot or a Telegram digest")]
pub struct CliConfig {
    #[arg(long, value_enum, default_value = "snapshot")]
    pub emit: EmitMode,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    #[arg(long, default_value_t = DEFAULT_RELEASE_LIMIT)]
    pub limit: usize,

    #[arg(long, default_value = DEFAULT_SORT_BY)]
    pub sort_by: String,

    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, default_value = DEFAULT_TELEGRAM_API_URL)]
    pub telegram_api_url: String,

    #[arg(long, help = "Skip the per-title details call (ratings and posters)")]
    pub no_details: bool,

    #[arg(
        long,
        help = "TOML config file; its values replace flag defaults, flags given explicitly win"
    )]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Flags typed on the command line, as opposed to left at their default.
    #[arg(skip)]
    pub explicit: BTreeSet<String>,
}

impl CliConfig {
    pub fn parse_args() -> Self {
        Self::parse_args_from(std::env::args_os())
    }

    /// Parses like [`Parser::parse_from`] and also records which flags were
    /// given explicitly.
    pub fn parse_args_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().get_matches_from(args);
        let mut config = Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
        config.explicit = matches
            .ids()
            .filter(|id| matches.value_source(id.as_str()) == Some(ValueSource::CommandLine))
            .map(|id| id.as_str().to_string())
            .collect();
        config
    }

    /// Resolves flags, the optional TOML file and environment credentials
    /// into the settings for one run.
    ///
    /// Precedence: explicit flag, then config file, then flag default.
    pub fn into_settings(self, credentials: Credentials, run_date: NaiveDate) -> Result<Settings> {
        let flags = Settings {
            api_base_url: self.api_base_url,
            region: self.region,
            sort_by: self.sort_by,
            release_limit: self.limit,
            fetch_details: !self.no_details,
            request_timeout_seconds: None,
            services: ServiceRegistry::builtin(),
            emit: self.emit,
            output_path: self.output_path,
            output_file: self.output_file,
            telegram_api_url: self.telegram_api_url,
            credentials,
            run_date,
        };

        let Some(path) = &self.config else {
            return Ok(flags);
        };
        tracing::info!("📄 Loading config file {}", path);
        let mut settings = flags.clone();
        TomlConfig::from_file(path)?.apply_to(&mut settings)?;

        // 明確輸入的參數優先於設定檔
        for id in &self.explicit {
            match id.as_str() {
                "emit" => settings.emit = flags.emit,
                "output_path" => settings.output_path = flags.output_path.clone(),
                "output_file" => settings.output_file = flags.output_file.clone(),
                "region" => settings.region = flags.region.clone(),
                "limit" => settings.release_limit = flags.release_limit,
                "sort_by" => settings.sort_by = flags.sort_by.clone(),
                "api_base_url" => settings.api_base_url = flags.api_base_url.clone(),
                "telegram_api_url" => settings.telegram_api_url = flags.telegram_api_url.clone(),
                "no_details" => settings.fetch_details = flags.fetch_details,
                _ => {}
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_defaults_match_snapshot_run() {
        let cli = CliConfig::parse_args_from(["streaming-news"]);
        let settings = cli.into_settings(Credentials::default(), date()).unwrap();

        assert_eq!(settings.emit, EmitMode::Snapshot);
        assert_eq!(settings.output_path, "data");
        assert_eq!(settings.output_file, "releases.json");
        assert_eq!(settings.region, "BR");
        assert_eq!(settings.release_limit, 20);
        assert!(settings.fetch_details);
        assert_eq!(settings.run_date, date());
    }

    #[test]
    fn test_flags_select_telegram_without_details() {
        let cli = CliConfig::parse_args_from([
            "streaming-news",
            "--emit",
            "telegram",
            "--no-details",
            "--limit",
            "5",
        ]);
        let settings = cli.into_settings(Credentials::default(), date()).unwrap();

        assert_eq!(settings.emit, EmitMode::Telegram);
        assert!(!settings.fetch_details);
        assert_eq!(settings.release_limit, 5);
    }

    fn config_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[source]\nregion = \"PT\"\nlimit = 7\nfetch_details = false\n\n\
             [load]\noutput_file = \"pt.json\""
        )
        .unwrap();
        file
    }

    #[test]
    fn test_config_file_overrides_flag_defaults() {
        let file = config_file();
        let cli = CliConfig::parse_args_from([
            "streaming-news",
            "--config",
            file.path().to_str().unwrap(),
        ]);
        assert!(cli.explicit.contains("config"));
        assert!(!cli.explicit.contains("region"));

        let settings = cli.into_settings(Credentials::default(), date()).unwrap();

        assert_eq!(settings.region, "PT");
        assert_eq!(settings.release_limit, 7);
        assert!(!settings.fetch_details);
        assert_eq!(settings.output_file, "pt.json");
    }

    #[test]
    fn test_explicit_flags_win_over_config_file() {
        let file = config_file();
        let cli = CliConfig::parse_args_from([
            "streaming-news",
            "--region",
            "BR",
            "--limit",
            "20",
            "--config",
            file.path().to_str().unwrap(),
        ]);
        let settings = cli.into_settings(Credentials::default(), date()).unwrap();

        // 與預設值相同但明確輸入的參數也要保留
        assert_eq!(settings.region, "BR");
        assert_eq!(settings.release_limit, 20);
        assert!(!settings.fetch_details);
        assert_eq!(settings.output_file, "pt.json");
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let cli = CliConfig::parse_args_from([
            "streaming-news",
            "--config",
            "/definitely/not/here.toml",
        ]);
        let err = cli.into_settings(Credentials::default(), date()).unwrap_err();
        assert!(matches!(err, crate::utils::error::EtlError::IoError(_)));
    }
}
