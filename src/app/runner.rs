use crate::adapters::storage::LocalStorage;
use crate::adapters::telegram::TelegramNotifier;
use crate::adapters::watchmode::WatchmodeClient;
use crate::config::settings::{EmitMode, Settings};
use crate::core::emit::SnapshotEmitter;
use crate::core::etl::{EtlEngine, RunSummary};
use crate::core::pipeline::ReleasePipeline;
use crate::domain::ports::{ConfigProvider, Emitter};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Runs one release check with the emitter selected in `settings`.
///
/// Nothing touches the network before the settings and the credentials the
/// chosen emitter needs have been checked.
pub async fn run(settings: Settings) -> Result<RunSummary> {
    settings.validate()?;

    match settings.emit {
        EmitMode::Snapshot => run_snapshot(settings).await,
        EmitMode::Telegram => run_telegram(settings).await,
    }
}

async fn run_snapshot(settings: Settings) -> Result<RunSummary> {
    let storage = LocalStorage::new(settings.output_path());
    let emitter = SnapshotEmitter::new(storage, settings.output_path(), settings.output_file());

    let api_key = match settings.api_key() {
        Ok(key) => key.to_string(),
        Err(e) => {
            // 沒有 API key 時仍寫出空的快照，讓下游讀取端有合法的檔案
            tracing::warn!("⚠️ {}; writing an empty snapshot", e);
            let destination = emitter.emit(settings.run_date(), &[]).await?;
            return Ok(RunSummary {
                releases_fetched: 0,
                records_emitted: 0,
                destination,
            });
        }
    };

    let catalog = WatchmodeClient::new(&settings, api_key, settings.request_timeout())?;
    EtlEngine::new(ReleasePipeline::new(catalog, emitter, settings))
        .run()
        .await
}

async fn run_telegram(settings: Settings) -> Result<RunSummary> {
    let api_key = settings.api_key()?.to_string();
    let (bot_token, chat_id) = settings.telegram_credentials()?;
    let notifier = TelegramNotifier::new(settings.telegram_api_url.clone(), bot_token, chat_id);

    let catalog = WatchmodeClient::new(&settings, api_key, settings.request_timeout())?;
    EtlEngine::new(ReleasePipeline::new(catalog, notifier, settings))
        .run()
        .await
}
