pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{
    storage::LocalStorage, telegram::TelegramNotifier, watchmode::WatchmodeClient,
};
pub use crate::config::settings::{Credentials, EmitMode, Settings};
pub use crate::core::{
    emit::SnapshotEmitter,
    etl::{EtlEngine, RunSummary},
    pipeline::ReleasePipeline,
};
pub use crate::domain::model::{OutputRecord, ReleaseItem, Snapshot};
pub use crate::domain::services::ServiceRegistry;
pub use crate::utils::error::{EtlError, Result};
