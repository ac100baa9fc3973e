use crate::domain::model::{OutputRecord, Snapshot};
use crate::domain::ports::{Emitter, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

/// Writes `{date, items}` to a fixed file, even when there are no items, so
/// readers never have to tell "no run yet" from "no matches".
pub struct SnapshotEmitter<S: Storage> {
    storage: S,
    output_path: String,
    output_file: String,
}

impl<S: Storage> SnapshotEmitter<S> {
    pub fn new(storage: S, output_path: impl Into<String>, output_file: impl Into<String>) -> Self {
        Self {
            storage,
            output_path: output_path.into(),
            output_file: output_file.into(),
        }
    }

    pub fn destination(&self) -> String {
        Path::new(&self.output_path)
            .join(&self.output_file)
            .to_string_lossy()
            .into_owned()
    }

    pub async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<String> {
        let json_data = serde_json::to_string_pretty(snapshot)?;

        tracing::debug!(
            "Writing snapshot ({} bytes, {} items)",
            json_data.len(),
            snapshot.items.len()
        );
        self.storage
            .write_file(&self.output_file, json_data.as_bytes())
            .await?;

        Ok(self.destination())
    }
}

#[async_trait]
impl<S: Storage> Emitter for SnapshotEmitter<S> {
    async fn emit(&self, date: NaiveDate, records: &[OutputRecord]) -> Result<String> {
        let snapshot = Snapshot::new(date, records.to_vec());
        let destination = self.write_snapshot(&snapshot).await?;

        tracing::info!(
            "💾 Snapshot with {} items written to {}",
            snapshot.items.len(),
            destination
        );
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MockStorage;

    #[tokio::test]
    async fn test_empty_snapshot_is_still_written() {
        let storage = MockStorage::new();
        let emitter = SnapshotEmitter::new(storage.clone(), "data", "releases.json");
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let destination = emitter.emit(date, &[]).await.unwrap();

        assert_eq!(
            destination,
            Path::new("data").join("releases.json").to_string_lossy()
        );
        let written = storage.get_file("releases.json").await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2026-10-19", "items": []}));
    }
}
