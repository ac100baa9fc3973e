use crate::core::render::render_message;
use crate::domain::model::OutputRecord;
use crate::domain::ports::Emitter;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Sends the daily digest through a Telegram bot (`sendMessage`).
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);
        let form = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "Markdown"),
        ];

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| EtlError::NotificationError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtlError::NotificationError {
                message: format!("Telegram responded with {}: {}", status, body),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Emitter for TelegramNotifier {
    async fn emit(&self, date: NaiveDate, records: &[OutputRecord]) -> Result<String> {
        if records.is_empty() {
            tracing::info!("📭 No release on tracked services, notification skipped");
            return Ok("notification skipped (no matches)".to_string());
        }

        let message = render_message(date, records);
        tracing::debug!("Sending Telegram message ({} chars)", message.len());
        self.send_message(&message).await?;

        tracing::info!("📨 Notification sent with {} titles", records.len());
        Ok(format!("telegram chat {}", self.chat_id))
    }
}
