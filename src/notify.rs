//! Report delivery to a Telegram chat.
//!
//! [`Notifier`] is either a configured [`TelegramBot`] or `Unavailable` with
//! the reason, so the pipeline can call it unconditionally and log why a
//! delivery was skipped.
//!
//! | Report | Bot API method |
//! |--------|----------------|
//! | issue bundle, summary, frequencies CSV | `sendDocument` |
//! | word cloud | `sendPhoto` |

use crate::config::TelegramSettings;
use crate::error::NotifyError;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::{info, instrument};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// A bot token and the chat it posts to.
#[derive(Debug, Clone)]
pub struct TelegramBot {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramBot {
    pub fn new(client: Client, token: String, chat_id: String) -> Self {
        Self {
            client,
            token,
            chat_id,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{TELEGRAM_API}/bot{}/{method}", self.token)
    }

    /// Upload `path` as the multipart field `field` of `method`.
    async fn upload(
        &self,
        method: &str,
        field: &'static str,
        path: &Path,
        caption: &str,
    ) -> Result<(), NotifyError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| field.to_string());

        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .part(field, Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.method_url(method))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Delivery capability held by the pipeline.
#[derive(Debug, Clone)]
pub enum Notifier {
    Telegram(TelegramBot),
    /// Not configured; every send returns [`NotifyError::Unavailable`].
    Unavailable(String),
}

impl Notifier {
    pub fn from_settings(settings: &TelegramSettings, client: Client) -> Self {
        match (&settings.bot_token, &settings.chat_id) {
            (None, _) => Notifier::Unavailable("TELEGRAM_BOT_TOKEN is not set".to_string()),
            (_, None) => Notifier::Unavailable("TELEGRAM_CHAT_ID is not set".to_string()),
            (Some(token), Some(chat_id)) => {
                Notifier::Telegram(TelegramBot::new(client, token.clone(), chat_id.clone()))
            }
        }
    }

    /// Send a local file as a document.
    #[instrument(level = "info", skip(self), fields(path = %path.display()))]
    pub async fn send_document(&self, path: &Path, caption: &str) -> Result<(), NotifyError> {
        let bot = self.ready(path)?;
        bot.upload("sendDocument", "document", path, caption).await?;
        info!("Sent document to Telegram");
        Ok(())
    }

    /// Send a local image as a photo.
    #[instrument(level = "info", skip(self), fields(path = %path.display()))]
    pub async fn send_photo(&self, path: &Path, caption: &str) -> Result<(), NotifyError> {
        let bot = self.ready(path)?;
        bot.upload("sendPhoto", "photo", path, caption).await?;
        info!("Sent photo to Telegram");
        Ok(())
    }

    /// Checks made before any request: the file exists, then credentials.
    fn ready(&self, path: &Path) -> Result<&TelegramBot, NotifyError> {
        if !path.exists() {
            return Err(NotifyError::MissingFile(path.to_path_buf()));
        }
        match self {
            Notifier::Telegram(bot) => Ok(bot),
            Notifier::Unavailable(reason) => Err(NotifyError::Unavailable(reason.clone())),
        }
    }
}
