//! Minimal Telegram Bot API client: long polling and replies.

use crate::error::{Result, RiskError};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Extra headroom on top of the long-poll timeout before reqwest gives up.
const REQUEST_GRACE_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(base_url: String, token: String, poll_timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + REQUEST_GRACE_SECS))
            .build()
            .map_err(RiskError::Http)?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        let request = self.client.post(self.method_url("getUpdates")).json(&body);
        self.call(request).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let request = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }));

        let _: Message = self.call(request).await?;
        debug!("Sent message to chat {}", chat_id);
        Ok(())
    }

    pub async fn send_document(&self, chat_id: i64, path: &Path) -> Result<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "map.html".to_string(), |n| n.to_string_lossy().into_owned());

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", Part::bytes(bytes).file_name(file_name));

        let request = self
            .client
            .post(self.method_url("sendDocument"))
            .multipart(form);

        let _: Message = self.call(request).await?;
        debug!("Sent document {} to chat {}", path.display(), chat_id);
        Ok(())
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        // Request URLs embed the bot token; keep them out of error messages.
        let response = request.send().await.map_err(|e| e.without_url())?;
        let status = response.status();
        let body: ApiResponse<T> = response.json().await.map_err(|e| e.without_url())?;

        if !body.ok {
            return Err(RiskError::Telegram(format!(
                "HTTP {}: {}",
                status,
                body.description.unwrap_or_default()
            )));
        }

        body.result
            .ok_or_else(|| RiskError::Telegram("response without result".to_string()))
    }
}
