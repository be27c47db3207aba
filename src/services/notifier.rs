// src/services/notifier.rs

//! Chat-bot notification sink.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;

/// Where a message goes: a chat, optionally one of its topics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub chat_id: String,
    pub thread_id: Option<String>,
}

impl Destination {
    pub fn new(chat_id: impl Into<String>, thread_id: Option<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            thread_id: thread_id.filter(|t| !t.is_empty()),
        }
    }
}

/// Something that can deliver a formatted (HTML) message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(
        &self,
        destination: &Destination,
        text: &str,
        disable_preview: bool,
    ) -> Result<()>;
}

/// Sends messages through the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    endpoint: Url,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, token: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let mut endpoint = Url::parse(&config.base_url)?;
        endpoint
            .path_segments_mut()
            .map_err(|_| AppError::config("telegram.base_url cannot carry a path"))?
            .pop_if_empty()
            .push(&format!("bot{token}"))
            .push("sendMessage");

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(
        &self,
        destination: &Destination,
        text: &str,
        disable_preview: bool,
    ) -> Result<()> {
        let preview = if disable_preview { "true" } else { "false" };
        let mut form = vec![
            ("chat_id", destination.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "HTML"),
            ("disable_web_page_preview", preview),
        ];
        if let Some(thread_id) = &destination.thread_id {
            form.push(("message_thread_id", thread_id.as_str()));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice::<TelegramResponse>(&body) {
            Ok(reply) if reply.ok => Ok(()),
            Ok(reply) => Err(AppError::Notify(
                reply
                    .description
                    .unwrap_or_else(|| format!("rejected with status {status}")),
            )),
            Err(_) => Err(AppError::Notify(format!(
                "unexpected response with status {status}"
            ))),
        }
    }
}

/// Used when no bot token is configured: messages are only logged.
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send_message(
        &self,
        _destination: &Destination,
        text: &str,
        _disable_preview: bool,
    ) -> Result<()> {
        log::debug!("Not sending message (no bot token): {}", text);
        Ok(())
    }
}
