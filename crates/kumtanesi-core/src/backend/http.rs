use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{
    interpret_chat_reply, interpret_clear_reply, interpret_history_reply, ChatBackend,
    ClearReply, HistoryEntry,
};
use crate::config::ResponseVariant;
use crate::error::ChatResult;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// HTTP client for the chat backend.
///
/// Cookies are kept so the server-side session (and with it the transcript)
/// survives across requests.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    variant: ResponseVariant,
}

impl HttpBackend {
    pub fn new(base_url: &str, variant: ResponseVariant) -> ChatResult<Self> {
        let client = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            variant,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(&self, message: &str) -> ChatResult<String> {
        let url = format!("{}/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, bytes = body.len(), "chat reply received");

        interpret_chat_reply(status.is_success(), &body, self.variant)
    }

    async fn get_history(&self) -> ChatResult<Vec<HistoryEntry>> {
        let url = format!("{}/get_history", self.base_url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        interpret_history_reply(status.is_success(), &body)
    }

    async fn clear_history(&self) -> ChatResult<ClearReply> {
        let url = format!("{}/clear_history", self.base_url);

        let response = self.client.post(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        interpret_clear_reply(status.is_success(), &body)
    }
}
