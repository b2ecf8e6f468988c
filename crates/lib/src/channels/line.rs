//! LINE channel: webhook wire types and the reply API client.

use crate::channels::inbound::InboundMessage;
use crate::channels::ChannelHandle;
use async_trait::async_trait;
use serde::Deserialize;

const LINE_API_BASE: &str = "https://api.line.me";

/// Body the platform POSTs to the webhook endpoint: zero or more events.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One webhook event. Only `message` events carrying text are answered; everything
/// else (stickers, follows, joins, postbacks) is skipped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub message: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
pub struct MessagePayload {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookEnvelope {
    /// Text message events with a reply token, in delivery order.
    pub fn text_messages(&self) -> Vec<InboundMessage> {
        self.events
            .iter()
            .filter(|e| e.typ == "message")
            .filter_map(|e| {
                let reply_token = e.reply_token.as_ref()?;
                let message = e.message.as_ref()?;
                if message.typ != "text" {
                    return None;
                }
                let text = message.text.as_ref()?;
                Some(InboundMessage {
                    reply_token: reply_token.clone(),
                    text: text.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("reply request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("reply api error: {0}")]
    Api(String),
}

/// LINE channel connector: sends replies via the Messaging API reply endpoint.
pub struct LineChannel {
    id: String,
    token: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl LineChannel {
    pub fn new(token: Option<String>) -> Self {
        Self {
            id: "line".to_string(),
            token,
            base_url: LINE_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Send one text reply via POST /v2/bot/message/reply. The reply token is
    /// single-use; the platform rejects a second call with the same token.
    pub async fn reply_message(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| LineError::Api("channel access token not configured".to_string()))?;
        let url = format!("{}/v2/bot/message/reply", self.base_url);
        let body = serde_json::json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": text }]
        });
        let res = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LineError::Api(format!("{} {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelHandle for LineChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), String> {
        self.reply_message(reply_token, text)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_parses_and_keeps_only_text_messages() {
        let body = r#"{
            "destination": "U0123456789abcdef",
            "events": [
                {
                    "type": "message",
                    "replyToken": "rt-text",
                    "message": { "type": "text", "text": "who is on call?" }
                },
                {
                    "type": "message",
                    "replyToken": "rt-sticker",
                    "message": { "type": "sticker", "packageId": "1", "stickerId": "2" }
                },
                { "type": "follow", "replyToken": "rt-follow" },
                { "type": "unfollow" }
            ]
        }"#;
        let envelope: WebhookEnvelope = serde_json::from_str(body).expect("parse envelope");
        assert_eq!(envelope.destination.as_deref(), Some("U0123456789abcdef"));
        assert_eq!(envelope.events.len(), 4);

        let messages = envelope.text_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].reply_token, "rt-text");
        assert_eq!(messages[0].text, "who is on call?");
    }

    #[test]
    fn envelope_without_events_yields_no_messages() {
        let envelope: WebhookEnvelope =
            serde_json::from_str(r#"{ "destination": "U0" }"#).expect("parse envelope");
        assert!(envelope.text_messages().is_empty());
    }

    #[tokio::test]
    async fn reply_without_token_is_an_api_error() {
        let channel = LineChannel::new(None);
        let err = channel
            .reply_message("rt-1", "hello")
            .await
            .expect_err("reply should fail without a token");
        assert!(matches!(err, LineError::Api(_)));
    }
}
