//! Messaging-platform channel (LINE).
//!
//! Channel trait so the gateway can dispatch replies without knowing the concrete
//! client, plus webhook signature verification and the wire types the platform
//! POSTs to the webhook endpoint.

mod inbound;
mod line;
pub mod signature;

pub use inbound::InboundMessage;
pub use line::{LineChannel, LineError, MessagePayload, WebhookEnvelope, WebhookEvent};

use async_trait::async_trait;

/// Handle to a reply-capable channel.
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    /// Channel id (e.g. "line").
    fn id(&self) -> &str;
    /// Send one text reply for the event identified by the reply token.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), String>;
}
