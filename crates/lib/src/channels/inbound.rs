//! Inbound message lifted out of a webhook delivery, ready for the answer pipeline.

/// One user text message and the token that scopes the single allowed reply to it.
/// Created per webhook event, consumed once, discarded.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub reply_token: String,
    pub text: String,
}
