//! Handover core library — config, knowledge document, prompt composition,
//! LINE channel, Gemini client, and the webhook gateway used by the CLI.

pub mod channels;
pub mod config;
pub mod gateway;
pub mod knowledge;
pub mod llm;
pub mod prompt;
