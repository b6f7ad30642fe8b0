// wolbot-line: LINE Messaging API webhook model, signature check and reply client.

pub mod client;
pub mod error;
pub mod signature;
pub mod webhook;

pub use client::{ChannelConfig, DEFAULT_API_BASE, ReplyClient, TextMessage};
pub use error::Error;
pub use signature::SIGNATURE_HEADER;
pub use webhook::{Event, InboundText, WebhookPayload};
