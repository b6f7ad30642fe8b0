// Webhook payload model.
//
// Only text message events are consumed. Every other event, source or
// message type deserializes into an opaque `Other` variant so new
// platform features never break delivery. Events are decoded one by one:
// a malformed event also becomes `Other` and its neighbours still run.

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::Error;

/// Body of one webhook delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Bot user id the events were sent to.
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "events_lenient")]
    pub events: Vec<Event>,
}

fn events_lenient<'de, D>(deserializer: D) -> Result<Vec<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).unwrap_or_else(|err| {
                warn!(index, error = %err, "skipping malformed webhook event");
                Event::Other
            })
        })
        .collect())
}

impl WebhookPayload {
    /// Decode a raw (already verified) webhook body.
    pub fn from_slice(body: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(body)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(default)]
    pub reply_token: Option<String>,
    pub source: Source,
    pub message: Message,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Where an event came from. `user_id` is present for 1:1 chats and, when
/// the user consented, for group and room messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    Text {
        #[serde(default)]
        id: Option<String>,
        text: String,
    },
    #[serde(other)]
    Other,
}

/// The part of an event the router consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    pub user_id: String,
    pub text: String,
    pub reply_token: Option<String>,
}

impl Event {
    /// The text message carried by this event, if it is one and the
    /// sender is known.
    pub fn inbound_text(&self) -> Option<InboundText> {
        let Self::Message(event) = self else {
            return None;
        };
        let Message::Text { text, .. } = &event.message else {
            return None;
        };
        let user_id = event.source.user_id.clone()?;

        Some(InboundText {
            user_id,
            text: text.clone(),
            reply_token: event.reply_token.clone(),
        })
    }
}
