// Messaging API reply client
//
// Wraps `reqwest::Client` with bearer authentication and the reply
// endpoint. A reply token is single-use and expires shortly after the
// webhook delivery, so nothing here retries.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Default Messaging API root.
pub const DEFAULT_API_BASE: &str = "https://api.line.me";

const REPLY_PATH: &str = "v2/bot/message/reply";

/// Credentials and endpoint for one messaging channel.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub api_base: Url,
    /// Key for webhook signature verification.
    pub channel_secret: SecretString,
    /// Bearer token for the reply API.
    pub access_token: SecretString,
    pub timeout: Duration,
}

impl ChannelConfig {
    pub fn new(api_base: Url, channel_secret: SecretString, access_token: SecretString) -> Self {
        Self {
            api_base,
            channel_secret,
            access_token,
            timeout: Duration::from_secs(10),
        }
    }
}

/// A plain text message in a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [TextMessage],
}

/// HTTP client for the Messaging API reply endpoint.
#[derive(Debug, Clone)]
pub struct ReplyClient {
    http: reqwest::Client,
    reply_url: Url,
}

impl ReplyClient {
    /// Build a client that authenticates with the channel access token.
    pub fn new(config: &ChannelConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", config.access_token.expose_secret()))
                .map_err(|_| Error::InvalidAccessToken)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("wolbot/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Self::from_reqwest(config.api_base.as_str(), http)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for any authentication headers.
    pub fn from_reqwest(api_base: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base = Url::parse(api_base)?;
        let base = if base.path().ends_with('/') {
            base
        } else {
            Url::parse(&format!("{base}/"))?
        };
        let reply_url = base.join(REPLY_PATH)?;
        Ok(Self { http, reply_url })
    }

    pub fn reply_url(&self) -> &Url {
        &self.reply_url
    }

    /// Reply to a webhook event with one text message.
    pub async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), Error> {
        self.reply(reply_token, &[TextMessage::new(text)]).await
    }

    /// Reply to a webhook event with up to five messages.
    pub async fn reply(&self, reply_token: &str, messages: &[TextMessage]) -> Result<(), Error> {
        debug!("POST {}", self.reply_url);

        let resp = self
            .http
            .post(self.reply_url.clone())
            .json(&ReplyRequest {
                reply_token,
                messages,
            })
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }
}
