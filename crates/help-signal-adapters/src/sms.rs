//! SMS gateways: Twilio's REST API and a dry-run logger.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use help_signal_core::{AlertGateway, DeliveryReceipt, DispatchError};
use serde::Deserialize;
use tracing::{debug, info};

/// Default Twilio API host.
pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Credentials and addresses for sending through Twilio.
#[derive(Clone)]
pub struct TwilioConfig {
    /// Account SID, also the basic-auth user.
    pub account_sid: String,
    /// Auth token, the basic-auth password.
    pub auth_token: String,
    /// Sending number.
    pub from: String,
    /// Destination number.
    pub to: String,
    /// API host, without a trailing slash.
    pub api_base: String,
}

impl TwilioConfig {
    /// Reads `TWILIO_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_FROM` and `TWILIO_TO`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that is unset or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Environment variable {key} is not set"))
        };
        Ok(Self {
            account_sid: var("TWILIO_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            from: var("TWILIO_FROM")?,
            to: var("TWILIO_TO")?,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Overrides the API host.
    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Message resource returned on success.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    status: String,
}

/// Error resource returned on failure.
#[derive(Debug, Deserialize)]
struct ErrorResource {
    code: Option<i64>,
    message: Option<String>,
}

/// Sends SMS through the Twilio Messages API.
#[derive(Debug)]
pub struct TwilioGateway {
    client: reqwest::blocking::Client,
    config: TwilioConfig,
}

impl TwilioGateway {
    /// Creates a gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: TwilioConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a gateway on a preconfigured HTTP client.
    #[must_use]
    pub const fn with_client(config: TwilioConfig, client: reqwest::blocking::Client) -> Self {
        Self { client, config }
    }
}

impl AlertGateway for TwilioGateway {
    fn send(&self, body: &str) -> Result<DeliveryReceipt, DispatchError> {
        let url = self.config.messages_url();
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", self.config.to.as_str()),
                ("From", self.config.from.as_str()),
                ("Body", body),
            ])
            .send()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        if status.is_success() {
            let message: MessageResource = serde_json::from_str(&text)
                .map_err(|e| DispatchError::InvalidResponse(e.to_string()))?;
            return Ok(DeliveryReceipt {
                id: message.sid,
                status: message.status,
            });
        }

        let error = serde_json::from_str::<ErrorResource>(&text).ok();
        let code = error.as_ref().and_then(|e| e.code);
        let message = error
            .and_then(|e| e.message)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

/// Logs messages instead of sending them.
#[derive(Debug, Default)]
pub struct LogGateway {
    sent: AtomicU64,
}

impl LogGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages logged so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

impl AlertGateway for LogGateway {
    fn send(&self, body: &str) -> Result<DeliveryReceipt, DispatchError> {
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        info!("Dry run, SMS not sent: {body}");
        Ok(DeliveryReceipt {
            id: format!("dry-run-{n}"),
            status: "logged".into(),
        })
    }
}
