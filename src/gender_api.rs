//! Blocking HTTP client for the gender-api.com name lookup service.

use std::{thread, time::Duration};

use reqwest::{
    blocking::Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Deserialize;
use tracing::debug;

use crate::core::{GenderLookup, LookupError, LookupResponse};

const USER_AGENT_VALUE: &str = concat!("bibbias/", env!("CARGO_PKG_VERSION"));

/// Default delay before the first retry; doubled on every further attempt.
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Connection settings for [`GenderApiClient`].
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl ApiSettings {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
            max_retries: 0,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    gender: Option<String>,
    accuracy: Accuracy,
}

/// The service has been seen returning accuracy both as a number and as a
/// numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Accuracy {
    Number(f64),
    Text(String),
}

impl Accuracy {
    fn to_score(&self) -> Result<u32, LookupError> {
        let value = match self {
            Accuracy::Number(value) => *value,
            Accuracy::Text(text) => text.trim().parse::<f64>().map_err(|_| LookupError::Decode {
                message: format!("accuracy is not a number: {:?}", text),
            })?,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(LookupError::Decode {
                message: format!("accuracy out of range: {}", value),
            });
        }
        Ok(value as u32)
    }
}

/// gender-api.com client: `GET <url>?name=<name>&key=<key>`.
#[derive(Debug, Clone)]
pub struct GenderApiClient {
    client: Client,
    settings: ApiSettings,
}

impl GenderApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, LookupError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .timeout(settings.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| LookupError::Client {
                message: e.to_string(),
            })?;

        Ok(Self { client, settings })
    }

    fn request_once(&self, name: &str) -> Result<LookupResponse, LookupError> {
        let response = self
            .client
            .get(&self.settings.url)
            .query(&[("name", name), ("key", self.settings.api_key.as_str())])
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let wire: WireResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout
            } else {
                LookupError::Decode {
                    message: e.to_string(),
                }
            }
        })?;

        Ok(LookupResponse {
            gender: wire.gender.unwrap_or_default(),
            accuracy: wire.accuracy.to_score()?,
        })
    }
}

impl GenderLookup for GenderApiClient {
    fn lookup(&self, name: &str) -> Result<LookupResponse, LookupError> {
        let mut attempt = 0;
        loop {
            match self.request_once(name) {
                Err(err) if err.is_retryable() && attempt < self.settings.max_retries => {
                    let delay = self.settings.retry_backoff * 2u32.saturating_pow(attempt);
                    debug!(name = %name, attempt, error = %err, ?delay, "retrying lookup");
                    thread::sleep(delay);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Network {
            message: err.to_string(),
        }
    }
}
