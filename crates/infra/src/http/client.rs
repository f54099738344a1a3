use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client as ReqwestClient, Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;
use vendorlink_core::ports::{AttemptObserver, Transport};
use vendorlink_domain::constants::{
    DEFAULT_BASE_URL, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS,
};
use vendorlink_domain::{
    ApiRequest, ApiResponse, AttemptOutcome, AttemptRecord, ClientConfig, HttpMethod, Result,
    VendorLinkError,
};

use crate::errors::{is_transient, InfraError};

/// Authenticated HTTP transport with timeout and retry support.
///
/// Every attempt carries the bearer credential. 429, 5xx and network-class
/// failures are retried with exponential backoff up to `max_attempts` total
/// attempts; other 4xx responses fail immediately.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    base_url: Url,
    token: String,
    max_attempts: u32,
    base_backoff: Duration,
    observer: Option<Arc<dyn AttemptObserver>>,
}

/// How one attempt ended.
enum Attempt {
    Done(ApiResponse),
    Fatal { error: VendorLinkError, status: Option<u16>, outcome: AttemptOutcome },
    Retry { outcome: AttemptOutcome, status: Option<u16>, reason: String },
}

impl HttpTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Build a transport from loaded configuration.
    ///
    /// # Errors
    /// `AuthMissing` without a token, `Config` for an invalid configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        HttpTransportBuilder::from_config(config).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)
            .map_err(|err| VendorLinkError::Config(format!("invalid request URL {joined}: {err}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    async fn attempt(&self, request: &ApiRequest, url: &Url, attempt: u32) -> Attempt {
        let mut builder = self
            .client
            .request(to_method(request.method), url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(attempt, method = %request.method, path = %request.path, "sending HTTP request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) if is_transient(&err) => {
                debug!(attempt, method = %request.method, path = %request.path, error = %err, "HTTP request failed");
                return Attempt::Retry {
                    outcome: AttemptOutcome::NetworkError,
                    status: None,
                    reason: VendorLinkError::from(InfraError::from(err)).to_string(),
                };
            }
            Err(err) => {
                return Attempt::Fatal {
                    error: InfraError::from(err).into(),
                    status: None,
                    outcome: AttemptOutcome::ClientError,
                }
            }
        };

        let status = response.status();
        debug!(attempt, method = %request.method, path = %request.path, status = status.as_u16(), "received HTTP response");

        if status.is_success() {
            return match read_json(response).await {
                Ok(body) => Attempt::Done(ApiResponse::from_body(status.as_u16(), body, attempt)),
                Err(err) if err.is_retryable() => Attempt::Retry {
                    outcome: AttemptOutcome::NetworkError,
                    status: Some(status.as_u16()),
                    reason: err.to_string(),
                },
                Err(error) => Attempt::Fatal {
                    error,
                    status: Some(status.as_u16()),
                    outcome: AttemptOutcome::InvalidBody,
                },
            };
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Attempt::Retry {
                outcome: AttemptOutcome::RateLimited,
                status: Some(status.as_u16()),
                reason: "rate limited".into(),
            };
        }

        if status.is_server_error() {
            return Attempt::Retry {
                outcome: AttemptOutcome::ServerError,
                status: Some(status.as_u16()),
                reason: format!("HTTP {status}"),
            };
        }

        let body = response.text().await.unwrap_or_default();
        Attempt::Fatal {
            error: VendorLinkError::Api { status: status.as_u16(), body },
            status: Some(status.as_u16()),
            outcome: AttemptOutcome::ClientError,
        }
    }

    fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    fn notify(
        &self,
        request: &ApiRequest,
        attempt: u32,
        status: Option<u16>,
        outcome: AttemptOutcome,
        delay_before_next: Option<Duration>,
    ) {
        if let Some(observer) = &self.observer {
            observer.on_attempt(&AttemptRecord {
                method: request.method,
                path: request.path.clone(),
                attempt,
                status,
                outcome,
                delay_before_next,
            });
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        let attempts = self.max_attempts.max(1);
        let mut last_outcome = AttemptOutcome::NetworkError;
        let mut last_reason = String::new();

        for attempt in 1..=attempts {
            match self.attempt(&request, &url, attempt).await {
                Attempt::Done(response) => {
                    self.notify(&request, attempt, Some(response.status), AttemptOutcome::Success, None);
                    return Ok(response);
                }
                Attempt::Fatal { error, status, outcome } => {
                    self.notify(&request, attempt, status, outcome, None);
                    return Err(error);
                }
                Attempt::Retry { outcome, status, reason } => {
                    let delay = (attempt < attempts).then(|| self.backoff_delay(attempt));
                    self.notify(&request, attempt, status, outcome, delay);
                    last_outcome = outcome;
                    last_reason = reason;

                    if let Some(delay) = delay {
                        warn!(
                            attempt,
                            max_attempts = attempts,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            reason = %last_reason,
                            "retrying HTTP request"
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
            }
        }

        warn!(attempts, reason = %last_reason, "HTTP request exhausted retries");
        Err(match last_outcome {
            AttemptOutcome::RateLimited => VendorLinkError::RateLimitExceeded { attempts },
            _ => VendorLinkError::ServiceUnavailable { attempts, reason: last_reason },
        })
    }
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    max_attempts: u32,
    base_backoff: Duration,
    user_agent: Option<String>,
    observer: Option<Arc<dyn AttemptObserver>>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            user_agent: None,
            observer: None,
        }
    }
}

impl HttpTransportBuilder {
    /// Builder preloaded with the connection and retry settings of `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            timeout: config.timeout(),
            max_attempts: config.retry.max_attempts.max(1),
            base_backoff: config.retry.base_delay(),
            ..Self::default()
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// # Errors
    /// `AuthMissing` when no non-blank token was given, `Config` for an
    /// unparsable base URL.
    pub fn build(self) -> Result<HttpTransport> {
        let token = self
            .token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(VendorLinkError::AuthMissing)?;

        let base_url = Url::parse(self.base_url.trim_end_matches('/')).map_err(|err| {
            VendorLinkError::Config(format!("invalid base_url {}: {err}", self.base_url))
        })?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("vendorlink/{}", env!("CARGO_PKG_VERSION")));
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(user_agent)
            .no_proxy()
            .build()
            .map_err(|err| VendorLinkError::from(InfraError::from(err)))?;

        Ok(HttpTransport {
            client,
            base_url,
            token,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
            observer: self.observer,
        })
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Decode a 2xx body; an empty body is `null`.
async fn read_json(response: Response) -> Result<Value> {
    let bytes = response.bytes().await.map_err(|err| VendorLinkError::from(InfraError::from(err)))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| VendorLinkError::MalformedResponse(format!("response body is not JSON: {err}")))
}
