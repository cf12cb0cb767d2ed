//! Resend Email Adapter
//!
//! Delivers registration confirmation emails through a Resend-compatible REST
//! API. Implements the `ConfirmationNotifier` trait, so the submission
//! pipeline never learns which provider is behind it.
//!
//! # Architecture
//!
//! - Connection pooling via reqwest
//! - Per-request timeout from configuration
//! - Circuit breaker so a dead provider stops costing a timeout per submission
//! - Request/response tracing
//!
//! # Configuration
//!
//! ```rust,ignore
//! let config = ResendEmailConfig {
//!     api_key: std::env::var("RESEND_API_KEY")?,
//!     from_address: "Clube <recadastro@clube.example>".to_string(),
//!     ..Default::default()
//! };
//! ```
//!
//! # Error Handling
//!
//! Provider responses are mapped to `PortError` variants:
//! - 400/422 -> `PortError::Validation`
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - network timeout -> `PortError::Timeout`
//! - other network failures -> `PortError::Connection`
//!
//! All of these stay inside the detached dispatch task; the submitter only
//! ever sees them in logs.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, CircuitBreakerConfig, DomainPort, HealthCheckResult, HealthCheckable,
    OperationMetadata, PortError,
};

use crate::ports::{ConfirmationMessage, ConfirmationNotifier};

/// Configuration for the Resend email adapter
#[derive(Debug, Clone)]
pub struct ResendEmailConfig {
    /// Base URL of the email API
    pub base_url: String,

    /// API key for bearer authentication
    pub api_key: String,

    /// Sender, in `Name <address>` or bare address form
    pub from_address: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Circuit breaker configuration; `None` disables the breaker
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl Default for ResendEmailConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.resend.com".to_string(),
            api_key: String::new(),
            from_address: String::new(),
            timeout_secs: 10,
            circuit_breaker: Some(CircuitBreakerConfig {
                failure_threshold: 5,
                success_threshold: 3,
                reset_timeout_secs: 60,
            }),
        }
    }
}

/// Tracks consecutive transport failures and short-circuits dispatch while
/// the provider is considered down
#[derive(Debug)]
struct CircuitBreaker {
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    last_failure_time: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            last_failure_time: RwLock::new(None),
        }
    }

    /// Whether a request may go out; an open breaker admits a probe once the
    /// reset timeout has elapsed
    async fn is_available(&self) -> bool {
        if !self.is_open.load(Ordering::Relaxed) {
            return true;
        }

        let last_failure = self.last_failure_time.read().await;
        match *last_failure {
            Some(at) => at.elapsed() > Duration::from_secs(self.config.reset_timeout_secs),
            None => true,
        }
    }

    fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        let successes = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= self.config.success_threshold as u64 {
            self.is_open.store(false, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
        }
    }

    async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= self.config.failure_threshold as u64 {
            self.is_open.store(true, Ordering::Relaxed);
            *self.last_failure_time.write().await = Some(Instant::now());
        }
    }
}

/// Email adapter for a Resend-compatible API implementing
/// [`ConfirmationNotifier`]
///
/// Sends one plain-text email per confirmation message via
/// `POST {base_url}/emails` with bearer authentication.
#[derive(Debug)]
pub struct ResendEmailAdapter {
    config: ResendEmailConfig,
    client: reqwest::Client,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl ResendEmailAdapter {
    /// Creates a new adapter with the given configuration
    pub fn new(config: ResendEmailConfig) -> Self {
        let circuit_breaker = config
            .circuit_breaker
            .clone()
            .map(|cb| Arc::new(CircuitBreaker::new(cb)));

        Self {
            config,
            client: reqwest::Client::new(),
            circuit_breaker,
        }
    }

    /// Returns the base URL of the email API
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Whether the circuit breaker is currently blocking requests
    pub async fn is_circuit_open(&self) -> bool {
        match &self.circuit_breaker {
            Some(cb) => !cb.is_available().await,
            None => false,
        }
    }

    async fn post_email(&self, request: &EmailRequest) -> Result<EmailResponse, PortError> {
        if let Some(cb) = &self.circuit_breaker {
            if !cb.is_available().await {
                return Err(PortError::ServiceUnavailable {
                    service: "email-api circuit open".to_string(),
                });
            }
        }

        let result = self.execute(request).await;

        // Only transport-class failures move the breaker; a rejected payload
        // says nothing about provider availability.
        if let Some(cb) = &self.circuit_breaker {
            match &result {
                Ok(_) => cb.record_success(),
                Err(error) if error.is_transient() => cb.record_failure().await,
                Err(_) => {}
            }
        }

        result
    }

    async fn execute(&self, request: &EmailRequest) -> Result<EmailResponse, PortError> {
        let url = format!("{}/emails", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(request)
            .send()
            .await
            .map_err(|error| self.network_error(error))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, retry_after, body));
        }

        response
            .json::<EmailResponse>()
            .await
            .map_err(|error| PortError::transformation(format!("malformed email API response: {error}")))
    }

    fn network_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: "send_confirmation".to_string(),
                duration_ms: self.config.timeout_secs * 1000,
            }
        } else {
            PortError::Connection {
                message: format!("email API request failed: {error}"),
                source: Some(Box::new(error)),
            }
        }
    }
}

fn map_status(status: StatusCode, retry_after: Option<u64>, body: String) -> PortError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PortError::validation(format!("email rejected by provider: {body}"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
            message: "email API rejected the credentials".to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(60),
        },
        status if status.is_server_error() => PortError::ServiceUnavailable {
            service: format!("email-api ({status})"),
        },
        status => PortError::internal(format!("unexpected email API status {status}: {body}")),
    }
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

impl DomainPort for ResendEmailAdapter {}

#[async_trait]
impl HealthCheckable for ResendEmailAdapter {
    /// Reports adapter health from local state
    ///
    /// The provider offers no unauthenticated ping, so this reflects
    /// configuration completeness and the circuit breaker rather than a live
    /// round-trip.
    async fn health_check(&self) -> HealthCheckResult {
        let (status, message) = if self.config.api_key.is_empty() {
            (
                AdapterHealth::Unhealthy,
                Some("email API key is not configured".to_string()),
            )
        } else if self.is_circuit_open().await {
            (
                AdapterHealth::Degraded,
                Some("circuit breaker is open".to_string()),
            )
        } else {
            (AdapterHealth::Healthy, None)
        };

        HealthCheckResult {
            adapter_id: "resend-email-adapter".to_string(),
            status,
            latency_ms: 0,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ConfirmationNotifier for ResendEmailAdapter {
    #[instrument(skip(self, message, _metadata), fields(notification_id = %message.id))]
    async fn send_confirmation(
        &self,
        message: ConfirmationMessage,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        let request = EmailRequest {
            from: self.config.from_address.clone(),
            to: vec![message.to],
            subject: message.subject,
            text: message.body,
        };

        let response = self.post_email(&request).await?;
        debug!(
            provider_id = %response.id,
            registration_id = %message.registration_id,
            "confirmation email accepted by provider"
        );
        Ok(())
    }
}

/// Request body for `POST /emails`
#[derive(Debug, Clone, Serialize)]
struct EmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    text: String,
}

/// Response body from `POST /emails`
#[derive(Debug, Clone, Deserialize)]
struct EmailResponse {
    id: String,
}
