//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::{ApiKey, SendMessage, SendReport, ValidationError};
use crate::transport::PayloadError;

const DEFAULT_SEND_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        auth: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        auth: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(reqwest::header::AUTHORIZATION, auth)
                .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            // Encoded by hand so the charset-qualified content type FCM
            // documents can be set verbatim.
            let body = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            let response = self
                .client
                .post(url)
                .header(reqwest::header::AUTHORIZATION, auth)
                .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`FcmClient`].
///
/// Every variant is terminal: the client never retries, including for
/// [`FcmError::ProviderUnavailable`]. Callers wanting retries must layer
/// their own policy on top.
pub enum FcmError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// FCM rejected the payload (HTTP 400): the request could not be parsed
    /// as JSON or contained invalid fields.
    #[error("the request could not be parsed as JSON or contained invalid fields")]
    MalformedRequest,

    /// The sender account could not be authenticated (HTTP 401).
    #[error("there was an error authenticating the sender account")]
    AuthenticationFailed,

    /// FCM is temporarily unavailable (HTTP 503).
    #[error("the FCM server is temporarily unavailable")]
    ProviderUnavailable,

    /// Any other non-200 status, preserved for diagnostics.
    #[error("internal error in the FCM server (HTTP status {status})")]
    InternalError { status: u16 },

    /// Response body could not be parsed or reconciled against the request.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors or payload validators rejected a value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn payload_error(err: PayloadError) -> FcmError {
    match err {
        PayloadError::Validation(err) => FcmError::Validation(err),
        PayloadError::Json(err) => FcmError::Parse(Box::new(err)),
    }
}

#[derive(Debug, Clone)]
/// Builder for [`FcmClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent,
/// or debug logging.
pub struct FcmClientBuilder {
    api_key: ApiKey,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    debug: bool,
}

impl FcmClientBuilder {
    /// Create a builder with the default endpoint and no overrides.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            debug: false,
        }
    }

    /// Override the FCM send endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Emit a `tracing` debug event for each significant step of a send.
    ///
    /// Observability only: events go to whatever subscriber the caller has
    /// installed and never affect control flow or return values.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build an [`FcmClient`].
    pub fn build(self) -> Result<FcmClient, FcmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| FcmError::Transport(Box::new(err)))?;

        Ok(FcmClient {
            api_key: self.api_key,
            endpoint: self.endpoint,
            debug: self.debug,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level client for the legacy FCM HTTP send API.
///
/// This type orchestrates payload building, one HTTPS POST per send to
/// `https://fcm.googleapis.com/fcm/send`, and reconciliation of the
/// positional per-recipient results. Configuration is immutable after
/// construction, so a client can be shared across concurrent callers.
pub struct FcmClient {
    api_key: ApiKey,
    endpoint: String,
    debug: bool,
    http: Arc<dyn HttpTransport>,
}

impl FcmClient {
    /// Create a client using the default endpoint.
    ///
    /// For more customization, use [`FcmClient::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            debug: false,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> FcmClientBuilder {
        FcmClientBuilder::new(api_key)
    }

    /// Send a data message and reconcile the per-recipient results.
    ///
    /// Errors:
    /// - [`FcmError::Validation`] when the payload is invalid (including
    ///   more than 1000 recipients; nothing is sent in that case),
    /// - [`FcmError::MalformedRequest`] / [`FcmError::AuthenticationFailed`] /
    ///   [`FcmError::ProviderUnavailable`] / [`FcmError::InternalError`]
    ///   for the respective HTTP statuses,
    /// - [`FcmError::Parse`] when the response body cannot be decoded or
    ///   its result count does not match the recipient count.
    pub async fn send_data(&self, request: SendMessage) -> Result<SendReport, FcmError> {
        let payload = crate::transport::encode_json_payload(&request).map_err(payload_error)?;
        if self.debug {
            debug!(
                "sending data message to {} recipient(s)",
                request.recipients().len()
            );
        }

        let response = self
            .http
            .post_json(&self.endpoint, &self.auth_header(), payload)
            .await
            .map_err(FcmError::Transport)?;
        let body = self.interpret_status(response)?;

        let decoded = crate::transport::decode_send_json_response(&body)
            .map_err(|err| FcmError::Parse(Box::new(err)))?;
        let report = crate::transport::reconcile(request.recipients(), &decoded)
            .map_err(|err| FcmError::Parse(Box::new(err)))?;

        Ok(report)
    }

    /// Send a notification message.
    ///
    /// Identical to [`FcmClient::send_data`]; the distinction is which
    /// fields the caller populates (`notification` vs `data`).
    pub async fn send_notification(&self, request: SendMessage) -> Result<SendReport, FcmError> {
        self.send_data(request).await
    }

    /// Send a plain-text (form-encoded) message.
    ///
    /// Returns the raw provider response body unmodified; plain-text sends
    /// have no structured per-recipient tracking.
    pub async fn send_plain_text(&self, request: SendMessage) -> Result<String, FcmError> {
        let params = crate::transport::encode_plain_text_form(&request).map_err(payload_error)?;
        if self.debug {
            debug!(
                "sending plain-text message to {} recipient(s)",
                request.recipients().len()
            );
        }

        let response = self
            .http
            .post_form(&self.endpoint, &self.auth_header(), params)
            .await
            .map_err(FcmError::Transport)?;
        self.interpret_status(response)
    }

    fn auth_header(&self) -> String {
        format!("key={}", self.api_key.as_str())
    }

    fn interpret_status(&self, response: HttpResponse) -> Result<String, FcmError> {
        match response.status {
            200 => {
                if self.debug {
                    debug!("request success: 200");
                }
                Ok(response.body)
            }
            400 => {
                if self.debug {
                    debug!("request failed: 400 (malformed payload)");
                }
                Err(FcmError::MalformedRequest)
            }
            401 => {
                if self.debug {
                    debug!("request failed: 401 (authentication)");
                }
                Err(FcmError::AuthenticationFailed)
            }
            503 => {
                if self.debug {
                    debug!("request failed: 503 (server unavailable)");
                }
                Err(FcmError::ProviderUnavailable)
            }
            status => {
                if self.debug {
                    debug!("request failed: {status}");
                }
                Err(FcmError::InternalError { status })
            }
        }
    }
}
