use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, Response, header};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability;
use crate::types::{
    AddUserRequest, AgentMessageRequest, AgentMessageResponse, DeleteSessionRequest, LoginRequest,
    LoginResponse, StatusResponse,
};

/// Environment variable consulted when no base URL is given explicitly.
const BASE_URL_ENV: &str = "PERGAMUM_BASE_URL";

/// Client for the Pergamum backend API.
///
/// Requests carry no timeout by default: a hung request hangs the calling
/// operation until the connection dies. Use [`Pergamum::with_options`] to
/// opt into one.
#[derive(Clone)]
pub struct Pergamum {
    client: ReqwestClient,
    base_url: String,
    timeout: Option<Duration>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Pergamum {
    /// Create a new Pergamum client.
    ///
    /// The base URL can be provided directly or read from the
    /// PERGAMUM_BASE_URL environment variable.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var(BASE_URL_ENV).map_err(|_| {
                Error::url(
                    "base URL not provided and PERGAMUM_BASE_URL environment variable not set",
                    None,
                )
            })?,
        };
        url::Url::parse(&base_url)
            .map_err(|e| Error::url(format!("invalid base URL {base_url:?}: {e}"), Some(e)))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every successful exchange.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Default headers plus bearer authorization for protected endpoints.
    fn bearer_headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = self.default_headers();
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::authentication("token contains characters invalid in a header"))?;
        headers.insert(header::AUTHORIZATION, value);
        Ok(headers)
    }

    /// Map a reqwest send failure onto the error taxonomy.
    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // Headers we might need for error processing
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|val| val.to_str().ok())
            .map(String::from);

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // The backend reports failures as `{status: "fail", message}`; fall
        // back to the raw body when the payload is not that shape.
        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<ErrorBody>(&error_body)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| error_body.clone());

        // Map HTTP status code to appropriate error type
        match status_code {
            400 => Error::bad_request(message, None),
            401 => Error::authentication(message),
            403 => Error::permission(message),
            404 => Error::not_found(message),
            408 => Error::timeout(message, None),
            429 => Error::rate_limit(message, retry_after),
            500 => Error::internal_server(message, request_id),
            502..=504 => Error::service_unavailable(message, retry_after),
            _ => Error::api(status_code, None, message, request_id),
        }
    }

    /// Issue a JSON request and decode a JSON response.
    ///
    /// All four endpoints share this shape; a non-2xx status is treated
    /// identically to a transport failure by callers.
    async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);

        observability::CLIENT_REQUESTS.click();
        let start = Instant::now();

        let response = self
            .client
            .request(method, &url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                self.map_send_error(e)
            })?;

        observability::CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            observability::CLIENT_REQUEST_ERRORS.click();
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Authenticate a user by email.
    ///
    /// `POST /login`. No authorization header; this is the exchange that
    /// produces the bearer token.
    pub async fn login(&self, params: &LoginRequest) -> Result<LoginResponse> {
        observability::LOGIN_REQUESTS.click();
        let response: LoginResponse = self
            .execute(Method::POST, "login", self.default_headers(), params)
            .await?;
        if let Some(logger) = &self.logger {
            logger.log_login_response(&response);
        }
        Ok(response)
    }

    /// Relay a user message to the question-answering agent.
    ///
    /// `POST /message_to_agent` with bearer authorization.
    pub async fn message_to_agent(
        &self,
        token: &str,
        params: &AgentMessageRequest,
    ) -> Result<AgentMessageResponse> {
        observability::AGENT_MESSAGE_REQUESTS.click();
        let headers = self.bearer_headers(token)?;
        let response: AgentMessageResponse = self
            .execute(Method::POST, "message_to_agent", headers, params)
            .await?;
        if let Some(logger) = &self.logger {
            logger.log_agent_response(&response);
        }
        Ok(response)
    }

    /// Delete a conversation session on the backend.
    ///
    /// `DELETE /delete_session` with bearer authorization.
    pub async fn delete_session(
        &self,
        token: &str,
        params: &DeleteSessionRequest,
    ) -> Result<StatusResponse> {
        observability::SESSION_DELETE_REQUESTS.click();
        let headers = self.bearer_headers(token)?;
        let response: StatusResponse = self
            .execute(Method::DELETE, "delete_session", headers, params)
            .await?;
        if let Some(logger) = &self.logger {
            logger.log_ack_response(&response);
        }
        Ok(response)
    }

    /// Register a new authorized user.
    ///
    /// `POST /add_user` with bearer authorization.
    pub async fn add_user(&self, token: &str, params: &AddUserRequest) -> Result<StatusResponse> {
        observability::ADD_USER_REQUESTS.click();
        let headers = self.bearer_headers(token)?;
        let response: StatusResponse = self
            .execute(Method::POST, "add_user", headers, params)
            .await?;
        if let Some(logger) = &self.logger {
            logger.log_ack_response(&response);
        }
        Ok(response)
    }
}

impl fmt::Debug for Pergamum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pergamum")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Pergamum::new(Some("https://papers.example.com".to_string())).unwrap();
        assert_eq!(client.base_url, "https://papers.example.com");
        assert_eq!(client.timeout, None);

        let client = Pergamum::with_options(
            Some("https://custom-api.example.com/".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://custom-api.example.com");
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = Pergamum::new(Some("not a url".to_string())).unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn test_bearer_headers() {
        let client = Pergamum::new(Some("https://papers.example.com".to_string())).unwrap();
        let headers = client.bearer_headers("T1").unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer T1");

        let err = client.bearer_headers("bad\ntoken").unwrap_err();
        assert!(err.is_authentication());
    }
}
