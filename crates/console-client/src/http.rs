//! `reqwest`-backed auth API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use console_core::config::ApiConfig;
use console_core::error::{AppError, ErrorKind};
use console_core::result::AppResult;
use console_core::traits::{AuthApi, TokenResponse};

use crate::envelope::ApiEnvelope;

const LOGIN_PATH: &str = "/api/v1/auth/login";
const REFRESH_PATH: &str = "/api/v1/auth/refresh";
const LOGOUT_PATH: &str = "/api/v1/auth/logout";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Auth endpoints of the backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpAuthApi {
    /// Builds a client from API configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid API base URL '{}': {e}", config.base_url))
        })?;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base })
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>) -> AppResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| AppError::configuration(format!("Invalid endpoint path '{path}': {e}")))?;

        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Request to {path} failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        debug!(path = %path, status = %status, "Auth endpoint responded");

        let text = response.text().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to read response from {path}: {e}"),
                e,
            )
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| default_message(status));
            return Err(status_error(status, message));
        }

        if text.trim().is_empty() {
            return Ok(None);
        }
        let envelope: ApiEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
            warn!(path = %path, error = %e, "Unreadable response body");
            AppError::from(e)
        })?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let body = LoginRequest { email, password };
        let result = self
            .post::<_, TokenResponse>(LOGIN_PATH, Some(&body))
            .await?;
        Ok(result.unwrap_or_default())
    }

    async fn refresh(&self) -> AppResult<TokenResponse> {
        let result = self
            .post::<serde_json::Value, TokenResponse>(REFRESH_PATH, None)
            .await?;
        Ok(result.unwrap_or_default())
    }

    async fn logout(&self) -> AppResult<()> {
        self.post::<serde_json::Value, serde_json::Value>(LOGOUT_PATH, None)
            .await?;
        Ok(())
    }
}

fn status_error(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::authentication(message),
        StatusCode::FORBIDDEN => AppError::authorization(message),
        _ => AppError::external_service(message),
    }
}

fn default_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {}: {reason}", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}
