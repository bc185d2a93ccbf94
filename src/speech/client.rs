//! Watson Speech to Text customization client.
//!
//! Sends `ApiRequest`s to the service instance with bearer authentication. The
//! API key is exchanged for an IAM access token on first use and the token is
//! reused for the rest of the process.

use std::time::Duration;

use anyhow::anyhow;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;

use super::api::{ApiRequest, CustomizationApi, RequestBody};
use crate::config::{Credentials, ServiceSettings};

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// IAM token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Network-backed customization API.
pub struct WatsonClient {
    http: reqwest::Client,
    service_url: String,
    api_key: String,
    iam_url: String,
    token: OnceCell<String>,
}

impl WatsonClient {
    /// Creates a client for the instance described by `credentials`.
    ///
    /// # Errors
    /// - If the HTTP client cannot be built
    pub fn new(credentials: &Credentials, settings: &ServiceSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            http,
            service_url: credentials.service_url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
            iam_url: credentials
                .iam_url
                .clone()
                .unwrap_or_else(|| settings.iam_url.clone()),
            token: OnceCell::new(),
        })
    }

    async fn access_token(&self) -> anyhow::Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| self.request_token())
            .await?;
        Ok(token.as_str())
    }

    async fn request_token(&self) -> anyhow::Result<String> {
        tracing::debug!("Requesting IAM token from {}", self.iam_url);

        let response = self
            .http
            .post(&self.iam_url)
            .header("Accept", "application/json")
            .form(&[("grant_type", IAM_GRANT_TYPE), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| describe_send_error("IAM", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!(format_iam_error(status.as_u16(), &error_body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse IAM token response: {e}"))?;

        tracing::debug!("IAM token acquired (expires in {:?}s)", token.expires_in);
        Ok(token.access_token)
    }
}

impl CustomizationApi for WatsonClient {
    async fn send(&self, request: ApiRequest) -> anyhow::Result<Value> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.service_url, request.path);

        tracing::debug!(
            "Speech to Text API Call:\n  URL: {}\n  Method: {}\n  Query: {:?}\n  Headers:\n    Authorization: Bearer <redacted>",
            url,
            request.method,
            request.query
        );

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .bearer_auth(token)
            .header("Accept", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::None => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Bytes { content_type, data } => {
                tracing::debug!("Uploading {} bytes as {}", data.len(), content_type);
                builder.header(CONTENT_TYPE, content_type).body(data)
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| describe_send_error("Speech to Text", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read Speech to Text response: {e}"))?;

        if !status.is_success() {
            tracing::error!("{} {} failed with status {}", request.method, url, status);
            return Err(anyhow!(format_error(status.as_u16(), &body)));
        }

        tracing::info!("{} {} -> {}", request.method, request.path, status);
        parse_body(&body)
    }
}

/// Parses a successful response body. Empty bodies become `Value::Null`.
fn parse_body(body: &str) -> anyhow::Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| anyhow!("Failed to parse Speech to Text response: {e}"))
}

fn describe_send_error(service: &str, e: reqwest::Error) -> anyhow::Error {
    if e.is_connect() {
        anyhow!("Failed to connect to the {service} server. Check your internet connection and service URL.")
    } else if e.is_timeout() {
        anyhow!("Request to {service} timed out. The server is not responding.")
    } else if e.is_builder() {
        anyhow!("Failed to build {service} request: {e}. Check the configured URL.")
    } else {
        anyhow!("{service} network error: {e}")
    }
}

/// Formats HTTP error codes from the customization API into human-readable messages.
fn format_error(status: u16, error_body: &str) -> String {
    match status {
        400 => format!("Speech to Text rejected the request: {}", vendor_message(error_body)),
        401 => "Speech to Text API key is invalid or expired. Check your env file or campaign credentials.".to_string(),
        403 => "You don't have permission to use this Speech to Text instance. Check your API key and plan.".to_string(),
        404 => format!("Not found: {}", vendor_message(error_body)),
        409 => "The customization is locked by another request (training or upgrade in progress). Try again when it is available.".to_string(),
        429 => "Too many requests to Speech to Text. Please wait and try again.".to_string(),
        500 | 502 | 503 | 504 => format!(
            "Speech to Text service is experiencing issues. Please try again later. ({})",
            vendor_message(error_body)
        ),
        _ => format!("Speech to Text API error (status {status}): {error_body}"),
    }
}

fn format_iam_error(status: u16, error_body: &str) -> String {
    match status {
        400 | 401 => "IAM rejected the API key. Check your env file or campaign credentials.".to_string(),
        _ => format!("IAM token request failed (status {status}): {error_body}"),
    }
}

/// Extracts the `error` field the service puts in failure bodies.
fn vendor_message(error_body: &str) -> String {
    serde_json::from_str::<Value>(error_body)
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| error_body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body_empty_is_null() {
        assert_eq!(parse_body("").unwrap(), Value::Null);
        assert_eq!(parse_body("  \n").unwrap(), Value::Null);
        assert_eq!(parse_body("{}").unwrap(), json!({}));
        assert!(parse_body("<html>").is_err());
    }

    #[test]
    fn test_format_error_uses_vendor_message() {
        let body = r#"{"code":404,"error":"Invalid value for 'customization_id'"}"#;
        assert_eq!(
            format_error(404, body),
            "Not found: Invalid value for 'customization_id'"
        );
        assert!(format_error(400, "plain text").ends_with("plain text"));
    }

    #[test]
    fn test_format_error_keeps_vendor_message_on_server_errors() {
        let body = r#"{"code":503,"error":"Service Unavailable: model es-CO is updating"}"#;
        let message = format_error(503, body);
        assert!(message.starts_with("Speech to Text service is experiencing issues"));
        assert!(message.contains("model es-CO is updating"));
    }

    #[test]
    fn test_format_error_status_mapping() {
        assert!(format_error(401, "").contains("invalid or expired"));
        assert!(format_error(409, "").contains("locked"));
        assert!(format_error(503, "").contains("try again later"));
        assert_eq!(
            format_error(418, "teapot"),
            "Speech to Text API error (status 418): teapot"
        );
    }

    #[test]
    fn test_new_trims_service_url_and_prefers_credential_iam_url() {
        let credentials = Credentials {
            api_key: "k".to_string(),
            service_url: "https://stt.example/instances/1/".to_string(),
            iam_url: Some("https://iam.example/token".to_string()),
        };
        let client = WatsonClient::new(&credentials, &ServiceSettings::default()).unwrap();

        assert_eq!(client.service_url, "https://stt.example/instances/1");
        assert_eq!(client.iam_url, "https://iam.example/token");
    }
}
