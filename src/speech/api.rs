//! Customization API abstraction.
//!
//! Every management operation is a single HTTP exchange with the service, so the
//! boundary is one `send` method taking a fully described request. Request
//! construction lives in `requests`; `WatsonClient` is the network-backed
//! implementation.

use reqwest::Method;
use serde_json::Value;

use super::kind::CustomizationKind;
use super::record::{parse_listing, CustomizationRecord};
use super::requests;

/// Body carried by an API request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Json(Value),
    /// Raw upload (corpus text, grammar, audio)
    Bytes {
        content_type: String,
        data: Vec<u8>,
    },
}

/// A single call against the service, relative to the configured service URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds a query parameter only when a value is present
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn bytes(mut self, content_type: &str, data: Vec<u8>) -> Self {
        self.body = RequestBody::Bytes {
            content_type: content_type.to_string(),
            data,
        };
        self
    }
}

/// Remote customization service.
///
/// Responses are opaque JSON passed through to the operator. An empty response
/// body is returned as `Value::Null`.
#[allow(async_fn_in_trait)]
pub trait CustomizationApi {
    async fn send(&self, request: ApiRequest) -> anyhow::Result<Value>;

    /// Lists every customization of the given kind visible to the account.
    async fn list_records(
        &self,
        kind: CustomizationKind,
    ) -> anyhow::Result<Vec<CustomizationRecord>> {
        let body = self.send(requests::list_models(kind, None)).await?;
        parse_listing(kind, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_opt_skips_missing_values() {
        let request = ApiRequest::get("/v1/customizations")
            .query_opt("language", None::<&str>)
            .query_opt("sort", Some("alphabetical"));

        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.query,
            vec![("sort".to_string(), "alphabetical".to_string())]
        );
        assert_eq!(request.body, RequestBody::None);
    }
}
