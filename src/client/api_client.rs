use std::collections::HashMap;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::error::ClientError;
use super::token_store::TokenStore;

/// The `{ success, data, message }` envelope every API response carries.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    field_errors: Option<HashMap<String, String>>,
}

/// Unwrapped successful response.
#[derive(Debug, Clone)]
pub struct ApiReply<T> {
    pub data: T,
    pub message: String,
}

/// Attaches the bearer token when one is stored.
pub fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Every outgoing request goes through here so the token is always attached.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let builder = self.http.request(method, self.url(path)?);
        Ok(authorize(builder, self.tokens.token().as_deref()))
    }

    pub async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<ApiReply<T>, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Non-envelope response ({}): {}", status, e);
            ClientError::Decode(format!("HTTP {}: {}", status.as_u16(), e))
        })?;

        if !envelope.success || !status.is_success() {
            tracing::warn!(
                "API call failed with {}: {} ({})",
                status,
                envelope.message,
                envelope.code.as_deref().unwrap_or("-")
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.message,
                code: envelope.code,
                field_errors: envelope.field_errors,
            });
        }

        let data = serde_json::from_value(envelope.data)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(ApiReply {
            data,
            message: envelope.message,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiReply<T>, ClientError> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<ApiReply<T>, ClientError> {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiReply<T>, ClientError> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiReply<T>, ClientError> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiReply<T>, ClientError> {
        self.send(self.request(Method::DELETE, path)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::token_store::MemoryTokenStore;

    #[test]
    fn attaches_bearer_when_token_stored() {
        let client = ApiClient::new(
            "http://localhost:3000",
            Arc::new(MemoryTokenStore::with_token("abc")),
        )
        .unwrap();
        let request = client.request(Method::GET, "/api/jobroles").unwrap().build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:3000/api/jobroles");
        assert_eq!(request.headers()["authorization"], "Bearer abc");
    }

    #[test]
    fn no_header_when_signed_out() {
        let client = ApiClient::new("http://localhost:3000/base", Arc::new(MemoryTokenStore::new())).unwrap();
        let request = client.request(Method::GET, "auth/signin").unwrap().build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:3000/base/auth/signin");
        assert!(request.headers().get("authorization").is_none());
    }
}
