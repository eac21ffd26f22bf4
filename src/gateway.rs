use crate::errors::ClientError;
use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};

#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base: String,
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|value| value.starts_with("image/"))
    }
}

impl Gateway {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(client: Client, base: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base, endpoint)
    }

    pub async fn call(&self, endpoint: &str, body: Option<&Value>) -> Result<Value, ClientError> {
        let raw = self.send(endpoint, body).await?;
        serde_json::from_slice(&raw.body).map_err(|err| {
            error!("API error ({endpoint}): response is not JSON: {err}");
            ClientError::decode(endpoint, err)
        })
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, ClientError> {
        self.call(endpoint, None).await
    }

    pub async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Value, ClientError> {
        let body = to_body(endpoint, body)?;
        self.call(endpoint, Some(&body)).await
    }

    pub async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let value = self.call(endpoint, body).await?;
        serde_json::from_value(value).map_err(|err| {
            error!("API error ({endpoint}): unexpected shape: {err}");
            ClientError::decode(endpoint, err)
        })
    }

    pub async fn post_as<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = to_body(endpoint, body)?;
        self.call_as(endpoint, Some(&body)).await
    }

    pub async fn call_raw(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, ClientError> {
        self.send(endpoint, body).await
    }

    async fn send(&self, endpoint: &str, body: Option<&Value>) -> Result<RawResponse, ClientError> {
        let method = if body.is_some() { Method::POST } else { Method::GET };
        debug!(%method, endpoint, "calling backend");

        let mut request = self
            .client
            .request(method, self.url(endpoint))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(|err| {
            error!("API error ({endpoint}): {err}");
            ClientError::network(endpoint, err)
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|err| {
            error!("API error ({endpoint}): {err}");
            ClientError::network(endpoint, err)
        })?;

        Ok(RawResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

fn to_body<B: Serialize>(endpoint: &str, body: &B) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|err| ClientError::decode(endpoint, err))
}
