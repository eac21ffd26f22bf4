use crate::errors::ClientError;
use reqwest::{header, Client, Method};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const CACHE_NAME: &str = "excusegen-v1";

pub const PRECACHE: [&str; 4] = [
    "/static/style.css",
    "/static/manifest.json",
    "/static/logo.png",
    "/static/click.mp3",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAsset {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

pub struct AssetCache {
    name: &'static str,
    origin: String,
    client: Client,
    entries: RwLock<HashMap<String, CachedAsset>>,
}

impl AssetCache {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            name: CACHE_NAME,
            origin: origin.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn intercepts(method: &Method, path: &str) -> bool {
        method == Method::GET && !path.starts_with("/api/")
    }

    pub async fn install(&self) -> usize {
        let mut stored = 0;
        for path in PRECACHE {
            match self.fetch_network(&Method::GET, path).await {
                Ok(asset) if is_success(asset.status) => {
                    self.entries.write().await.insert(path.to_string(), asset);
                    stored += 1;
                }
                Ok(asset) => {
                    warn!(cache = self.name, path, status = asset.status, "asset not cached")
                }
                Err(err) => warn!(cache = self.name, path, "asset install failed: {err}"),
            }
        }
        info!(cache = self.name, stored, "asset cache installed");
        stored
    }

    pub async fn respond(&self, method: &Method, path: &str) -> Result<CachedAsset, ClientError> {
        if !Self::intercepts(method, path) {
            return self.fetch_network(method, path).await;
        }

        if let Some(hit) = self.entries.read().await.get(path) {
            debug!(cache = self.name, path, "cache hit");
            return Ok(hit.clone());
        }

        let asset = self.fetch_network(method, path).await?;
        if is_success(asset.status) {
            self.entries
                .write()
                .await
                .insert(path.to_string(), asset.clone());
        }
        Ok(asset)
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.entries.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn fetch_network(&self, method: &Method, path: &str) -> Result<CachedAsset, ClientError> {
        let response = self
            .client
            .request(method.clone(), format!("{}{}", self.origin, path))
            .send()
            .await
            .map_err(|err| ClientError::network(path, err))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|err| ClientError::network(path, err))?;

        Ok(CachedAsset {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
