use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// HTTP klient pro OpenSearch / Elasticsearch
#[derive(Debug, Clone)]
pub struct EsClient {
    base_url: String,
    client: Client,
}

impl EsClient {
    /// `root_path` je volitelný prefix za hostem (reverse proxy apod.)
    pub fn new(host: &str, root_path: Option<&str>, timeout: Duration) -> Result<Self> {
        // Ořízni trailing slash
        let mut base_url = host.trim_end_matches('/').to_string();
        if let Some(root) = root_path.map(|r| r.trim_matches('/')).filter(|r| !r.is_empty()) {
            base_url.push('/');
            base_url.push_str(root);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Univerzální GET request
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", path))?;

        self.handle_response(response).await
    }

    /// Univerzální PUT request
    pub async fn put<T>(&self, path: &str, body: &Value) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", path))?;

        self.handle_response(response).await
    }

    /// Raw GET request (vrací text místo JSON), pro cat API a hot threads
    pub async fn get_raw(&self, path: &str) -> Result<String> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", path))?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response text")?;

        if !status.is_success() {
            return Err(anyhow!("Cluster error ({}): {}", status, body));
        }

        Ok(body)
    }

    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(anyhow!("Cluster error ({}): {}", status, error_text));
        }

        let body = response
            .json::<T>()
            .await
            .context("Failed to parse response JSON")?;

        Ok(body)
    }
}
