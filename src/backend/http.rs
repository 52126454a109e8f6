use crate::backend::traits::AdsBackend;
use crate::config::Config;
use crate::models::{Ad, AdPayload};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Body shapes the backend has been seen to answer with
#[derive(Deserialize)]
#[serde(untagged)]
enum AdResponse {
    Bare(Ad),
    Wrapped { ad: Ad },
    Other(serde_json::Value),
}

/// REST client for the ads backend
pub struct HttpAdsBackend {
    client: Client,
    config: Config,
}

impl HttpAdsBackend {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("housing-ads/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn read_ad(response: Response, action: &str) -> Result<Option<Ad>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned status {} on {}: {}", status, action, body);
            anyhow::bail!("Failed to {} ad: {}", action, status);
        }

        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        debug!("Response from backend ({} bytes): {}", text.len(), text);

        if text.trim().is_empty() {
            return Ok(None);
        }

        let parsed: AdResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Response to {} is not JSON ({}), treating as saved", action, e);
                return Ok(None);
            }
        };
        Ok(match parsed {
            AdResponse::Bare(ad) | AdResponse::Wrapped { ad } => Some(ad),
            AdResponse::Other(_) => None,
        })
    }
}

#[async_trait]
impl AdsBackend for HttpAdsBackend {
    async fn create_ad(&self, payload: &AdPayload) -> Result<Option<Ad>> {
        let url = self.config.ads_url();
        info!("Creating ad \"{}\" via POST {}", payload.title, url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .context("Failed to send create request")?;

        Self::read_ad(response, "create").await
    }

    async fn update_ad(&self, id: &str, payload: &AdPayload) -> Result<Option<Ad>> {
        let url = self.config.ad_url(id);
        info!("Updating ad {} via PUT {}", id, url);

        let response = self
            .client
            .put(&url)
            .json(payload)
            .send()
            .await
            .context("Failed to send update request")?;

        Self::read_ad(response, "update").await
    }
}
