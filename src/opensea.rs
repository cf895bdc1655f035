use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::GalleryError;
use crate::models::{Nft, NftPage};

pub const DEFAULT_API_URL: &str = "https://api.opensea.io/api/v2";

/// The gallery is scoped to a single chain.
pub const CHAIN: &str = "ethereum";

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

/// Read seam against the upstream marketplace API. The production impl is
/// [`OpenSeaClient`]; tests substitute their own.
///
/// Neither operation retries: a failed request is terminal for its caller and
/// any retry is user-initiated.
#[async_trait]
pub trait NftApi: Send + Sync {
    /// One paginated listing request. `cursor = None` asks for the first
    /// page; a continuation token must be echoed back verbatim.
    async fn fetch_page(
        &self,
        wallet: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<NftPage, GalleryError>;

    /// Single-shot lookup of one NFT by its identity pair.
    async fn fetch_detail(&self, contract: &str, token_id: &str) -> Result<Nft, GalleryError>;
}

#[derive(Clone, Debug)]
pub struct OpenSeaClient {
    api_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl OpenSeaClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout_ms,
        }
    }
}

#[derive(Deserialize)]
struct DetailEnvelope {
    nft: Nft,
}

#[async_trait]
impl NftApi for OpenSeaClient {
    async fn fetch_page(
        &self,
        wallet: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<NftPage, GalleryError> {
        log::info!(
            "[opensea] fetching page for {} (cursor: {})",
            wallet,
            cursor.unwrap_or("first")
        );

        let mut request = http_client()
            .get(format!(
                "{}/chain/{}/account/{}/nfts",
                self.api_url, CHAIN, wallet
            ))
            .header("X-API-KEY", &self.api_key)
            .query(&[("limit", limit.to_string())])
            .timeout(Duration::from_millis(self.timeout_ms));
        if let Some(next) = cursor {
            request = request.query(&[("next", next)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GalleryError::Fetch(format!("Failed to fetch NFTs: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::warn!("[opensea] listing request failed with status {status}");
            return Err(GalleryError::Fetch(upstream_message(status, &body)));
        }

        let page: NftPage = response
            .json()
            .await
            .map_err(|e| GalleryError::Fetch(format!("Malformed OpenSea response: {e}")))?;
        log::debug!(
            "[opensea] page received: {} nfts, has next: {}",
            page.nfts.len(),
            page.next.is_some()
        );
        Ok(page)
    }

    async fn fetch_detail(&self, contract: &str, token_id: &str) -> Result<Nft, GalleryError> {
        log::info!("[opensea] fetching detail for {contract}/{token_id}");

        let response = http_client()
            .get(format!(
                "{}/chain/{}/contract/{}/nfts/{}",
                self.api_url, CHAIN, contract, token_id
            ))
            .header("X-API-KEY", &self.api_key)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| GalleryError::Fetch(format!("Failed to fetch NFT details: {e}")))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(GalleryError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[opensea] detail request failed with status {status}");
            return Err(GalleryError::Fetch(upstream_message(status.as_u16(), &body)));
        }

        let envelope: DetailEnvelope = response
            .json()
            .await
            .map_err(|e| GalleryError::Fetch(format!("Malformed OpenSea response: {e}")))?;
        Ok(envelope.nft)
    }
}

/// Extract a human-readable message from an upstream error body when present,
/// else fall back to a generic status line.
fn upstream_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(first) = value
            .get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
            .and_then(Value::as_str)
        {
            return first.to_string();
        }
    }
    format!("OpenSea API error ({status})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_prefers_message_field() {
        let body = r#"{"message": "Invalid API key"}"#;
        assert_eq!(upstream_message(401, body), "Invalid API key");
    }

    #[test]
    fn upstream_message_falls_back_to_errors_array() {
        let body = r#"{"errors": ["Address validation failed"]}"#;
        assert_eq!(upstream_message(400, body), "Address validation failed");
    }

    #[test]
    fn upstream_message_generic_on_unparseable_body() {
        assert_eq!(upstream_message(502, "<html>bad gateway</html>"), "OpenSea API error (502)");
        assert_eq!(upstream_message(500, ""), "OpenSea API error (500)");
    }
}
