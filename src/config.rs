use anyhow::{anyhow, Result};
use clap::Parser;

use crate::opensea::DEFAULT_API_URL;

/// Seaview - Terminal NFT Gallery
///
/// Browses NFTs owned by an Ethereum wallet via the OpenSea v2 API.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "seaview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal NFT gallery for OpenSea", long_about = None)]
pub struct CliArgs {
    /// Wallet address whose NFTs populate the home gallery
    #[arg(long, env = "NFT_WALLET_ADDRESS")]
    pub wallet: Option<String>,

    /// OpenSea API key (required for every request)
    #[arg(long, env = "NFT_OPENSEA_API_KEY")]
    pub api_key: Option<String>,

    /// Comma-separated keywords; items whose name contains one are hidden
    #[arg(long, env = "NFT_FILTER_KEYWORDS")]
    pub filter_keywords: Option<String>,

    /// OpenSea API base URL
    #[arg(long, env = "OPENSEA_API_URL")]
    pub api_url: Option<String>,

    /// Items requested per page (1-200)
    #[arg(long, env = "NFT_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub wallet: Option<String>,
    pub api_key: Option<String>,
    pub filter_keywords: Vec<String>,
    pub api_url: String,
    pub page_size: u32,
    pub http_timeout_ms: u64,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Parse the comma-separated deny-keyword list: trimmed, lowercased, empties
/// dropped.
fn parse_keywords(s: &str) -> Vec<String> {
    s.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Validate URL format (basic scheme check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables.
///
/// A missing wallet address or API key is NOT an error here: it becomes a
/// configuration-error state rendered by the UI, so the binary starts either
/// way instead of crashing.
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

pub fn from_args(args: CliArgs) -> Result<Config> {
    let api_url = args
        .api_url
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = api_url.trim_end_matches('/').to_string();
    validate_url(&api_url, "OPENSEA_API_URL")?;

    let page_size = validate_in_range(args.page_size.unwrap_or(50), 1, 200, "NFT_PAGE_SIZE")?;

    let http_timeout_ms = validate_in_range(
        args.http_timeout_ms.unwrap_or(8000),
        1000,
        60000,
        "HTTP_TIMEOUT_MS",
    )?;

    let filter_keywords = args
        .filter_keywords
        .as_deref()
        .map(parse_keywords)
        .unwrap_or_default();

    Ok(Config {
        wallet: args.wallet.filter(|w| !w.trim().is_empty()),
        api_key: args.api_key.filter(|k| !k.trim().is_empty()),
        filter_keywords,
        api_url,
        page_size,
        http_timeout_ms,
    })
}
