use url::Url;

use crate::models::Nft;

/// Extensions accepted by the account-gallery policy (static images only).
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Decides whether a fetched item is displayable.
///
/// Two variants exist, mirroring the two gallery routes:
/// - `home`: requires the image URL to be https.
/// - `account`: accepts any absolute URL scheme but additionally requires a
///   static-image extension, so arbitrary wallets can't flood the view with
///   data-URIs and untyped assets.
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    deny_keywords: Vec<String>,
    require_https: bool,
    require_image_ext: bool,
}

impl FilterPolicy {
    pub fn home(keywords: &[String]) -> Self {
        Self {
            deny_keywords: lowercase(keywords),
            require_https: true,
            require_image_ext: false,
        }
    }

    pub fn account(keywords: &[String]) -> Self {
        Self {
            deny_keywords: lowercase(keywords),
            require_https: false,
            require_image_ext: true,
        }
    }

    /// Rules run short-circuit in order; the first failing rule excludes the
    /// item. No side effects.
    pub fn is_displayable(&self, nft: &Nft) -> bool {
        let image_url = nft.image_url.as_deref().unwrap_or("");

        // Rule 1: syntactically valid absolute URL (https on the home policy)
        let parsed = match Url::parse(image_url) {
            Ok(u) => u,
            Err(_) => return false,
        };
        if self.require_https && parsed.scheme() != "https" {
            return false;
        }

        // Rule 2: configured deny-keywords against the lowercase name
        if !self.deny_keywords.is_empty() {
            let name = nft.name.as_deref().unwrap_or("").to_lowercase();
            if self.deny_keywords.iter().any(|k| name.contains(k.as_str())) {
                return false;
            }
        }

        // Rule 3: the public IPFS gateway is too slow/unreliable to display
        if image_url.contains("ipfs.io") {
            return false;
        }

        // Rule 4 (account policy): static-image extensions only, no data-URIs
        if self.require_image_ext {
            if parsed.scheme() == "data" {
                return false;
            }
            if !has_image_extension(parsed.path()) {
                return false;
            }
        }

        true
    }
}

fn lowercase(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn has_image_extension(path: &str) -> bool {
    match path.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nft(name: &str, image_url: &str) -> Nft {
        Nft {
            name: Some(name.to_string()),
            image_url: Some(image_url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn home_policy_requires_https() {
        let policy = FilterPolicy::home(&[]);
        assert!(policy.is_displayable(&nft("a", "https://cdn.example.com/a.png")));
        assert!(!policy.is_displayable(&nft("a", "http://cdn.example.com/a.png")));
        assert!(!policy.is_displayable(&nft("a", "not a url")));
        assert!(!policy.is_displayable(&nft("a", "/relative/path.png")));
    }

    #[test]
    fn missing_image_url_is_not_displayable() {
        let policy = FilterPolicy::home(&[]);
        let item = Nft {
            name: Some("a".into()),
            ..Default::default()
        };
        assert!(!policy.is_displayable(&item));
    }

    #[test]
    fn deny_keywords_match_case_insensitive_substrings() {
        let keywords = vec!["airdrop".to_string(), "SPAM".to_string()];
        let policy = FilterPolicy::home(&keywords);
        assert!(!policy.is_displayable(&nft("Free AIRDROP inside", "https://x.io/a.png")));
        assert!(!policy.is_displayable(&nft("totally spammy", "https://x.io/a.png")));
        assert!(policy.is_displayable(&nft("legit art", "https://x.io/a.png")));
    }

    #[test]
    fn keyword_match_excludes_regardless_of_url_validity() {
        let keywords = vec!["scam".to_string()];
        let policy = FilterPolicy::home(&keywords);
        assert!(!policy.is_displayable(&nft("scam token", "https://good.example/a.png")));
    }

    #[test]
    fn ipfs_gateway_urls_are_excluded() {
        let policy = FilterPolicy::home(&[]);
        assert!(!policy.is_displayable(&nft("a", "https://ipfs.io/ipfs/Qm123/img.png")));
    }

    #[test]
    fn account_policy_requires_image_extension() {
        let policy = FilterPolicy::account(&[]);
        assert!(policy.is_displayable(&nft("a", "https://x.io/a.png")));
        assert!(policy.is_displayable(&nft("a", "https://x.io/a.JPEG")));
        // http is fine on the account policy as long as it is absolute
        assert!(policy.is_displayable(&nft("a", "http://x.io/a.gif")));
        assert!(!policy.is_displayable(&nft("a", "https://x.io/a.mp4")));
        assert!(!policy.is_displayable(&nft("a", "https://x.io/no-extension")));
        assert!(!policy.is_displayable(&nft("a", "data:image/png;base64,AAAA")));
    }

    #[test]
    fn empty_keyword_entries_are_ignored() {
        let keywords = vec!["  ".to_string(), String::new()];
        let policy = FilterPolicy::home(&keywords);
        assert!(policy.is_displayable(&nft("anything", "https://x.io/a.png")));
    }
}
