use serde::{Deserialize, Serialize};

use crate::error::GalleryError;

/// One NFT record as returned by the OpenSea v2 API.
///
/// Every attribute is optional-tolerant: the upstream omits fields freely and
/// the gallery must render whatever survives. Identity is the
/// (contract, identifier) pair; duplicates within one accumulated page-set can
/// occur upstream and are kept as distinct rows keyed by position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nft {
    #[serde(default)]
    pub contract: String,
    #[serde(default)]
    pub identifier: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub mime_type: Option<String>,
    pub collection: Option<CollectionRef>,
    pub token_standard: Option<String>,
    #[serde(default)]
    pub traits: Vec<NftTrait>,
}

impl Nft {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => "Unnamed NFT",
        }
    }

    /// Collection label for display. A bare slug falls back to the
    /// `collection` trait value when present (upstream sometimes carries the
    /// human name only there); structured collections use their own name.
    pub fn collection_label(&self) -> Option<String> {
        match self.collection.as_ref()? {
            CollectionRef::Slug(slug) => Some(
                self.trait_value("collection")
                    .unwrap_or_else(|| slug.clone()),
            ),
            CollectionRef::Object(info) => Some(
                info.name
                    .clone()
                    .or_else(|| info.slug.clone())
                    .unwrap_or_else(|| "Unknown Collection".to_string()),
            ),
        }
    }

    fn trait_value(&self, trait_type: &str) -> Option<String> {
        self.traits
            .iter()
            .find(|t| t.trait_type == trait_type)
            .map(|t| match &t.value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    /// True when both halves of the identity pair are present, i.e. the item
    /// can be opened in the detail view.
    pub fn has_identity(&self) -> bool {
        !self.contract.is_empty() && !self.identifier.is_empty()
    }
}

/// The upstream `collection` field is polymorphic: either a bare slug string
/// or a structured object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionRef {
    Slug(String),
    Object(CollectionInfo),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NftTrait {
    #[serde(default)]
    pub trait_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// One page of the upstream listing. `next` is an opaque continuation token;
/// absent/null means the final page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NftPage {
    #[serde(default)]
    pub nfts: Vec<Nft>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Events flowing from fetch tasks back into the UI loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    PageLoaded {
        generation: u64,
        result: Result<NftPage, GalleryError>,
    },
    DetailLoaded {
        generation: u64,
        result: Result<Nft, GalleryError>,
    },
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_accepts_bare_slug_and_object() {
        let slug: Nft = serde_json::from_str(r#"{"collection": "cool-cats"}"#).unwrap();
        assert!(matches!(
            slug.collection,
            Some(CollectionRef::Slug(ref s)) if s == "cool-cats"
        ));

        let object: Nft =
            serde_json::from_str(r#"{"collection": {"name": "Cool Cats", "slug": "cool-cats"}}"#)
                .unwrap();
        assert_eq!(object.collection_label().as_deref(), Some("Cool Cats"));
    }

    #[test]
    fn slug_collection_prefers_trait_fallback() {
        let nft: Nft = serde_json::from_str(
            r#"{
                "collection": "cool-cats",
                "traits": [{"trait_type": "collection", "value": "Cool Cats Official"}]
            }"#,
        )
        .unwrap();
        assert_eq!(
            nft.collection_label().as_deref(),
            Some("Cool Cats Official")
        );
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let nft: Nft = serde_json::from_str("{}").unwrap();
        assert_eq!(nft.contract, "");
        assert_eq!(nft.display_name(), "Unnamed NFT");
        assert!(!nft.has_identity());

        let page: NftPage = serde_json::from_str("{}").unwrap();
        assert!(page.nfts.is_empty());
        assert!(page.next.is_none());
    }
}
