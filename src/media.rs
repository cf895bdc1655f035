use crate::models::Nft;

const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogg"];

/// How an item's primary asset should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn classify(nft: &Nft) -> MediaKind {
        classify_parts(
            nft.mime_type.as_deref().unwrap_or(""),
            nft.image_url.as_deref().unwrap_or(""),
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Total over all inputs: missing fields behave as empty strings.
pub fn classify_parts(mime_type: &str, image_url: &str) -> MediaKind {
    if mime_type.starts_with("video/") {
        return MediaKind::Video;
    }
    let lower = image_url.to_lowercase();
    if VIDEO_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
    {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}
