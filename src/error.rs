use thiserror::Error;

/// Error kinds that can end up in UI state.
///
/// Superseded requests are not represented here: a response arriving for a
/// stale generation is dropped before it can touch state (see
/// `gallery::GalleryController::apply_page`), so cancellation never surfaces
/// as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// Missing deployment configuration (wallet address or API key).
    /// Terminal: there is no retry path, only fixing the environment.
    #[error("{0}")]
    Config(String),

    /// Transport failure, non-2xx upstream status, or malformed payload.
    /// Carries the upstream error message when one could be extracted.
    #[error("{0}")]
    Fetch(String),

    /// The upstream knows the identity pair but has no record for it.
    /// Distinct from `Fetch` so the UI can render "not found" vs "retry".
    #[error("NFT not found")]
    NotFound,
}

impl GalleryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GalleryError::NotFound)
    }
}
