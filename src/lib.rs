//! Seaview - Terminal NFT Gallery
//!
//! Seaview browses the NFTs owned by an Ethereum wallet, fetched from the
//! OpenSea v2 API, in a terminal UI.
//!
//! ## Architecture
//!
//! The core is the fetch/paginate/filter/cache pipeline behind the list:
//!
//! - [`opensea`]: one paginated request (or one detail lookup) against the
//!   upstream API, normalized into [`models`] types.
//! - [`filter`]: decides whether a fetched item is displayable.
//! - [`media`]: decides how an item's primary asset renders.
//! - [`gallery`]: the incremental collection controller - accumulates
//!   filtered pages, tracks the cursor, debounces load-more, and discards
//!   superseded responses.
//! - [`cache`]: short-lived page memo keyed by (wallet, cursor).
//!
//! The UI ([`app`], [`ui`], the binary) is a thin consumer: it pumps the
//! controller for fetch requests, performs the IO on tokio tasks, and feeds
//! outcomes back through an event channel.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod media;
pub mod models;
pub mod opensea;
pub mod ui;

// Re-export commonly used types
pub use app::{App, DetailPhase, DetailRequest, InputMode, View};
pub use cache::PageCache;
pub use config::Config;
pub use error::GalleryError;
pub use filter::FilterPolicy;
pub use gallery::{FetchRequest, GalleryController, Phase, LOAD_MORE_DEBOUNCE};
pub use models::{AppEvent, Nft, NftPage};
pub use opensea::{NftApi, OpenSeaClient};
