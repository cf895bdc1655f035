use std::time::{Duration, Instant};

use crate::error::GalleryError;
use crate::filter::FilterPolicy;
use crate::models::{Nft, NftPage};

/// Repeated load-more requests within this window collapse to one fetch.
pub const LOAD_MORE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Gallery session lifecycle.
///
/// `Idle -> LoadingInitial -> Ready <-> LoadingMore`, with `Failed` reachable
/// from either loading state. A wallet switch tears the session down and
/// starts a new one at `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingInitial,
    Ready,
    LoadingMore,
    Failed,
}

/// A page request the controller wants issued. The event loop performs the
/// actual IO and feeds the outcome back through `apply_page` with the same
/// generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub wallet: String,
    pub cursor: Option<String>,
    pub limit: u32,
}

/// Orchestrates repeated page fetches for one gallery session: accumulates
/// filtered items, tracks the pagination cursor, deduplicates triggers, and
/// exposes loading/error state to the UI.
///
/// Sans-IO by design: callers pump `start_initial`/`poll` for requests and
/// report completions via `apply_page`. At most one request is outstanding at
/// a time; page N+1 is never requested before page N's outcome is applied.
///
/// Responses are tagged with a generation counter. Switching wallets bumps
/// the generation, so a late response for a superseded session fails the tag
/// check and is discarded without touching state.
pub struct GalleryController {
    wallet: String,
    filter: FilterPolicy,
    page_size: u32,

    phase: Phase,
    items: Vec<Nft>,
    cursor: Option<String>,
    has_more: bool,
    total: usize,
    error: Option<GalleryError>,

    generation: u64,
    in_flight: bool,
    initial_done: bool,
    load_more_deadline: Option<Instant>,
}

impl GalleryController {
    pub fn new(wallet: impl Into<String>, filter: FilterPolicy, page_size: u32) -> Self {
        Self {
            wallet: wallet.into(),
            filter,
            page_size,
            phase: Phase::Idle,
            items: Vec::new(),
            cursor: None,
            has_more: true,
            total: 0,
            error: None,
            generation: 0,
            in_flight: false,
            initial_done: false,
            load_more_deadline: None,
        }
    }

    // ----- getters -----
    pub fn wallet(&self) -> &str {
        &self.wallet
    }
    pub fn items(&self) -> &[Nft] {
        &self.items
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn has_more(&self) -> bool {
        self.has_more
    }
    pub fn total(&self) -> usize {
        self.total
    }
    pub fn error(&self) -> Option<&GalleryError> {
        self.error.as_ref()
    }
    pub fn generation(&self) -> u64 {
        self.generation
    }
    pub fn is_loading_initial(&self) -> bool {
        self.phase == Phase::LoadingInitial
    }
    pub fn is_loading_more(&self) -> bool {
        self.phase == Phase::LoadingMore
    }

    /// Request the initial page for this session.
    ///
    /// Idempotent: the triggering event (view mount) is not guaranteed to
    /// fire exactly once, so a request already in flight or an initial fetch
    /// that already completed makes this a no-op. A failed session also
    /// refuses: the caller pumps this every frame, and a retry must be
    /// user-initiated (a new session), never automatic.
    pub fn start_initial(&mut self) -> Option<FetchRequest> {
        if self.wallet.is_empty()
            || self.in_flight
            || self.initial_done
            || self.phase == Phase::Failed
        {
            return None;
        }
        self.phase = Phase::LoadingInitial;
        self.error = None;
        self.in_flight = true;
        Some(self.request(None))
    }

    /// Ask for the next page. Debounced: each call (re)arms a 300ms window,
    /// and the fetch is issued by `poll` when the window elapses, using the
    /// cursor current at that moment. Guards are checked at issue time, not
    /// here, so a call made while a fetch is in flight simply dissolves.
    pub fn load_more(&mut self, now: Instant) {
        self.load_more_deadline = Some(now + LOAD_MORE_DEBOUNCE);
    }

    /// Drive the debounce clock. Returns a request when an armed load-more
    /// window has elapsed and none of the refusal conditions hold (fetch in
    /// flight, no more pages, no cursor).
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        let deadline = self.load_more_deadline?;
        if now < deadline {
            return None;
        }
        self.load_more_deadline = None;

        if self.in_flight || !self.has_more || self.phase != Phase::Ready {
            return None;
        }
        let cursor = self.cursor.clone()?;
        self.phase = Phase::LoadingMore;
        self.in_flight = true;
        Some(self.request(Some(cursor)))
    }

    /// Apply a fetch outcome. A generation mismatch means the session was
    /// superseded while the request was in flight; the response is dropped
    /// silently (cancellation is not an error).
    pub fn apply_page(&mut self, generation: u64, result: Result<NftPage, GalleryError>) {
        if generation != self.generation {
            log::debug!(
                "[gallery] dropping stale page (gen {} != {})",
                generation,
                self.generation
            );
            return;
        }
        self.in_flight = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                log::warn!("[gallery] page fetch failed: {e}");
                self.phase = Phase::Failed;
                self.error = Some(e);
                return;
            }
        };

        let initial = self.phase == Phase::LoadingInitial;
        let survivors: Vec<Nft> = page
            .nfts
            .into_iter()
            .filter(|nft| self.filter.is_displayable(nft))
            .collect();
        let survived = survivors.len();

        if initial {
            // initial fetch replaces rather than appends
            self.items = survivors;
            self.total = survived;
            self.initial_done = true;
        } else {
            self.items.extend(survivors);
            self.total += survived;
        }

        // A fully filtered page ends pagination even when a next cursor
        // exists; a missing next cursor always ends it.
        self.has_more = page.next.is_some() && survived > 0;
        self.cursor = page.next;
        self.phase = Phase::Ready;
        log::debug!(
            "[gallery] page applied: +{} items (total {}), has_more: {}",
            survived,
            self.total,
            self.has_more
        );
    }

    /// Switch the session to a different wallet (and possibly a different
    /// filter policy). Resets all accumulated state; old and new results are
    /// never merged. The next `start_initial` begins the fresh session.
    pub fn reset_session(&mut self, wallet: impl Into<String>, filter: FilterPolicy) {
        self.wallet = wallet.into();
        self.filter = filter;
        self.generation += 1;
        self.phase = Phase::Idle;
        self.items.clear();
        self.cursor = None;
        self.has_more = true;
        self.total = 0;
        self.error = None;
        self.in_flight = false;
        self.initial_done = false;
        self.load_more_deadline = None;
    }

    fn request(&self, cursor: Option<String>) -> FetchRequest {
        FetchRequest {
            generation: self.generation,
            wallet: self.wallet.clone(),
            cursor,
            limit: self.page_size,
        }
    }
}
