use std::time::Instant;

use crate::config::Config;
use crate::error::GalleryError;
use crate::filter::FilterPolicy;
use crate::gallery::{FetchRequest, GalleryController, Phase};
use crate::models::{AppEvent, Nft};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Address,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    Gallery,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    Ready,
    NotFound,
    Failed,
}

/// A detail lookup the event loop should issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: u64,
    pub contract: String,
    pub token_id: String,
}

/// State for one detail view "mount". Dropped entirely when the user goes
/// back, so the one-shot request latch resets with it.
pub struct DetailState {
    pub contract: String,
    pub token_id: String,
    pub phase: DetailPhase,
    pub nft: Option<Nft>,
    pub error: Option<GalleryError>,
    requested: bool,
    generation: u64,
}

/// TUI application state: routes between the gallery and detail views, owns
/// the gallery session controller, and turns key presses into controller
/// calls. All fetch outcomes arrive through `on_event`.
pub struct App {
    quit: bool,
    view: View,
    input_mode: InputMode,
    address_input: String,

    gallery: GalleryController,
    home_wallet: Option<String>,
    browsing_home: bool,
    api_key_missing: bool,
    filter_keywords: Vec<String>,

    detail: Option<DetailState>,
    detail_generation: u64,

    selected: usize,
}

impl App {
    pub fn new(cfg: &Config) -> Self {
        let home_wallet = cfg.wallet.clone();
        let gallery = GalleryController::new(
            home_wallet.clone().unwrap_or_default(),
            FilterPolicy::home(&cfg.filter_keywords),
            cfg.page_size,
        );
        Self {
            quit: false,
            view: View::Gallery,
            input_mode: InputMode::Normal,
            address_input: String::new(),
            gallery,
            home_wallet,
            browsing_home: true,
            api_key_missing: cfg.api_key.is_none(),
            filter_keywords: cfg.filter_keywords.clone(),
            detail: None,
            detail_generation: 0,
            selected: 0,
        }
    }

    // ----- getters -----
    pub fn quit_flag(&self) -> bool {
        self.quit
    }
    pub fn view(&self) -> View {
        self.view
    }
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
    pub fn address_input(&self) -> &str {
        &self.address_input
    }
    pub fn items(&self) -> &[Nft] {
        self.gallery.items()
    }
    pub fn selected(&self) -> usize {
        self.selected
    }
    pub fn selected_nft(&self) -> Option<&Nft> {
        self.gallery.items().get(self.selected)
    }
    pub fn total(&self) -> usize {
        self.gallery.total()
    }
    pub fn has_more(&self) -> bool {
        self.gallery.has_more()
    }
    pub fn phase(&self) -> Phase {
        self.gallery.phase()
    }
    pub fn wallet(&self) -> &str {
        self.gallery.wallet()
    }
    pub fn browsing_home(&self) -> bool {
        self.browsing_home
    }
    pub fn detail(&self) -> Option<&DetailState> {
        self.detail.as_ref()
    }

    /// The error the UI should render, if any. Configuration problems take
    /// precedence over per-request failures.
    pub fn display_error(&self) -> Option<GalleryError> {
        if self.api_key_missing {
            return Some(GalleryError::Config("API key not configured".into()));
        }
        if self.gallery.wallet().is_empty() {
            return Some(GalleryError::Config("No wallet address specified".into()));
        }
        self.gallery.error().cloned()
    }

    // ----- fetch pumping (called by the event loop every frame) -----

    /// Page request the controller wants issued right now, if any.
    pub fn next_page_fetch(&mut self, now: Instant) -> Option<FetchRequest> {
        if self.api_key_missing {
            return None;
        }
        self.gallery
            .start_initial()
            .or_else(|| self.gallery.poll(now))
    }

    /// Detail request for the current detail view, at most once per mount.
    pub fn take_detail_request(&mut self) -> Option<DetailRequest> {
        if self.api_key_missing {
            return None;
        }
        let detail = self.detail.as_mut()?;
        if detail.requested {
            return None;
        }
        detail.requested = true;
        Some(DetailRequest {
            generation: detail.generation,
            contract: detail.contract.clone(),
            token_id: detail.token_id.clone(),
        })
    }

    // ----- events -----

    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::PageLoaded { generation, result } => {
                self.gallery.apply_page(generation, result);
                self.clamp_selection();
            }
            AppEvent::DetailLoaded { generation, result } => {
                let Some(detail) = self.detail.as_mut() else {
                    // view unmounted while the request was in flight
                    return;
                };
                if detail.generation != generation {
                    log::debug!("[app] dropping stale detail response (gen {generation})");
                    return;
                }
                match result {
                    Ok(nft) => {
                        detail.nft = Some(nft);
                        detail.phase = DetailPhase::Ready;
                    }
                    Err(GalleryError::NotFound) => detail.phase = DetailPhase::NotFound,
                    Err(e) => {
                        detail.error = Some(e);
                        detail.phase = DetailPhase::Failed;
                    }
                }
            }
            AppEvent::Quit => self.quit = true,
        }
    }

    // ----- navigation -----

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move down; at the end of the loaded list this doubles as the
    /// load-more trigger (debounced by the controller, so holding the key
    /// collapses to a single request).
    pub fn down(&mut self, now: Instant) {
        let len = self.gallery.items().len();
        if self.selected + 1 < len {
            self.selected += 1;
        } else if self.gallery.has_more() {
            self.gallery.load_more(now);
        }
    }

    pub fn load_more(&mut self, now: Instant) {
        self.gallery.load_more(now);
    }

    pub fn open_detail(&mut self) {
        let Some(nft) = self.selected_nft() else {
            return;
        };
        if !nft.has_identity() {
            return;
        }
        let (contract, token_id) = (nft.contract.clone(), nft.identifier.clone());
        self.detail_generation += 1;
        self.detail = Some(DetailState {
            contract,
            token_id,
            phase: DetailPhase::Loading,
            nft: None,
            error: None,
            requested: false,
            generation: self.detail_generation,
        });
        self.view = View::Detail;
    }

    pub fn back_to_gallery(&mut self) {
        self.view = View::Gallery;
        self.detail = None;
    }

    // ----- address entry (the /account/:address route analog) -----

    pub fn start_address_input(&mut self) {
        self.input_mode = InputMode::Address;
        self.address_input.clear();
    }

    pub fn address_add_char(&mut self, c: char) {
        if !c.is_whitespace() {
            self.address_input.push(c);
        }
    }

    pub fn address_backspace(&mut self) {
        self.address_input.pop();
    }

    pub fn cancel_address_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.address_input.clear();
    }

    /// Submit the entered address: tears the current session down and starts
    /// a fresh one under the account filter policy. Old and new results are
    /// never merged.
    pub fn submit_address(&mut self) {
        let address = self.address_input.trim().to_string();
        self.input_mode = InputMode::Normal;
        if address.is_empty() {
            return;
        }
        self.browsing_home = false;
        self.gallery
            .reset_session(address, FilterPolicy::account(&self.filter_keywords));
        self.selected = 0;
        self.view = View::Gallery;
        self.detail = None;
        self.address_input.clear();
    }

    /// Return to the configured wallet's gallery (the `/` route analog).
    pub fn go_home(&mut self) {
        let Some(home) = self.home_wallet.clone() else {
            return;
        };
        if self.browsing_home {
            return;
        }
        self.browsing_home = true;
        self.gallery
            .reset_session(home, FilterPolicy::home(&self.filter_keywords));
        self.selected = 0;
        self.view = View::Gallery;
        self.detail = None;
    }

    fn clamp_selection(&mut self) {
        let len = self.gallery.items().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NftPage;

    fn config() -> Config {
        Config {
            wallet: Some("0xhome".into()),
            api_key: Some("key".into()),
            filter_keywords: vec![],
            api_url: "https://api.opensea.io/api/v2".into(),
            page_size: 50,
            http_timeout_ms: 8000,
        }
    }

    fn nft(name: &str) -> Nft {
        Nft {
            contract: "0xc".into(),
            identifier: name.into(),
            name: Some(name.into()),
            image_url: Some(format!("https://cdn.example.com/{name}.png")),
            ..Default::default()
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(&config());
        let req = app.next_page_fetch(Instant::now()).unwrap();
        app.on_event(AppEvent::PageLoaded {
            generation: req.generation,
            result: Ok(NftPage {
                nfts: vec![nft("a"), nft("b")],
                next: None,
            }),
        });
        app
    }

    #[test]
    fn detail_request_is_one_shot_per_mount() {
        let mut app = loaded_app();
        app.open_detail();
        assert!(app.take_detail_request().is_some());
        // duplicate trigger within the same mount is ignored
        assert!(app.take_detail_request().is_none());

        // remount resets the latch
        app.back_to_gallery();
        app.open_detail();
        assert!(app.take_detail_request().is_some());
    }

    #[test]
    fn detail_request_carries_selected_identity() {
        let mut app = loaded_app();
        app.down(Instant::now());
        app.open_detail();
        let req = app.take_detail_request().unwrap();
        assert_eq!(req.contract, "0xc");
        assert_eq!(req.token_id, "b");
        assert_eq!(req.generation, 1);
    }

    #[test]
    fn stale_detail_response_is_dropped() {
        let mut app = loaded_app();
        app.open_detail();
        let old = app.take_detail_request().unwrap();

        app.back_to_gallery();
        app.open_detail();
        let _new = app.take_detail_request().unwrap();

        app.on_event(AppEvent::DetailLoaded {
            generation: old.generation,
            result: Ok(nft("stale")),
        });
        assert_eq!(app.detail().unwrap().phase, DetailPhase::Loading);
    }

    #[test]
    fn not_found_is_a_distinct_detail_state() {
        let mut app = loaded_app();
        app.open_detail();
        let req = app.take_detail_request().unwrap();
        app.on_event(AppEvent::DetailLoaded {
            generation: req.generation,
            result: Err(GalleryError::NotFound),
        });
        let detail = app.detail().unwrap();
        assert_eq!(detail.phase, DetailPhase::NotFound);
        assert!(detail.error.is_none());
    }

    #[test]
    fn missing_api_key_blocks_all_fetches() {
        let mut cfg = config();
        cfg.api_key = None;
        let mut app = App::new(&cfg);
        assert!(app.next_page_fetch(Instant::now()).is_none());
        assert!(matches!(
            app.display_error(),
            Some(GalleryError::Config(_))
        ));
    }

    #[test]
    fn missing_wallet_reports_config_error_but_allows_address_browse() {
        let mut cfg = config();
        cfg.wallet = None;
        let mut app = App::new(&cfg);
        assert!(app.next_page_fetch(Instant::now()).is_none());
        assert!(matches!(
            app.display_error(),
            Some(GalleryError::Config(_))
        ));

        app.start_address_input();
        for c in "0xother".chars() {
            app.address_add_char(c);
        }
        app.submit_address();
        assert!(app.next_page_fetch(Instant::now()).is_some());
        assert_eq!(app.wallet(), "0xother");
    }

    #[test]
    fn down_at_list_end_arms_load_more() {
        let mut app = App::new(&config());
        let req = app.next_page_fetch(Instant::now()).unwrap();
        app.on_event(AppEvent::PageLoaded {
            generation: req.generation,
            result: Ok(NftPage {
                nfts: vec![nft("a")],
                next: Some("c1".into()),
            }),
        });

        let t0 = Instant::now();
        app.down(t0); // at end, has_more: arms debounce instead of moving
        assert_eq!(app.selected(), 0);
        let fired = app.next_page_fetch(t0 + crate::gallery::LOAD_MORE_DEBOUNCE);
        assert!(fired.is_some());
        assert_eq!(fired.unwrap().cursor.as_deref(), Some("c1"));
    }

    #[test]
    fn address_switch_resets_view_and_selection() {
        let mut app = loaded_app();
        app.down(Instant::now());
        assert_eq!(app.selected(), 1);

        app.start_address_input();
        for c in "0xother".chars() {
            app.address_add_char(c);
        }
        app.submit_address();

        assert_eq!(app.selected(), 0);
        assert!(app.items().is_empty());
        assert!(!app.browsing_home());
        assert_eq!(app.wallet(), "0xother");

        app.go_home();
        assert!(app.browsing_home());
        assert_eq!(app.wallet(), "0xhome");
    }
}
