use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::File,
    io,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use seaview::app::DetailRequest;
use seaview::{App, AppEvent, FetchRequest, InputMode, NftApi, OpenSeaClient, PageCache, View};

const FRAME_BUDGET: Duration = Duration::from_millis(33); // ~30 fps

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    dotenvy::dotenv().ok();
    init_logging();

    let cfg = seaview::config::load().context("Failed to load configuration")?;

    let api: Arc<dyn NftApi> = Arc::new(OpenSeaClient::new(
        cfg.api_url.clone(),
        cfg.api_key.clone().unwrap_or_default(),
        cfg.http_timeout_ms,
    ));
    let cache = Arc::new(Mutex::new(PageCache::new()));

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // app + event channel
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let mut app = App::new(&cfg);

    let result = run_loop(&mut app, &mut terminal, rx, tx, api, cache).await;

    // cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

/// The TUI owns the terminal, so logs go to a file instead of stderr.
fn init_logging() {
    let path = std::env::var("SEAVIEW_LOG").unwrap_or_else(|_| "./seaview.log".to_string());
    if let Ok(file) = File::create(&path) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
    tx: UnboundedSender<AppEvent>,
    api: Arc<dyn NftApi>,
    cache: Arc<Mutex<PageCache>>,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        let wait = FRAME_BUDGET.saturating_sub(last_frame.elapsed());

        // input events
        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k);
                }
            }
        }

        // fetch completions
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        // pump the controller: issue at most one page request and one detail
        // request per frame (the controller enforces sequencing anyway)
        let now = Instant::now();
        if let Some(req) = app.next_page_fetch(now) {
            spawn_page_fetch(req, api.clone(), cache.clone(), tx.clone());
        }
        if let Some(req) = app.take_detail_request() {
            spawn_detail_fetch(req, api.clone(), tx.clone());
        }

        if last_frame.elapsed() >= FRAME_BUDGET {
            terminal.draw(|f| seaview::ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

/// Serve a page from the cache when fresh, else hit the upstream and memoize
/// the result. Either way the outcome flows back as an `AppEvent` tagged with
/// the request's generation.
fn spawn_page_fetch(
    req: FetchRequest,
    api: Arc<dyn NftApi>,
    cache: Arc<Mutex<PageCache>>,
    tx: UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let key = PageCache::key(&req.wallet, req.cursor.as_deref());

        if let Some(page) = cache.lock().ok().and_then(|mut c| c.get(&key)) {
            log::debug!("[main] cache hit for {key}");
            let _ = tx.send(AppEvent::PageLoaded {
                generation: req.generation,
                result: Ok(page),
            });
            return;
        }

        let result = api
            .fetch_page(&req.wallet, req.cursor.as_deref(), req.limit)
            .await;
        if let Ok(page) = &result {
            if let Ok(mut c) = cache.lock() {
                c.put(key, page.clone());
            }
        }
        let _ = tx.send(AppEvent::PageLoaded {
            generation: req.generation,
            result,
        });
    });
}

fn spawn_detail_fetch(req: DetailRequest, api: Arc<dyn NftApi>, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = api.fetch_detail(&req.contract, &req.token_id).await;
        let _ = tx.send(AppEvent::DetailLoaded {
            generation: req.generation,
            result,
        });
    });
}

fn handle_key(app: &mut App, k: KeyEvent) {
    // Address entry mode captures everything
    if app.input_mode() == InputMode::Address {
        match k.code {
            KeyCode::Char(c) => app.address_add_char(c),
            KeyCode::Backspace => app.address_backspace(),
            KeyCode::Enter => app.submit_address(),
            KeyCode::Esc => app.cancel_address_input(),
            _ => {}
        }
        return;
    }

    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.on_event(AppEvent::Quit);
        }
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.down(Instant::now()),
        (KeyCode::Enter, _) => {
            if app.view() == View::Gallery {
                app.open_detail();
            }
        }
        (KeyCode::Esc, _) | (KeyCode::Backspace, _) => {
            if app.view() == View::Detail {
                app.back_to_gallery();
            }
        }
        (KeyCode::Char('l'), _) => {
            if app.view() == View::Gallery {
                app.load_more(Instant::now());
            }
        }
        (KeyCode::Char('a'), _) | (KeyCode::Char('/'), _) => {
            if app.view() == View::Gallery {
                app.start_address_input();
            }
        }
        (KeyCode::Char('h'), _) => app.go_home(),
        _ => {}
    }
}
