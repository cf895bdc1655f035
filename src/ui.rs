use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, DetailPhase, InputMode, View};
use crate::gallery::Phase;
use crate::media::MediaKind;
use crate::models::Nft;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    header(f, chunks[0], app);
    match app.view() {
        View::Gallery => gallery_body(f, chunks[1], app),
        View::Detail => detail_body(f, chunks[1], app),
    }
    footer(f, chunks[2], app);

    if app.input_mode() == InputMode::Address {
        draw_address_overlay(f, app);
    }
}

// ===============================
// Header / Footer
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.browsing_home() {
        "Curated NFT Collection".to_string()
    } else {
        format!("NFTs for {}", short_address(app.wallet()))
    };

    let mut spans = vec![Span::styled(
        format!(" seaview · {title}"),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if app.total() > 0 {
        spans.push(Span::styled(
            format!("  ·  Total NFTs: {}", app.total()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn footer(f: &mut Frame, area: Rect, app: &App) {
    let status = if let Some(err) = app.display_error() {
        Span::styled(format!(" {err} "), Style::default().fg(Color::Red))
    } else {
        match app.phase() {
            Phase::LoadingInitial => {
                Span::styled(" Loading NFTs... ", Style::default().fg(Color::Yellow))
            }
            Phase::LoadingMore => {
                Span::styled(" Loading more... ", Style::default().fg(Color::Yellow))
            }
            Phase::Ready if app.items().is_empty() => {
                Span::styled(" No NFTs found ", Style::default().fg(Color::DarkGray))
            }
            Phase::Ready if !app.has_more() => Span::styled(
                " No more NFTs to load ",
                Style::default().fg(Color::DarkGray),
            ),
            _ => Span::raw(" "),
        }
    };

    let keys = match app.view() {
        View::Gallery => "↑/↓ browse · Enter detail · l load more · a address · h home · q quit",
        View::Detail => "Esc back to gallery · q quit",
    };

    let line = Line::from(vec![
        status,
        Span::styled(
            format!("  {keys}"),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

// ===============================
// Gallery view
// ===============================
fn gallery_body(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let items: Vec<ListItem> = app
        .items()
        .iter()
        .map(|nft| {
            let kind = MediaKind::classify(nft);
            let mut spans = vec![
                Span::styled(
                    format!("[{}] ", kind.label()),
                    Style::default().fg(match kind {
                        MediaKind::Video => Color::Magenta,
                        MediaKind::Image => Color::Cyan,
                    }),
                ),
                Span::raw(nft.display_name().to_string()),
            ];
            if let Some(collection) = nft.collection_label() {
                spans.push(Span::styled(
                    format!("  · {collection}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Gallery ({}) ", app.items().len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    // ListState is rebuilt per frame; selection lives in App
    let mut state = ListState::default();
    if !app.items().is_empty() {
        state.select(Some(app.selected()));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    let summary = match app.selected_nft() {
        Some(nft) => summary_lines(nft),
        None => vec![Line::from(Span::styled(
            "Nothing selected",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let pane = Paragraph::new(summary)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Selected "));
    f.render_widget(pane, chunks[1]);
}

fn summary_lines(nft: &Nft) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        nft.display_name().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(collection) = nft.collection_label() {
        lines.push(Line::from(Span::styled(
            collection,
            Style::default().fg(Color::DarkGray),
        )));
    }
    if !nft.contract.is_empty() {
        lines.push(Line::from(format!(
            "Contract: {}",
            short_address(&nft.contract)
        )));
    }
    if let Some(url) = &nft.image_url {
        lines.push(Line::from(Span::styled(
            url.clone(),
            Style::default().fg(Color::Blue),
        )));
    }
    lines
}

// ===============================
// Detail view
// ===============================
fn detail_body(f: &mut Frame, area: Rect, app: &App) {
    let Some(detail) = app.detail() else {
        return;
    };

    let lines: Vec<Line> = match detail.phase {
        DetailPhase::Loading => vec![Line::from(Span::styled(
            "Loading NFT details...",
            Style::default().fg(Color::Yellow),
        ))],
        DetailPhase::NotFound => vec![
            Line::from(Span::styled(
                "NFT not found",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from("Press Esc to go back to the gallery"),
        ],
        DetailPhase::Failed => {
            let message = detail
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Failed to fetch NFT details".to_string());
            vec![
                Line::from(Span::styled(message, Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from("Press Esc to go back to the gallery"),
            ]
        }
        DetailPhase::Ready => match &detail.nft {
            Some(nft) => detail_lines(nft),
            None => vec![Line::from("(empty record)")],
        },
    };

    let pane = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" NFT Detail "));
    f.render_widget(pane, area);
}

fn detail_lines(nft: &Nft) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            nft.display_name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(description) = &nft.description {
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for paragraph in description.lines() {
            lines.push(Line::from(paragraph.to_string()));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Details",
        Style::default().add_modifier(Modifier::UNDERLINED),
    )));
    if let Some(collection) = nft.collection_label() {
        lines.push(Line::from(format!("Collection:     {collection}")));
    }
    lines.push(Line::from(format!("Token ID:       {}", nft.identifier)));
    lines.push(Line::from(format!("Contract:       {}", nft.contract)));
    if let Some(standard) = &nft.token_standard {
        lines.push(Line::from(format!("Token Standard: {standard}")));
    }
    lines.push(Line::from(format!(
        "Media:          {}",
        MediaKind::classify(nft).label()
    )));
    if let Some(url) = &nft.image_url {
        lines.push(Line::from(vec![
            Span::raw("Asset URL:      "),
            Span::styled(url.clone(), Style::default().fg(Color::Blue)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("View on OpenSea: "),
        Span::styled(
            format!(
                "https://opensea.io/assets/ethereum/{}/{}",
                nft.contract, nft.identifier
            ),
            Style::default().fg(Color::Blue),
        ),
    ]));
    lines
}

// ===============================
// Address entry overlay
// ===============================
fn draw_address_overlay(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 3, f.area());
    f.render_widget(Clear, area);
    let input = Paragraph::new(app.address_input().to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Wallet address (Enter to browse, Esc to cancel) "),
    );
    f.render_widget(input, area);
}

fn centered_rect(width_pct: u16, height: u16, area: Rect) -> Rect {
    // widen before multiplying: width * pct can exceed u16 on wide terminals
    let width = (area.width as u32 * width_pct as u32 / 100) as u16;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}

/// `0x12345678...abcd` style shortening for wallet/contract addresses.
/// Counts chars, not bytes: the address is user-entered and may hold
/// multibyte input.
pub fn short_address(address: &str) -> String {
    let count = address.chars().count();
    if count <= 12 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(count - 4).collect();
    format!("{head}...{tail}")
}
