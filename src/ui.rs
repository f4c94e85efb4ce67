//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, LineGauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Focus, TrackMarker};
use crate::audio::{Player, PlayerState, TransportStatus, format_elapsed};
use crate::catalog::{Release, Track};
use crate::config::{ControlsSettings, UiSettings};
use crate::i18n::Strings;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("tab".to_string(), "switch pane".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("n/N".to_string(), "next/prev track".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "seek".to_string());
    map.insert("m".to_string(), "mute".to_string());
    map.insert("t".to_string(), "language".to_string());
    map.insert("K".to_string(), "release info".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "tab", "enter", "space/p", "n/N", "H/L", "0-9", "m", "t", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

/// Track title for the transport bar, suffixed with the loading or error label.
fn transport_title(track: &Track, status: &TransportStatus, strings: &Strings) -> String {
    if status.has_error {
        format!("{} ({})", track.title, strings.error)
    } else if status.is_loading {
        format!("{} ({})", track.title, strings.loading)
    } else {
        track.title.clone()
    }
}

fn state_glyph(state: PlayerState) -> &'static str {
    match state {
        PlayerState::Playing => "▶",
        PlayerState::Loading => "…",
        PlayerState::Errored => "!",
        PlayerState::Paused | PlayerState::Idle => "⏸",
    }
}

fn release_item<'a>(app: &App, release: &'a Release, strings: &Strings) -> ListItem<'a> {
    let glyph = if release.is_upcoming {
        " "
    } else if app.release_is_playing(&release.id) {
        "⏸"
    } else {
        "▶"
    };
    let mut spans = vec![
        Span::raw(format!("{glyph} ")),
        Span::raw(release.title.as_str()).bold(),
        Span::raw(format!("  {} · {}", release.kind.label(), release.year)),
    ];
    if release.is_upcoming {
        spans.push(Span::raw(format!("  [{}]", strings.upcoming)).italic());
    }
    ListItem::new(Line::from(spans))
}

fn track_item<'a>(app: &App, release: &Release, index: usize, track: &'a Track) -> ListItem<'a> {
    let marker = app.track_marker(&release.id, &track.id);
    let glyph = match marker {
        TrackMarker::Sounding => "♪",
        TrackMarker::Current => "•",
        TrackMarker::None => " ",
    };
    let title = Span::raw(track.title.as_str());
    let title = if marker == TrackMarker::None {
        title
    } else {
        title.bold()
    };
    ListItem::new(Line::from(vec![
        Span::raw(format!("{glyph} {:>2}. ", index + 1)),
        title,
        Span::raw(format!("  {}", track.duration)).dim(),
    ]))
}

fn draw_lists(frame: &mut Frame, app: &App, area: Rect, strings: &Strings) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let releases: Vec<ListItem> = app
        .catalog
        .releases()
        .iter()
        .map(|r| release_item(app, r, strings))
        .collect();
    let releases_list = List::new(releases)
        .block(pane_block(
            format!(" {} ", strings.discography),
            app.focus == Focus::Releases,
        ))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !app.catalog.is_empty() {
        state.select(Some(app.release_cursor));
    }
    frame.render_stateful_widget(releases_list, panes[0], &mut state);

    let (title, tracks): (String, Vec<ListItem>) = match app.selected_release() {
        Some(release) if release.tracks.is_empty() => (
            format!(" {} ", release.title),
            vec![ListItem::new(format!("  {}", strings.upcoming)).italic()],
        ),
        Some(release) => (
            format!(" {} · {} ", strings.tracklist, release.title),
            release
                .tracks
                .iter()
                .enumerate()
                .map(|(i, t)| track_item(app, release, i, t))
                .collect(),
        ),
        None => (format!(" {} ", strings.tracklist), Vec::new()),
    };
    let has_tracks = app
        .selected_release()
        .is_some_and(|r| !r.tracks.is_empty());
    let tracks_list = List::new(tracks)
        .block(pane_block(title, app.focus == Focus::Tracks))
        .highlight_style(if app.focus == Focus::Tracks {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        })
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if has_tracks {
        state.select(Some(app.track_cursor));
    }
    frame.render_stateful_widget(tracks_list, panes[1], &mut state);
}

fn draw_transport(
    frame: &mut Frame,
    track: &Track,
    player: &Player,
    area: Rect,
    ui_settings: &UiSettings,
    strings: &Strings,
) {
    let status = player.status();
    // The catalog label stands in until the media reports its own length.
    let total = player
        .duration()
        .map_or_else(|| track.duration.clone(), format_elapsed);

    let mut info = vec![
        Span::raw(format!("{} ", state_glyph(status.state))),
        Span::raw(transport_title(track, &status, strings)).bold(),
        Span::raw(format!("  {} // {}", ui_settings.artist_name, track.duration)),
    ];
    if status.is_muted {
        info.push(Span::raw(format!("  [{}]", strings.muted)).italic());
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(Block::default().borders(Borders::ALL).inner(area));

    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(" now playing "),
        area,
    );
    frame.render_widget(Paragraph::new(Line::from(info)), rows[0]);

    let gauge = LineGauge::default()
        .filled_symbol(symbols::line::THICK_HORIZONTAL)
        .ratio((status.progress_percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{} / {}", status.elapsed_label, total));
    frame.render_widget(gauge, rows[1]);
}

fn draw_details(frame: &mut Frame, app: &App, area: Rect, strings: &Strings) {
    let popup_area = centered_rect_sized(72, 14, area);
    frame.render_widget(Clear, popup_area);

    let text = match app.selected_release() {
        Some(release) => {
            let mut lines = vec![
                format!("{} · {}", release.kind.label(), release.year),
                String::new(),
                release.description.get(app.lang).to_string(),
                String::new(),
            ];
            if release.is_upcoming {
                lines.push(format!("[{}]", strings.upcoming));
            }
            if !release.cover_url.is_empty() {
                lines.push(format!("cover: {}", release.cover_url));
            }
            let links = release.links.entries();
            if links.is_empty() {
                lines.push(strings.no_links.to_string());
            } else {
                lines.push(format!("{}:", strings.links));
                lines.extend(links.iter().map(|(name, url)| format!("  {name}: {url}")));
            }
            lines.join("\n")
        }
        None => strings.nothing_selected.to_string(),
    };
    let title = app
        .selected_release()
        .map_or_else(|| " info ".to_string(), |r| format!(" {} (K closes) ", r.title));

    let details = Paragraph::new(text)
        .block(
            Block::default()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .borders(Borders::ALL)
                .title(title),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(details, popup_area);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    player: &Player,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let strings = app.lang.strings();
    let current = app.session.current_track();

    // The transport bar only exists once something has been selected.
    let transport_height = if current.is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(transport_height),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", ui_settings.artist_name))
                .title_alignment(Alignment::Center)
                .title_bottom(Line::from(format!(" {} ", app.lang.code())).right_aligned()),
        );
    frame.render_widget(header, chunks[0]);

    draw_lists(frame, app, chunks[1], strings);

    if let Some(track) = current {
        draw_transport(frame, track, player, chunks[2], ui_settings, strings);
    }

    // Overlay release details (keeps lists visible under it)
    if app.details_window {
        draw_details(frame, app, chunks[1], strings);
    }

    let footer_text = controls_text(controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests;
