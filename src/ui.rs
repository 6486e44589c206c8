//! UI rendering helpers for the terminal user interface.
//!
//! The screen is a static trip card with the relaxation mini-player docked
//! under it, separated by a one-line calm-mode banner. The player is either
//! a one-line capsule or an expanded panel; `m` overlays the full player as a
//! modal.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::{Settings, TripSettings};

const CONTROLS: [(&str, &str); 10] = [
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("H/L", "seek"),
    ("1-9", "track"),
    ("r", "repeat"),
    ("s", "shuffle"),
    ("e", "expand"),
    ("m", "player"),
    ("esc", "close"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| {
            if *k == "H/L" {
                format!("[H/L] seek -/+{seek_seconds}s")
            } else {
                format!("[{k}] {v}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    // The minimum size can exceed a tiny terminal.
    Rect {
        x,
        y,
        width,
        height,
    }
    .intersection(r)
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        })
}

fn trip_lines(trip: &TripSettings) -> Vec<Line<'_>> {
    vec![
        Line::from(vec![
            Span::from(trip.driver.as_str()).bold(),
            Span::from(format!("  ★ {:.1}", trip.rating)),
        ]),
        Line::from(format!("{} • {}", trip.car, trip.plate)),
        Line::from(""),
        Line::from(vec![Span::from("From  ").dim(), Span::from(trip.pickup.as_str())]),
        Line::from(vec![
            Span::from("To    ").dim(),
            Span::from(trip.destination.as_str()),
        ]),
        Line::from(vec![
            Span::from("ETA   ").dim(),
            Span::from(trip.eta.as_str()),
            Span::from("   Price ").dim(),
            Span::from(trip.price.as_str()),
        ]),
        Line::from(vec![Span::from("Status ").dim(), Span::from(trip.status.as_str())]),
    ]
}

fn calm_banner() -> Line<'static> {
    Line::from(vec![
        Span::from(" Calm mode").bold(),
        Span::from(" · A pause on the move ").dim(),
        Span::from("› [m]").dim(),
    ])
}

/// One chip per track, the selected one highlighted.
fn track_chips(app: &App) -> Line<'_> {
    let selected = app.selected_index();
    let mut spans = Vec::new();
    for (i, t) in app.tracks().iter().enumerate() {
        if i > 0 {
            spans.push(Span::from("  "));
        }
        let label = format!(" {} {} ", i + 1, t.subtitle);
        if i == selected {
            spans.push(Span::styled(
                label,
                Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
            ));
        } else {
            spans.push(Span::from(label));
        }
    }
    Line::from(spans)
}

fn mode_flags(app: &App) -> String {
    let s = app.state();
    format!(
        "Repeat: {} • Shuffle: {} • {}",
        if s.is_repeat { "ON" } else { "OFF" },
        if s.is_shuffle { "ON" } else { "OFF" },
        app.readiness_label()
    )
}

fn play_glyph(app: &App) -> &'static str {
    if app.state().is_playing { "⏸" } else { "▶" }
}

fn draw_capsule(frame: &mut Frame, app: &App, settings: &Settings, area: Rect) {
    let (title, subtitle) = app.capsule_labels(&settings.ui);
    let line = Line::from(vec![
        Span::from(format!(" {} ", play_glyph(app))).bold(),
        Span::from(title).bold(),
        Span::from(" · "),
        Span::from(subtitle).dim(),
    ]);
    let p = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(settings.ui.header_text.as_str()),
    );
    frame.render_widget(p, area);
}

/// Track info, chips, progress and flags. Shared by the expanded panel and the modal.
fn draw_player(frame: &mut Frame, app: &App, area: Rect, title: &str) {
    let block = padded(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let track = app.current_track();
    let heading = Line::from(vec![
        Span::from(format!("{} ", play_glyph(app))).bold(),
        Span::from(track.display_name.as_str()).bold(),
        Span::from(" · "),
        Span::from(track.subtitle.as_str()).dim(),
    ]);
    frame.render_widget(Paragraph::new(heading), rows[0]);
    frame.render_widget(Paragraph::new(track_chips(app)), rows[1]);

    let progress = app.progress();
    let gauge = Gauge::default()
        .ratio(progress.fraction)
        .label(format!("{} / {}", progress.elapsed, progress.total));
    frame.render_widget(gauge, rows[2]);

    let times = Line::from(vec![
        Span::from(progress.elapsed.clone()),
        Span::from("  "),
        Span::from(progress.remaining.clone()).dim(),
    ]);
    frame.render_widget(Paragraph::new(times), rows[3]);
    frame.render_widget(Paragraph::new(mode_flags(app)), rows[4]);

    if let Some(status) = app.status.as_deref() {
        frame.render_widget(Paragraph::new(status).red(), rows[5]);
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, settings: &Settings) {
    let player_height = if app.state().is_expanded_view { 9 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(player_height),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let trip = Paragraph::new(trip_lines(&settings.trip))
        .block(padded(" Your ride "))
        .wrap(Wrap { trim: true });
    frame.render_widget(trip, chunks[0]);
    frame.render_widget(Paragraph::new(calm_banner()), chunks[1]);

    let safety = Paragraph::new("Share your trip or call for help at any time")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Trip Safety "));
    frame.render_widget(safety, chunks[2]);

    if app.state().is_expanded_view {
        draw_player(frame, app, chunks[3], settings.ui.header_text.as_str());
    } else {
        draw_capsule(frame, app, settings, chunks[3]);
    }

    let footer = Paragraph::new(controls_text(settings.controls.seek_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    // Modal goes last so it covers everything under it.
    if app.modal_open {
        let popup_area = centered_rect_sized(64, 11, frame.area());
        frame.render_widget(Clear, popup_area);
        draw_player(frame, app, popup_area, " Relax during the ride (m closes) ");
    }
}

#[cfg(test)]
mod tests;
