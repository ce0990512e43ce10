use crate::launch::LaunchRecord;
use crate::scroll::{ScrollGate, ScrollLock};
use crate::ui::layout::{self, CLOSE_ICON};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::sync::Arc;

/// A mounted detail overlay. Holds the scroll lock for its whole lifetime.
///
/// The page underneath stays put while it is open; only the overlay's own
/// text scrolls, via `offset`.
#[derive(Debug)]
pub struct DetailOverlay {
    record: Arc<LaunchRecord>,
    offset: u16,
    _lock: ScrollLock,
}

impl DetailOverlay {
    pub fn mount(record: Arc<LaunchRecord>, gate: &ScrollGate) -> Self {
        let lock = gate.lock();
        tracing::debug!(previous = ?lock.previous(), "page scroll locked for overlay");
        Self {
            record,
            offset: 0,
            _lock: lock,
        }
    }

    pub fn record(&self) -> &Arc<LaunchRecord> {
        &self.record
    }

    /// First body row shown.
    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Move the body by `delta` rows, stopping at the first and last line.
    pub fn scroll_by(&mut self, delta: i16) {
        let last = last_line(&body_lines(&self.record));
        self.offset = self.offset.saturating_add_signed(delta).min(last);
    }
}

fn label(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))
}

fn value(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

fn body_lines(launch: &LaunchRecord) -> Vec<Line<'_>> {
    // Required content first so it survives short terminals.
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" ▣ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                launch.patch_url(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::from(""),
        label("Mission name:"),
        value(&launch.mission_name),
        Line::from(""),
        label("Rocket name:"),
        value(&launch.rocket.rocket_name),
        Line::from(""),
        label("Details:"),
        value(launch.details_text()),
    ];

    let launch_date = launch
        .launch_date()
        .map(|d| d.format("%B %-d, %Y %H:%M UTC").to_string())
        .or_else(|| Some(launch.launch_date_utc.clone()).filter(|s| !s.is_empty()));
    if let Some(date) = launch_date {
        lines.push(Line::from(""));
        lines.push(label("Launch date:"));
        lines.push(Line::from(Span::styled(date, Style::default().fg(Color::Gray))));
    }
    if !launch.launch_site.site_name_long.is_empty() {
        lines.push(Line::from(""));
        lines.push(label("Launch site:"));
        lines.push(value(&launch.launch_site.site_name_long));
    }

    lines
}

fn last_line(lines: &[Line]) -> u16 {
    u16::try_from(lines.len().saturating_sub(1)).unwrap_or(u16::MAX)
}

pub fn render(overlay: &DetailOverlay, frame: &mut Frame) {
    let launch = overlay.record();
    let area = layout::overlay(frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area.content);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(Span::styled(
            format!(" {} ", launch.mission_name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )))
        .title_top(
            Line::from(vec![
                Span::styled("Close modal ", Style::default().fg(Color::DarkGray)),
                Span::styled(CLOSE_ICON, Style::default().fg(Color::Red)),
                Span::raw(" "),
            ])
            .alignment(Alignment::Right),
        );
    frame.render_widget(block, area.content);

    let lines = body_lines(launch);
    let offset = overlay.offset().min(last_line(&lines));
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    frame.render_widget(body, area.body);

    let close = Paragraph::new("[ Close ]")
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(close, area.close_button);
}
