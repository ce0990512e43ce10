use crate::app::App;
use crate::launch::{CardKey, LaunchRecord};
use crate::state::Phase;
use crate::ui::layout::{self, CardSlot};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::sync::Arc;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const TITLE: &str = "SpaceX Launches 2020";
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// What one card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView<'a> {
    pub key: CardKey,
    pub image: &'a str,
    pub title: &'a str,
    pub subtitle: &'a str,
}

impl<'a> CardView<'a> {
    pub fn new(launch: &'a LaunchRecord) -> Self {
        Self {
            key: launch.card_key(),
            image: launch.patch_small_url(),
            title: &launch.mission_name,
            subtitle: &launch.rocket.rocket_name,
        }
    }
}

/// One view per record, in collection order.
pub fn card_views(collection: &[Arc<LaunchRecord>]) -> Vec<CardView<'_>> {
    collection.iter().map(|l| CardView::new(l)).collect()
}

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let screen = layout::screen(area);

    // ── Header ──
    let header_text = match app.state().phase() {
        Phase::Ready => format!(" {}   [{} launches]", TITLE, app.state().collection().len()),
        _ => format!(" {}", TITLE),
    };
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, screen.header);

    // ── Body ──
    let body_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Launches ");
    let inner = layout::grid_area(area);
    frame.render_widget(body_block, screen.body);

    match app.state().phase() {
        Phase::Loading => {
            let spinner = SPINNER[app.spinner_frame() % SPINNER.len()];
            render_centered(
                frame,
                inner,
                Line::from(Span::styled(
                    format!("{spinner} Loading launches…"),
                    Style::default().fg(Color::Cyan),
                )),
            );
        }
        Phase::Error(message) => {
            render_centered(
                frame,
                inner,
                Line::from(Span::styled(
                    format!("Error: {message}"),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
            );
        }
        Phase::Ready => {
            let collection = app.state().collection();
            if collection.is_empty() {
                render_centered(
                    frame,
                    inner,
                    Line::from(Span::styled(
                        "No launches found",
                        Style::default().fg(Color::DarkGray),
                    )),
                );
            }
            let views = card_views(collection);
            // The card behind an open overlay stays highlighted with the cursor.
            let selected = app.state().selected().map(|r| r.card_key());
            let slots = layout::card_slots(inner, views.len(), app.first_row());
            for slot in slots {
                let card = &views[slot.index];
                let highlighted =
                    slot.index == app.cursor() || selected == Some(card.key);
                render_card(frame, card, slot, highlighted);
            }
        }
    }

    // ── Status bar ──
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ←↑↓→", key_style),
        Span::raw(" Move  "),
        Span::styled("Enter", key_style),
        Span::raw(" See more  "),
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), screen.status);
}

/// Draw `line` wrapped to `area`'s width and vertically centered in it.
fn render_centered(frame: &mut Frame, area: Rect, line: Line) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let wrapped = u16::try_from(line.width().div_ceil(usize::from(area.width)))
        .unwrap_or(u16::MAX)
        .clamp(1, area.height);
    let top = (area.height - wrapped) / 2;
    let text = Rect {
        y: area.y + top,
        height: area.height - top,
        ..area
    };
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        text,
    );
}

fn render_card(frame: &mut Frame, card: &CardView, slot: CardSlot, highlighted: bool) {
    let border = if highlighted {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(slot.area);
    frame.render_widget(block, slot.area);

    let width = usize::from(inner.width);
    let lines = vec![
        Line::from(vec![
            Span::styled("▣ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                truncate_str(card.image, width.saturating_sub(2)),
                Style::default().fg(Color::Blue),
            ),
        ]),
        Line::from(Span::styled(
            truncate_str(card.title, width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_str(card.subtitle, width),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    let button_style = if highlighted {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };
    frame.render_widget(
        Paragraph::new("[ See more ]")
            .alignment(Alignment::Center)
            .style(button_style),
        slot.button,
    );
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    if max_width > 0 {
        result.push('…');
    }
    result
}
