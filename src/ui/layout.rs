//! Screen geometry shared by the renderers and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Rows taken by one card including its border.
pub const CARD_HEIGHT: u16 = 7;

/// Header(3) + grid(min) + status(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
}

pub fn screen(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    ScreenLayout {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

/// Area available to cards: the body minus its border.
pub fn grid_area(area: Rect) -> Rect {
    let body = screen(area).body;
    Rect {
        x: body.x.saturating_add(1),
        y: body.y.saturating_add(1),
        width: body.width.saturating_sub(2),
        height: body.height.saturating_sub(2),
    }
}

/// One column on narrow terminals, two on medium, three on wide.
pub fn columns_for(width: u16) -> usize {
    if width < 60 {
        1
    } else if width < 100 {
        2
    } else {
        3
    }
}

/// Number of card rows that fit in the grid, never zero.
pub fn visible_rows(grid: Rect) -> usize {
    usize::from(grid.height / CARD_HEIGHT).max(1)
}

/// Placement of one card on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSlot {
    /// Index into the collection.
    pub index: usize,
    pub area: Rect,
    /// The "See more" control row.
    pub button: Rect,
}

/// Lay out the cards visible when the grid is scrolled to `first_row`.
pub fn card_slots(grid: Rect, count: usize, first_row: usize) -> Vec<CardSlot> {
    let columns = columns_for(grid.width);
    let rows = visible_rows(grid);
    let col_width = grid.width / columns as u16;
    let first = first_row.saturating_mul(columns);

    (first..count)
        .take(rows * columns)
        .map(|index| {
            let offset = index - first;
            let col = (offset % columns) as u16;
            let row = (offset / columns) as u16;
            let width = if usize::from(col) + 1 == columns {
                grid.width - col_width * col
            } else {
                col_width
            };
            let area = Rect {
                x: grid.x + col * col_width,
                y: grid.y + row * CARD_HEIGHT,
                width,
                height: CARD_HEIGHT,
            }
            .intersection(grid);
            let button = Rect {
                x: area.x.saturating_add(1),
                y: area.y.saturating_add(CARD_HEIGHT - 2),
                width: area.width.saturating_sub(2),
                height: 1,
            }
            .intersection(area);
            CardSlot {
                index,
                area,
                button,
            }
        })
        .collect()
}

/// Create a centered rectangle using percentage of parent area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub const CLOSE_ICON: &str = "[ ✕ ]";
const CLOSE_ICON_WIDTH: u16 = 5;

/// Where a click landed relative to the detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    Close,
    Inside,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayout {
    pub content: Rect,
    /// Text area inside the border, above the close button.
    pub body: Rect,
    /// The icon on the top border.
    pub close_icon: Rect,
    /// The full-width button on the bottom row.
    pub close_button: Rect,
}

pub fn overlay(area: Rect) -> OverlayLayout {
    let content = centered_rect(70, 80, area);
    let inner_width = content.width.saturating_sub(2);
    let close_icon = Rect {
        x: content.right().saturating_sub(CLOSE_ICON_WIDTH + 2),
        y: content.y,
        width: CLOSE_ICON_WIDTH.min(content.width),
        height: 1,
    }
    .intersection(content);
    let close_button = Rect {
        x: content.x.saturating_add(1),
        y: content.bottom().saturating_sub(2),
        width: inner_width,
        height: 1,
    }
    .intersection(content);
    let body = Rect {
        x: content.x.saturating_add(1),
        y: content.y.saturating_add(1),
        width: inner_width,
        height: content.height.saturating_sub(4),
    };
    OverlayLayout {
        content,
        body,
        close_icon,
        close_button,
    }
}

impl OverlayLayout {
    pub fn hit(&self, column: u16, row: u16) -> OverlayHit {
        let pos = Position::new(column, row);
        if self.close_icon.contains(pos) || self.close_button.contains(pos) {
            OverlayHit::Close
        } else if self.content.contains(pos) {
            OverlayHit::Inside
        } else {
            OverlayHit::Outside
        }
    }
}
