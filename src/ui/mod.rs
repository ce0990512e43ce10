pub mod detail;
mod help;
pub mod layout;
pub mod list;

use crate::app::App;
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    list::render(app, frame);

    if let Some(overlay) = app.overlay() {
        detail::render(overlay, frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}
