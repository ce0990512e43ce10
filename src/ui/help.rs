use crate::ui::layout::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(keys: &'a str, what: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {keys:<12}"), Style::default().fg(Color::Yellow)),
        Span::raw(what),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("Global"),
        binding("?", "Toggle this help"),
        binding("q", "Quit application"),
        binding("Ctrl+C", "Quit immediately"),
        Line::from(""),
        section("Launch grid"),
        binding("←↑↓→ hjkl", "Move between cards"),
        binding("PgUp/PgDn", "Scroll a page"),
        binding("g/G", "First/last card"),
        binding("Enter", "See more about the card"),
        binding("Click", "See more / select card"),
        binding("Wheel", "Scroll the grid"),
        Line::from(""),
        section("Launch details"),
        binding("Esc/q/Enter", "Close"),
        binding("↑↓ PgUp/PgDn", "Scroll the details"),
        binding("Click", "Close when outside the panel or on ✕"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help — Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
