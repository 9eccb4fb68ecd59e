use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("q", "Quit application"),
            ("Ctrl+C", "Quit from anywhere"),
        ],
    ),
    (
        "Movie List",
        &[
            ("↑/k ↓/j", "Move selection"),
            ("←/h →/l", "Previous / next page"),
            ("[ ]", "First / last page"),
            ("/", "Edit search (Enter to search)"),
            ("g", "Filter by genre"),
            ("c", "Clear search and reconnect"),
            ("Enter", "Open movie detail"),
        ],
    ),
    (
        "Genre Picker",
        &[("↑/↓", "Choose genre"), ("Enter", "Apply"), ("Esc", "Back")],
    ),
    (
        "Movie Detail",
        &[("↑/↓", "Scroll fields"), ("Esc/q", "Close")],
    ),
];

pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut help_text = vec![Line::from("")];
    for (title, bindings) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            format!("  {}", title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for (keys, action) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {:<10}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
