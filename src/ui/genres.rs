use crate::app::{App, Fetch};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use super::centered_rect;

pub fn render(app: &App, frame: &mut Frame) {
    let area = centered_rect(40, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Filter by Genre ")
        .title_bottom(Line::from(" Enter Apply  Esc Back ").style(Style::default().fg(Color::DarkGray)));

    if let Fetch::Failed(ref e) = app.genres {
        let text = Paragraph::new(Line::from(Span::styled(
            format!(" Genres unavailable: {}", e),
            Style::default().fg(Color::Red),
        )))
        .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = app
        .genre_options()
        .into_iter()
        .map(|option| match option {
            None => ListItem::new(Span::styled("Select a genre", Style::default().fg(Color::DarkGray))),
            Some(title) if title == app.query.selected_genre => {
                ListItem::new(Span::styled(format!("{} ✓", title), Style::default().fg(Color::Magenta)))
            }
            Some(title) => ListItem::new(title.to_string()),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(app.genre_selected));
    frame.render_stateful_widget(list, area, &mut state);
}
