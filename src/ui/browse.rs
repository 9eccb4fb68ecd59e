use crate::app::{App, Fetch, InputMode};
use crate::format::summary_value;
use crate::model::MovieSummary;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use unicode_width::UnicodeWidthStr;

use super::truncate_str;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + controls(3) + notice(1) + list(min) + pager(3) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header = Paragraph::new(" Movie Database")
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
    frame.render_widget(header, chunks[0]);

    // ── Search bar | genre selector ──
    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(chunks[1]);

    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " Search movies (Enter to search, Esc to cancel): "
    } else {
        " Search movies (/): "
    };
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.search_input))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search ")
                .title_bottom(Line::from(" c Clear Search ").alignment(Alignment::Right)),
        );
    frame.render_widget(search_bar, controls[0]);

    if app.input_mode == InputMode::Editing {
        let cursor = search_cursor(controls[0], search_label, &app.search_input);
        frame.set_cursor_position(cursor);
    }

    let genre_text = if app.query.selected_genre.is_empty() {
        Span::styled("Select a genre", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            app.query.selected_genre.as_str(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )
    };
    let mut genre_line = vec![Span::raw(" "), genre_text];
    match &app.genres {
        Fetch::Loading => genre_line.push(Span::styled("  loading…", Style::default().fg(Color::DarkGray))),
        Fetch::Failed(e) => genre_line.push(Span::styled(format!("  ({})", e), Style::default().fg(Color::Red))),
        _ => {}
    }
    let genre_box = Paragraph::new(Line::from(genre_line)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Filter by Genre (g) "),
    );
    frame.render_widget(genre_box, controls[1]);

    // ── Notice line ──
    let notice = match &app.movies {
        Fetch::Loading => Line::from(Span::styled(" Loading data...", Style::default().fg(Color::Yellow))),
        Fetch::Failed(e) => Line::from(Span::styled(
            format!(" Error: {}", e),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Fetch::Loaded(page) if app.query.search_performed && !page.data.is_empty() => Line::from(Span::styled(
            format!(" {} results found", page.data.len()),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )),
        _ => Line::from(""),
    };
    frame.render_widget(Paragraph::new(notice), chunks[2]);

    // ── Result list ──
    let width = chunks[3].width as usize;
    let items: Vec<ListItem> = app
        .visible_movies()
        .iter()
        .map(|movie| ListItem::new(movie_line(movie, width)))
        .collect();

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(if app.query.filter().is_empty() { " Movies " } else { " Results " }),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if !app.visible_movies().is_empty() {
        list_state.select(Some(app.list_selected));
    }
    frame.render_stateful_widget(list_widget, chunks[3], &mut list_state);

    // ── Pagination ──
    if app.movies.loaded().is_some() {
        let pager = Paragraph::new(pager_line(app))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(pager, chunks[4]);
    }

    // ── Status bar ──
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };
    let mut status = vec![
        key(" ↑↓"),
        Span::raw(" Navigate  "),
        key("←→"),
        Span::raw(" Page  "),
        key("Enter"),
        Span::raw(" Detail  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit  "),
        Span::styled(app.status_msg.as_str(), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(Err(ref e)) = app.health {
        status.push(Span::styled(
            format!("  [health: {}]", e),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(status)), chunks[5]);
}

/// Terminal cell just after the typed text, kept inside the search box.
fn search_cursor(area: Rect, label: &str, input: &str) -> (u16, u16) {
    let offset = (label.width() + input.width()).min(u16::MAX as usize) as u16;
    let x = area.x.saturating_add(1).saturating_add(offset);
    (x.min(area.right().saturating_sub(2)), area.y + 1)
}

fn movie_line(movie: &MovieSummary, width: usize) -> Line<'static> {
    let mut spans = Vec::new();
    let title = movie.title.as_deref().unwrap_or("");
    if !title.is_empty() {
        spans.push(Span::styled(
            truncate_str(title, width.saturating_sub(40).max(10)),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }

    let fields = [
        ("Year", summary_value(movie.year.as_ref())),
        ("Genre", summary_value(movie.genre.as_ref())),
        ("Rating", summary_value(movie.rating.as_ref())),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            spans.push(Span::styled(format!("  {}: ", label), Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(value, Style::default().fg(Color::Yellow)));
        }
    }
    Line::from(spans)
}

fn pager_line(app: &App) -> Line<'static> {
    let enabled = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        "← Prev",
        if app.has_prev_page() { enabled } else { disabled },
    )];
    spans.push(Span::raw("   "));
    for page in app.page_buttons() {
        if page == app.query.current_page {
            spans.push(Span::styled(
                format!("[{}]", page),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(format!(" {} ", page), Style::default().fg(Color::White)));
        }
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        "Next →",
        if app.has_next_page() { enabled } else { disabled },
    ));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::search_cursor;
    use super::super::test_support::render_to_string;
    use crate::app::{App, Fetch};
    use crate::model::MoviePage;
    use crate::testing::{FakeCatalog, summary};
    use std::sync::Arc;

    fn app_with_page() -> App {
        let mut app = App::new(Arc::new(FakeCatalog::new()));
        let mut untitled = summary("3", "");
        untitled.title = None;
        untitled.year = None;
        app.movies = Fetch::Loaded(MoviePage {
            data: vec![summary("1", "The Matrix"), summary("2", "Heat"), untitled],
            total_pages: Some(20),
        });
        app.query.current_page = 10;
        app.query.total_pages = 20;
        app
    }

    #[test]
    fn test_renders_movies_and_page_window() {
        let app = app_with_page();
        let screen = render_to_string(&app, 120, 30);
        assert!(screen.contains("Movie Database"));
        assert!(screen.contains("The Matrix"));
        assert!(screen.contains("Year: 1999"));
        assert!(screen.contains("Rating: R"));
        assert!(screen.contains("[10]"));
        assert!(screen.contains(" 6 "));
        assert!(screen.contains(" 14 "));
        assert!(!screen.contains(" 15 "));
        assert!(screen.contains("Select a genre"));
    }

    #[test]
    fn test_results_found_only_after_search() {
        let mut app = app_with_page();
        assert!(!render_to_string(&app, 120, 30).contains("results found"));
        app.query.search_performed = true;
        assert!(render_to_string(&app, 120, 30).contains("3 results found"));
    }

    #[test]
    fn test_error_and_loading_notices() {
        let mut app = app_with_page();
        app.movies = Fetch::Failed("API error: 500 Internal Server Error".to_string());
        let screen = render_to_string(&app, 120, 30);
        assert!(screen.contains("Error: API error: 500 Internal Server Error"));
        assert!(!screen.contains("Next →"));

        app.movies = Fetch::Loading;
        assert!(render_to_string(&app, 120, 30).contains("Loading data..."));
    }

    #[test]
    fn test_search_cursor_counts_display_width() {
        let area = ratatui::layout::Rect::new(0, 3, 80, 3);
        // "映画" is two wide characters, four cells
        assert_eq!(search_cursor(area, " Search: ", "映画"), (1 + 9 + 4, 4));
        assert_eq!(search_cursor(area, " Search: ", "café"), (1 + 9 + 4, 4));
        let narrow = ratatui::layout::Rect::new(0, 3, 12, 3);
        assert_eq!(search_cursor(narrow, " Search: ", "long query"), (10, 4));
    }
}
