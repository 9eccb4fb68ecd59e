use crate::app::{DetailOverlay, Fetch};
use crate::format::detail_fields;
use crate::poster::{FALLBACK_POSTER, PosterState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{centered_rect, truncate_str};

pub fn render(overlay: &DetailOverlay, frame: &mut Frame) {
    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Movie Detail ")
        .title_bottom(Line::from(" ↑↓ Scroll  Esc Close ").style(Style::default().fg(Color::DarkGray)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let detail = match &overlay.detail {
        Fetch::Loaded(d) => d,
        Fetch::Failed(e) => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Could not load this movie",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(e.as_str(), Style::default().fg(Color::Red))),
            ];
            frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
            return;
        }
        Fetch::Loading | Fetch::Idle => {
            frame.render_widget(Paragraph::new("Loading...").alignment(Alignment::Center), inner);
            return;
        }
    };

    // Poster (left) | fields (right)
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(inner);

    render_poster(&overlay.poster, frame, columns[0]);

    let mut lines = vec![
        Line::from(Span::styled(
            detail.title().unwrap_or("").to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for field in detail_fields(detail) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", field.label),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(field.value),
        ]));
    }

    let fields = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((overlay.scroll, 0))
        .block(Block::default().borders(Borders::LEFT).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(fields, columns[1]);
}

fn render_poster(poster: &PosterState, frame: &mut Frame, area: Rect) {
    let (lines, caption): (Vec<Line>, String) = match poster {
        PosterState::Missing | PosterState::Failed(_) => (
            FALLBACK_POSTER.lines().map(Line::from).collect(),
            "No poster available".to_string(),
        ),
        PosterState::Checking(url) => (
            vec![Line::from(""), Line::from("Loading poster...")],
            truncate_str(url.as_str(), area.width.saturating_sub(2) as usize),
        ),
        PosterState::Available(url) => (
            vec![Line::from(""), Line::from("[ poster ]")],
            truncate_str(url.as_str(), area.width.saturating_sub(2) as usize),
        ),
    };

    let mut text = lines;
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(caption, Style::default().fg(Color::DarkGray))));
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}
