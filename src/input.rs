use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, View};

/// Dispatch a key press to the handler for the focused view.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return;
    }

    if app.detail.is_some() {
        handle_detail_key(app, key);
        return;
    }

    match app.view {
        View::Browse => handle_browse_key(app, key),
        View::GenrePicker => handle_genre_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.search();
        }
        KeyCode::Esc => {
            // Discard the draft and restore the committed term
            app.input_mode = InputMode::Normal;
            app.search_input = app.query.search_term.clone();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.list_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.list_prev();
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
            app.next_page();
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
            app.prev_page();
        }
        KeyCode::Char('[') | KeyCode::Home => {
            app.first_page();
        }
        KeyCode::Char(']') | KeyCode::End => {
            app.last_page();
        }
        KeyCode::Enter => {
            app.open_selected();
        }
        KeyCode::Char('g') => {
            app.open_genre_picker();
        }
        KeyCode::Char('c') => {
            app.clear_search();
        }
        _ => {}
    }
}

fn handle_genre_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.view = View::Browse;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.genre_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.genre_prev();
        }
        KeyCode::Enter => {
            app.apply_genre_picker();
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => {
            app.close_detail();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up();
        }
        _ => {}
    }
}
