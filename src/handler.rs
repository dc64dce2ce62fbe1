use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Search => handle_search_key(app, key),
        AppMode::Help => handle_help_key(app, key),
        AppMode::Detail(_) => handle_detail_key(app, key),
        AppMode::Normal => handle_normal_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            open_search_if_ready(app)
        }
        KeyCode::Char('/') => open_search_if_ready(app),
        _ if !app.is_ready() => {}
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.activate_selected(),
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => app.go_back(),
        KeyCode::Char(' ') => app.toggle_expand_selected(),
        KeyCode::Char('v') => app.cycle_view_mode(),
        KeyCode::Char('0') => app.jump_to_breadcrumb(-1),
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as u8 - b'1') as isize;
            app.jump_to_breadcrumb(index);
        }
        _ => {}
    }
}

fn open_search_if_ready(app: &mut App) {
    if app.is_ready() {
        app.open_search();
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Enter => app.accept_search(),
        KeyCode::Down => app.search.select_next(),
        KeyCode::Up => app.search.select_previous(),
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search.select_next()
        }
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search.select_previous()
        }
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_input(c),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.close_overlay(),
        KeyCode::Char('j') | KeyCode::Down => app.help_scroll += 1,
        KeyCode::Char('k') | KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Backspace => {
            app.close_overlay()
        }
        _ => {}
    }
}

/// Handle a mouse event: the wheel moves the selection.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != AppMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}
