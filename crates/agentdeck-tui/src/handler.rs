use agentdeck_core::Tab;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Lines moved per PgUp/PgDn or mouse wheel step
const SCROLL_STEP: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Demo(event) => app.apply_demo_event(event),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Tab switching
        KeyCode::Char('1') => app.select_tab(Tab::Agents),
        KeyCode::Char('2') => app.select_tab(Tab::Google),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_tab(),

        // Start typing
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
        KeyCode::Char('/') if app.tab() == Tab::Google => app.input_mode = InputMode::Editing,

        _ if app.tab() == Tab::Agents => handle_grid_keys(app, key),
        _ => {}
    }
}

fn handle_grid_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('l') | KeyCode::Right => app.select_next_card(),
        KeyCode::Char('h') | KeyCode::Left => app.select_prev_card(),
        KeyCode::Char('j') | KeyCode::Down => app.select_card_below(),
        KeyCode::Char('k') | KeyCode::Up => app.select_card_above(),
        KeyCode::Char('g') => app.select_card(0),
        KeyCode::Char('G') => app.select_card(app.card_count().saturating_sub(1)),
        KeyCode::PageUp => app.scroll_card_back(app.selected_card, SCROLL_STEP),
        KeyCode::PageDown => app.scroll_card_forward(app.selected_card, SCROLL_STEP),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => match app.tab() {
            // Chat keeps focus in the box so the next message can be typed
            Tab::Agents => {
                app.submit_selected_card();
            }
            Tab::Google => {
                app.submit_search();
                app.input_mode = InputMode::Normal;
            }
        },
        KeyCode::Backspace => {
            if let Some(input) = app.active_input_mut() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.active_input_mut() {
                input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(tab) = app.tab_at(mouse.column, mouse.row) {
                app.select_tab(tab);
            } else if let Some(index) = app.card_at(mouse.column, mouse.row) {
                app.select_card(index);
            }
        }
        MouseEventKind::ScrollUp => {
            if let Some(index) = app.card_at(mouse.column, mouse.row) {
                app.scroll_card_back(index, SCROLL_STEP);
            }
        }
        MouseEventKind::ScrollDown => {
            if let Some(index) = app.card_at(mouse.column, mouse.row) {
                app.scroll_card_forward(index, SCROLL_STEP);
            }
        }
        _ => {}
    }
}
