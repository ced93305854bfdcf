//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application state changes.
//! Network actions are never awaited here: they are queued on
//! `App::pending` and run by the main loop after the next frame.

use anyhow::Result;
use catalogdesk_core::Route;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_field_char, can_add_password_char, can_add_username_char, App, AppState, FormField,
    FormMode, LoginFocus, PendingAction,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Any key dismisses an alert
    if app.alert.is_some() {
        app.alert = None;
        return Ok(false);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if let AppState::ConfirmingDelete(id) = app.state {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Normal;
                app.pending = Some(PendingAction::Delete(id));
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Ignore input while a request is in flight
    if app.pending.is_some() {
        return Ok(false);
    }

    match app.route {
        Route::Login => handle_login_input(app, key),
        Route::Products if app.products.page_input.is_some() => {
            handle_page_jump_input(app, key);
            Ok(false)
        }
        Route::NewProduct | Route::EditProduct(_) if app.form.focus() != FormField::Submit => {
            handle_form_input(app, key);
            Ok(false)
        }
        _ => handle_page_input(app, key),
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let focus = app.login.focus();
    match key.code {
        KeyCode::Esc => {
            // Quit from the login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login.focus = Some(match focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            });
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login.focus = Some(match focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            });
        }
        KeyCode::Enter => match focus {
            LoginFocus::Username => app.login.focus = Some(LoginFocus::Password),
            LoginFocus::Password | LoginFocus::Button => {
                app.login.submitting = true;
                app.pending = Some(PendingAction::Login);
            }
        },
        KeyCode::Backspace => match focus {
            LoginFocus::Username => {
                app.login.username.pop();
            }
            LoginFocus::Password => {
                app.login.password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login.username.chars().count(), c) {
                    app.login.username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login.password.chars().count(), c) {
                    app.login.password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

/// Text entry on the add/edit form
fn handle_form_input(app: &mut App, key: KeyEvent) {
    if app.form.loading || app.form.saving {
        if key.code == KeyCode::Esc {
            cancel_form(app);
        }
        return;
    }

    let focus = app.form.focus();
    match key.code {
        KeyCode::Esc => cancel_form(app),
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => app.form.focus = Some(focus.next()),
        KeyCode::BackTab | KeyCode::Up => app.form.focus = Some(focus.prev()),
        KeyCode::Backspace => {
            if let Some(value) = app.form.value_mut(focus) {
                value.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(value) = app.form.value_mut(focus) {
                if can_add_field_char(value.chars().count(), c) {
                    value.push(c);
                }
            }
        }
        _ => {}
    }
}

fn cancel_form(app: &mut App) {
    match app.form.mode {
        FormMode::Add => app.navigate(Route::Products),
        FormMode::Edit(id) => app.navigate(Route::ProductDetail(id)),
    }
}

/// Keys shared by every protected page, then page-specific keys
fn handle_page_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.navigate(Route::Dashboard);
            return Ok(false);
        }
        KeyCode::Char('2') => {
            app.navigate(Route::Products);
            return Ok(false);
        }
        KeyCode::Char('3') => {
            app.navigate(Route::NewProduct);
            return Ok(false);
        }
        KeyCode::Char('4') => {
            app.logout();
            return Ok(false);
        }
        KeyCode::Char('r') => {
            app.navigate(app.route);
            return Ok(false);
        }
        _ => {}
    }

    match app.route {
        Route::Products => handle_products_input(app, key),
        Route::ProductDetail(id) => handle_detail_input(app, key, id),
        Route::NewProduct | Route::EditProduct(_) => handle_submit_input(app, key),
        Route::Dashboard | Route::Login => {}
    }
    Ok(false)
}

fn handle_products_input(app: &mut App, key: KeyEvent) {
    let count = app.products.products.len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.products.selection = app.products.selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.products.selection + 1 < count {
                app.products.selection += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => app.prev_page(),
        KeyCode::Right | KeyCode::Char('l') => app.next_page(),
        KeyCode::Char('g') => app.products.page_input = Some(String::new()),
        KeyCode::Home => app.go_to_page(1),
        KeyCode::End => {
            let last = app.products.pagination.total_pages();
            app.go_to_page(last);
        }
        KeyCode::Enter => {
            if let Some(id) = app.selected_product().map(|p| p.id) {
                app.navigate(Route::ProductDetail(id));
            }
        }
        _ => {}
    }
}

/// Digits for the go-to-page prompt; Enter jumps, Esc closes
fn handle_page_jump_input(app: &mut App, key: KeyEvent) {
    let Some(ref mut digits) = app.products.page_input else {
        return;
    };
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() && digits.len() < 6 => digits.push(c),
        KeyCode::Backspace => {
            digits.pop();
        }
        KeyCode::Enter => {
            let page = digits.parse::<u64>().ok();
            app.products.page_input = None;
            if let Some(page) = page {
                app.go_to_page(page);
            }
        }
        KeyCode::Esc => app.products.page_input = None,
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent, id: i64) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.navigate(Route::Products),
        KeyCode::Char('e') => {
            if app.detail.product.is_some() {
                app.navigate(Route::EditProduct(id));
            }
        }
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.detail.scroll = app.detail.scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.detail.scroll = app.detail.scroll.saturating_add(1);
        }
        _ => {}
    }
}

/// Form input while the submit button has focus
fn handle_submit_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            if !app.form.loading && !app.form.saving {
                app.form.saving = true;
                app.pending = Some(PendingAction::SubmitForm);
            }
        }
        KeyCode::Tab | KeyCode::Down => app.form.focus = Some(FormField::Submit.next()),
        KeyCode::BackTab | KeyCode::Up => app.form.focus = Some(FormField::Submit.prev()),
        KeyCode::Esc => cancel_form(app),
        _ => {}
    }
}
