use catalogdesk_core::{guard, GuardDecision, Route};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState};

use super::pages::{dashboard, login, product_detail, product_form, products};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Page content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    // The guard is re-evaluated on every frame; a redirecting route draws nothing.
    match guard(app.route, &app.auth) {
        GuardDecision::Guarded(route) => {
            if route.is_protected() {
                render_nav(frame, route, chunks[1]);
            }
            render_page(frame, app, route, chunks[2]);
        }
        GuardDecision::Redirecting(_) => {}
    }

    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingDelete(id) => render_delete_overlay(frame, app, id),
        AppState::Normal | AppState::Quitting => {}
    }

    if let Some(ref message) = app.alert {
        render_alert_overlay(frame, message);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Catalog Desk";
    let right = if app.is_authenticated() {
        format!("{}  [?] Help", app.api.base_url())
    } else {
        "[?] Help".to_string()
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + right.chars().count() as u16 + 4)
                as usize,
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_nav(frame: &mut Frame, route: Route, area: Rect) {
    let entries = [
        ("[1] Dashboard", route == Route::Dashboard),
        (
            "[2] Products",
            matches!(route, Route::Products | Route::ProductDetail(_) | Route::EditProduct(_)),
        ),
        ("[3] Add Product", route == Route::NewProduct),
        ("[4] Logout", false),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in entries.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(*label, styles::nav_style(*selected)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_page(frame: &mut Frame, app: &App, route: Route, area: Rect) {
    match route {
        Route::Login => login::render(frame, app, area),
        Route::Dashboard => dashboard::render(frame, app, area),
        Route::Products => products::render(frame, app, area),
        Route::ProductDetail(_) => product_detail::render(frame, app, area),
        Route::NewProduct | Route::EditProduct(_) => product_form::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.route {
        Route::Login => "[Tab] next field | [Enter] login | [Ctrl+C] quit",
        Route::Products => "[←/→] page | [g]o to page | [Enter] open | [q]uit",
        Route::ProductDetail(_) => "[e]dit | [d]elete | [Esc] back | [q]uit",
        Route::NewProduct | Route::EditProduct(_) => "[Tab] next field | [Esc] cancel",
        Route::Dashboard => "[q]uit",
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {}  {} ", app.route.title(), app.route),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 23, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Catalog Desk", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-4", "Dashboard / Products / Add / Logout"),
        help_line("↑/↓", "Move selection"),
        help_line("←/→", "Previous / next page"),
        help_line("g", "Go to page number"),
        help_line("Enter", "Open product / submit"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Product", styles::highlight_style())),
        help_line("e", "Edit product"),
        help_line("d", "Delete product"),
        help_line("r", "Reload page"),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::highlight_style())),
        help_line("Tab", "Next field (Shift+Tab previous)"),
        help_line("q", "Quit (outside text fields)"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(help_text).block(overlay_block()), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        confirm_line("quit"),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block()), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App, id: i64) {
    let area = centered_rect_fixed(50, 8, frame.area());
    frame.render_widget(Clear, area);

    let title = app
        .detail
        .product
        .as_ref()
        .map(|p| p.title.as_str())
        .unwrap_or("this product");

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to delete this product?",
            styles::highlight_style(),
        )),
        Line::from(Span::styled(format!("   #{} {}", id, title), styles::muted_style())),
        Line::from(""),
        confirm_line("delete"),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block()), area);
}

fn render_alert_overlay(frame: &mut Frame, message: &str) {
    let area = centered_rect_fixed(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(format!(" {}", message), styles::error_style())),
        Line::from(""),
        Line::from(Span::styled(" Press any key to continue", styles::muted_style())),
    ];

    let block = overlay_block()
        .title(" Error ")
        .title_style(styles::error_style());
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn confirm_line(action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(format!(" to {}, ", action), styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ])
}

fn overlay_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default())
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use catalogdesk_core::auth::MemoryTokenStore;
    use catalogdesk_core::Config;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_status_bar_names_current_page() {
        let config = Config {
            api_base_url: Some("http://127.0.0.1:9".to_string()),
            ..Config::default()
        };
        let mut app =
            App::with_parts(config, None, Arc::new(MemoryTokenStore::with_token("abc"))).unwrap();
        app.route = Route::Products;

        let screen = draw(&app);
        assert!(screen.contains(" Products  /products "));
    }

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(50, 10, outer), Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_outer() {
        let outer = Rect::new(2, 3, 20, 5);
        let rect = centered_rect_fixed(50, 10, outer);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 5);
        assert_eq!((rect.x, rect.y), (2, 3));
    }
}
