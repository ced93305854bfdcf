use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Width of the visible part of an input box
const FIELD_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let height = if form.error.is_some() { 12 } else { 10 };
    let area = centered_rect_fixed(48, height, area);
    frame.render_widget(Clear, area);

    let focus = form.focus();
    let mut lines = vec![Line::from("")];

    // Username
    let focused = focus == LoginFocus::Username;
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled("Username: [", styles::muted_style()),
        Span::styled(
            input_display(&form.username, focused),
            styles::field_style(focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password, masked
    let focused = focus == LoginFocus::Password;
    let masked = "*".repeat(form.password.chars().count());
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(input_display(&masked, focused), styles::field_style(focused)),
        Span::styled("]", styles::muted_style()),
    ]));

    // Button
    lines.push(Line::from(""));
    let focused = focus == LoginFocus::Button;
    let label = if form.submitting {
        "  Logging in...  "
    } else if focused {
        "   ▶ Login ◀     "
    } else {
        "     Login       "
    };
    lines.push(Line::from(vec![
        Span::raw("             ["),
        Span::styled(label, styles::field_style(focused)),
        Span::raw("]"),
    ]));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Pad or tail-truncate input so the cursor end stays visible
fn input_display(value: &str, focused: bool) -> String {
    let cursor = if focused { "▌" } else { " " };
    let chars: Vec<char> = value.chars().collect();
    let visible: String = if chars.len() > FIELD_WIDTH {
        chars[chars.len() - FIELD_WIDTH..].iter().collect()
    } else {
        value.to_string()
    };
    format!("{:<width$}{}", visible, cursor, width = FIELD_WIDTH)
}
