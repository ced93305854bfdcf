use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, FormField, FormMode};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;

    let title = match form.mode {
        FormMode::Add => " Add Product ".to_string(),
        FormMode::Edit(id) => format!(" Edit Product #{} ", id),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if form.loading {
        let paragraph = Paragraph::new(Span::styled("Loading...", styles::muted_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let focus = form.focus();
    let field_width = (area.width as usize).saturating_sub(22).max(10);

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        if field == FormField::Submit {
            continue;
        }
        let focused = field == focus;
        let cursor = if focused { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", field.label()), styles::label_style()),
            Span::styled(
                format!("{}{}", visible_tail(form.value(field), field_width), cursor),
                styles::field_style(focused),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let focused = focus == FormField::Submit;
    lines.push(Line::from(vec![
        Span::raw("  ["),
        Span::styled(format!(" {} ", form.submit_label()), styles::field_style(focused)),
        Span::raw("]"),
    ]));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Keep the end of long input visible
fn visible_tail(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        value.to_string()
    } else {
        value.chars().skip(count - width).collect()
    }
}
