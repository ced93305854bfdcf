use catalogdesk_core::utils::{format_optional, format_price, truncate_string};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    render_table(frame, app, chunks[0]);
    render_page_controls(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.products;
    let title = format!(" Products ({}) ", view.pagination.total);

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if view.loading {
        let paragraph =
            Paragraph::new(Span::styled("Loading products...", styles::muted_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref error) = view.error {
        let paragraph = Paragraph::new(Span::styled(error.clone(), styles::error_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new([
        Cell::from("ID"),
        Cell::from("Title"),
        Cell::from("Price"),
        Cell::from("Stock"),
        Cell::from("Category"),
    ])
    .style(styles::label_style())
    .height(1);

    let rows: Vec<Row> = view
        .products
        .iter()
        .map(|product| {
            Row::new(vec![
                Cell::from(product.id.to_string()),
                Cell::from(truncate_string(&product.title, 40)),
                Cell::from(format_price(product.price)),
                Cell::from(format_optional(&product.stock, "-")),
                Cell::from(product.category.clone().unwrap_or_else(|| "-".to_string())),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !view.products.is_empty() {
        state.select(Some(view.selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_page_controls(frame: &mut Frame, app: &App, area: Rect) {
    let pagination = &app.products.pagination;

    let enabled = |on: bool| {
        if on {
            styles::help_key_style()
        } else {
            styles::muted_style()
        }
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("← Prev", enabled(pagination.has_prev())),
        Span::raw("  "),
    ];
    for page in pagination.page_numbers() {
        let label = format!(" {} ", page);
        if page == pagination.page {
            spans.push(Span::styled(label, styles::nav_style(true)));
        } else {
            spans.push(Span::styled(label, styles::list_item_style()));
        }
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled("Next →", enabled(pagination.has_next())));

    match app.products.page_input {
        Some(ref digits) => {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Go to page: ", styles::label_style()));
            spans.push(Span::styled(format!("{}▌", digits), styles::field_style(true)));
        }
        None => {
            spans.push(Span::styled("    [g] go to page", styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
