use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, DASHBOARD_USERS};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(8)])
        .split(area);

    render_summary(frame, app, chunks[0]);
    render_users_chart(frame, chunks[1]);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.dashboard;

    let total = if view.loading {
        Span::styled("Loading...", styles::muted_style())
    } else if let Some(ref error) = view.error {
        Span::styled(error.clone(), styles::error_style())
    } else {
        match view.total_products {
            Some(total) => Span::styled(total.to_string(), styles::highlight_style()),
            None => Span::styled("-", styles::muted_style()),
        }
    };

    let lines = vec![
        Line::from(Span::styled("Welcome to the Admin Dashboard", styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Products in catalog: ", styles::label_style()),
            total,
        ]),
    ];

    let block = Block::default()
        .title(" Dashboard ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_users_chart(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Users ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let chart = BarChart::default()
        .block(block)
        .data(&DASHBOARD_USERS[..])
        .bar_width(7)
        .bar_gap(3)
        .bar_style(styles::bar_style())
        .value_style(styles::selected_style())
        .label_style(styles::muted_style())
        .max(DASHBOARD_USERS.iter().map(|(_, v)| *v).max().unwrap_or(0));

    frame.render_widget(chart, area);
}
