use catalogdesk_core::models::Product;
use catalogdesk_core::utils::{format_optional, format_percent, format_price};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.detail;

    let (title, lines) = match (&view.product, view.loading) {
        (_, true) => (
            " Product ".to_string(),
            vec![Line::from(Span::styled("Loading...", styles::muted_style()))],
        ),
        (Some(product), false) => (format!(" Product #{} ", product.id), detail_lines(product)),
        (None, false) => (
            " Product ".to_string(),
            vec![Line::from(Span::styled("Product not found.", styles::error_style()))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn field<'a>(label: &'static str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<16}", label), styles::label_style()),
        Span::raw(value),
    ])
}

fn detail_lines(product: &Product) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(product.title.clone(), styles::title_style())),
        Line::from(""),
        Line::from(product.description.clone()),
        Line::from(""),
        field("Price", format_price(product.price)),
        field("Discount", format_percent(product.discount_percentage)),
        field("Stock", format_optional(&product.stock, "-")),
        field("Brand", format_optional(&product.brand, "-")),
        field("Category", format_optional(&product.category, "-")),
        field("Rating", format_optional(&product.rating, "-")),
        field("SKU", format_optional(&product.sku, "-")),
        field("Availability", format_optional(&product.availability_status, "-")),
        field("Min. Order Qty", format_optional(&product.minimum_order_quantity, "-")),
    ];

    if let Some(ref dims) = product.dimensions {
        lines.push(field(
            "Dimensions",
            format!("{} x {} x {}", dims.width, dims.height, dims.depth),
        ));
    }
    if let Some(weight) = product.weight {
        lines.push(field("Weight", weight.to_string()));
    }
    if let Some(barcode) = product.barcode() {
        lines.push(field("Barcode", barcode.to_string()));
    }
    if !product.tags.is_empty() {
        lines.push(field("Tags", product.tags.join(", ")));
    }
    lines.push(field("Thumbnail", format_optional(&product.thumbnail, "-")));
    for (i, url) in product.images.iter().enumerate() {
        let label = if i == 0 { "Images" } else { "" };
        lines.push(field(label, url.clone()));
    }
    if let Some(ref meta) = product.meta {
        lines.push(field("Created", format_optional(&meta.created_at, "-")));
        lines.push(field("Updated", format_optional(&meta.updated_at, "-")));
    }

    // Policies
    if product.warranty_information.is_some()
        || product.shipping_information.is_some()
        || product.return_policy.is_some()
    {
        lines.push(Line::from(""));
        lines.push(field("Warranty", format_optional(&product.warranty_information, "-")));
        lines.push(field("Shipping", format_optional(&product.shipping_information, "-")));
        lines.push(field("Returns", format_optional(&product.return_policy, "-")));
    }

    if !product.reviews.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Reviews ({})", product.reviews.len()),
            styles::highlight_style(),
        )));
        for review in &product.reviews {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", format_optional(&review.rating, "-")),
                    styles::help_key_style(),
                ),
                Span::styled(
                    format_optional(&review.reviewer_name, "Anonymous"),
                    styles::label_style(),
                ),
                Span::raw(format!(": {}", review.comment.as_deref().unwrap_or(""))),
                Span::styled(
                    format!("  ({})", format_optional(&review.date, "-")),
                    styles::muted_style(),
                ),
            ]));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use catalogdesk_core::models::Review;

    use super::*;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_detail_lines_sparse_product() {
        let product = Product {
            id: 1,
            title: "Lamp".to_string(),
            price: Some(12.5),
            ..Default::default()
        };
        let rendered = text(&detail_lines(&product));
        assert!(rendered.contains("Lamp"));
        assert!(rendered.contains("$12.50"));
        assert!(!rendered.contains("Reviews"));
        assert!(!rendered.contains("Warranty"));
    }

    #[test]
    fn test_detail_lines_with_tags() {
        let product = Product {
            id: 2,
            tags: vec!["home".to_string(), "light".to_string()],
            ..Default::default()
        };
        assert!(text(&detail_lines(&product)).contains("home, light"));
    }

    #[test]
    fn test_detail_lines_lists_images() {
        let product = Product {
            id: 3,
            images: vec!["a.png".to_string(), "b.png".to_string()],
            ..Default::default()
        };
        let rendered = text(&detail_lines(&product));
        assert!(rendered.contains("a.png"));
        assert!(rendered.contains("b.png"));
    }

    #[test]
    fn test_detail_lines_min_order_and_review_date() {
        let product = Product {
            id: 4,
            minimum_order_quantity: Some(24),
            reviews: vec![Review {
                rating: Some(5.0),
                comment: Some("Great".to_string()),
                date: Some("2024-05-23T08:56:21.618Z".to_string()),
                reviewer_name: Some("Eleanor Collins".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let rendered = text(&detail_lines(&product));
        assert!(rendered.contains("Min. Order Qty  24"));
        assert!(rendered.contains("Eleanor Collins: Great  (2024-05-23T08:56:21.618Z)"));
    }
}
