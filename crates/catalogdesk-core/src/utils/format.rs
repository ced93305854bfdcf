/// Format a price for display, `$9.99`
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${:.2}", p),
        None => "-".to_string(),
    }
}

/// Format a percentage for display, `7.17%`
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", v),
        None => "-".to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional value, returning a default if None
pub fn format_optional<T: ToString>(value: &Option<T>, default: &str) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(9.99)), "$9.99");
        assert_eq!(format_price(Some(12.0)), "$12.00");
        assert_eq!(format_price(None), "-");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(7.17)), "7.17%");
        assert_eq!(format_percent(None), "-");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Héllo wörld", 8), "Héllo...");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(&Some(5), "n/a"), "5");
        assert_eq!(format_optional::<String>(&None, "n/a"), "n/a");
    }
}
