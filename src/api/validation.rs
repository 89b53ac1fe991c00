use super::ApiError;

pub fn validate_required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{field} is required"))),
    }
}

/// Page numbers are 1-based; absent means the first page.
pub fn validate_page(page: Option<i64>) -> Result<usize, ApiError> {
    let Some(page) = page else {
        return Ok(1);
    };

    if page < 1 {
        return Err(ApiError::validation(format!(
            "Invalid page: {page}. Page must be 1 or greater"
        )));
    }

    usize::try_from(page).map_err(|_| ApiError::validation(format!("Invalid page: {page}")))
}

/// Path segment page numbers; anything that is not a positive integer is rejected.
pub fn parse_page_segment(segment: &str) -> Option<usize> {
    segment.parse::<usize>().ok().filter(|page| *page >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required(Some("Napolitana"), "keyword").unwrap(), "Napolitana");
        assert_eq!(validate_required(Some("  Rosario "), "city").unwrap(), "Rosario");
        assert!(validate_required(Some(""), "keyword").is_err());
        assert!(validate_required(Some("   "), "keyword").is_err());
        assert!(validate_required(None, "city").is_err());
    }

    #[test]
    fn test_validate_page() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some(1)).unwrap(), 1);
        assert_eq!(validate_page(Some(42)).unwrap(), 42);
        assert!(validate_page(Some(0)).is_err());
        assert!(validate_page(Some(-3)).is_err());
    }

    #[test]
    fn test_parse_page_segment() {
        assert_eq!(parse_page_segment("2"), Some(2));
        assert_eq!(parse_page_segment("0"), None);
        assert_eq!(parse_page_segment("dos"), None);
        assert_eq!(parse_page_segment("-1"), None);
    }
}
