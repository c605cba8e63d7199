use std::cmp::Ordering;

/// Treats a missing string as empty
pub fn or_empty(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

/// Compares two optional strings, with missing values sorting as empty strings
pub fn cmp_or_empty(a: Option<&str>, b: Option<&str>) -> Ordering {
    or_empty(a).cmp(or_empty(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_or_empty() {
        assert_eq!(cmp_or_empty(None, None), Ordering::Equal);
        assert_eq!(cmp_or_empty(None, Some("")), Ordering::Equal);
        assert_eq!(cmp_or_empty(None, Some("a")), Ordering::Less);
        assert_eq!(cmp_or_empty(Some("b"), Some("a")), Ordering::Greater);
        assert_eq!(cmp_or_empty(Some("B"), Some("b")), Ordering::Less);
    }
}
