use crate::ValidationError;

/// Maximum accepted search query length, counted in characters after normalization.
pub const MAX_QUERY_LEN: usize = 100;

const FORBIDDEN_CHARS: [char; 9] = ['<', '>', '{', '}', '[', ']', '\\', ';', '`'];

/// Trim `input` and collapse internal whitespace runs to a single space.
///
/// Two inputs with the same normalized form produce the same request.
pub fn normalize_query(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validate a free-text company search query.
///
/// The query is normalized with [`normalize_query`]; nothing else about it
/// is rewritten.
pub fn validate_search_query(input: &str) -> Result<String, ValidationError> {
    let normalized = normalize_query(input);
    if normalized.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }

    let len = normalized.chars().count();
    if len > MAX_QUERY_LEN {
        return Err(ValidationError::QueryTooLong {
            len,
            max: MAX_QUERY_LEN,
        });
    }

    if let Some(ch) = normalized
        .chars()
        .find(|ch| ch.is_control() || FORBIDDEN_CHARS.contains(ch))
    {
        return Err(ValidationError::QueryInvalidChar { ch });
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_collapses_whitespace_only() {
        let query = validate_search_query("  Berkshire   Hathaway\tInc. ").expect("valid");
        assert_eq!(query, "Berkshire Hathaway Inc.");
    }

    #[test]
    fn passes_valid_query_through_unchanged() {
        for input in ["TSLA", "AT&T", "Procter & Gamble", "l'oréal", "3M Co"] {
            assert_eq!(validate_search_query(input).as_deref(), Ok(input));
        }
    }

    #[test]
    fn rejects_blank_query() {
        assert_eq!(validate_search_query(" \n "), Err(ValidationError::EmptyQuery));
    }

    #[test]
    fn rejects_query_over_max_length() {
        let input = "a".repeat(MAX_QUERY_LEN + 1);
        assert!(matches!(
            validate_search_query(&input),
            Err(ValidationError::QueryTooLong { len: 101, max: MAX_QUERY_LEN })
        ));
        assert!(validate_search_query(&"a".repeat(MAX_QUERY_LEN)).is_ok());
    }

    #[test]
    fn rejects_markup_characters() {
        assert_eq!(
            validate_search_query("<script>"),
            Err(ValidationError::QueryInvalidChar { ch: '<' })
        );
    }
}
