//! Route pattern matching with `:param` segments.

/// Whether `path` matches `pattern`.
///
/// Patterns are compared segment by segment; a `:param` segment
/// matches any single non-empty segment. Trailing slashes are not
/// significant.
pub fn match_route(path: &str, pattern: &str) -> bool {
    let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let pattern_segments: Vec<&str> = pattern.trim_matches('/').split('/').collect();

    if path_segments.len() != pattern_segments.len() {
        return false;
    }

    path_segments
        .iter()
        .zip(&pattern_segments)
        .all(|(segment, pattern_segment)| {
            if pattern_segment.starts_with(':') {
                !segment.is_empty()
            } else {
                segment == pattern_segment
            }
        })
}

/// Whether `path` matches any of the allowed offline route patterns.
pub fn is_allowed_offline(path: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|pattern| match_route(path, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        assert!(match_route(
            "/dashboard/offline-learning",
            "/dashboard/offline-learning"
        ));
        assert!(!match_route("/dashboard", "/dashboard/offline-learning"));
        assert!(!match_route("/dashboard/offline-learning/extra", "/dashboard/offline-learning"));
    }

    #[test]
    fn test_param_segments() {
        let pattern = "/dashboard/courses/:id/content";
        assert!(match_route("/dashboard/courses/42/content", pattern));
        assert!(match_route("/dashboard/courses/rust-101/content", pattern));
        assert!(!match_route("/dashboard/courses/42", pattern));
        assert!(!match_route("/dashboard/courses/42/quiz", pattern));
    }

    #[test]
    fn test_trailing_slash_not_significant() {
        assert!(match_route(
            "/dashboard/offline-learning/",
            "/dashboard/offline-learning"
        ));
    }

    #[test]
    fn test_allowed_offline() {
        let allowed = vec![
            "/dashboard/offline-learning".to_string(),
            "/dashboard/courses/:id/content".to_string(),
        ];
        assert!(is_allowed_offline("/dashboard/courses/7/content", &allowed));
        assert!(!is_allowed_offline("/dashboard/quizzes", &allowed));
    }
}
