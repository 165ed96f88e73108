/// Turns a caller-supplied base URL into the effective request root:
/// trailing slashes are stripped, the versioned API path is appended,
/// and exactly one trailing slash is kept so relative paths compose.
///
/// The version segment is never duplicated, so normalization is
/// idempotent.
pub(crate) fn normalize_base_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with("/api/v1") {
        format!("{}/", base)
    } else {
        format!("{}/api/v1/", base)
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base, path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_version_segment() {
        assert_eq!(normalize_base_url("https://x"), "https://x/api/v1/");
    }

    #[test]
    fn normalize_strips_trailing_slash() {
        assert_eq!(normalize_base_url("https://x/"), "https://x/api/v1/");
        assert_eq!(normalize_base_url("https://x//"), "https://x/api/v1/");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_base_url("https://cloud.axiom.co");
        assert_eq!(normalize_base_url(&once), once);
    }

    #[test]
    fn join_handles_leading_slash() {
        assert_eq!(
            join_url("https://x/api/v1/", "datasets"),
            "https://x/api/v1/datasets"
        );
        assert_eq!(
            join_url("https://x/api/v1/", "/datasets"),
            "https://x/api/v1/datasets"
        );
    }
}
