/// Rewrites an uploaded filename (or stem) to a form that is safe to store.
///
/// Drops any path components the client sent, keeps ASCII alphanumerics,
/// `.`, `-` and `_`, turns whitespace into `_` and discards everything else.
/// Leading dots are stripped so an upload can never become a hidden file.
pub fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("").trim();

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}
