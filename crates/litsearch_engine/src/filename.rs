const FILENAME_PREFIX: &str = "literature_results";
const FALLBACK_KEYWORD: &str = "search_results";
const MAX_KEYWORD_CHARS: usize = 60;

/// `literature_results_{keyword}_{timestamp}.csv`, with the keyword reduced to
/// characters that are safe in a file name on every platform.
pub fn export_filename(keyword: &str, timestamp: &str) -> String {
    format!(
        "{FILENAME_PREFIX}_{}_{timestamp}.csv",
        sanitize_keyword(keyword)
    )
}

fn sanitize_keyword(keyword: &str) -> String {
    let kept: String = keyword
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-'))
        .collect();
    let joined = kept.split_whitespace().collect::<Vec<_>>().join("_");
    let truncated: String = joined.chars().take(MAX_KEYWORD_CHARS).collect();
    if truncated.is_empty() {
        FALLBACK_KEYWORD.to_string()
    } else {
        truncated
    }
}
