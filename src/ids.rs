/// Split free-text project-ID input into tokens.
///
/// Separators are any run of whitespace and/or commas. Order and duplicates
/// are preserved; blank input yields an empty list.
pub fn parse_identifiers(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
