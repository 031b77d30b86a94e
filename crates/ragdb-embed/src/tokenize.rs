/// Lowercased, whitespace-delimited terms. Duplicates are kept so that a
/// repeated query word weighs more.
pub fn terms(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}
