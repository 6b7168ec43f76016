/// Characters dropped before tokenizing a raw batter name.
const STRIPPED_CHARS: [char; 2] = ['"', ','];

/// Turns a `"Last, First"` batter name into `"First Last"`.
///
/// Double quotes and commas are removed, the remainder is split on
/// whitespace, and the tokens are rejoined in reverse order. Apostrophes and
/// other punctuation are kept.
pub fn normalize_name(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.reverse();
    tokens.join(" ")
}
