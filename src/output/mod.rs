// Output formatting — terminal display of topic models.

pub mod terminal;

/// Shorten a term to at most `max_chars` characters, appending "..." if cut.
///
/// Counts characters, not bytes, so multi-byte terms never split mid-character.
pub fn truncate_term(term: &str, max_chars: usize) -> String {
    if term.chars().count() <= max_chars {
        term.to_string()
    } else {
        let kept: String = term.chars().take(max_chars).collect();
        format!("{kept}...")
    }
}
