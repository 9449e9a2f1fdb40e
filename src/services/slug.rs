//! URL slug generation

/// Generate a URL-friendly slug from a title.
///
/// Lowercases ASCII, turns every other ASCII character into `-`, keeps
/// non-ASCII characters, collapses runs of `-` and trims them from both ends.
pub fn generate_slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        let mapped = if c.is_ascii_alphanumeric() || !c.is_ascii() { c } else { '-' };
        if mapped == '-' {
            if !prev_hyphen && !result.is_empty() {
                result.push('-');
                prev_hyphen = true;
            }
        } else {
            result.push(mapped);
            prev_hyphen = false;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

/// Cut a slug to at most `max` characters without leaving a trailing `-`
pub fn truncate_slug(slug: String, max: usize) -> String {
    if slug.chars().count() <= max {
        return slug;
    }
    let cut: String = slug.chars().take(max).collect();
    cut.trim_end_matches('-').to_string()
}
