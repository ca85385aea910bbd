/// Lower-cases, drops anything that is not alphanumeric, `_`, `-` or
/// whitespace, collapses whitespace/hyphen runs into one `-` and strips
/// leading/trailing `-`/`_`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        }
    }
    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// True when `value` is already a well-formed slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Base slug for a username, never empty.
pub fn base_slug(username: &str) -> String {
    let slug: String = slugify(username)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(50)
        .collect();
    let slug = slug.trim_matches(|c| c == '-' || c == '_').to_string();
    if slug.is_empty() {
        "profile".to_string()
    } else {
        slug
    }
}

/// The n-th candidate for a base slug: `base`, `base-2`, `base-3`, ...
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}
