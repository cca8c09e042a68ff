//! URL-friendly permalink strings.

/// Maximum length of a stored slug.
pub const SLUG_LENGTH: usize = 50;

/// Normalize arbitrary text into a slug.
///
/// Lower-cases the input, drops apostrophes, and collapses every run of
/// characters that are not ASCII letters or digits into a single `-`.
/// The result never starts or ends with `-` and is at most
/// [`SLUG_LENGTH`] bytes, so `slugify(&slugify(s)) == slugify(s)`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len().min(SLUG_LENGTH));
    let mut prev_hyphen = true;

    for ch in input.to_lowercase().chars() {
        if ch == '\'' || ch == '\u{2019}' {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }

    slug.truncate(SLUG_LENGTH);
    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Append a numeric suffix to `base`, trimming it so the result stays
/// within [`SLUG_LENGTH`].
pub(crate) fn with_suffix(base: &str, n: u32) -> String {
    let suffix = format!("-{}", n);
    let keep = SLUG_LENGTH.saturating_sub(suffix.len()).min(base.len());
    format!("{}{}", base[..keep].trim_end_matches('-'), suffix)
}
