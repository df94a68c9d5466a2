//! Name normalization helpers.
//!
//! Storage keys and record-store lookups both key off a normalized slug
//! derived from the submitted community name, so the derivation must be
//! deterministic and idempotent.

const MAX_SLUG_LEN: usize = 50;

/// Derive a normalized slug from a display name.
///
/// Lowercases, strips everything outside `[a-z0-9 _-]`, collapses runs of
/// spaces/underscores into single hyphens, and truncates to 50 characters.
/// Applying the function to its own output is a no-op.
pub fn normalize_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.trim().to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' => {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(c);
            }
            ' ' | '_' => pending_separator = true,
            _ => {}
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Recover a human-readable name from a slug (`my-town` -> `My Town`).
///
/// Used for alt-text generation when only the slug form of a name survives.
pub fn titlecase_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
