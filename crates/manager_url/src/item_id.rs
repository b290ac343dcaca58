//! Item identifier construction.

use crate::error::UrlSyncError;

const SEPARATORS: &[char] = &[
    ' ', '’', '–', '—', '―', '′', '¿', '\'', '`', '~', '!', '@', '#', '$', '%', '^', '&', '*', '(',
    ')', '_', '|', '+', '-', '=', '?', ';', ':', '"', ',', '.', '<', '>', '{', '}', '[', ']', '\\', '/',
];

/// Lowercases `raw`, turns spaces and punctuation into single dashes and trims edge dashes.
///
/// Other whitespace such as tabs is kept as is.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.to_lowercase().chars() {
        if SEPARATORS.contains(&ch) {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else {
            out.push(ch);
        }
    }
    out.trim_matches('-').to_string()
}

fn sanitize_part(raw: &str, part: &'static str) -> Result<String, UrlSyncError> {
    let sanitized = sanitize(raw);
    if sanitized.is_empty() {
        return Err(UrlSyncError::InvalidItemId {
            part,
            raw: raw.to_string(),
        });
    }
    Ok(sanitized)
}

/// Composes the item id for a `(kind, name)` pair.
///
/// # Errors
///
/// Returns [`UrlSyncError::InvalidItemId`] when either part sanitizes to an empty string.
pub fn to_id(kind: &str, name: &str) -> Result<String, UrlSyncError> {
    Ok(format!(
        "{}--{}",
        sanitize_part(kind, "kind")?,
        sanitize_part(name, "name")?
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sanitize_collapses_separators() {
        assert_eq!(sanitize("Foo"), "foo");
        assert_eq!(sanitize("Atoms/Button Group"), "atoms-button-group");
        assert_eq!(sanitize("  --Hello, World!--  "), "hello-world");
        assert_eq!(sanitize("Ünïcode Kind"), "ünïcode-kind");
        assert_eq!(sanitize("Foo\tBar"), "foo\tbar");
        assert_eq!(sanitize("Foo\nBar Baz"), "foo\nbar-baz");
    }

    #[test]
    fn to_id_joins_sanitized_parts() {
        assert_eq!(to_id("Foo", "Bar").expect("id"), "foo--bar");
        assert_eq!(
            to_id("Forms/Input", "with label").expect("id"),
            "forms-input--with-label"
        );
    }

    #[test]
    fn to_id_rejects_parts_without_content() {
        assert_eq!(
            to_id("Foo", "!!!"),
            Err(UrlSyncError::InvalidItemId {
                part: "name",
                raw: "!!!".to_string(),
            })
        );
        assert!(to_id("", "Bar").is_err());
    }
}
