//! Label → generated-symbol normalization.

/// Normalize a free-text name into an identifier for generated symbols.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, so `sse4.1` →
/// `sse4_1` and `android-sdk` → `android_sdk`. Case is preserved; callers
/// that need an upper-cased form (negative defines) uppercase the result.
pub fn symbol_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_identifiers_through() {
        assert_eq!(symbol_name("thread"), "thread");
        assert_eq!(symbol_name("already_fine_123"), "already_fine_123");
    }

    #[test]
    fn replaces_punctuation() {
        assert_eq!(symbol_name("sse4.1"), "sse4_1");
        assert_eq!(symbol_name("android-sdk"), "android_sdk");
        assert_eq!(symbol_name("c++11"), "c__11");
    }

    #[test]
    fn preserves_case() {
        assert_eq!(symbol_name("OpenGL-ES"), "OpenGL_ES");
    }
}
