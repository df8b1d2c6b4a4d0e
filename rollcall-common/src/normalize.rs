//! Identity normalization
//!
//! All name matching in rollcall happens on a normalized key: lowercase,
//! trimmed. The same function MUST be applied at write time (directory
//! construction) and read time (row matching) — any asymmetry between the
//! two sides is a correctness bug that silently drops matches.

/// Canonicalize a raw full name into the comparable key used everywhere.
///
/// Standard Unicode lowercase, then trim. No locale-specific casing rules.
/// Idempotent: `normalize_name(normalize_name(x)) == normalize_name(x)`.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_name("  Alice Smith "), "alice smith");
        assert_eq!(normalize_name("BOB JONES"), "bob jones");
    }

    #[test]
    fn already_normalized_is_unchanged() {
        assert_eq!(normalize_name("carol white"), "carol white");
    }

    #[test]
    fn idempotent() {
        let inputs = ["  Alice Smith ", "BOB", "métropole DUPONT", "\tx y\n"];
        for input in inputs {
            let once = normalize_name(input);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn interior_whitespace_preserved() {
        // Only leading/trailing whitespace is stripped; a double space inside
        // a name is a different identity than a single space.
        assert_eq!(normalize_name("Alice  Smith"), "alice  smith");
    }

    #[test]
    fn empty_and_whitespace_only() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
    }
}
