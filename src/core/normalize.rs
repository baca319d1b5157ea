// File: src/core/normalize.rs

/// Canonical form of a symptom token: surrounding whitespace trimmed, lowercased.
///
/// Catalog symptoms, user input and autocomplete prefixes all pass through
/// here, so matching is a plain string comparison afterwards.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalizes every token and drops the ones that end up empty.
pub fn normalize_all<I, S>(tokens: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| normalize(t.as_ref()))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize("  Skin_Rash \t"), "skin_rash");
        assert_eq!(normalize("FEVER"), "fever");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn idempotent() {
        for s in ["", " a ", "High_Fever", "\tChills\n", "ÄCHE ", "mixed Case words"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn normalize_all_skips_blank_tokens() {
        let out: Vec<String> = normalize_all(["Cough", "  ", "", " Fever"]).collect();
        assert_eq!(out, vec!["cough", "fever"]);
    }
}
