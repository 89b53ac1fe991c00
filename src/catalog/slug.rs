use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

struct SlugRegex {
    whitespace: Regex,
    disallowed: Regex,
    dashes: Regex,
}

impl SlugRegex {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<SlugRegex>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    whitespace: Regex::new(r"\s+").ok()?,
                    disallowed: Regex::new(r"[^a-z0-9_-]+").ok()?,
                    dashes: Regex::new(r"-{2,}").ok()?,
                })
            })
            .as_ref()
    }
}

/// Lowercases and strips combining marks after canonical decomposition
/// (`Ñ` becomes `n`, `ş` becomes `s`). Letters with no decomposition pass through.
#[must_use]
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// URL-safe identifier for a display name: accents stripped, lowercased,
/// whitespace runs hyphenated, anything outside `[a-z0-9_-]` dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let folded = fold(text);
    let trimmed = folded.trim();

    let Some(re) = SlugRegex::get() else {
        return trimmed
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
    };

    let hyphenated = re.whitespace.replace_all(trimmed, "-");
    let cleaned = re.disallowed.replace_all(&hyphenated, "");
    re.dashes.replace_all(&cleaned, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_strips_accents() {
        assert_eq!(slugify("Córdoba"), "cordoba");
        assert_eq!(slugify("Neuquén"), "neuquen");
        assert_eq!(slugify("Tucumán"), "tucuman");
        assert_eq!(slugify("Villa María"), "villa-maria");
        assert_eq!(slugify("Añelo"), "anelo");
    }

    #[test]
    fn test_slugify_hyphenates_and_cleans() {
        assert_eq!(slugify("Ciudad de Buenos Aires"), "ciudad-de-buenos-aires");
        assert_eq!(slugify("  Pizza a la Piedra  "), "pizza-a-la-piedra");
        assert_eq!(slugify("Fugazzeta (rellena)"), "fugazzeta-rellena");
        assert_eq!(slugify("Media - Masa"), "media-masa");
        assert_eq!(slugify("Pizza & Fainá"), "pizza-faina");
    }

    #[test]
    fn test_slugify_folds_any_decomposable_letter() {
        assert_eq!(slugify("Şanlıurfa"), "sanlurfa");
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("São Tomé"), "sao-tome");
        assert_eq!(fold("ÑANDÚ"), "nandu");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
    }
}
