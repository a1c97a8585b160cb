// Localized spellings of the "false" answer label, used to decide which
// choice of a true/false question is the false one.
pub fn localized_false(locale: &str) -> &'static str {
    let language = locale
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or("en");

    match language {
        "fr" => "Faux",
        "es" | "it" | "pt" => "Falso",
        "de" => "Falsch",
        "nl" => "Onwaar",
        "fi" => "Epätosi",
        _ => "False",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_language_from_full_locale_tags() {
        assert_eq!(localized_false("en"), "False");
        assert_eq!(localized_false("fr_CA"), "Faux");
        assert_eq!(localized_false("de-AT"), "Falsch");
        assert_eq!(localized_false("unknown"), "False");
    }
}
