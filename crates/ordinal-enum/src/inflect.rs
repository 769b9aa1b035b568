//! Name inflection used by lookups, type names and attribute predicates.

use regex::Regex;
use std::sync::OnceLock;

fn camelize_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|_)(.)").expect("camelize regex must compile"))
}

fn acronym_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("acronym boundary regex must compile")
    })
}

fn word_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").expect("word boundary regex must compile"))
}

/// Upper-case the first letter of every underscore-delimited segment and drop
/// the underscores: `foo_bar` becomes `FooBar`.
pub fn camelize(word: &str) -> String {
    camelize_re()
        .replace_all(word, |caps: &regex::Captures<'_>| caps[1].to_uppercase())
        .into_owned()
}

/// Lower-case a camel-cased word, separating the words with underscores:
/// `CubaLibre` becomes `cuba_libre`, `NOT_STARTED` becomes `not_started`.
/// Namespace separators (`::`) become `/`.
pub fn underscore(word: &str) -> String {
    let word = word.replace("::", "/");
    let word = acronym_boundary_re().replace_all(&word, "${1}_${2}");
    let word = word_boundary_re().replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// Naive English singular of a lower-case word (`drinks` → `drink`,
/// `categories` → `category`).
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["sses", "uses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// The last `::`-separated segment of a qualified name.
pub fn demodulize(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camelize_segments() {
        assert_eq!(camelize("foo_bar"), "FooBar");
        assert_eq!(camelize("bar_foo"), "BarFoo");
        assert_eq!(camelize("rock"), "Rock");
        assert_eq!(camelize("hair_color"), "HairColor");
        assert_eq!(camelize("set_member64"), "SetMember64");
    }

    #[test]
    fn underscore_words() {
        assert_eq!(underscore("CubaLibre"), "cuba_libre");
        assert_eq!(underscore("NOT_STARTED"), "not_started");
        assert_eq!(underscore("RnB"), "rn_b");
        assert_eq!(underscore("HTTPServer"), "http_server");
        assert_eq!(underscore("MyNamespace::FooValue"), "my_namespace/foo_value");
    }

    #[test]
    fn camelize_inverts_underscore_for_camel_names() {
        for name in ["FooBar", "CubaLibre", "RnB", "SetMember64"] {
            assert_eq!(camelize(&underscore(name)), name);
        }
    }

    #[test]
    fn singular_forms() {
        assert_eq!(singularize("drinks"), "drink");
        assert_eq!(singularize("interests"), "interest");
        assert_eq!(singularize("music_styles"), "music_style");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("glass"), "glass");
        assert_eq!(singularize("music"), "music");
    }

    #[test]
    fn demodulize_takes_last_segment() {
        assert_eq!(demodulize("MyNamespace::FooValue"), "FooValue");
        assert_eq!(demodulize("Color"), "Color");
    }
}
