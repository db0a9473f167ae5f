//! Inline style declarations.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// CSS property name to value mapping for an element's inline `style`.
///
/// Names are kept verbatim (custom properties are case-sensitive). Inserting an existing name
/// replaces its value.
pub struct StyleMap {
    declarations: BTreeMap<String, String>,
}

impl StyleMap {
    /// Empty style map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an inline `style` attribute value such as `"width: 2rem; opacity: .5"`.
    ///
    /// Declarations are split on `;` outside quotes and brackets, so values like
    /// `url("data:image/png;base64,...")` stay whole. Blank declarations and declarations without
    /// a `:` are skipped.
    pub fn parse_inline(inline: &str) -> Self {
        split_declarations(inline)
            .into_iter()
            .filter_map(|declaration| {
                let (name, value) = declaration.split_once(':')?;
                let (name, value) = (name.trim(), value.trim());
                (!name.is_empty() && !value.is_empty()).then_some((name, value))
            })
            .collect()
    }

    /// Set a property, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.declarations.insert(name.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value for a property, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations.get(name).map(String::as_str)
    }

    /// Whether a property is set.
    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the map has no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Serialize to an inline `style` value, or `None` when there is nothing to emit.
    ///
    /// Declarations that would not stay a single declaration are left out, so the output always
    /// parses back to the same name/value pairs.
    pub fn to_inline(&self) -> Option<String> {
        let declarations = self
            .iter()
            .filter(|(name, value)| is_declaration(name, value))
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>();
        (!declarations.is_empty()).then(|| declarations.join(" "))
    }
}

/// Whether `name: value` stays a single declaration when written into a `style` attribute.
///
/// The name must be a plain or custom property identifier. The value must not end the
/// declaration early: no `;` outside quotes or brackets, no braces, and every quote, bracket and
/// escape closed.
pub(crate) fn is_declaration(name: &str, value: &str) -> bool {
    is_property_name(name) && !value.trim().is_empty() && {
        let scan = Scan::of(value);
        scan.balanced && scan.separators.is_empty()
    }
}

fn is_property_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') || !ch.is_ascii())
}

fn split_declarations(inline: &str) -> Vec<&str> {
    let mut declarations = Vec::new();
    let mut start = 0;
    for separator in Scan::of(inline).separators {
        declarations.push(&inline[start..separator]);
        start = separator + 1;
    }
    declarations.push(&inline[start..]);
    declarations
}

/// Top-level `;` positions of a style fragment and whether its quotes and brackets close.
struct Scan {
    separators: Vec<usize>,
    balanced: bool,
}

impl Scan {
    fn of(text: &str) -> Self {
        let mut separators = Vec::new();
        let mut open = Vec::new();
        let mut quote = None;
        let mut escaped = false;
        let mut balanced = true;
        for (index, ch) in text.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match (quote, ch) {
                (_, '\\') => escaped = true,
                (Some(q), _) if ch == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '(') => open.push(')'),
                (None, '[') => open.push(']'),
                (None, ')' | ']') => balanced &= open.pop() == Some(ch),
                (None, '{' | '}') => balanced = false,
                (None, ';') if open.is_empty() => separators.push(index),
                _ => {}
            }
        }
        Self {
            separators,
            balanced: balanced && quote.is_none() && open.is_empty() && !escaped,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for StyleMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_inline_skips_blank_and_malformed_declarations() {
        let map = StyleMap::parse_inline(" width : 2rem;; bogus ; opacity:0.5 ; :x; y: ;");
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![("opacity", "0.5"), ("width", "2rem")]
        );
    }

    #[test]
    fn parse_inline_keeps_colons_inside_values() {
        let map = StyleMap::parse_inline("background-image: url(http://x/y.png)");
        assert_eq!(map.get("background-image"), Some("url(http://x/y.png)"));
    }

    #[test]
    fn parse_inline_keeps_separators_inside_quotes_and_brackets() {
        let map = StyleMap::parse_inline(
            r#"background-image: url("data:image/png;base64,AAAA"); margin: 0; content: ';'"#,
        );
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![
                ("background-image", r#"url("data:image/png;base64,AAAA")"#),
                ("content", "';'"),
                ("margin", "0"),
            ]
        );
    }

    #[test]
    fn declaration_check_rejects_values_that_escape() {
        assert!(is_declaration("--spinner-color", "rgb(0 0 0 / 50%)"));
        assert!(is_declaration("font-family", r#""A;B", serif"#));
        assert!(!is_declaration("--spinner-color", "red; display: none"));
        assert!(!is_declaration("--spinner-color", "url(x"));
        assert!(!is_declaration("--spinner-color", "red)"));
        assert!(!is_declaration("--spinner-color", "\"open"));
        assert!(!is_declaration("--spinner-color", "} body { color: red"));
        assert!(!is_declaration("--spinner-color", "red\\"));
        assert!(!is_declaration("color: red; x", "1"));
        assert!(!is_declaration("margin", "  "));
    }

    #[test]
    fn to_inline_leaves_out_escaping_declarations() {
        let map = StyleMap::new()
            .with("--spinner-color", "red; display: none")
            .with("margin", "0");
        assert_eq!(map.to_inline(), Some("margin: 0;".to_string()));
        assert_eq!(
            StyleMap::new().with("width", "calc(1px").to_inline(),
            None
        );
    }

    #[test]
    fn insert_replaces_existing_value() {
        let map = StyleMap::new()
            .with("--spinner-color", "red")
            .with("--spinner-color", "blue");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("--spinner-color"), Some("blue"));
    }

    #[test]
    fn to_inline_is_none_for_empty_map() {
        assert_eq!(StyleMap::new().to_inline(), None);
        assert_eq!(
            StyleMap::from_iter([("margin", "0"), ("--spinner-color", "#fff")]).to_inline(),
            Some("--spinner-color: #fff; margin: 0;".to_string())
        );
    }
}
