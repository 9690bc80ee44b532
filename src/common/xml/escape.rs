use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("XML escape patterns are valid")
});

/// Whether `c` may appear in an XML 1.0 document.
#[inline]
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Escape XML special characters.
///
/// Used for every piece of user text that ends up in a slide, such as chart
/// titles, page names and picture descriptions. Characters XML 1.0 does not
/// allow (control characters other than tab, newline and carriage return)
/// are dropped.
///
/// # Examples
///
/// ```
/// use chartdeck::common::xml::escape_xml;
/// assert_eq!(escape_xml("R&D"), "R&amp;D");
/// assert_eq!(escape_xml("<Q1 \"Sales\">"), "&lt;Q1 &quot;Sales&quot;&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    const REPLACEMENTS: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];
    if s.chars().all(is_xml_char) {
        XML_ESCAPER.replace_all(s, &REPLACEMENTS)
    } else {
        let cleaned: String = s.chars().filter(|&c| is_xml_char(c)).collect();
        XML_ESCAPER.replace_all(&cleaned, &REPLACEMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_entities() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("it's"), "it&apos;s");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_xml("Performance - Chart 1"), "Performance - Chart 1");
        assert_eq!(escape_xml(""), "");
    }

    #[test]
    fn test_illegal_characters_dropped() {
        assert_eq!(escape_xml("Sales\u{1}\u{1F} & Ops\u{FFFF}"), "Sales &amp; Ops");
        assert_eq!(escape_xml("a\tb\nc\rd"), "a\tb\nc\rd");
        assert_eq!(escape_xml("Café 📈"), "Café 📈");
    }
}
