//! Text sanitization applied to user-supplied fields before persistence.

/// Character references produced by [`escape_html`]. An `&` that already starts
/// one of these is left alone so escaping an escaped string is a no-op.
const KNOWN_REFERENCES: [&str; 6] = ["amp;", "lt;", "gt;", "quot;", "#34;", "#39;"];

/// Escape the five HTML-significant characters: `<`, `>`, `&`, `'` and `"`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (idx, ch) in input.char_indices() {
        match ch {
            '&' => {
                let rest = &input[idx + 1..];
                if KNOWN_REFERENCES.iter().any(|r| rest.starts_with(r)) {
                    out.push('&');
                } else {
                    out.push_str("&amp;");
                }
            }
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            other => out.push(other),
        }
    }
    out
}

/// Trim surrounding whitespace, then escape.
pub fn clean_text(input: &str) -> String {
    escape_html(input.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&#34;Tom&#34; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(escape_html("The Matrix (1999)"), "The Matrix (1999)");
    }

    #[test]
    fn trims_before_escaping() {
        assert_eq!(clean_text("   <i>Alien</i>\n"), "&lt;i&gt;Alien&lt;/i&gt;");
        assert_eq!(clean_text(" \t "), "");
    }

    #[test]
    fn escaping_is_idempotent() {
        let inputs = ["Fish & Chips", "<script>", "\"quoted\"", "it's", "&amp already", "a&&b"];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "second pass changed {input:?}");
        }
    }

    #[test]
    fn bare_ampersand_is_escaped() {
        assert_eq!(escape_html("R&D"), "R&amp;D");
        assert_eq!(escape_html("&amp"), "&amp;amp");
    }
}
