//! Lossy markup-to-text conversion used by the text based exporters
//!
//! This is a fixed substitution pipeline, not an HTML parser. Only the
//! entities `&nbsp; &amp; &lt; &gt; &quot;` are decoded; anything else is
//! left as written.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Bullet inserted for each list item
pub const BULLET: &str = "  \u{2022} ";

/// Replacement for a list-item open tag
const LIST_ITEM: &str = "\n  \u{2022} ";

struct Patterns {
    line_breaks: Regex,
    list_items: Regex,
    tags: Regex,
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(Patterns {
                line_breaks: Regex::new(r"(?i)<br\s*/?>|</p>|</div>|</h[1-6]>|</li>").ok()?,
                list_items: Regex::new(r"(?i)<li(\s[^>]*)?>").ok()?,
                tags: Regex::new(r"<[^>]+>").ok()?,
            })
        })
        .as_ref()
}

/// Strip tags from `html`, turning block ends into newlines
pub fn strip_markup(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let Some(p) = patterns() else {
        return html.to_string();
    };

    let text = p.line_breaks.replace_all(html, "\n");
    let text = p.list_items.replace_all(&text, LIST_ITEM);
    let text = p.tags.replace_all(&text, "");

    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_break() {
        assert_eq!(strip_markup("Hello<br>World"), "Hello\nWorld");
        assert_eq!(strip_markup("Hello<BR />World"), "Hello\nWorld");
    }

    #[test]
    fn test_blocks_and_lists() {
        let html = "<h1>Title</h1><p>First <strong>bold</strong></p><ul><li>one</li><li class=\"x\">two</li></ul>";
        assert_eq!(
            strip_markup(html),
            format!("Title\nFirst bold\n\n{BULLET}one\n\n{BULLET}two\n")
        );
    }

    #[test]
    fn test_list_item_starts_new_line() {
        assert_eq!(
            strip_markup("<p>Intro:</p>text<ul><li>one</li></ul>"),
            format!("Intro:\ntext\n{BULLET}one\n")
        );
    }

    #[test]
    fn test_entities() {
        assert_eq!(
            strip_markup("a&nbsp;&lt;b&gt; &amp; &quot;c&quot; &copy;"),
            "a <b> & \"c\" &copy;"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_markup("# Heading\n\nbody"), "# Heading\n\nbody");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_link_tag_is_not_list_item() {
        assert_eq!(strip_markup("<link rel=\"x\">text"), "text");
    }
}
