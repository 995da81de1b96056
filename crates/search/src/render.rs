//! Escaped markup for searched text.
//!
//! Every match becomes `<mark class="match" data-match-index="N">`. The
//! current match is flagged afterwards by [`mark_current`], which rewrites
//! only the two affected opening tags.

use std::fmt::Write as _;

use crate::matcher::MatchSpan;

pub const MATCH_CLASS: &str = "match";
pub const CURRENT_CLASS: &str = "current";

pub fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

/// Renders `text` with each span in `matches` wrapped in a highlight marker.
///
/// Spans must be ordered and non-overlapping; a span that is out of order or
/// does not fall on character boundaries is rendered as plain text.
pub fn render(text: &str, matches: &[MatchSpan]) -> String {
    let mut out = String::with_capacity(text.len() + matches.len() * 48);
    let mut cursor = 0;

    for (index, span) in matches.iter().enumerate() {
        if span.start < cursor {
            continue;
        }
        let (Some(before), Some(hit)) = (text.get(cursor..span.start), text.get(span.range()))
        else {
            continue;
        };

        escape_into(&mut out, before);
        out.push_str(&open_tag(index, false));
        escape_into(&mut out, hit);
        out.push_str("</mark>");
        cursor = span.end;
    }

    escape_into(&mut out, &text[cursor..]);
    out
}

fn open_tag(index: usize, current: bool) -> String {
    let mut tag = String::with_capacity(48);
    let _ = write!(tag, "<mark class=\"{MATCH_CLASS}");
    if current {
        let _ = write!(tag, " {CURRENT_CLASS}");
    }
    let _ = write!(tag, "\" data-match-index=\"{index}\">");
    tag
}

/// Moves the current-match flag from `previous` to `current`.
///
/// Indices without a marker in `markup` are ignored.
pub fn mark_current(markup: &str, previous: Option<usize>, current: usize) -> String {
    let mut out = match previous {
        Some(previous) if previous != current => {
            markup.replacen(&open_tag(previous, true), &open_tag(previous, false), 1)
        }
        _ => markup.to_string(),
    };

    let plain = open_tag(current, false);
    if out.contains(&plain) {
        out = out.replacen(&plain, &open_tag(current, true), 1);
    }
    out
}

/// Returns the index of the match currently flagged in `markup`.
pub fn current_marker(markup: &str) -> Option<usize> {
    let needle = format!("<mark class=\"{MATCH_CLASS} {CURRENT_CLASS}\" data-match-index=\"");
    let start = markup.find(&needle)? + needle.len();
    let digits = markup[start..]
        .split('"')
        .next()
        .unwrap_or_default();
    digits.parse().ok()
}

/// Drops all tags and decodes entities, recovering the original text.
pub fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(pos) = rest.find(['<', '&']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('<') {
            match rest.find('>') {
                Some(end) => rest = &rest[end + 1..],
                None => {
                    out.push_str(rest);
                    return out;
                }
            }
            continue;
        }

        let decoded = [
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&amp;", '&'),
            ("&quot;", '"'),
            ("&#39;", '\''),
        ]
        .into_iter()
        .find(|(entity, _)| rest.starts_with(entity));

        match decoded {
            Some((entity, c)) => {
                out.push(c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DEFAULT_MAX_MATCHES, SearchMode, compile, find_matches};

    fn search(text: &str, query: &str, mode: SearchMode) -> Vec<MatchSpan> {
        let pattern = compile(query, mode).unwrap().unwrap();
        find_matches(text, &pattern, DEFAULT_MAX_MATCHES)
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn render_wraps_matches_with_ordinals() {
        let text = "abcabcabc";
        let html = render(text, &search(text, "abc", SearchMode::Plain));
        assert_eq!(
            html,
            "<mark class=\"match\" data-match-index=\"0\">abc</mark>\
             <mark class=\"match\" data-match-index=\"1\">abc</mark>\
             <mark class=\"match\" data-match-index=\"2\">abc</mark>"
        );
    }

    #[test]
    fn render_escapes_match_content_and_surroundings() {
        let text = "<b>bold</b> & <script>";
        let html = render(text, &search(text, "<script>", SearchMode::Plain));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains(">&lt;script&gt;</mark>"));
    }

    #[test]
    fn render_without_matches_is_plain_escape() {
        assert_eq!(render("a < b", &[]), "a &lt; b");
    }

    #[test]
    fn render_then_strip_round_trips() {
        let samples = [
            ("", "a"),
            ("plain text", "text"),
            ("x<y && y>z \"q\" 'p'", "y"),
            ("caf\u{e9} CAF\u{c9}", "caf\u{e9}"),
            ("&amp; literal entity", "amp"),
            ("<mark class=\"match\">", "mark"),
        ];
        for (text, query) in samples {
            let html = render(text, &search(text, query, SearchMode::Plain));
            assert_eq!(strip_markup(&html), text, "round trip failed for {text:?}");
        }
    }

    #[test]
    fn render_skips_bad_spans() {
        let text = "h\u{e9}llo";
        let html = render(text, &[MatchSpan::new(2, 3), MatchSpan::new(0, 1)]);
        assert_eq!(strip_markup(&html), text);
        assert!(!html.contains("data-match-index=\"0\""));
    }

    #[test]
    fn mark_current_moves_single_flag() {
        let text = "one two one two";
        let html = render(text, &search(text, "one", SearchMode::Plain));

        let first = mark_current(&html, None, 0);
        assert_eq!(current_marker(&first), Some(0));
        assert_eq!(first.matches(CURRENT_CLASS).count(), 1);

        let second = mark_current(&first, Some(0), 1);
        assert_eq!(current_marker(&second), Some(1));
        assert_eq!(second.matches(CURRENT_CLASS).count(), 1);
        assert_eq!(strip_markup(&second), text);
    }

    #[test]
    fn mark_current_ignores_unknown_index() {
        let html = render("abc", &search("abc", "b", SearchMode::Plain));
        assert_eq!(mark_current(&html, None, 7), html);
        assert_eq!(current_marker(&html), None);
    }
}
