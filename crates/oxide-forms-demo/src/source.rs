//! Source listings of the demo module.
//!
//! The demo source is embedded at compile time. Each demo page shows its
//! own function, and `/allcode/` shows the whole file with that function
//! highlighted.

use oxide_forms::widgets::html_escape;

/// The demo module, as compiled.
pub const SOURCE: &str = include_str!("demos.rs");

/// Stylesheet for listings, served at `/code.css`.
pub const CSS: &str = "\
.highlight { background: #f8f8f8; font-size: 0.85rem; }\n\
.highlight pre { margin: 0; padding: 0.75rem; overflow-x: auto; }\n\
.highlight .hll { background-color: #ffffcc; display: inline-block; width: 100%; }\n\
.linenos { color: #999; text-align: right; user-select: none; \
padding-right: 0.75rem; border-right: 1px solid #ddd; }\n\
.linenos a { color: inherit; text-decoration: none; }\n\
.code-listing td { vertical-align: top; }";

/// `Cache-Control` value for the stylesheet.
pub const CSS_CACHE_CONTROL: &str = "max-age=360";

/// A demo function's source and its 1-based `[start, end)` line bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnippet {
    /// Source text of the function.
    pub code: String,
    /// First line.
    pub start: usize,
    /// One past the last line.
    pub end: usize,
}

impl SourceSnippet {
    /// Link to the full listing with this snippet highlighted.
    pub fn allcode_url(&self) -> String {
        format!("/allcode/?start={}&end={}#line-{}", self.start, self.end, self.start)
    }

    /// The snippet as an escaped `<pre>` block.
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="highlight"><pre>{}</pre></div>"#,
            html_escape(&self.code)
        )
    }
}

/// Finds the top-level function `name` in [`SOURCE`].
pub fn locate(name: &str) -> Option<SourceSnippet> {
    locate_in(SOURCE, name)
}

fn locate_in(source: &str, name: &str) -> Option<SourceSnippet> {
    let signature = format!("pub fn {name}(");
    let lines: Vec<&str> = source.lines().collect();
    let first = lines.iter().position(|l| l.starts_with(&signature))?;
    let last = first + lines[first..].iter().position(|l| *l == "}")?;

    Some(SourceSnippet {
        code: lines[first..=last].join("\n"),
        start: first + 1,
        end: last + 2,
    })
}

/// Renders the whole demo source with numbered, anchored lines.
///
/// Lines in `[start, end)` get the `hll` class.
pub fn render_listing(highlight: Option<(usize, usize)>) -> String {
    render_listing_of(SOURCE, highlight)
}

fn render_listing_of(source: &str, highlight: Option<(usize, usize)>) -> String {
    let mut numbers = String::new();
    let mut code = String::new();
    for (idx, line) in source.lines().enumerate() {
        let n = idx + 1;
        numbers.push_str(&format!(r##"<a href="#line-{n}">{n}</a>"##));
        numbers.push('\n');

        let text = html_escape(line);
        let lit = highlight.is_some_and(|(start, end)| (start..end).contains(&n));
        if lit {
            code.push_str(&format!(r#"<a id="line-{n}"></a><span class="hll">{text}</span>"#));
        } else {
            code.push_str(&format!(r#"<a id="line-{n}"></a>{text}"#));
        }
        code.push('\n');
    }

    format!(
        r#"<table class="code-listing highlight"><tr>
            <td class="linenos"><pre>{numbers}</pre></td>
            <td class="code"><pre>{code}</pre></td>
        </tr></table>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "use x;\n\npub fn alpha(a: u8) -> u8 {\n    a + 1\n}\n\npub fn beta() {\n    if true {\n    }\n}\n";

    #[test]
    fn test_locate_bounds() {
        let snippet = locate_in(SAMPLE, "alpha").unwrap();
        assert_eq!(snippet.start, 3);
        assert_eq!(snippet.end, 6);
        assert_eq!(snippet.code, "pub fn alpha(a: u8) -> u8 {\n    a + 1\n}");
    }

    #[test]
    fn test_locate_skips_nested_braces() {
        let snippet = locate_in(SAMPLE, "beta").unwrap();
        assert_eq!((snippet.start, snippet.end), (7, 11));
    }

    #[test]
    fn test_locate_missing() {
        assert!(locate_in(SAMPLE, "gamma").is_none());
        assert!(locate_in(SAMPLE, "alph").is_none());
    }

    #[test]
    fn test_every_demo_is_located() {
        for demo in crate::demos::DEMOS {
            let snippet = locate(demo.name).unwrap();
            assert!(snippet.code.starts_with(&format!("pub fn {}(", demo.name)));
            assert!(snippet.end > snippet.start);
        }
    }

    #[test]
    fn test_listing_highlights_range() {
        let html = render_listing_of(SAMPLE, Some((3, 6)));
        assert!(html.contains(r#"<a id="line-3"></a><span class="hll">pub fn alpha"#));
        assert!(html.contains(r#"<a id="line-6"></a>"#));
        assert!(!html.contains(r#"<span class="hll">pub fn beta"#));
        assert!(html.contains("-&gt; u8"));
    }

    #[test]
    fn test_listing_without_highlight() {
        assert!(!render_listing_of(SAMPLE, None).contains("hll\">"));
    }

    #[test]
    fn test_allcode_url() {
        let snippet = SourceSnippet {
            code: String::new(),
            start: 10,
            end: 20,
        };
        assert_eq!(snippet.allcode_url(), "/allcode/?start=10&end=20#line-10");
    }
}
