//! Markdown-like generated text → styled HTML.
//!
//! A single pass over the text's lines. Each line is classified on its own
//! by its leading token after trimming:
//!
//! | leading token | block |
//! |---|---|
//! | `### ` | `<h3>` |
//! | `## ` | `<h2>` |
//! | `# ` | `<h1>` |
//! | `- ` or `* ` | `<ul><li>` (one list per item) |
//! | anything else, non-blank | `<p>` |
//! | blank | nothing |
//!
//! The block sequence is wrapped in a fixed head/body shell with an embedded
//! style sheet.

mod shell;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Style class of one markup block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    ListItem,
    Paragraph,
}

/// One styled unit derived from one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Line content with the leading marker and surrounding whitespace removed.
    pub text: String,
}

impl Block {
    /// Serialize the block. With `escape`, HTML-reserved characters in the
    /// text are replaced by entities.
    pub fn to_html(&self, escape: bool) -> String {
        let text = if escape {
            escape_html(&self.text)
        } else {
            self.text.clone()
        };
        match self.kind {
            BlockKind::Heading1 => format!("<h1>{text}</h1>"),
            BlockKind::Heading2 => format!("<h2>{text}</h2>"),
            BlockKind::Heading3 => format!("<h3>{text}</h3>"),
            BlockKind::ListItem => format!("<ul><li>{text}</li></ul>"),
            BlockKind::Paragraph => format!("<p>{text}</p>"),
        }
    }
}

/// The ordered block sequence of a generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledDocument {
    pub blocks: Vec<Block>,
}

impl StyledDocument {
    /// The blocks concatenated in order, without the document shell.
    pub fn body_html(&self, escape: bool) -> String {
        self.blocks.iter().map(|b| b.to_html(escape)).collect()
    }

    /// The complete HTML document: shell head, blocks, shell tail.
    pub fn to_html(&self, escape: bool) -> String {
        let body = self.body_html(escape);
        let mut html = String::with_capacity(shell::HEAD.len() + body.len() + shell::TAIL.len());
        html.push_str(shell::HEAD);
        html.push_str(&body);
        html.push_str(shell::TAIL);
        html
    }
}

// ---------------------------------------------------------------------------
// Formatter
// ---------------------------------------------------------------------------

/// Classify every line of `text` and collect the resulting blocks.
#[instrument(skip(text), fields(chars = text.len()))]
pub fn format_document(text: &str) -> StyledDocument {
    let blocks: Vec<Block> = text.lines().filter_map(classify_line).collect();
    debug!(blocks = blocks.len(), "formatted document");
    StyledDocument { blocks }
}

/// Classify one line. Returns `None` for blank lines.
pub fn classify_line(line: &str) -> Option<Block> {
    static HEADING_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(#{1,3}) (.*)$").expect("valid regex"));

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = HEADING_RE.captures(trimmed) {
        let kind = match caps[1].len() {
            1 => BlockKind::Heading1,
            2 => BlockKind::Heading2,
            _ => BlockKind::Heading3,
        };
        return Some(Block {
            kind,
            text: caps[2].trim().to_string(),
        });
    }

    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Some(Block {
            kind: BlockKind::ListItem,
            text: item.trim().to_string(),
        });
    }

    Some(Block {
        kind: BlockKind::Paragraph,
        text: trimmed.to_string(),
    })
}

/// Replace HTML-reserved characters with entities.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: BlockKind, text: &str) -> Block {
        Block {
            kind,
            text: text.to_string(),
        }
    }

    fn kind_of(line: &str) -> Option<BlockKind> {
        classify_line(line).map(|b| b.kind)
    }

    #[test]
    fn one_of_each_line_type_in_order() {
        let doc = format_document("# Title\n## Sec\n### Sub\n- item\nplain text\n\n");
        let expected = vec![
            block(BlockKind::Heading1, "Title"),
            block(BlockKind::Heading2, "Sec"),
            block(BlockKind::Heading3, "Sub"),
            block(BlockKind::ListItem, "item"),
            block(BlockKind::Paragraph, "plain text"),
        ];
        assert_eq!(doc.blocks, expected);
        assert_eq!(
            doc.body_html(true),
            "<h1>Title</h1><h2>Sec</h2><h3>Sub</h3><ul><li>item</li></ul><p>plain text</p>"
        );
    }

    #[test]
    fn classification_ignores_surrounding_whitespace() {
        assert_eq!(kind_of("   ## Indented"), Some(BlockKind::Heading2));
        assert_eq!(kind_of("\t* star item  "), Some(BlockKind::ListItem));
        assert_eq!(kind_of("  \t "), None);
        assert_eq!(kind_of(""), None);
    }

    #[test]
    fn deeper_or_unspaced_markers_are_paragraphs() {
        assert_eq!(kind_of("#### Too deep"), Some(BlockKind::Paragraph));
        assert_eq!(kind_of("#NoSpace"), Some(BlockKind::Paragraph));
        assert_eq!(kind_of("-dash"), Some(BlockKind::Paragraph));
        assert_eq!(kind_of("**Bold lead**"), Some(BlockKind::Paragraph));
        assert_eq!(kind_of("#"), Some(BlockKind::Paragraph));
    }

    #[test]
    fn marker_and_extra_spaces_are_stripped() {
        let block = classify_line("###    Spaced   ").unwrap();
        assert_eq!(block.kind, BlockKind::Heading3);
        assert_eq!(block.text, "Spaced");

        let block = classify_line("  -   item  ").unwrap();
        assert_eq!(block.text, "item");
    }

    #[test]
    fn only_the_leading_marker_is_removed() {
        let block = classify_line("## Section ## two").unwrap();
        assert_eq!(block.text, "Section ## two");
    }

    #[test]
    fn consecutive_list_items_are_not_merged() {
        let doc = format_document("- a\n- b");
        assert_eq!(doc.body_html(true), "<ul><li>a</li></ul><ul><li>b</li></ul>");
    }

    #[test]
    fn escaping_is_applied_when_requested() {
        let doc = format_document("Use <script> & \"quotes\"");
        assert_eq!(
            doc.body_html(true),
            "<p>Use &lt;script&gt; &amp; &quot;quotes&quot;</p>"
        );
        assert_eq!(doc.body_html(false), "<p>Use <script> & \"quotes\"</p>");
    }

    #[test]
    fn full_document_is_wrapped_in_shell() {
        let html = format_document("# SRS\nThis is a test.").to_html(true);
        assert!(html.starts_with("<html>"));
        assert!(html.contains("font-family: 'Times New Roman', serif;"));
        assert!(html.contains("text-align: justify;"));
        assert!(html.ends_with("<h1>SRS</h1><p>This is a test.</p></body></html>"));
    }

    #[test]
    fn crlf_lines_are_handled() {
        let doc = format_document("# A\r\nbody\r\n");
        assert_eq!(doc.body_html(true), "<h1>A</h1><p>body</p>");
    }
}
