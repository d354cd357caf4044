//! Minimal Markdown renderer for the editor preview pane.
//!
//! Three separate passes: a line classifier producing a block sequence, an
//! inline-span tokenizer, and an HTML emission pass. Each construct is
//! handled exactly once, so no rule can re-match text produced by an
//! earlier rule.
//!
//! The output is a raw HTML fragment. Body text is NOT escaped or
//! sanitized; an embedded `<script>` tag passes through verbatim. That is
//! an accepted risk of this renderer, which only ever feeds the author's
//! own preview pane.
//!
//! This is deliberate minimalism, not full Markdown: no `<br>` conversion,
//! no paragraph wrapping, and list items are emitted as bare `<li>`
//! elements without a `<ul>`/`<ol>` container (the rich variant in
//! [`crate::preview`] delegates those to a compliant engine instead).

use std::sync::OnceLock;

use regex::Regex;

/// Render a Markdown/MDX body to an HTML fragment.
///
/// Pure and deterministic: the same input always produces the same output.
pub fn render(body: &str) -> String {
    emit(&classify(body))
}

/// A classified block-level element.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    /// ATX heading, levels 1-3.
    Heading { level: u8, text: String },
    /// One `* item` or `1. item` line.
    ListItem { text: String },
    /// One `> text` line.
    Blockquote { text: String },
    /// Fenced code block content, verbatim.
    Code { text: String },
    /// Pipe table with an optional header row.
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// A plain line, emitted with inline spans resolved.
    Text { text: String },
    /// An empty line, preserved as vertical spacing in the fragment.
    Blank,
}

/// Classify the body into a block sequence.
///
/// Fenced code blocks are resolved here, before any inline processing, so
/// a single backtick inside a fence can never open an inline code span.
fn classify(body: &str) -> Vec<Block> {
    let lines: Vec<&str> = body.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim_start().starts_with("```") {
            let mut content = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim_start().starts_with("```") {
                content.push(lines[i]);
                i += 1;
            }
            // Skip the closing fence; an unclosed fence runs to the end.
            i += 1;
            blocks.push(Block::Code {
                text: content.join("\n"),
            });
            continue;
        }

        if is_pipe_row(line) {
            let start = i;
            while i < lines.len() && is_pipe_row(lines[i]) {
                i += 1;
            }
            classify_table_group(&lines[start..i], &mut blocks);
            continue;
        }

        blocks.push(classify_line(line));
        i += 1;
    }

    blocks
}

/// Classify a single non-table, non-fence line.
fn classify_line(line: &str) -> Block {
    if line.is_empty() {
        return Block::Blank;
    }

    for (level, marker) in [(3u8, "### "), (2, "## "), (1, "# ")] {
        if let Some(text) = line.strip_prefix(marker) {
            return Block::Heading {
                level,
                text: text.to_string(),
            };
        }
    }

    if let Some(text) = line.strip_prefix("> ") {
        return Block::Blockquote {
            text: text.to_string(),
        };
    }

    if let Some(text) = line.strip_prefix("* ") {
        return Block::ListItem {
            text: text.to_string(),
        };
    }

    if let Some(text) = ordered_item(line) {
        return Block::ListItem {
            text: text.to_string(),
        };
    }

    Block::Text {
        text: line.to_string(),
    }
}

/// Match `1. item` style lines, returning the item text.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn is_pipe_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Split a pipe row into trimmed cells, dropping the outer empty segments
/// produced by leading/trailing pipes.
fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

/// A separator row has every cell made of (at least three) dashes.
fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| c.len() >= 3 && c.chars().all(|ch| ch == '-'))
}

/// Structure a run of consecutive pipe rows into table blocks.
///
/// A separator row is dropped; the row immediately preceding it becomes the
/// header of a table, and following rows are its body until the row that
/// serves as the next table's header. Back-to-back tables therefore never
/// emit an empty wrapper element: a table with no header and no rows is
/// discarded. Pipe rows before the first header fall back to plain text.
fn classify_table_group(group: &[&str], blocks: &mut Vec<Block>) {
    let cells: Vec<Vec<String>> = group.iter().map(|l| split_cells(l)).collect();
    let separators: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, c)| is_separator(c))
        .map(|(idx, _)| idx)
        .collect();

    if separators.is_empty() {
        for line in group {
            blocks.push(Block::Text {
                text: (*line).to_string(),
            });
        }
        return;
    }

    // Rows before the first header are not part of any table.
    let first_header = separators[0].saturating_sub(1);
    for line in &group[..first_header] {
        blocks.push(Block::Text {
            text: (*line).to_string(),
        });
    }

    for (k, &sep) in separators.iter().enumerate() {
        let header = if sep > 0 && !separators.contains(&(sep - 1)) {
            cells[sep - 1].clone()
        } else {
            Vec::new()
        };

        // Body runs up to the next table's header row (the line just
        // before the next separator), or to the end of the group.
        let body_end = match separators.get(k + 1) {
            Some(&next) => next.saturating_sub(1).max(sep + 1),
            None => cells.len(),
        };
        let rows: Vec<Vec<String>> = cells[sep + 1..body_end.min(cells.len())].to_vec();

        if header.is_empty() && rows.is_empty() {
            continue;
        }
        blocks.push(Block::Table { header, rows });
    }
}

/// Emit the block sequence as an HTML fragment, one block per line.
fn emit(blocks: &[Block]) -> String {
    let mut out = Vec::with_capacity(blocks.len());

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                out.push(format!("<h{level}>{}</h{level}>", inline(text)));
            }
            Block::ListItem { text } => out.push(format!("<li>{}</li>", inline(text))),
            Block::Blockquote { text } => {
                out.push(format!("<blockquote>{}</blockquote>", inline(text)));
            }
            Block::Code { text } => out.push(format!("<pre><code>{text}</code></pre>")),
            Block::Table { header, rows } => out.push(emit_table(header, rows)),
            Block::Text { text } => out.push(inline(text)),
            Block::Blank => out.push(String::new()),
        }
    }

    out.join("\n")
}

fn emit_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table>");

    if !header.is_empty() {
        html.push_str("<thead><tr>");
        for cell in header {
            html.push_str(&format!("<th>{}</th>", inline(cell)));
        }
        html.push_str("</tr></thead>");
    }

    if !rows.is_empty() {
        html.push_str("<tbody>");
        for row in rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", inline(cell)));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody>");
    }

    html.push_str("</table>");
    html
}

/// Inline span kinds, in tie-breaking priority order.
///
/// Bold sits above italic so that `**x**` is never consumed as an empty
/// italic; the image pattern sits above the link pattern so its leading
/// `!` keeps it from being swallowed.
#[derive(Debug, Clone, Copy)]
enum Span {
    Image,
    Link,
    Bold,
    Italic,
    Code,
}

fn patterns() -> &'static [(Span, Regex)] {
    static PATTERNS: OnceLock<Vec<(Span, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (Span::Image, Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap()),
            (Span::Link, Regex::new(r"\[([^\]]+)\]\(([^)]*)\)").unwrap()),
            (Span::Bold, Regex::new(r"\*\*(.+?)\*\*").unwrap()),
            (Span::Italic, Regex::new(r"\*([^*]+)\*").unwrap()),
            (Span::Code, Regex::new(r"`([^`]+)`").unwrap()),
        ]
    })
}

/// Resolve inline spans by repeatedly taking the earliest match; ties go to
/// the higher-priority pattern. Emphasis and link text are tokenized
/// recursively; code span content and URLs stay literal.
fn inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let earliest = patterns()
            .iter()
            .filter_map(|(kind, re)| re.captures(rest).map(|caps| (*kind, caps)))
            .min_by_key(|(_, caps)| caps.get(0).map_or(usize::MAX, |m| m.start()));

        let Some((kind, caps)) = earliest else {
            out.push_str(rest);
            break;
        };

        let whole = caps.get(0).expect("capture group 0 always present");
        out.push_str(&rest[..whole.start()]);

        match kind {
            Span::Image => {
                let alt = &caps[1];
                let url = &caps[2];
                out.push_str(&format!("<img src=\"{url}\" alt=\"{alt}\">"));
            }
            Span::Link => {
                let label = inline(&caps[1]);
                let url = &caps[2];
                out.push_str(&format!("<a href=\"{url}\">{label}</a>"));
            }
            Span::Bold => out.push_str(&format!("<strong>{}</strong>", inline(&caps[1]))),
            Span::Italic => out.push_str(&format!("<em>{}</em>", inline(&caps[1]))),
            Span::Code => out.push_str(&format!("<code>{}</code>", &caps[1])),
        }

        rest = &rest[whole.end()..];
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn renders_headings() {
        assert_eq!(render("# One"), "<h1>One</h1>");
        assert_eq!(render("## Two"), "<h2>Two</h2>");
        assert_eq!(render("### Three"), "<h3>Three</h3>");
        // Level 4 is not part of this renderer.
        assert_eq!(render("#### Four"), "#### Four");
    }

    #[test]
    fn renders_bold_and_italic() {
        assert_eq!(
            render("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn nests_emphasis_inside_bold() {
        assert_eq!(
            render("**a *b* c**"),
            "<strong>a <em>b</em> c</strong>"
        );
    }

    #[test]
    fn fenced_block_protects_single_backticks() {
        let input = "```\nlet s = `template`;\n```";
        assert_eq!(render(input), "<pre><code>let s = `template`;</code></pre>");
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let input = "```\ncode line";
        assert_eq!(render(input), "<pre><code>code line</code></pre>");
    }

    #[test]
    fn renders_inline_code() {
        assert_eq!(render("use `foo()` here"), "use <code>foo()</code> here");
    }

    #[test]
    fn code_span_content_stays_literal() {
        assert_eq!(render("`*not italic*`"), "<code>*not italic*</code>");
    }

    #[test]
    fn renders_links_and_images() {
        assert_eq!(
            render("[docs](https://example.com)"),
            "<a href=\"https://example.com\">docs</a>"
        );
        assert_eq!(
            render("![logo](/logo.png)"),
            "<img src=\"/logo.png\" alt=\"logo\">"
        );
    }

    #[test]
    fn image_is_not_swallowed_by_link_pattern() {
        assert_eq!(
            render("see ![alt](a.png) and [text](b.html)"),
            "see <img src=\"a.png\" alt=\"alt\"> and <a href=\"b.html\">text</a>"
        );
    }

    #[test]
    fn renders_list_items_without_wrapper() {
        assert_eq!(
            render("* first\n* second\n1. third"),
            "<li>first</li>\n<li>second</li>\n<li>third</li>"
        );
    }

    #[test]
    fn renders_blockquote() {
        assert_eq!(render("> quoted"), "<blockquote>quoted</blockquote>");
    }

    #[test]
    fn renders_single_table() {
        let input = "| A | B |\n|---|---|\n| 1 | 2 |";
        assert_eq!(
            render(input),
            "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn back_to_back_tables_emit_no_empty_wrappers() {
        let input = "| A |\n|---|\n| 1 |\n| B |\n|---|\n| 2 |";
        let html = render(input);

        assert_eq!(html.matches("<table>").count(), 2);
        assert!(!html.contains("<table></table>"));
        assert!(html.contains("<th>A</th>"));
        assert!(html.contains("<th>B</th>"));
        assert!(html.contains("<td>1</td>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn pipe_rows_without_separator_stay_text() {
        assert_eq!(render("| not | a table |"), "| not | a table |");
    }

    #[test]
    fn plain_lines_pass_through_without_wrapping() {
        assert_eq!(render("just a line\n\nanother"), "just a line\n\nanother");
    }

    #[test]
    fn script_tags_pass_through_unescaped() {
        // Accepted risk, documented on the module: no sanitization.
        assert_eq!(render("<script>alert(1)</script>"), "<script>alert(1)</script>");
    }

    #[test]
    fn is_deterministic() {
        let input = "# T\n**b** *i* `c`\n| A |\n|---|\n| 1 |";
        assert_eq!(render(input), render(input));
    }
}
