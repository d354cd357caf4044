//! Parsing of the completion output into article fields.

/// Article fields recovered from free-text completion output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedArticle {
    pub title: String,
    pub description: String,
    pub content: String,
}

impl GeneratedArticle {
    /// Split completion text into title, description, and body.
    ///
    /// The text is split into newline-delimited non-empty lines: the first
    /// line (minus a literal `Title:` prefix) becomes the title, the
    /// second (minus `Description:`) the description, and the remaining
    /// lines are rejoined with newlines as the body. This never fails:
    /// missing prefixes leave the line as-is, and fewer than three
    /// non-empty lines leave the remaining fields empty.
    pub fn from_completion(text: &str) -> Self {
        let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();

        Self {
            title: lines
                .first()
                .map(|l| strip_label(l, "Title:"))
                .unwrap_or_default(),
            description: lines
                .get(1)
                .map(|l| strip_label(l, "Description:"))
                .unwrap_or_default(),
            content: lines.get(2..).unwrap_or_default().join("\n"),
        }
    }
}

/// Drop a leading label (with or without a trailing space) from a line.
fn strip_label(line: &str, label: &str) -> String {
    line.trim()
        .strip_prefix(label)
        .map(str::trim_start)
        .unwrap_or(line.trim())
        .to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_labeled_three_line_output() {
        let article =
            GeneratedArticle::from_completion("Title: Foo\nDescription: Bar\nSome body line");

        assert_eq!(article.title, "Foo");
        assert_eq!(article.description, "Bar");
        assert_eq!(article.content, "Some body line");
    }

    #[test]
    fn single_line_output_leaves_rest_empty() {
        let article = GeneratedArticle::from_completion("Title: Only\n\n");

        assert_eq!(article.title, "Only");
        assert_eq!(article.description, "");
        assert_eq!(article.content, "");
    }

    #[test]
    fn missing_labels_keep_lines_as_is() {
        let article = GeneratedArticle::from_completion("A plain title\nA plain description\nBody");

        assert_eq!(article.title, "A plain title");
        assert_eq!(article.description, "A plain description");
        assert_eq!(article.content, "Body");
    }

    #[test]
    fn blank_lines_are_dropped_before_splitting() {
        let article =
            GeneratedArticle::from_completion("\n\nTitle: T\n\nDescription: D\n\nline one\nline two\n");

        assert_eq!(article.title, "T");
        assert_eq!(article.description, "D");
        assert_eq!(article.content, "line one\nline two");
    }

    #[test]
    fn empty_output_parses_to_empty_fields() {
        assert_eq!(GeneratedArticle::from_completion(""), GeneratedArticle::default());
    }
}
