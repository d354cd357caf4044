//! Frontmatter model and the delimited-block codec.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Post category, drawn from the fixed editor vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Programming,
    #[serde(rename = "Web Development")]
    WebDevelopment,
    Design,
    Tutorial,
    Opinion,
    News,
}

impl Category {
    /// The full vocabulary, in display order.
    pub const ALL: [Category; 7] = [
        Category::Technology,
        Category::Programming,
        Category::WebDevelopment,
        Category::Design,
        Category::Tutorial,
        Category::Opinion,
        Category::News,
    ];

    /// Display name as it appears in serialized frontmatter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Programming => "Programming",
            Category::WebDevelopment => "Web Development",
            Category::Design => "Design",
            Category::Tutorial => "Tutorial",
            Category::Opinion => "Opinion",
            Category::News => "News",
        }
    }

    /// Parse a category from its display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
    Archived,
}

impl Status {
    /// Name as it appears in serialized frontmatter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Published => "published",
            Status::Archived => "archived",
        }
    }

    /// Parse a status from its serialized name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "draft" => Some(Status::Draft),
            "published" => Some(Status::Published),
            "archived" => Some(Status::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured metadata block preceding a post body.
///
/// The category list preserves insertion order for display and never
/// contains duplicates; mutate it through [`Frontmatter::add_category`] and
/// [`Frontmatter::remove_category`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Frontmatter {
    /// Post title.
    pub title: String,

    /// ISO calendar date string (YYYY-MM-DD).
    pub date: String,

    /// Short description, may be empty.
    pub description: String,

    /// Author name.
    pub author: String,

    /// Ordered, duplicate-free category list.
    category: Vec<Category>,

    /// Publication status, defaults to draft.
    pub status: Status,
}

impl Frontmatter {
    /// Create empty frontmatter dated today.
    pub fn new() -> Self {
        Self {
            date: today(),
            ..Self::default()
        }
    }

    /// Categories in insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.category
    }

    /// Append a category unless it is already present.
    ///
    /// Returns `true` if the list changed. Calling this twice with the same
    /// category is equivalent to calling it once.
    pub fn add_category(&mut self, category: Category) -> bool {
        if self.category.contains(&category) {
            return false;
        }
        self.category.push(category);
        true
    }

    /// Remove a category; no-op if absent.
    ///
    /// Returns `true` if the list changed. Re-adding a removed category
    /// appends it at the tail, so membership is restored but not position.
    pub fn remove_category(&mut self, category: Category) -> bool {
        let before = self.category.len();
        self.category.retain(|c| *c != category);
        self.category.len() != before
    }

    /// Serialize to the delimited metadata block, including both `---`
    /// fences but no trailing newline.
    ///
    /// String fields are quoted verbatim; embedded double quotes in a field
    /// break the quoting scheme and the round-trip guarantee. That is a
    /// known limitation of the wire format, left visible rather than
    /// silently escaped.
    pub fn to_block(&self) -> String {
        let category = self
            .category
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "---\ntitle: \"{}\"\ndate: \"{}\"\ndescription: \"{}\"\nauthor: \"{}\"\ncategory: [{}]\nstatus: {}\n---",
            self.title, self.date, self.description, self.author, category, self.status
        )
    }

    /// Parse the `key: value` lines between the `---` fences.
    ///
    /// Values may be quoted or bare. Unknown keys, categories outside the
    /// vocabulary, and unknown status names are errors; missing fields keep
    /// their defaults (status in particular defaults to draft).
    pub fn parse_lines<'a, I>(lines: I) -> Result<Self, FrontmatterError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fm = Self::default();

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| FrontmatterError::InvalidLine(line.to_string()))?;
            let value = value.trim();

            match key.trim() {
                "title" => fm.title = unquote(value).to_string(),
                "date" => fm.date = unquote(value).to_string(),
                "description" => fm.description = unquote(value).to_string(),
                "author" => fm.author = unquote(value).to_string(),
                "category" => {
                    let inner = value
                        .strip_prefix('[')
                        .and_then(|v| v.strip_suffix(']'))
                        .ok_or_else(|| FrontmatterError::InvalidLine(line.to_string()))?;
                    for name in inner.split(',') {
                        let name = unquote(name.trim());
                        if name.is_empty() {
                            continue;
                        }
                        let category = Category::from_name(name)
                            .ok_or_else(|| FrontmatterError::UnknownCategory(name.to_string()))?;
                        fm.add_category(category);
                    }
                }
                "status" => {
                    fm.status = Status::from_name(value)
                        .ok_or_else(|| FrontmatterError::UnknownStatus(value.to_string()))?;
                }
                other => return Err(FrontmatterError::UnknownKey(other.to_string())),
            }
        }

        Ok(fm)
    }
}

/// Strip one matching pair of surrounding double quotes, if present.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Today's date as an ISO calendar date string.
fn today() -> String {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    time::OffsetDateTime::now_utc()
        .date()
        .format(&format)
        .expect("formatting a date with a constant description")
}

/// Errors that can occur when parsing a frontmatter block.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Line is not a key: value pair: {0:?}")]
    InvalidLine(String),

    #[error("Unknown frontmatter key: {0}")]
    UnknownKey(String),

    #[error("Category outside the vocabulary: {0}")]
    UnknownCategory(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),
}
