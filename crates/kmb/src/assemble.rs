//! Wraps compiled statements into a Python class definition.

use log::debug;

use kmb_compiler::Compilation;

use crate::config::ModelConfig;

/// Indentation unit of the generated file.
const TAB: &str = "    ";

/// Column the class docstring is wrapped at.
const SAFE_WIDTH: usize = 80;

/// Class name used when the configured name sanitizes to nothing.
const FALLBACK_TITLE: &str = "Model";

/// Date format of the header comment.
pub const DATE_FORMAT: &str = "%y/%m/%d";

/// Builds the text of the generated module.
#[derive(Debug, Clone)]
pub struct Assembler {
    title: String,
    author: String,
    comment: Option<String>,
    date: String,
}

impl Assembler {
    /// Creates an assembler dated today.
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            title: sanitize_title(config.name()),
            author: capitalize(config.author()),
            comment: config.comment().map(str::to_string),
            date: chrono::Local::now().format(DATE_FORMAT).to_string(),
        }
    }

    /// Replaces the header date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// The sanitized class name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// File name the module is exported under.
    pub fn file_name(&self) -> String {
        format!("{}.py", self.title.to_lowercase())
    }

    /// Renders the full module text, ending with a newline.
    pub fn assemble(&self, compilation: &Compilation) -> String {
        let mut lines: Vec<String> = Vec::new();

        self.header(&mut lines);
        for source in compilation.sources() {
            lines.push(format!("from keras import {source}"));
        }
        lines.push(String::new());
        lines.push(String::new());

        lines.push(format!("class {}:", self.title));
        if let Some(comment) = &self.comment {
            lines.extend(docstring(comment));
        }
        lines.push(String::new());

        constructor(&mut lines, compilation.placeholders());
        lines.push(String::new());

        lines.push(format!("{TAB}def build(self):"));
        lines.extend(compilation.lines().map(|line| format!("{TAB}{TAB}{line}")));
        lines.push(String::new());
        lines.push(
            format!("{TAB}{TAB}return {}", compilation.endpoints().join(", "))
                .trim_end()
                .to_string(),
        );

        debug!(title = self.title, lines = lines.len(); "Assembled module");

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn header(&self, lines: &mut Vec<String>) {
        lines.extend([
            "# -*- coding: utf-8 -*-".to_string(),
            "#".to_string(),
            format!("# {}", self.file_name()),
            format!("# Created by {} on {}", self.author, self.date),
            "#".to_string(),
            format!("# {} was built with Karken: KMB", self.title),
            "# A Keras Model Builder Tool.".to_string(),
            "#".to_string(),
            String::new(),
        ]);
    }
}

fn constructor(lines: &mut Vec<String>, placeholders: &[String]) {
    if placeholders.is_empty() {
        lines.push(format!("{TAB}def __init__(self):"));
        lines.push(format!("{TAB}{TAB}pass"));
        return;
    }

    lines.push(format!(
        "{TAB}def __init__(self, {}):",
        placeholders.join(", ")
    ));
    for name in placeholders {
        lines.push(format!("{TAB}{TAB}self.{name} = {name}"));
    }
}

/// Docstring lines of the class, wrapped so no line passes [`SAFE_WIDTH`].
fn docstring(comment: &str) -> Vec<String> {
    let quotes = "\"\"\"".len();
    let width = SAFE_WIDTH - TAB.len() - 2 * quotes;
    let mut wrapped = wrap(comment, width);
    if wrapped.is_empty() {
        return Vec::new();
    }

    let last = wrapped.len() - 1;
    wrapped[0].insert_str(0, "\"\"\"");
    wrapped[last].push_str("\"\"\"");
    wrapped.into_iter().map(|line| format!("{TAB}{line}")).collect()
}

/// Greedy word wrap. A single word longer than `width` gets its own line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Turns free text into a valid class name.
///
/// The text is capitalized and stripped of everything but word characters;
/// a leading digit gets a `_` prefix and an empty result falls back to
/// `Model`.
///
/// # Examples
///
/// ```
/// use kmb::assemble::sanitize_title;
///
/// assert_eq!(sanitize_title("my model-2"), "Mymodel2");
/// assert_eq!(sanitize_title("3d net"), "_3dnet");
/// assert_eq!(sanitize_title("?!"), "Model");
/// ```
pub fn sanitize_title(name: &str) -> String {
    let title: String = capitalize(name)
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    match title.chars().next() {
        None => FALLBACK_TITLE.to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{title}"),
        Some(_) => title,
    }
}
