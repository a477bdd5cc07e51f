//! Parsed documents.

use std::path::{Path, PathBuf};

use super::{Import, SettingKind, Settings, Step};

/// What a document node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// A directory suite; its settings come from an `__init__` file.
    Directory,
    /// A test-case file.
    Suite,
    /// A resource file: keywords and variables, no tests.
    Resource,
}

/// One row of a variable table: `${name}  value  ...`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableDef {
    pub name: String,
    pub values: Vec<String>,
}

impl VariableDef {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Name followed by values, as displayed in the table.
    pub fn cell(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.name),
            i => self.values.get(i - 1).map(String::as_str),
        }
    }

    pub fn set_cell(&mut self, index: usize, value: impl Into<String>) -> String {
        if index == 0 {
            return std::mem::replace(&mut self.name, value.into());
        }
        if index > self.values.len() {
            self.values.resize(index, String::new());
        }
        std::mem::replace(&mut self.values[index - 1], value.into())
    }

    pub fn cells(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.values.iter().map(String::as_str))
    }
}

/// A test case or user keyword as produced by the parser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedMacro {
    pub name: String,
    pub settings: Settings,
    pub steps: Vec<Step>,
}

impl ParsedMacro {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_setting<I, S>(mut self, kind: SettingKind, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.set(kind, cells);
        self
    }

    pub fn with_step<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(Step::new(cells));
        self
    }
}

/// A whole document as produced by the parser, before it is installed
/// into a forest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDocument {
    pub kind: DocumentKind,
    /// Explicit display name; derived from `source` when absent.
    pub name: Option<String>,
    pub source: Option<PathBuf>,
    pub settings: Settings,
    pub imports: Vec<Import>,
    pub variables: Vec<VariableDef>,
    pub tests: Vec<ParsedMacro>,
    pub keywords: Vec<ParsedMacro>,
}

impl ParsedDocument {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            name: None,
            source: None,
            settings: Settings::new(),
            imports: Vec::new(),
            variables: Vec::new(),
            tests: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn suite(name: impl Into<String>) -> Self {
        Self::new(DocumentKind::Suite).with_name(name)
    }

    pub fn resource(name: impl Into<String>) -> Self {
        Self::new(DocumentKind::Resource).with_name(name)
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(DocumentKind::Directory).with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_setting<I, S>(mut self, kind: SettingKind, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.set(kind, cells);
        self
    }

    pub fn with_import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_variable<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables.push(VariableDef::new(name, values));
        self
    }

    pub fn with_test(mut self, test: ParsedMacro) -> Self {
        self.tests.push(test);
        self
    }

    pub fn with_keyword(mut self, keyword: ParsedMacro) -> Self {
        self.keywords.push(keyword);
        self
    }

    /// The name shown for this document: the explicit name, otherwise one
    /// derived from the source path.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.source, self.kind) {
            (Some(source), DocumentKind::Resource) => source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            (Some(source), _) => suite_name_from_path(source),
            (None, _) => String::new(),
        }
    }
}

/// Derive a suite name from a file or directory path.
///
/// The extension and any `NN__` ordering prefix are dropped, underscores
/// become spaces and each word is capitalized.
///
/// # Example
/// ```
/// use std::path::Path;
/// use ride::syntax::suite_name_from_path;
///
/// assert_eq!(suite_name_from_path(Path::new("suites/some_suite.txt")), "Some Suite");
/// assert_eq!(suite_name_from_path(Path::new("01__login tests")), "Login Tests");
/// ```
pub fn suite_name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = if path.is_dir() || path.extension().is_none() {
        file_name.as_str()
    } else {
        file_name
            .rsplit_once('.')
            .map_or(file_name.as_str(), |(stem, _)| stem)
    };
    let stem = match stem.split_once("__") {
        Some((prefix, rest)) if !prefix.is_empty() && !rest.is_empty() => rest,
        _ => stem,
    };
    stem.replace('_', " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
