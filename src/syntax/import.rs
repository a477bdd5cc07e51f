//! Import settings.

use std::fmt;
use std::path::MAIN_SEPARATOR_STR;

use crate::base::constants::PATH_SEPARATOR_VARIABLE;
use crate::base::eq_names;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Library,
    Resource,
    Variables,
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Library => "Library",
            Self::Resource => "Resource",
            Self::Variables => "Variables",
        })
    }
}

/// One `Library`, `Resource` or `Variables` import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub kind: ImportKind,
    /// Name or path exactly as written.
    pub raw_name: String,
    pub args: Vec<String>,
    /// `WITH NAME` alias of a library import.
    pub alias: Option<String>,
}

impl Import {
    pub fn new(kind: ImportKind, raw_name: impl Into<String>) -> Self {
        Self {
            kind,
            raw_name: raw_name.into(),
            args: Vec::new(),
            alias: None,
        }
    }

    pub fn library(name: impl Into<String>) -> Self {
        Self::new(ImportKind::Library, name)
    }

    pub fn resource(path: impl Into<String>) -> Self {
        Self::new(ImportKind::Resource, path)
    }

    pub fn variables(path: impl Into<String>) -> Self {
        Self::new(ImportKind::Variables, path)
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Build an import from its setting-table cells: name, arguments and an
    /// optional `WITH NAME alias` tail.
    pub fn from_cells(kind: ImportKind, cells: &[String]) -> Option<Self> {
        let (name, rest) = cells.split_first()?;
        let mut import = Self::new(kind, name.clone());
        let marker = rest
            .iter()
            .position(|c| eq_names(c, "WITH NAME") || c.trim() == "AS");
        match marker {
            Some(i) if kind == ImportKind::Library => {
                import.args = rest[..i].to_vec();
                import.alias = rest.get(i + 1).cloned();
            }
            _ => import.args = rest.to_vec(),
        }
        Some(import)
    }

    /// The imported name with `${/}` replaced by the platform separator.
    ///
    /// Arguments are never substituted.
    pub fn name(&self) -> String {
        self.raw_name.replace(PATH_SEPARATOR_VARIABLE, MAIN_SEPARATOR_STR)
    }

    /// The name keywords of this import are qualified with: the alias if
    /// any, otherwise the imported name.
    pub fn qualifier(&self) -> String {
        self.alias.clone().unwrap_or_else(|| self.name())
    }
}
