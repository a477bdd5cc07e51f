//! Catalog of external libraries and variable files.
//!
//! Library keywords and variable-file variables are defined outside the
//! document forest. The embedding application registers what it knows
//! about them here; imports of unregistered libraries simply contribute
//! no names.

use std::path::Path;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::constants::{BUILTIN_KEYWORDS, BUILTIN_LIBRARY};
use crate::base::{NormalizedName, VariableKey};

/// Keywords of one external library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    pub name: SmolStr,
    keywords: IndexMap<NormalizedName, SmolStr>,
}

impl Library {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            keywords: IndexMap::new(),
        }
    }

    /// The always-imported built-in library.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_LIBRARY).with_keywords(BUILTIN_KEYWORDS.iter().copied())
    }

    pub fn with_keywords<'a>(mut self, keywords: impl IntoIterator<Item = &'a str>) -> Self {
        for keyword in keywords {
            self.add_keyword(keyword);
        }
        self
    }

    pub fn add_keyword(&mut self, name: &str) {
        self.keywords
            .insert(NormalizedName::new(name), SmolStr::new(name));
    }

    /// The keyword's name as declared, if the library has it.
    pub fn keyword(&self, name: &str) -> Option<&SmolStr> {
        self.keywords.get(&NormalizedName::new(name))
    }

    pub fn keywords(&self) -> impl Iterator<Item = &SmolStr> {
        self.keywords.values()
    }
}

/// Registered libraries and variable files, in registration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryCatalog {
    libraries: IndexMap<NormalizedName, Library>,
    variable_files: IndexMap<NormalizedName, Vec<VariableKey>>,
}

impl Default for LibraryCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.add_library(Library::builtin());
        catalog
    }
}

impl LibraryCatalog {
    /// A catalog without even the built-in library.
    pub fn empty() -> Self {
        Self {
            libraries: IndexMap::new(),
            variable_files: IndexMap::new(),
        }
    }

    pub fn add_library(&mut self, library: Library) {
        self.libraries
            .insert(NormalizedName::new(&library.name), library);
    }

    /// Look a library up by import name. Imports by path fall back to the
    /// file stem (`libs/Custom.py` finds `Custom`).
    pub fn library(&self, name: &str) -> Option<&Library> {
        self.libraries
            .get(&NormalizedName::new(name))
            .or_else(|| self.libraries.get(&NormalizedName::new(file_stem(name)?)))
    }

    pub fn builtin(&self) -> Option<&Library> {
        self.library(BUILTIN_LIBRARY)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.libraries.values()
    }

    /// Register the variables a variable file defines, by variable text
    /// (`${host}`) or bare name.
    pub fn add_variable_file<'a>(&mut self, name: &str, variables: impl IntoIterator<Item = &'a str>) {
        let keys = variables
            .into_iter()
            .filter_map(|v| VariableKey::parse(v).or_else(|| VariableKey::parse(&format!("${{{v}}}"))))
            .collect();
        self.variable_files.insert(variable_file_key(name), keys);
    }

    pub fn variable_file(&self, name: &str) -> Option<&[VariableKey]> {
        self.variable_files
            .get(&variable_file_key(name))
            .map(Vec::as_slice)
    }
}

fn file_stem(name: &str) -> Option<&str> {
    Path::new(name).file_stem()?.to_str()
}

fn variable_file_key(name: &str) -> NormalizedName {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    NormalizedName::new(file_name)
}
