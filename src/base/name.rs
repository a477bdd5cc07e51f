//! Name normalization and keyword-cell matching.
//!
//! Keyword and variable names are compared case-insensitively with all
//! whitespace ignored. Every comparison in the engine goes through
//! [`NormalizedName`], so `"R un KE Y W O rd"` and `"Run Keyword"` are the
//! same name everywhere.

use std::fmt;
use std::ops::Range;

use smol_str::SmolStr;

use super::constants::BDD_PREFIXES;

/// A name folded to its comparison form: lowercase, whitespace removed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NormalizedName(SmolStr);

impl NormalizedName {
    pub fn new(name: &str) -> Self {
        Self(SmolStr::new(normalize(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether a raw name normalizes to this name.
    pub fn matches(&self, raw: &str) -> bool {
        normalize(raw) == self.0.as_str()
    }
}

impl fmt::Debug for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NormalizedName({:?})", self.0.as_str())
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Fold a name to its comparison form.
///
/// # Example
/// ```
/// use ride::base::normalize;
///
/// assert_eq!(normalize("Run  Keyword"), "runkeyword");
/// assert_eq!(normalize(&normalize("Se tu p KW  ")), normalize("Setup Kw"));
/// ```
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two names case- and whitespace-insensitively.
pub fn eq_names(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Split a leading BDD prefix (`Given`, `When`, `Then`, `And`, `But`) off a
/// keyword cell.
///
/// Returns the prefix including its trailing whitespace, exactly as written,
/// and the remaining keyword name. A cell that is only a prefix word has no
/// keyword to strip it from and returns `None`.
///
/// # Example
/// ```
/// use ride::base::split_bdd_prefix;
///
/// assert_eq!(split_bdd_prefix("wHEn   I log in"), Some(("wHEn   ", "I log in")));
/// assert_eq!(split_bdd_prefix("Log"), None);
/// ```
pub fn split_bdd_prefix(cell: &str) -> Option<(&str, &str)> {
    let word_end = cell.find(char::is_whitespace)?;
    let word = &cell[..word_end];
    if !BDD_PREFIXES.iter().any(|p| p.eq_ignore_ascii_case(word)) {
        return None;
    }
    let rest = cell[word_end..].trim_start();
    if rest.is_empty() {
        return None;
    }
    let split = cell.len() - rest.len();
    Some((&cell[..split], rest))
}

/// Split a qualified keyword call `Owner.Keyword` at its last dot.
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let dot = name.rfind('.')?;
    let (owner, keyword) = (name[..dot].trim(), name[dot + 1..].trim());
    (!owner.is_empty() && !keyword.is_empty()).then_some((owner, keyword))
}

/// How a keyword cell matched a searched name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeywordMatch {
    /// The whole cell is the name.
    Exact,
    /// The cell is a BDD prefix of `prefix_len` bytes followed by the name.
    Prefixed { prefix_len: usize },
    /// The cell is a qualified call `Owner.Name`; the name starts at `name_start`.
    Qualified { name_start: usize },
}

impl KeywordMatch {
    /// Byte range of the matched name within `cell`.
    pub fn name_range(self, cell: &str) -> Range<usize> {
        match self {
            Self::Exact => 0..cell.len(),
            Self::Prefixed { prefix_len } => prefix_len..cell.len(),
            Self::Qualified { name_start } => name_start..cell.len(),
        }
    }

    /// Rewrite `cell` with the matched name replaced, keeping any BDD
    /// prefix or qualifier exactly as written.
    pub fn rewrite(self, cell: &str, new_name: &str) -> String {
        let range = self.name_range(cell);
        format!("{}{}{}", &cell[..range.start], new_name, &cell[range.end..])
    }
}

/// Match a step keyword cell against a normalized name.
///
/// The whole cell is tried first, so a keyword literally named
/// `When I say so` matches as a whole rather than as `I say so`. Then a BDD
/// prefix is stripped, and finally a qualified `Owner.Name` call is matched
/// on its name part. Whether the owner is the right one is up to the caller.
pub fn match_keyword_cell(cell: &str, target: &NormalizedName) -> Option<KeywordMatch> {
    if target.matches(cell) {
        return Some(KeywordMatch::Exact);
    }
    let (prefix_len, rest) = match split_bdd_prefix(cell) {
        Some((prefix, rest)) => (prefix.len(), rest),
        None => (0, cell),
    };
    if prefix_len > 0 && target.matches(rest) {
        return Some(KeywordMatch::Prefixed { prefix_len });
    }
    let dot = rest.rfind('.')?;
    let name = &rest[dot + 1..];
    let name_start = prefix_len + dot + 1 + (name.len() - name.trim_start().len());
    let owner = rest[..dot].trim();
    (!owner.is_empty() && !target.is_empty() && target.matches(name))
        .then_some(KeywordMatch::Qualified { name_start })
}
