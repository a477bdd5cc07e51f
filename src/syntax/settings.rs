//! Setting tables.

use std::collections::BTreeMap;
use std::fmt;

use crate::base::normalize;

/// Settings that can appear in a document or test/keyword setting table.
///
/// Ordered the way settings are listed and searched: suite-level fixtures
/// first, then per-item settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKind {
    Documentation,
    SuiteSetup,
    SuiteTeardown,
    TestSetup,
    TestTeardown,
    TestTemplate,
    ForceTags,
    DefaultTags,
    TestTimeout,
    Arguments,
    Setup,
    Teardown,
    Template,
    Tags,
    Timeout,
    Return,
}

impl SettingKind {
    pub const ALL: [SettingKind; 16] = [
        Self::Documentation,
        Self::SuiteSetup,
        Self::SuiteTeardown,
        Self::TestSetup,
        Self::TestTeardown,
        Self::TestTemplate,
        Self::ForceTags,
        Self::DefaultTags,
        Self::TestTimeout,
        Self::Arguments,
        Self::Setup,
        Self::Teardown,
        Self::Template,
        Self::Tags,
        Self::Timeout,
        Self::Return,
    ];

    /// Display label, e.g. `Suite Setup`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documentation => "Documentation",
            Self::SuiteSetup => "Suite Setup",
            Self::SuiteTeardown => "Suite Teardown",
            Self::TestSetup => "Test Setup",
            Self::TestTeardown => "Test Teardown",
            Self::TestTemplate => "Test Template",
            Self::ForceTags => "Force Tags",
            Self::DefaultTags => "Default Tags",
            Self::TestTimeout => "Test Timeout",
            Self::Arguments => "Arguments",
            Self::Setup => "Setup",
            Self::Teardown => "Teardown",
            Self::Template => "Template",
            Self::Tags => "Tags",
            Self::Timeout => "Timeout",
            Self::Return => "Return",
        }
    }

    /// Parse a setting name as written in a setting table, with or without
    /// brackets (`Suite Setup`, `[Setup]`).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_start_matches('[').trim_end_matches(']');
        let name = normalize(name);
        Self::ALL
            .into_iter()
            .find(|kind| normalize(kind.label()) == name)
    }

    /// Whether the first cell of this setting is a keyword call.
    pub fn is_fixture(self) -> bool {
        matches!(
            self,
            Self::SuiteSetup
                | Self::SuiteTeardown
                | Self::TestSetup
                | Self::TestTeardown
                | Self::TestTemplate
                | Self::Setup
                | Self::Teardown
                | Self::Template
        )
    }

    /// Templates name a keyword but take no arguments.
    pub fn is_template(self) -> bool {
        matches!(self, Self::TestTemplate | Self::Template)
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The setting table of one node. Each setting holds its cells in order;
/// documentation is a single cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<SettingKind, Vec<String>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: SettingKind) -> Option<&[String]> {
        self.values.get(&kind).map(Vec::as_slice)
    }

    pub fn cell(&self, kind: SettingKind, index: usize) -> Option<&str> {
        self.values
            .get(&kind)
            .and_then(|cells| cells.get(index))
            .map(String::as_str)
    }

    pub fn set<I, S>(&mut self, kind: SettingKind, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .insert(kind, cells.into_iter().map(Into::into).collect());
    }

    pub fn remove(&mut self, kind: SettingKind) -> Option<Vec<String>> {
        self.values.remove(&kind)
    }

    /// Set one cell, creating the setting or padding its cells as needed.
    ///
    /// Returns the previous value (empty for a new cell).
    pub fn set_cell(&mut self, kind: SettingKind, index: usize, value: impl Into<String>) -> String {
        let cells = self.values.entry(kind).or_default();
        if index >= cells.len() {
            cells.resize(index + 1, String::new());
        }
        std::mem::replace(&mut cells[index], value.into())
    }

    pub fn documentation(&self) -> &str {
        self.cell(SettingKind::Documentation, 0).unwrap_or_default()
    }

    /// Settings in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (SettingKind, &[String])> {
        self.values.iter().map(|(kind, cells)| (*kind, cells.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
