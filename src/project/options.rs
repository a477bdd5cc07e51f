//! Project configuration.

use std::path::Path;
use std::time::Duration;

use crate::base::constants::DATA_EXTENSIONS;
use crate::hir::KeywordArgumentRules;

/// Options for loading, editing and searching a project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Maximum number of undo entries; `None` keeps everything.
    pub undo_limit: Option<usize>,
    /// How often a waiting loader checks for progress.
    pub poll_interval: Duration,
    /// File extensions, without the dot, treated as test data.
    pub data_extensions: Vec<String>,
    /// Keywords that take other keyword names as arguments.
    pub keyword_arguments: KeywordArgumentRules,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            undo_limit: Some(100),
            poll_interval: Duration::from_millis(100),
            data_extensions: DATA_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            keyword_arguments: KeywordArgumentRules::default(),
        }
    }
}

impl ProjectOptions {
    pub fn with_undo_limit(mut self, limit: Option<usize>) -> Self {
        self.undo_limit = limit;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Whether `path` has one of the data file extensions.
    pub fn is_data_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.data_extensions.iter().any(|d| d.eq_ignore_ascii_case(ext)))
    }
}
