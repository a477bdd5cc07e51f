//! IDE features: the API the presentation layer talks to.
//!
//! The presentation layer owns a [`ProjectHost`]. Queries go through an
//! [`Analysis`] snapshot; mutations go through [`ProjectHost::execute`],
//! and the view reacts to the notifications published afterwards.
//!
//! ## Usage
//!
//! ```ignore
//! use ride::edit::RenameKeywordOccurrences;
//! use ride::ide::ProjectHost;
//!
//! let mut host = ProjectHost::new();
//! let report = host.load(path, &parser, &mut NullLoadObserver)?;
//!
//! let usages: Vec<_> = host.analysis().find_occurrences(Some(report.root), "Log In").collect();
//! host.execute(&mut RenameKeywordOccurrences::new(Some(report.root), "Log In", "Sign In"))?;
//! host.undo()?;
//! ```

mod analysis;
mod host;
mod occurrences;

pub use analysis::Analysis;
pub use host::ProjectHost;
pub use occurrences::{
    Occurrence, Occurrences, Usage, find_occurrences, find_variable_occurrences,
};
