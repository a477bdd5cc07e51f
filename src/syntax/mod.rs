//! Plain data of the document tree.
//!
//! These types carry no identity and no resolution logic. A parser
//! collaborator produces [`ParsedDocument`] values; the forest in
//! [`crate::hir`] owns them once installed.
//!
//! ## Key Types
//!
//! - [`Step`] - One row of a test case or user keyword, as cells
//! - [`Settings`] - Setting table of a document, test case or keyword
//! - [`Import`] - Library, resource or variable-file import
//! - [`VariableDef`] - One row of a variable table
//! - [`ParsedDocument`] / [`ParsedMacro`] - Parser output

mod document;
mod import;
mod settings;
mod step;

pub use document::{DocumentKind, ParsedDocument, ParsedMacro, VariableDef, suite_name_from_path};
pub use import::{Import, ImportKind};
pub use settings::{SettingKind, Settings};
pub use step::Step;
