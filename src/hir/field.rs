//! Addresses of editable text within a node.

use std::fmt;

use thiserror::Error;

use crate::syntax::SettingKind;

/// One editable piece of text inside a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The node's own name (a keyword's name field).
    Name,
    /// Cell `index` of a setting; documentation is cell 0.
    Setting { kind: SettingKind, index: usize },
    /// A step cell of a test case or keyword.
    Step { row: usize, col: usize },
    /// Cell of a variable-table row: 0 is the name, then the values.
    Variable { index: usize, cell: usize },
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Setting { kind, index } => write!(f, "{kind}[{index}]"),
            Self::Step { row, col } => write!(f, "step({row}, {col})"),
            Self::Variable { index, cell } => write!(f, "variable({index}, {cell})"),
        }
    }
}

/// A field that cannot be read or written on the addressed node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field {field} does not exist")]
    Missing { field: String },

    #[error("field {field} is not supported by this node")]
    Unsupported { field: String },
}

impl FieldError {
    pub fn missing(field: &Field) -> Self {
        Self::Missing {
            field: field.to_string(),
        }
    }

    pub fn unsupported(field: &Field) -> Self {
        Self::Unsupported {
            field: field.to_string(),
        }
    }
}
