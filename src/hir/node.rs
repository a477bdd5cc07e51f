//! Document-tree nodes.
//!
//! A node is one of five kinds. Container kinds (directory, suite,
//! resource) share [`Document`]; test cases and user keywords share
//! [`Macro`]. Children are addressed by [`NodeId`] into the owning forest.

use std::path::{Path, PathBuf};

use crate::base::NodeId;
use crate::syntax::{DocumentKind, Import, Settings, Step, VariableDef};

use super::field::{Field, FieldError};

/// A directory, suite file or resource file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub source: Option<PathBuf>,
    pub settings: Settings,
    pub imports: Vec<Import>,
    pub variables: Vec<VariableDef>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) dirty: bool,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// A test case or user keyword.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Macro {
    pub name: String,
    pub settings: Settings,
    pub steps: Vec<Step>,
}

impl Macro {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Kind tag of a [`Node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    Suite,
    Resource,
    TestCase,
    UserKeyword,
}

impl NodeKind {
    pub fn is_document(self) -> bool {
        matches!(self, Self::Directory | Self::Suite | Self::Resource)
    }
}

impl From<DocumentKind> for NodeKind {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Directory => Self::Directory,
            DocumentKind::Suite => Self::Suite,
            DocumentKind::Resource => Self::Resource,
        }
    }
}

/// One node of the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Directory(Document),
    Suite(Document),
    Resource(Document),
    TestCase(Macro),
    UserKeyword(Macro),
}

impl Node {
    pub fn document(kind: DocumentKind, document: Document) -> Self {
        match kind {
            DocumentKind::Directory => Self::Directory(document),
            DocumentKind::Suite => Self::Suite(document),
            DocumentKind::Resource => Self::Resource(document),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Directory(_) => NodeKind::Directory,
            Self::Suite(_) => NodeKind::Suite,
            Self::Resource(_) => NodeKind::Resource,
            Self::TestCase(_) => NodeKind::TestCase,
            Self::UserKeyword(_) => NodeKind::UserKeyword,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Directory(d) | Self::Suite(d) | Self::Resource(d) => &d.name,
            Self::TestCase(m) | Self::UserKeyword(m) => &m.name,
        }
    }

    /// Rename the node, returning the previous name.
    pub fn rename(&mut self, name: impl Into<String>) -> String {
        let slot = match self {
            Self::Directory(d) | Self::Suite(d) | Self::Resource(d) => &mut d.name,
            Self::TestCase(m) | Self::UserKeyword(m) => &mut m.name,
        };
        std::mem::replace(slot, name.into())
    }

    /// Child nodes in order. Test cases and keywords have none.
    pub fn children(&self) -> &[NodeId] {
        self.as_document().map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    pub fn settings(&self) -> &Settings {
        match self {
            Self::Directory(d) | Self::Suite(d) | Self::Resource(d) => &d.settings,
            Self::TestCase(m) | Self::UserKeyword(m) => &m.settings,
        }
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        match self {
            Self::Directory(d) | Self::Suite(d) | Self::Resource(d) => &mut d.settings,
            Self::TestCase(m) | Self::UserKeyword(m) => &mut m.settings,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Directory(d) | Self::Suite(d) | Self::Resource(d) => Some(d),
            Self::TestCase(_) | Self::UserKeyword(_) => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Self::Directory(d) | Self::Suite(d) | Self::Resource(d) => Some(d),
            Self::TestCase(_) | Self::UserKeyword(_) => None,
        }
    }

    pub fn as_macro(&self) -> Option<&Macro> {
        match self {
            Self::TestCase(m) | Self::UserKeyword(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_macro_mut(&mut self) -> Option<&mut Macro> {
        match self {
            Self::TestCase(m) | Self::UserKeyword(m) => Some(m),
            _ => None,
        }
    }

    /// Steps of a test case or keyword; empty for documents.
    pub fn steps(&self) -> &[Step] {
        self.as_macro().map(|m| m.steps.as_slice()).unwrap_or(&[])
    }

    /// Read one editable field.
    pub fn field(&self, field: &Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name()),
            Field::Setting { kind, index } => self.settings().cell(*kind, *index),
            Field::Step { row, col } => self.steps().get(*row).and_then(|s| s.cell(*col)),
            Field::Variable { index, cell } => self
                .as_document()
                .and_then(|d| d.variables.get(*index))
                .and_then(|v| v.cell(*cell)),
        }
    }

    /// Write one editable field, returning the previous value.
    ///
    /// Step cells and setting cells past the end are created; a step row
    /// past the end is created too. Variable rows must already exist.
    pub fn set_field(&mut self, field: &Field, value: &str) -> Result<String, FieldError> {
        match field {
            Field::Name => Ok(self.rename(value)),
            Field::Setting { kind, index } => Ok(self.settings_mut().set_cell(*kind, *index, value)),
            Field::Step { row, col } => {
                let steps = &mut self
                    .as_macro_mut()
                    .ok_or_else(|| FieldError::unsupported(field))?
                    .steps;
                if *row >= steps.len() {
                    steps.resize_with(row + 1, Step::default);
                }
                Ok(steps[*row].set_cell(*col, value))
            }
            Field::Variable { index, cell } => self
                .as_document_mut()
                .and_then(|d| d.variables.get_mut(*index))
                .map(|v| v.set_cell(*cell, value))
                .ok_or_else(|| FieldError::missing(field)),
        }
    }

    /// Dispatch to the visitor method for this node's kind.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, id: NodeId, visitor: &mut V) {
        match self {
            Self::Directory(d) => visitor.visit_directory(id, d),
            Self::Suite(d) => visitor.visit_suite(id, d),
            Self::Resource(d) => visitor.visit_resource(id, d),
            Self::TestCase(m) => visitor.visit_test_case(id, m),
            Self::UserKeyword(m) => visitor.visit_user_keyword(id, m),
        }
    }
}

/// Visitor over node kinds. Every method defaults to doing nothing.
pub trait NodeVisitor {
    fn visit_directory(&mut self, _id: NodeId, _directory: &Document) {}
    fn visit_suite(&mut self, _id: NodeId, _suite: &Document) {}
    fn visit_resource(&mut self, _id: NodeId, _resource: &Document) {}
    fn visit_test_case(&mut self, _id: NodeId, _test: &Macro) {}
    fn visit_user_keyword(&mut self, _id: NodeId, _keyword: &Macro) {}
}
