//! The document forest arena.
//!
//! Nodes live in a single vector and refer to each other by [`NodeId`].
//! Each node records at most one parent. Resources reached only through
//! imports have no parent: they are listed as standalone resources and
//! shared by every importer.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::base::{NodeId, eq_names};
use crate::syntax::{DocumentKind, Import, ImportKind, ParsedDocument, ParsedMacro};

use super::library::LibraryCatalog;
use super::node::{Document, Macro, Node, NodeKind, NodeVisitor};

/// Structural misuse of the forest API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForestError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("{0} is not a document and cannot have children")]
    NotADocument(NodeId),
}

#[derive(Clone, Debug)]
struct Entry {
    node: Node,
    parent: Option<NodeId>,
}

/// Ordered top-level suites plus standalone resources, with every node
/// stored in one arena.
#[derive(Clone, Debug, Default)]
pub struct DocumentForest {
    nodes: Vec<Option<Entry>>,
    roots: Vec<NodeId>,
    resources: Vec<NodeId>,
    libraries: LibraryCatalog,
}

impl DocumentForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_libraries(libraries: LibraryCatalog) -> Self {
        Self {
            libraries,
            ..Self::default()
        }
    }

    pub fn libraries(&self) -> &LibraryCatalog {
        &self.libraries
    }

    pub fn libraries_mut(&mut self) -> &mut LibraryCatalog {
        &mut self.libraries
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.resources.is_empty()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    fn alloc(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Some(Entry { node, parent }));
        id
    }

    fn container_mut(&mut self, id: NodeId) -> Result<&mut Document, ForestError> {
        self.get_mut(id)
            .ok_or(ForestError::UnknownNode(id))?
            .as_document_mut()
            .ok_or(ForestError::NotADocument(id))
    }

    /// Install a parsed document with its test cases and keywords.
    ///
    /// Without a parent, suites and directories become top-level suites and
    /// resources become standalone resources.
    pub fn install(
        &mut self,
        parent: Option<NodeId>,
        parsed: ParsedDocument,
    ) -> Result<NodeId, ForestError> {
        if let Some(parent) = parent {
            self.container_mut(parent)?;
        }
        let name = parsed.display_name();
        let ParsedDocument {
            kind,
            source,
            settings,
            imports,
            variables,
            tests,
            keywords,
            ..
        } = parsed;
        let document = Document {
            name,
            source,
            settings,
            imports,
            variables,
            children: Vec::new(),
            dirty: false,
        };
        let id = self.alloc(Node::document(kind, document), parent);
        match (parent, kind) {
            (Some(parent), _) => self.container_mut(parent)?.children.push(id),
            (None, DocumentKind::Resource) => self.resources.push(id),
            (None, _) => self.roots.push(id),
        }
        for test in tests {
            self.add_test(id, test)?;
        }
        for keyword in keywords {
            self.add_keyword(id, keyword)?;
        }
        tracing::trace!("[FOREST] installed {:?} '{}' as {}", kind, self.name(id), id);
        Ok(id)
    }

    pub fn add_test(&mut self, document: NodeId, test: ParsedMacro) -> Result<NodeId, ForestError> {
        self.add_macro(document, Node::TestCase(macro_from(test)))
    }

    pub fn add_keyword(
        &mut self,
        document: NodeId,
        keyword: ParsedMacro,
    ) -> Result<NodeId, ForestError> {
        self.add_macro(document, Node::UserKeyword(macro_from(keyword)))
    }

    fn add_macro(&mut self, document: NodeId, node: Node) -> Result<NodeId, ForestError> {
        self.container_mut(document)?;
        let id = self.alloc(node, Some(document));
        self.container_mut(document)?.children.push(id);
        Ok(id)
    }

    /// Remove a node and everything below it.
    pub fn remove(&mut self, id: NodeId) -> Result<(), ForestError> {
        let parent = self
            .nodes
            .get(id.index() as usize)
            .and_then(Option::as_ref)
            .ok_or(ForestError::UnknownNode(id))?
            .parent;
        match parent {
            Some(parent) => {
                if let Ok(doc) = self.container_mut(parent) {
                    doc.children.retain(|c| *c != id);
                }
            }
            None => {
                self.roots.retain(|r| *r != id);
                self.resources.retain(|r| *r != id);
            }
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(entry) = self.nodes.get_mut(next.index() as usize).and_then(Option::take) {
                stack.extend_from_slice(entry.node.children());
            }
        }
        Ok(())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.index() as usize)
            .and_then(Option::as_ref)
            .map(|e| &e.node)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.index() as usize)
            .and_then(Option::as_mut)
            .map(|e| &mut e.node)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Name of a node, empty for unknown ids.
    pub fn name(&self, id: NodeId) -> &str {
        self.get(id).map_or("", Node::name)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .get(id.index() as usize)
            .and_then(Option::as_ref)
            .and_then(|e| e.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Top-level suites in order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Resources without a parent.
    pub fn standalone_resources(&self) -> &[NodeId] {
        &self.resources
    }

    /// The document a node belongs to: itself for documents, the owning
    /// file for test cases and keywords.
    pub fn document_of(&self, id: NodeId) -> Option<NodeId> {
        match self.get(id)? {
            node if node.kind().is_document() => Some(id),
            _ => self.parent(id),
        }
    }

    pub fn document(&self, id: NodeId) -> Option<&Document> {
        self.get(id).and_then(Node::as_document)
    }

    /// Every document in forest order: top-level suites depth first, then
    /// standalone resources.
    pub fn documents(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if !node.kind().is_document() {
                continue;
            }
            out.push(id);
            stack.extend(node.children().iter().rev().copied());
        }
        out.extend(self.resources.iter().copied().filter(|id| self.contains(*id)));
        out
    }

    fn children_of_kind(&self, document: NodeId, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(document)
            .iter()
            .copied()
            .filter(move |c| self.kind(*c) == Some(kind))
    }

    pub fn tests(&self, document: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of_kind(document, NodeKind::TestCase)
    }

    pub fn keywords(&self, document: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of_kind(document, NodeKind::UserKeyword)
    }

    /// First document with the given display name.
    pub fn find_document(&self, name: &str) -> Option<NodeId> {
        self.documents()
            .into_iter()
            .find(|id| eq_names(self.name(*id), name))
    }

    pub fn find_by_source(&self, path: &Path) -> Option<NodeId> {
        self.documents()
            .into_iter()
            .find(|id| self.document(*id).and_then(Document::source) == Some(path))
    }

    /// A macro of `document` by name.
    pub fn find_child(&self, document: NodeId, name: &str) -> Option<NodeId> {
        self.children(document)
            .iter()
            .copied()
            .find(|c| self.get(*c).is_some_and(|n| !n.kind().is_document() && eq_names(n.name(), name)))
    }

    /// The resource document a resource import of `document` refers to.
    ///
    /// Paths are resolved relative to the importing file. Documents without
    /// a source, and paths that match no source, fall back to a resource
    /// whose name is the imported file name.
    pub fn resolve_import(&self, document: NodeId, import: &Import) -> Option<NodeId> {
        if import.kind != ImportKind::Resource {
            return None;
        }
        let name = import.name();
        let imported = Path::new(&name);
        let base = self
            .document(document)
            .and_then(Document::source)
            .and_then(Path::parent);
        if let Some(base) = base {
            let candidate = normalize_path(&base.join(imported));
            if let Some(found) = self.find_by_source(&candidate) {
                return Some(found);
            }
        }
        let file_name = imported.file_name()?.to_string_lossy();
        self.documents().into_iter().find(|id| {
            self.kind(*id) == Some(NodeKind::Resource) && eq_names(self.name(*id), &file_name)
        })
    }

    /// Visit every node in forest order; documents before their children.
    pub fn walk<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) {
        for document in self.documents() {
            if let Some(node) = self.get(document) {
                node.accept(document, visitor);
                for child in node.children() {
                    if let Some(child_node) = self.get(*child).filter(|n| !n.kind().is_document()) {
                        child_node.accept(*child, visitor);
                    }
                }
            }
        }
    }

    // ========================================================================
    // Dirty tracking
    // ========================================================================

    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.document_of(id)
            .and_then(|d| self.document(d))
            .is_some_and(Document::is_dirty)
    }

    /// Mark the document owning `id` as having unsaved changes.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.set_dirty(id, true);
    }

    pub fn mark_clean(&mut self, id: NodeId) {
        self.set_dirty(id, false);
    }

    fn set_dirty(&mut self, id: NodeId, dirty: bool) {
        if let Some(doc) = self.document_of(id).and_then(|d| self.get_mut(d)).and_then(Node::as_document_mut) {
            doc.dirty = dirty;
        }
    }

    pub fn dirty_documents(&self) -> Vec<NodeId> {
        self.documents()
            .into_iter()
            .filter(|id| self.is_dirty(*id))
            .collect()
    }
}

fn macro_from(parsed: ParsedMacro) -> Macro {
    Macro {
        name: parsed.name,
        settings: parsed.settings,
        steps: parsed.steps,
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
