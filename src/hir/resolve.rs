//! Name resolution: keyword and variable names to their definitions.
//!
//! Resolution is a pure function of the forest at call time; nothing is
//! cached, so results are always consistent with the latest mutation.
//!
//! ## Keyword precedence
//!
//! 1. Qualified calls (`Resource.Keyword`, `Library.Keyword`, `Alias.Keyword`)
//! 2. User keywords of the same file
//! 3. User keywords of imported resources, depth first in import order
//! 4. Keywords of imported libraries (including libraries imported by resources)
//! 5. Built-in keywords
//! 6. Otherwise unresolved, which is still a searchable name
//!
//! Each level is tried with the whole cell first, then with a BDD prefix
//! stripped.
//!
//! ## Variable precedence
//!
//! Locals (arguments, loop variables, assignments), the file's variable
//! table, variables of imported resources, registered variable files,
//! built-in variables, and finally external.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::{NodeId, NormalizedName, VariableKey, eq_names, split_bdd_prefix, split_qualified};
use crate::syntax::{ImportKind, SettingKind};

use super::forest::DocumentForest;
use super::library::Library;
use super::node::{Node, NodeKind};

// ============================================================================
// RESOLUTION RESULTS
// ============================================================================

/// What a keyword name refers to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// A user keyword defined in `document`.
    UserKeyword { definition: NodeId, document: NodeId },
    /// A keyword of a registered library.
    LibraryKeyword { library: SmolStr, name: SmolStr },
    /// A keyword of the built-in library.
    BuiltIn { name: SmolStr },
    /// Nothing defines the name.
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved)
    }

    /// The defining user keyword node, if any.
    pub fn definition(&self) -> Option<NodeId> {
        match self {
            Resolution::UserKeyword { definition, .. } => Some(*definition),
            _ => None,
        }
    }
}

/// What a variable name refers to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariableResolution {
    /// Argument, loop variable or assignment of a test case or keyword.
    Local { owner: NodeId },
    /// The variable table of the context's own file.
    File { document: NodeId },
    /// The variable table of an imported resource.
    Imported { document: NodeId },
    /// A registered variable file.
    VariableFile { file: SmolStr },
    BuiltIn,
    /// Environment variables and names nothing assigns.
    External,
}

impl VariableResolution {
    /// Whether two resolutions point at the same definition, regardless
    /// of the context they were resolved from.
    pub fn same_definition(&self, other: &Self) -> bool {
        use VariableResolution::*;
        match (self, other) {
            (Local { owner: a }, Local { owner: b }) => a == b,
            (
                File { document: a } | Imported { document: a },
                File { document: b } | Imported { document: b },
            ) => a == b,
            (VariableFile { file: a }, VariableFile { file: b }) => eq_names(a, b),
            (BuiltIn, BuiltIn) | (External, External) => true,
            _ => false,
        }
    }

    /// The document whose variable table defines the variable.
    pub fn document(&self) -> Option<NodeId> {
        match self {
            VariableResolution::File { document } | VariableResolution::Imported { document } => {
                Some(*document)
            }
            _ => None,
        }
    }
}

/// Details of a keyword visible from some context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordInfo {
    /// Name as declared.
    pub name: SmolStr,
    pub resolution: Resolution,
    /// Name of the defining document or library.
    pub source: SmolStr,
    /// `[Arguments]` of a user keyword.
    pub arguments: Vec<String>,
    pub documentation: String,
}

impl KeywordInfo {
    pub fn is_user_keyword(&self) -> bool {
        matches!(self.resolution, Resolution::UserKeyword { .. })
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolver over one forest state.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    forest: &'a DocumentForest,
}

impl<'a> Resolver<'a> {
    pub fn new(forest: &'a DocumentForest) -> Self {
        Self { forest }
    }

    pub fn forest(&self) -> &'a DocumentForest {
        self.forest
    }

    /// Resources imported by `document`, directly or through other
    /// resources, depth first in import order. Each appears once and the
    /// document itself never does.
    pub fn import_closure(&self, document: NodeId) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        seen.insert(document);
        let mut out = Vec::new();
        self.collect_imports(document, &mut seen, &mut out);
        out
    }

    fn collect_imports(&self, document: NodeId, seen: &mut FxHashSet<NodeId>, out: &mut Vec<NodeId>) {
        let Some(doc) = self.forest.document(document) else {
            return;
        };
        for import in &doc.imports {
            let Some(resource) = self.forest.resolve_import(document, import) else {
                if import.kind == ImportKind::Resource {
                    tracing::debug!("[RESOLVE] unresolved resource import '{}'", import.raw_name);
                }
                continue;
            };
            if seen.insert(resource) {
                out.push(resource);
                self.collect_imports(resource, seen, out);
            }
        }
    }

    /// The libraries in scope of `document`: its own library imports
    /// followed by those of imported resources. Unregistered libraries are
    /// skipped. Each entry carries the qualifier the library is known by.
    fn libraries(&self, document: NodeId) -> Vec<(String, &'a Library)> {
        let catalog = self.forest.libraries();
        let mut seen = FxHashSet::default();
        std::iter::once(document)
            .chain(self.import_closure(document))
            .filter_map(|d| self.forest.document(d))
            .flat_map(|d| d.imports.iter())
            .filter(|import| import.kind == ImportKind::Library)
            .filter_map(|import| Some((import.qualifier(), catalog.library(&import.name())?)))
            .filter(|(qualifier, _)| seen.insert(NormalizedName::new(qualifier)))
            .collect()
    }

    fn own_keyword(&self, document: NodeId, target: &NormalizedName) -> Option<NodeId> {
        self.forest
            .keywords(document)
            .find(|k| target.matches(self.forest.name(*k)))
    }

    // ------------------------------------------------------------------------
    // Keywords
    // ------------------------------------------------------------------------

    /// Resolve a keyword name used anywhere inside `context`.
    pub fn resolve_keyword(&self, context: NodeId, name: &str) -> Resolution {
        let Some(document) = self.forest.document_of(context) else {
            return Resolution::Unresolved;
        };
        let name = name.trim();
        if name.is_empty() {
            return Resolution::Unresolved;
        }
        let stripped = split_bdd_prefix(name).map(|(_, rest)| rest);
        for candidate in std::iter::once(name).chain(stripped) {
            if let Some(found) = self.lookup_keyword(document, candidate) {
                tracing::trace!("[RESOLVE] '{}' in {} -> {:?}", name, document, found);
                return found;
            }
        }
        tracing::trace!("[RESOLVE] '{}' in {} is unresolved", name, document);
        Resolution::Unresolved
    }

    fn lookup_keyword(&self, document: NodeId, name: &str) -> Option<Resolution> {
        if let Some(found) = self.resolve_qualified(document, name) {
            return Some(found);
        }
        let target = NormalizedName::new(name);
        if let Some(definition) = self.own_keyword(document, &target) {
            return Some(Resolution::UserKeyword { definition, document });
        }
        for resource in self.import_closure(document) {
            if let Some(definition) = self.own_keyword(resource, &target) {
                return Some(Resolution::UserKeyword {
                    definition,
                    document: resource,
                });
            }
        }
        for (_, library) in self.libraries(document) {
            if let Some(keyword) = library.keyword(name) {
                return Some(library_resolution(library, keyword));
            }
        }
        let builtin = self.forest.libraries().builtin()?;
        builtin
            .keyword(name)
            .map(|keyword| Resolution::BuiltIn { name: keyword.clone() })
    }

    /// Resolve an `Owner.Keyword` call, if the owner is a resource or
    /// library in scope of `document`.
    pub fn resolve_qualified(&self, document: NodeId, name: &str) -> Option<Resolution> {
        let (owner, keyword) = split_qualified(name)?;
        let target = NormalizedName::new(keyword);
        for resource in self.import_closure(document) {
            if eq_names(resource_qualifier(self.forest.name(resource)), owner) {
                if let Some(definition) = self.own_keyword(resource, &target) {
                    return Some(Resolution::UserKeyword {
                        definition,
                        document: resource,
                    });
                }
            }
        }
        let builtin = self.forest.libraries().builtin();
        let libraries = self.libraries(document);
        let in_scope = libraries
            .iter()
            .map(|(qualifier, library)| (qualifier.as_str(), *library))
            .chain(builtin.map(|b| (b.name.as_str(), b)));
        for (qualifier, library) in in_scope {
            if eq_names(qualifier, owner) {
                if let Some(found) = library.keyword(keyword) {
                    return Some(library_resolution(library, found));
                }
            }
        }
        None
    }

    /// Whether `name` resolves to a user keyword from `context`.
    pub fn is_user_keyword(&self, context: NodeId, name: &str) -> bool {
        matches!(
            self.resolve_keyword(context, name),
            Resolution::UserKeyword { .. }
        )
    }

    /// Details of the keyword `name` resolves to.
    pub fn keyword_info(&self, context: NodeId, name: &str) -> Option<KeywordInfo> {
        self.info_for(self.resolve_keyword(context, name))
    }

    fn info_for(&self, resolution: Resolution) -> Option<KeywordInfo> {
        match &resolution {
            Resolution::UserKeyword { definition, document } => {
                let node = self.forest.get(*definition)?;
                let settings = node.settings();
                Some(KeywordInfo {
                    name: SmolStr::new(node.name()),
                    source: SmolStr::new(self.forest.name(*document)),
                    arguments: settings
                        .get(SettingKind::Arguments)
                        .map(<[String]>::to_vec)
                        .unwrap_or_default(),
                    documentation: settings.documentation().to_string(),
                    resolution,
                })
            }
            Resolution::LibraryKeyword { library, name } => Some(KeywordInfo {
                name: name.clone(),
                source: library.clone(),
                arguments: Vec::new(),
                documentation: String::new(),
                resolution,
            }),
            Resolution::BuiltIn { name } => Some(KeywordInfo {
                name: name.clone(),
                source: self
                    .forest
                    .libraries()
                    .builtin()
                    .map(|b| b.name.clone())
                    .unwrap_or_default(),
                arguments: Vec::new(),
                documentation: String::new(),
                resolution,
            }),
            Resolution::Unresolved => None,
        }
    }

    /// Every keyword callable unqualified from `context`, in precedence
    /// order. Shadowed duplicates are left out.
    pub fn visible_keywords(&self, context: NodeId) -> Vec<KeywordInfo> {
        let Some(document) = self.forest.document_of(context) else {
            return Vec::new();
        };
        let mut candidates = Vec::new();
        for doc in std::iter::once(document).chain(self.import_closure(document)) {
            candidates.extend(self.forest.keywords(doc).map(|definition| Resolution::UserKeyword {
                definition,
                document: doc,
            }));
        }
        for (_, library) in self.libraries(document) {
            candidates.extend(library.keywords().map(|k| library_resolution(library, k)));
        }
        if let Some(builtin) = self.forest.libraries().builtin() {
            candidates.extend(builtin.keywords().map(|k| Resolution::BuiltIn { name: k.clone() }));
        }
        let mut seen = FxHashSet::default();
        candidates
            .into_iter()
            .filter_map(|resolution| self.info_for(resolution))
            .filter(|info| seen.insert(NormalizedName::new(&info.name)))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Variables
    // ------------------------------------------------------------------------

    /// Variables local to a test case or keyword. With `row`, only
    /// assignments and loops before that row count.
    pub fn local_variables(&self, owner: NodeId, row: Option<usize>) -> Vec<VariableKey> {
        let Some(node) = self.forest.get(owner).and_then(Node::as_macro) else {
            return Vec::new();
        };
        let mut locals: Vec<VariableKey> = node
            .settings
            .get(SettingKind::Arguments)
            .unwrap_or_default()
            .iter()
            .filter_map(|cell| VariableKey::parse(cell))
            .collect();
        let rows = row.unwrap_or(node.steps.len()).min(node.steps.len());
        for step in &node.steps[..rows] {
            locals.extend(step.loop_variables().iter().map(|v| v.key()));
            locals.extend(step.assignments().iter().map(|v| v.key()));
        }
        locals
    }

    /// Resolve a variable (`${name}`, `@{name}`, or a bare name) used inside
    /// `context`, optionally at a given step row.
    pub fn resolve_variable(&self, context: NodeId, variable: &str, row: Option<usize>) -> VariableResolution {
        match variable_key(variable) {
            Some(key) => self.resolve_variable_key(context, &key, row),
            None => VariableResolution::External,
        }
    }

    pub fn resolve_variable_key(
        &self,
        context: NodeId,
        key: &VariableKey,
        row: Option<usize>,
    ) -> VariableResolution {
        if key.is_environment() {
            return VariableResolution::External;
        }
        let is_macro = self
            .forest
            .kind(context)
            .is_some_and(|k| matches!(k, NodeKind::TestCase | NodeKind::UserKeyword));
        if is_macro && self.local_variables(context, row).contains(key) {
            return VariableResolution::Local { owner: context };
        }
        let Some(document) = self.forest.document_of(context) else {
            return VariableResolution::External;
        };
        if self.defines_variable(document, key) {
            return VariableResolution::File { document };
        }
        let closure = self.import_closure(document);
        for resource in &closure {
            if self.defines_variable(*resource, key) {
                return VariableResolution::Imported { document: *resource };
            }
        }
        let catalog = self.forest.libraries();
        let variable_imports = std::iter::once(document)
            .chain(closure)
            .filter_map(|d| self.forest.document(d))
            .flat_map(|d| d.imports.iter())
            .filter(|import| import.kind == ImportKind::Variables);
        for import in variable_imports {
            let name = import.name();
            if catalog
                .variable_file(&name)
                .is_some_and(|vars| vars.contains(key))
            {
                return VariableResolution::VariableFile {
                    file: SmolStr::new(name),
                };
            }
        }
        if key.is_builtin() {
            return VariableResolution::BuiltIn;
        }
        VariableResolution::External
    }

    fn defines_variable(&self, document: NodeId, key: &VariableKey) -> bool {
        self.forest.document(document).is_some_and(|d| {
            d.variables
                .iter()
                .any(|v| VariableKey::parse(&v.name).as_ref() == Some(key))
        })
    }
}

/// Parse variable text, accepting a bare name as a scalar.
pub(crate) fn variable_key(variable: &str) -> Option<VariableKey> {
    let variable = variable.trim();
    if let Some(key) = VariableKey::parse(variable) {
        return Some(key);
    }
    if variable.is_empty() {
        return None;
    }
    VariableKey::parse(&format!("${{{variable}}}"))
}

fn library_resolution(library: &Library, keyword: &SmolStr) -> Resolution {
    Resolution::LibraryKeyword {
        library: library.name.clone(),
        name: keyword.clone(),
    }
}

/// Resources are qualified by file name without extension.
fn resource_qualifier(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}
