//! Occurrence search for keyword and variable names.
//!
//! Results are produced lazily, one document at a time, and never cached
//! across mutations. Documents are visited in a fixed order: the document
//! of the search context, then the resources it imports (depth first in
//! import order), then every other document in forest order. Within a
//! document, settings come before test cases, test cases before keywords,
//! and each item yields its settings before its steps.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;

use rustc_hash::FxHashSet;

use crate::base::{
    KeywordMatch, NodeId, NormalizedName, VariableKey, find_variables, match_keyword_cell,
    split_bdd_prefix, split_qualified,
};
use crate::hir::{
    DocumentForest, Field, KeywordArgumentRules, Node, NodeKind, Resolution, Resolver,
    VariableResolution, variable_key,
};
use crate::syntax::SettingKind;

// ============================================================================
// TYPES
// ============================================================================

/// The kind of field an occurrence was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Usage {
    Steps,
    Setup,
    Teardown,
    Template,
    SuiteSetup,
    TestSetup,
    TestTeardown,
    SuiteTeardown,
    TestTemplate,
    Documentation,
    VariableTable,
    Arguments,
    KeywordName,
    Tags,
    ForceTags,
    DefaultTags,
    Timeout,
    TestTimeout,
    Return,
}

impl Usage {
    pub fn label(self) -> &'static str {
        match self {
            Usage::Steps => "Steps",
            Usage::VariableTable => "Variable Table",
            Usage::KeywordName => "Keyword Name",
            Usage::Setup => SettingKind::Setup.label(),
            Usage::Teardown => SettingKind::Teardown.label(),
            Usage::Template => SettingKind::Template.label(),
            Usage::SuiteSetup => SettingKind::SuiteSetup.label(),
            Usage::TestSetup => SettingKind::TestSetup.label(),
            Usage::TestTeardown => SettingKind::TestTeardown.label(),
            Usage::SuiteTeardown => SettingKind::SuiteTeardown.label(),
            Usage::TestTemplate => SettingKind::TestTemplate.label(),
            Usage::Documentation => SettingKind::Documentation.label(),
            Usage::Arguments => SettingKind::Arguments.label(),
            Usage::Tags => SettingKind::Tags.label(),
            Usage::ForceTags => SettingKind::ForceTags.label(),
            Usage::DefaultTags => SettingKind::DefaultTags.label(),
            Usage::Timeout => SettingKind::Timeout.label(),
            Usage::TestTimeout => SettingKind::TestTimeout.label(),
            Usage::Return => SettingKind::Return.label(),
        }
    }
}

impl From<SettingKind> for Usage {
    fn from(kind: SettingKind) -> Self {
        match kind {
            SettingKind::Documentation => Usage::Documentation,
            SettingKind::SuiteSetup => Usage::SuiteSetup,
            SettingKind::SuiteTeardown => Usage::SuiteTeardown,
            SettingKind::TestSetup => Usage::TestSetup,
            SettingKind::TestTeardown => Usage::TestTeardown,
            SettingKind::TestTemplate => Usage::TestTemplate,
            SettingKind::ForceTags => Usage::ForceTags,
            SettingKind::DefaultTags => Usage::DefaultTags,
            SettingKind::TestTimeout => Usage::TestTimeout,
            SettingKind::Arguments => Usage::Arguments,
            SettingKind::Setup => Usage::Setup,
            SettingKind::Teardown => Usage::Teardown,
            SettingKind::Template => Usage::Template,
            SettingKind::Tags => Usage::Tags,
            SettingKind::Timeout => Usage::Timeout,
            SettingKind::Return => Usage::Return,
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One place a name is used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occurrence {
    /// Name of the owning test case, keyword or document.
    pub location: String,
    pub usage: Usage,
    /// The owning test case, keyword or document.
    pub item: NodeId,
    /// The document containing `item`.
    pub document: NodeId,
    pub field: Field,
    /// The field's text at search time.
    pub value: String,
    /// Byte range of the name within `value`.
    pub range: Range<usize>,
}

impl Occurrence {
    /// The field's text with the matched name replaced.
    pub fn replaced(&self, new_name: &str) -> String {
        format!(
            "{}{}{}",
            &self.value[..self.range.start],
            new_name,
            &self.value[self.range.end..]
        )
    }
}

// ============================================================================
// SEARCH
// ============================================================================

enum Target<'a> {
    Keyword {
        raw: String,
        name: NormalizedName,
        /// `None` searches textually, without resolution.
        resolution: Option<Resolution>,
        rules: &'a KeywordArgumentRules,
    },
    Variable {
        key: VariableKey,
        resolution: Option<VariableResolution>,
    },
    Nothing,
}

/// Lazy sequence of occurrences. A new search recomputes from scratch.
pub struct Occurrences<'a> {
    resolver: Resolver<'a>,
    target: Target<'a>,
    documents: std::vec::IntoIter<NodeId>,
    buffer: VecDeque<Occurrence>,
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        loop {
            if let Some(found) = self.buffer.pop_front() {
                return Some(found);
            }
            let document = self.documents.next()?;
            let found = match &self.target {
                Target::Keyword {
                    raw,
                    name,
                    resolution,
                    rules,
                } => KeywordScan::new(&self.resolver, document, raw, name, resolution.as_ref(), rules)
                    .run(),
                Target::Variable { key, resolution } => {
                    VariableScan::new(&self.resolver, document, key, resolution.as_ref()).run()
                }
                Target::Nothing => Vec::new(),
            };
            self.buffer.extend(found);
        }
    }
}

/// Documents in search order for a context.
fn search_order(resolver: &Resolver<'_>, context: Option<NodeId>) -> Vec<NodeId> {
    let forest = resolver.forest();
    let mut order = Vec::new();
    if let Some(document) = context.and_then(|c| forest.document_of(c)) {
        order.push(document);
        order.extend(resolver.import_closure(document));
    }
    let mut seen: FxHashSet<NodeId> = order.iter().copied().collect();
    order.extend(forest.documents().into_iter().filter(|d| seen.insert(*d)));
    order
}

/// Find every usage of keyword `name`.
///
/// With a `context`, the name is resolved there first and only usages
/// resolving to the same definition are reported, so a keyword shadowed
/// by an earlier import, and files where the name means something else,
/// are left out. Unresolved names match wherever they are also unresolved.
/// Without a context every textual match is reported.
pub fn find_occurrences<'a>(
    forest: &'a DocumentForest,
    rules: &'a KeywordArgumentRules,
    context: Option<NodeId>,
    name: &str,
) -> Occurrences<'a> {
    let resolver = Resolver::new(forest);
    let resolution = context.map(|c| resolver.resolve_keyword(c, name));
    tracing::debug!("[SEARCH] keyword '{}' resolved to {:?}", name, resolution);
    Occurrences {
        documents: search_order(&resolver, context).into_iter(),
        resolver,
        target: Target::Keyword {
            raw: name.trim().to_string(),
            name: NormalizedName::new(name),
            resolution,
            rules,
        },
        buffer: VecDeque::new(),
    }
}

/// Find every usage of a variable (`${name}`, `@{name}` or a bare name).
///
/// With a `context`, only usages that resolve to the same definition are
/// reported: a local variable is searched in its test case or keyword
/// only, a variable-table variable in its file and the files importing
/// it, and test cases or keywords shadowing the name locally are skipped.
/// Each reference inside a field is a separate occurrence.
pub fn find_variable_occurrences<'a>(
    forest: &'a DocumentForest,
    context: Option<NodeId>,
    variable: &str,
) -> Occurrences<'a> {
    let resolver = Resolver::new(forest);
    let Some(key) = variable_key(variable) else {
        return Occurrences {
            resolver,
            target: Target::Nothing,
            documents: Vec::new().into_iter(),
            buffer: VecDeque::new(),
        };
    };
    let resolution = context.map(|c| resolver.resolve_variable_key(c, &key, None));
    tracing::debug!("[SEARCH] variable {:?} resolved to {:?}", key, resolution);
    let documents = match &resolution {
        Some(VariableResolution::Local { owner }) => forest.document_of(*owner).into_iter().collect(),
        _ => search_order(&resolver, context),
    };
    Occurrences {
        resolver,
        target: Target::Variable { key, resolution },
        documents: documents.into_iter(),
        buffer: VecDeque::new(),
    }
}

// ============================================================================
// KEYWORD SCAN
// ============================================================================

/// Collects keyword occurrences within one document.
struct KeywordScan<'s, 'a> {
    resolver: &'s Resolver<'a>,
    document: NodeId,
    name: &'s NormalizedName,
    resolution: Option<&'s Resolution>,
    rules: &'s KeywordArgumentRules,
    /// Whether the plain name resolves to the target in this document.
    resolves_here: bool,
    out: Vec<Occurrence>,
}

impl<'s, 'a> KeywordScan<'s, 'a> {
    fn new(
        resolver: &'s Resolver<'a>,
        document: NodeId,
        raw: &str,
        name: &'s NormalizedName,
        resolution: Option<&'s Resolution>,
        rules: &'s KeywordArgumentRules,
    ) -> Self {
        let resolves_here =
            resolution.is_none_or(|target| resolver.resolve_keyword(document, raw) == *target);
        Self {
            resolver,
            document,
            name,
            resolution,
            rules,
            resolves_here,
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Occurrence> {
        let forest = self.resolver.forest();
        let Some(node) = forest.get(self.document) else {
            return self.out;
        };
        let location = node.name();
        for (kind, cells) in node.settings().iter().filter(|(kind, _)| kind.is_fixture()) {
            self.call(self.document, location, kind.into(), cells, 0, kind.is_template(), |index| {
                Field::Setting { kind, index }
            });
        }
        let tests = forest.tests(self.document);
        let keywords = forest.keywords(self.document);
        for item in tests.chain(keywords) {
            if let Some(node) = forest.get(item) {
                self.scan_macro(item, node);
            }
        }
        self.out
    }

    fn scan_macro(&mut self, item: NodeId, node: &Node) {
        let location = node.name();
        if node.kind() == NodeKind::UserKeyword && self.name.matches(location) {
            let is_target = self.resolution.is_none_or(|target| target.definition() == Some(item));
            if is_target {
                self.push(item, location, Usage::KeywordName, Field::Name, location, 0..location.len());
            }
        }
        for (kind, cells) in node.settings().iter().filter(|(kind, _)| kind.is_fixture()) {
            self.call(item, location, kind.into(), cells, 0, kind.is_template(), |index| {
                Field::Setting { kind, index }
            });
        }
        for (row, step) in node.steps().iter().enumerate() {
            if let Some(col) = step.keyword_index() {
                self.call(item, location, Usage::Steps, step.cells(), col, false, |col| Field::Step {
                    row,
                    col,
                });
            }
        }
    }

    /// A keyword call: the keyword cell at `keyword_col` plus any argument
    /// cells that name keywords.
    #[allow(clippy::too_many_arguments)]
    fn call(
        &mut self,
        item: NodeId,
        location: &str,
        usage: Usage,
        cells: &[String],
        keyword_col: usize,
        template: bool,
        field: impl Fn(usize) -> Field,
    ) {
        let Some(keyword) = cells.get(keyword_col) else {
            return;
        };
        self.cell(item, location, usage, field(keyword_col), keyword);
        if template {
            return;
        }
        let args = &cells[keyword_col + 1..];
        let positions = self.rules.keyword_positions(keyword, args);
        if positions.is_empty() || !self.takes_rules(keyword) {
            return;
        }
        for position in positions {
            let col = keyword_col + 1 + position;
            self.cell(item, location, usage, field(col), &cells[col]);
        }
    }

    /// Argument rules describe library keywords: a call that resolves to a
    /// user keyword, or names an owner that is not in scope, takes plain
    /// arguments.
    fn takes_rules(&self, keyword: &str) -> bool {
        match self.resolver.resolve_keyword(self.document, keyword) {
            Resolution::UserKeyword { .. } => false,
            Resolution::Unresolved => {
                let call = split_bdd_prefix(keyword).map_or(keyword, |(_, rest)| rest);
                split_qualified(call).is_none()
            }
            Resolution::LibraryKeyword { .. } | Resolution::BuiltIn { .. } => true,
        }
    }

    fn cell(&mut self, item: NodeId, location: &str, usage: Usage, field: Field, value: &str) {
        let Some(matched) = match_keyword_cell(value, self.name) else {
            return;
        };
        if self.accepts(value, matched) {
            self.push(item, location, usage, field, value, matched.name_range(value));
        }
    }

    fn accepts(&self, value: &str, matched: KeywordMatch) -> bool {
        match matched {
            KeywordMatch::Exact => self.resolves_here,
            KeywordMatch::Prefixed { .. } => self
                .resolution
                .is_none_or(|target| self.resolver.resolve_keyword(self.document, value) == *target),
            KeywordMatch::Qualified { .. } => {
                let call = split_bdd_prefix(value).map_or(value, |(_, rest)| rest);
                self.resolver
                    .resolve_qualified(self.document, call)
                    .is_some_and(|found| self.resolution.is_none_or(|target| *target == found))
            }
        }
    }

    fn push(
        &mut self,
        item: NodeId,
        location: &str,
        usage: Usage,
        field: Field,
        value: &str,
        range: Range<usize>,
    ) {
        self.out.push(Occurrence {
            location: location.to_string(),
            usage,
            item,
            document: self.document,
            field,
            value: value.to_string(),
            range,
        });
    }
}

// ============================================================================
// VARIABLE SCAN
// ============================================================================

/// Collects variable occurrences within one document.
struct VariableScan<'s, 'a> {
    resolver: &'s Resolver<'a>,
    document: NodeId,
    key: &'s VariableKey,
    resolution: Option<&'s VariableResolution>,
    out: Vec<Occurrence>,
}

impl<'s, 'a> VariableScan<'s, 'a> {
    fn new(
        resolver: &'s Resolver<'a>,
        document: NodeId,
        key: &'s VariableKey,
        resolution: Option<&'s VariableResolution>,
    ) -> Self {
        Self {
            resolver,
            document,
            key,
            resolution,
            out: Vec::new(),
        }
    }

    /// Whether the name means the target definition inside `context`, as
    /// seen from step `row` (`None` for the whole item).
    fn in_scope(&self, context: NodeId, row: Option<usize>) -> bool {
        self.resolution.is_none_or(|target| {
            self.resolver
                .resolve_variable_key(context, self.key, row)
                .same_definition(target)
        })
    }

    fn run(mut self) -> Vec<Occurrence> {
        let forest = self.resolver.forest();
        if let Some(&VariableResolution::Local { owner }) = self.resolution {
            if let Some(node) = forest.get(owner) {
                self.scan_macro(owner, node);
            }
            return self.out;
        }
        let Some(node) = forest.get(self.document) else {
            return self.out;
        };
        if !self.in_scope(self.document, None) {
            return self.out;
        }
        let location = node.name();
        self.scan_settings(self.document, node);
        if let Some(document) = node.as_document() {
            for (index, variable) in document.variables.iter().enumerate() {
                for (cell, value) in variable.cells().enumerate() {
                    self.text(self.document, location, Usage::VariableTable, Field::Variable { index, cell }, value);
                }
            }
        }
        let tests = forest.tests(self.document);
        let keywords = forest.keywords(self.document);
        for item in tests.chain(keywords) {
            if let Some(node) = forest.get(item) {
                self.scan_macro(item, node);
            }
        }
        self.out
    }

    fn scan_settings(&mut self, item: NodeId, node: &Node) {
        for (kind, cells) in node.settings().iter() {
            for (index, value) in cells.iter().enumerate() {
                self.text(item, node.name(), kind.into(), Field::Setting { kind, index }, value);
            }
        }
    }

    /// Settings are checked against the item as a whole; a step cell
    /// against the locals visible at its row. A cell that declares the
    /// variable sees its own row's declarations.
    fn scan_macro(&mut self, item: NodeId, node: &Node) {
        if self.in_scope(item, None) {
            self.scan_settings(item, node);
        }
        for (row, step) in node.steps().iter().enumerate() {
            for (col, value) in step.cells().iter().enumerate() {
                if !self.mentions(value) {
                    continue;
                }
                let visible_at = if step.declares(col) { row + 1 } else { row };
                if self.in_scope(item, Some(visible_at)) {
                    self.text(item, node.name(), Usage::Steps, Field::Step { row, col }, value);
                }
            }
        }
    }

    fn mentions(&self, value: &str) -> bool {
        find_variables(value).iter().any(|v| v.key() == *self.key)
    }

    /// One occurrence per reference to the variable inside `value`.
    fn text(&mut self, item: NodeId, location: &str, usage: Usage, field: Field, value: &str) {
        for variable in find_variables(value) {
            if variable.key() == *self.key {
                self.out.push(Occurrence {
                    location: location.to_string(),
                    usage,
                    item,
                    document: self.document,
                    field: field.clone(),
                    value: value.to_string(),
                    range: variable.start..variable.end,
                });
            }
        }
    }
}
