//! Background loading of a test data tree.
//!
//! The caller blocks in [`Loader::load`] while a worker thread discovers,
//! parses and assembles the documents. Progress reaches the caller through
//! a channel that is polled every [`ProjectOptions::poll_interval`]; the
//! observer may stop the load at any poll. A cancelled load installs
//! nothing: the forest is assembled from scratch only after every file has
//! been parsed.
//!
//! ```text
//! Loader::load(path)
//!     │  worker thread
//!     ▼
//! discover   ← data files and `__init__` files below a directory
//!     ▼
//! parse      ← DocumentParser, files in parallel (rayon)
//!     ▼
//! imports    ← resources imported from outside the tree, in waves
//!     ▼
//! assemble   ← fresh DocumentForest, returned to the caller
//! ```

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::base::NodeId;
use crate::base::constants::INIT_FILE_STEM;
use crate::hir::{DocumentForest, LibraryCatalog, normalize_path};
use crate::syntax::{DocumentKind, ImportKind, ParsedDocument, suite_name_from_path};

use super::error::{DataError, LoadError};
use super::options::ProjectOptions;

// ============================================================================
// COLLABORATORS
// ============================================================================

/// Turns one file into a [`ParsedDocument`].
///
/// The loader decides the document kind from the result: `__init__` files
/// are directory settings, files with test cases are suites, the rest are
/// resources.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<ParsedDocument, DataError>;
}

impl<F> DocumentParser for F
where
    F: Fn(&Path) -> Result<ParsedDocument, DataError> + Send + Sync,
{
    fn parse(&self, path: &Path) -> Result<ParsedDocument, DataError> {
        self(path)
    }
}

/// Progress of a running load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    /// Files parsed so far.
    pub parsed: usize,
    /// Files known so far; grows when imported resources are discovered.
    pub total: usize,
    /// The file just parsed.
    pub current: PathBuf,
}

/// Receives progress while the caller waits for a load.
///
/// Returning [`ControlFlow::Break`] cancels the load.
pub trait LoadObserver {
    fn progress(&mut self, progress: &LoadProgress) -> ControlFlow<()>;

    /// Called when a poll interval passes without progress.
    fn tick(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Observer that never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLoadObserver;

impl LoadObserver for NullLoadObserver {
    fn progress(&mut self, _progress: &LoadProgress) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Outcome of a successful load.
#[derive(Debug)]
pub struct LoadReport {
    /// The document for the loaded path.
    pub root: NodeId,
    /// Number of documents in the new forest.
    pub documents: usize,
    /// Files below the loaded path that could not be parsed.
    pub errors: Vec<DataError>,
}

// ============================================================================
// LOADER
// ============================================================================

/// Loads a directory, suite file or resource file into a new forest.
pub struct Loader<'a> {
    parser: &'a dyn DocumentParser,
    options: &'a ProjectOptions,
    libraries: LibraryCatalog,
    cancel: CancellationToken,
}

impl<'a> Loader<'a> {
    pub fn new(parser: &'a dyn DocumentParser, options: &'a ProjectOptions) -> Self {
        Self {
            parser,
            options,
            libraries: LibraryCatalog::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Library catalog installed into the loaded forest.
    pub fn with_libraries(mut self, libraries: LibraryCatalog) -> Self {
        self.libraries = libraries;
        self
    }

    /// Use an externally owned token, so the load can also be cancelled
    /// from another thread.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Load `path`, blocking until the worker finishes.
    pub fn load(
        &self,
        path: &Path,
        observer: &mut dyn LoadObserver,
    ) -> Result<(DocumentForest, LoadReport), LoadError> {
        let (tx, rx) = mpsc::channel();
        let outcome = thread::scope(|scope| {
            let worker = scope.spawn(move || self.run(path, tx));
            loop {
                let flow = match rx.recv_timeout(self.options.poll_interval) {
                    Ok(progress) => observer.progress(&progress),
                    Err(RecvTimeoutError::Timeout) => observer.tick(),
                    Err(RecvTimeoutError::Disconnected) => break,
                };
                if flow.is_break() && !self.cancel.is_cancelled() {
                    tracing::debug!("[LOAD] cancelled by observer");
                    self.cancel.cancel();
                }
            }
            worker.join()
        });
        outcome.unwrap_or(Err(LoadError::WorkerPanicked))
    }

    fn run(
        &self,
        path: &Path,
        tx: Sender<LoadProgress>,
    ) -> Result<(DocumentForest, LoadReport), LoadError> {
        let root = std::path::absolute(path)
            .map(|p| normalize_path(&p))
            .map_err(|e| DataError::io(path, &e))?;
        tracing::debug!("[LOAD] loading {}", root.display());

        let mut session = Session::new(self, tx);
        let tree = if root.is_dir() {
            Some(self.discover(&root, &mut session.errors))
        } else if root.is_file() {
            None
        } else {
            return Err(DataError::new(&root, "no such file or directory").into());
        };

        let files = match &tree {
            Some(tree) => tree.files(),
            None => vec![root.clone()],
        };
        session.parse_batch(files);
        let starts: Vec<PathBuf> = match &tree {
            Some(_) => session
                .parsed
                .iter()
                .filter(|(_, doc)| doc.kind != DocumentKind::Resource)
                .map(|(path, _)| path.clone())
                .collect(),
            None => vec![root.clone()],
        };
        let imported = session.follow_imports(starts);

        if self.cancel.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        session.assemble(&root, tree.as_ref(), &imported)
    }

    fn discover(&self, root: &Path, errors: &mut Vec<DataError>) -> TreeDirectory {
        let mut stack = vec![TreeDirectory::new(root.to_path_buf())];
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored(e.file_name()));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    tracing::warn!("[LOAD] cannot read {}: {}", path.display(), err);
                    errors.push(DataError::new(path, err.to_string()));
                    continue;
                }
            };
            while stack.len() > entry.depth() {
                close_directory(&mut stack);
            }
            let path = entry.path().to_path_buf();
            if entry.file_type().is_dir() {
                stack.push(TreeDirectory::new(path));
            } else if self.options.is_data_file(&path) {
                if let Some(current) = stack.last_mut() {
                    if is_init_file(&path) {
                        current.init = Some(path);
                    } else {
                        current.entries.push(TreeEntry::File(path));
                    }
                }
            }
        }
        while stack.len() > 1 {
            close_directory(&mut stack);
        }
        stack
            .pop()
            .unwrap_or_else(|| TreeDirectory::new(root.to_path_buf()))
    }
}

// ============================================================================
// DISCOVERED TREE
// ============================================================================

#[derive(Debug)]
struct TreeDirectory {
    path: PathBuf,
    init: Option<PathBuf>,
    entries: Vec<TreeEntry>,
}

#[derive(Debug)]
enum TreeEntry {
    Directory(TreeDirectory),
    File(PathBuf),
}

impl TreeDirectory {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            init: None,
            entries: Vec::new(),
        }
    }

    /// Every data file, depth first, `__init__` before its siblings.
    fn files(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files(&self, out: &mut Vec<PathBuf>) {
        out.extend(self.init.iter().cloned());
        for entry in &self.entries {
            match entry {
                TreeEntry::Directory(dir) => dir.collect_files(out),
                TreeEntry::File(path) => out.push(path.clone()),
            }
        }
    }

    fn contains_suites(&self, parsed: &IndexMap<PathBuf, ParsedDocument>) -> bool {
        self.entries.iter().any(|entry| match entry {
            TreeEntry::Directory(dir) => dir.contains_suites(parsed),
            TreeEntry::File(path) => parsed
                .get(path)
                .is_some_and(|doc| doc.kind == DocumentKind::Suite),
        })
    }
}

fn close_directory(stack: &mut Vec<TreeDirectory>) {
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.entries.push(TreeEntry::Directory(done));
        }
    }
}

fn is_init_file(path: &Path) -> bool {
    path.file_stem().is_some_and(|stem| stem == INIT_FILE_STEM)
}

/// Hidden entries and entries starting with `_` are not test data, except
/// `__init__` files.
fn is_ignored(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    if Path::new(name.as_ref()).file_stem().is_some_and(|s| s == INIT_FILE_STEM) {
        return false;
    }
    name.starts_with('.') || name.starts_with('_')
}

fn kind_for(path: &Path, document: &ParsedDocument) -> DocumentKind {
    if is_init_file(path) {
        DocumentKind::Directory
    } else if document.tests.is_empty() {
        DocumentKind::Resource
    } else {
        DocumentKind::Suite
    }
}

// ============================================================================
// WORKER SESSION
// ============================================================================

/// State of one load on the worker thread.
struct Session<'l, 'a> {
    loader: &'l Loader<'a>,
    tx: Sender<LoadProgress>,
    parsed: IndexMap<PathBuf, ParsedDocument>,
    errors: Vec<DataError>,
    done: usize,
    total: usize,
}

impl<'l, 'a> Session<'l, 'a> {
    fn new(loader: &'l Loader<'a>, tx: Sender<LoadProgress>) -> Self {
        Self {
            loader,
            tx,
            parsed: IndexMap::new(),
            errors: Vec::new(),
            done: 0,
            total: 0,
        }
    }

    /// Parse `paths` in parallel, keeping their order.
    fn parse_batch(&mut self, paths: Vec<PathBuf>) {
        self.total += paths.len();
        let total = self.total;
        let counter = AtomicUsize::new(self.done);
        let parser = self.loader.parser;
        let cancel = &self.loader.cancel;
        let tx = &self.tx;
        let results: Vec<(PathBuf, Result<ParsedDocument, DataError>)> = paths
            .into_par_iter()
            .filter_map(|path| {
                if cancel.is_cancelled() {
                    return None;
                }
                let result = parser.parse(&path);
                let parsed = counter.fetch_add(1, Ordering::Relaxed) + 1;
                // The receiver is gone only once the caller stopped waiting.
                let _ = tx.send(LoadProgress {
                    parsed,
                    total,
                    current: path.clone(),
                });
                Some((path, result))
            })
            .collect();
        self.done = counter.into_inner();

        for (path, result) in results {
            match result {
                Ok(mut document) => {
                    document.kind = kind_for(&path, &document);
                    document.source = Some(path.clone());
                    self.parsed.insert(path, document);
                }
                Err(error) => {
                    tracing::warn!("[LOAD] {}", error);
                    self.errors.push(error);
                }
            }
        }
    }

    /// Resolve resource imports starting from `starts`, parsing resources
    /// that were not part of the discovered tree. Returns every imported
    /// resource path in discovery order.
    fn follow_imports(&mut self, starts: Vec<PathBuf>) -> IndexSet<PathBuf> {
        let mut imported = IndexSet::new();
        let mut queue: VecDeque<PathBuf> = starts.into();
        loop {
            let mut wave = Vec::new();
            while let Some(path) = queue.pop_front() {
                let Some(document) = self.parsed.get(&path) else {
                    continue;
                };
                let base = path.parent().unwrap_or(Path::new(""));
                for import in document.imports.iter().filter(|i| i.kind == ImportKind::Resource) {
                    let target = normalize_path(&base.join(import.name()));
                    if !imported.insert(target.clone()) {
                        continue;
                    }
                    if self.parsed.contains_key(&target) {
                        queue.push_back(target);
                    } else if target.is_file() {
                        wave.push(target);
                    } else {
                        tracing::debug!(
                            "[LOAD] resource '{}' imported by {} not found",
                            import.raw_name,
                            path.display()
                        );
                    }
                }
            }
            if wave.is_empty() || self.loader.cancel.is_cancelled() {
                break;
            }
            tracing::debug!("[LOAD] parsing {} imported resource(s)", wave.len());
            self.parse_batch(wave.clone());
            for path in wave {
                if let Some(document) = self.parsed.get_mut(&path) {
                    document.kind = DocumentKind::Resource;
                    queue.push_back(path);
                }
            }
        }
        imported
    }

    fn assemble(
        mut self,
        root: &Path,
        tree: Option<&TreeDirectory>,
        imported: &IndexSet<PathBuf>,
    ) -> Result<(DocumentForest, LoadReport), LoadError> {
        let mut forest = DocumentForest::with_libraries(self.loader.libraries.clone());
        let root_id = match tree {
            Some(tree) => self
                .install_directory(&mut forest, None, tree, imported)?
                .ok_or_else(|| DataError::no_test_data(root))?,
            None => {
                let Some(document) = self.parsed.shift_remove(root) else {
                    let error = self
                        .errors
                        .iter()
                        .position(|e| e.path == root)
                        .map(|i| self.errors.remove(i))
                        .unwrap_or_else(|| DataError::no_test_data(root));
                    return Err(error.into());
                };
                forest.install(None, document)?
            }
        };
        for path in imported {
            if let Some(mut document) = self.parsed.shift_remove(path) {
                document.kind = DocumentKind::Resource;
                forest.install(None, document)?;
            }
        }

        let documents = forest.documents().len();
        tracing::debug!(
            "[LOAD] loaded {} document(s), {} error(s)",
            documents,
            self.errors.len()
        );
        Ok((
            forest,
            LoadReport {
                root: root_id,
                documents,
                errors: self.errors,
            },
        ))
    }

    /// Install a directory suite and its children. Directories without any
    /// suite below them are not installed.
    fn install_directory(
        &mut self,
        forest: &mut DocumentForest,
        parent: Option<NodeId>,
        dir: &TreeDirectory,
        imported: &IndexSet<PathBuf>,
    ) -> Result<Option<NodeId>, LoadError> {
        if !dir.contains_suites(&self.parsed) {
            return Ok(None);
        }
        let mut document = dir
            .init
            .as_ref()
            .and_then(|init| self.parsed.shift_remove(init))
            .unwrap_or_else(|| ParsedDocument::new(DocumentKind::Directory));
        document.kind = DocumentKind::Directory;
        document.name = Some(suite_name_from_path(&dir.path));
        let id = forest.install(parent, document)?;

        for entry in &dir.entries {
            match entry {
                TreeEntry::Directory(sub) => {
                    if self.install_directory(forest, Some(id), sub, imported)?.is_none() {
                        self.install_loose_resources(forest, id, sub, imported)?;
                    }
                }
                TreeEntry::File(path) => self.install_file(forest, id, path, imported)?,
            }
        }
        Ok(Some(id))
    }

    /// Suites and imported resources become children; other resources in
    /// the tree are dropped.
    fn install_file(
        &mut self,
        forest: &mut DocumentForest,
        parent: NodeId,
        path: &Path,
        imported: &IndexSet<PathBuf>,
    ) -> Result<(), LoadError> {
        let wanted = self
            .parsed
            .get(path)
            .is_some_and(|doc| doc.kind == DocumentKind::Suite || imported.contains(path));
        if wanted {
            if let Some(document) = self.parsed.shift_remove(path) {
                forest.install(Some(parent), document)?;
            }
        }
        Ok(())
    }

    /// Imported resources inside a directory that has no suites belong to
    /// the nearest installed directory.
    fn install_loose_resources(
        &mut self,
        forest: &mut DocumentForest,
        parent: NodeId,
        dir: &TreeDirectory,
        imported: &IndexSet<PathBuf>,
    ) -> Result<(), LoadError> {
        for entry in &dir.entries {
            match entry {
                TreeEntry::Directory(sub) => {
                    self.install_loose_resources(forest, parent, sub, imported)?
                }
                TreeEntry::File(path) => self.install_file(forest, parent, path, imported)?,
            }
        }
        Ok(())
    }
}
