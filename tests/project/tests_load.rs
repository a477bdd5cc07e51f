//! Loading a tree from disk through the host.

use std::ops::ControlFlow;

use ride::edit::RenameKeywordOccurrences;
use ride::events::topics;
use ride::hir::NodeKind;
use ride::ide::ProjectHost;
use ride::project::{
    DataError, LoadError, LoadObserver, LoadProgress, Loader, NullLoadObserver, ProjectOptions,
};
use ride::syntax::ParsedDocument;

use super::fixtures::{parse, project_dir};
use crate::helpers::recorder::Recorder;

#[test]
fn test_load_directory_builds_suite_tree() {
    let project = project_dir(false);
    let mut host = ProjectHost::new();
    let recorder = Recorder::attach(host.bus());

    let report = host.load(&project.root, &parse, &mut NullLoadObserver).unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.documents, 3);
    assert_eq!(recorder.topics(), [topics::OPEN_SUITE]);

    let analysis = host.analysis();
    let forest = analysis.forest();
    assert_eq!(forest.kind(report.root), Some(NodeKind::Directory));
    assert_eq!(forest.name(report.root), "Project");
    let suite = forest.find_document("Login Tests").unwrap();
    let common = forest.find_document("common.robot").unwrap();
    assert_eq!(forest.parent(suite), Some(report.root));
    assert_eq!(forest.kind(common), Some(NodeKind::Resource));

    let test = forest.find_child(suite, "Valid Login").unwrap();
    let login = forest.find_child(common, "Log In").unwrap();
    assert_eq!(analysis.resolve_keyword(test, "Log In").definition(), Some(login));
    assert_eq!(analysis.resolve_keyword(report.root, "log in").definition(), Some(login));
}

#[test]
fn test_parse_failures_are_reported_not_fatal() {
    let project = project_dir(true);
    let mut host = ProjectHost::new();

    let report = host.load(&project.root, &parse, &mut NullLoadObserver).unwrap();

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].path.ends_with("broken.robot"));
    assert_eq!(report.documents, 3);
}

#[test]
fn test_rename_after_load_touches_every_file() {
    let project = project_dir(false);
    let mut host = ProjectHost::new();
    let report = host.load(&project.root, &parse, &mut NullLoadObserver).unwrap();
    let (suite, common) = {
        let analysis = host.analysis();
        let forest = analysis.forest();
        (
            forest.find_document("Login Tests").unwrap(),
            forest.find_document("common.robot").unwrap(),
        )
    };

    host.execute(&mut RenameKeywordOccurrences::new(Some(suite), "Log In", "Sign In"))
        .unwrap();

    for document in [report.root, suite, common] {
        assert!(host.is_dirty(document), "{document} should be dirty");
    }
    assert_eq!(host.analysis().find_occurrences(Some(suite), "Sign In").count(), 3);
}

#[test]
fn test_failed_load_keeps_current_forest() {
    let project = project_dir(false);
    let mut host = ProjectHost::new();
    let report = host.load(&project.root, &parse, &mut NullLoadObserver).unwrap();

    let result = host.load(&project.root.join("missing"), &parse, &mut NullLoadObserver);

    assert!(matches!(result, Err(LoadError::Data(_))));
    assert_eq!(host.analysis().forest().name(report.root), "Project");
}

#[test]
fn test_load_single_resource_file() {
    let project = project_dir(false);
    let mut host = ProjectHost::new();
    let recorder = Recorder::attach(host.bus());

    let report = host
        .load(&project.root.join("resources/common.robot"), &parse, &mut NullLoadObserver)
        .unwrap();

    assert_eq!(host.analysis().forest().kind(report.root), Some(NodeKind::Resource));
    assert_eq!(recorder.topics(), [topics::OPEN_RESOURCE]);
}

#[test]
fn test_open_resource_adds_to_current_forest() {
    let project = project_dir(false);
    let mut host = ProjectHost::new();
    host.load(&project.root, &parse, &mut NullLoadObserver).unwrap();
    let recorder = Recorder::attach(host.bus());

    let extra = host.open_resource(ParsedDocument::resource("extra.robot")).unwrap();

    let analysis = host.analysis();
    assert_eq!(analysis.forest().kind(extra), Some(NodeKind::Resource));
    assert!(analysis.forest().standalone_resources().contains(&extra));
    assert_eq!(recorder.topics(), [topics::OPEN_RESOURCE]);
}

#[derive(Default)]
struct Counting {
    calls: usize,
    max_parsed: usize,
}

impl LoadObserver for Counting {
    fn progress(&mut self, progress: &LoadProgress) -> ControlFlow<()> {
        self.calls += 1;
        self.max_parsed = self.max_parsed.max(progress.parsed);
        ControlFlow::Continue(())
    }
}

#[test]
fn test_observer_sees_every_parsed_file() {
    let project = project_dir(false);
    let options = ProjectOptions::default();
    let mut observer = Counting::default();

    Loader::new(&parse, &options).load(&project.root, &mut observer).unwrap();

    assert_eq!(observer.calls, 3);
    assert_eq!(observer.max_parsed, 3);
}

#[test]
fn test_cancelled_load_installs_nothing() {
    let project = project_dir(false);
    let options = ProjectOptions::default();
    let token = tokio_util::sync::CancellationToken::new();
    let trigger = token.clone();
    let cancelling = move |path: &std::path::Path| -> Result<ParsedDocument, DataError> {
        trigger.cancel();
        parse(path)
    };

    let result = Loader::new(&cancelling, &options)
        .with_cancellation(token)
        .load(&project.root, &mut NullLoadObserver);

    assert!(matches!(result, Err(LoadError::Cancelled)));
}
