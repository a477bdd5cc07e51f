//! Saving dirty documents through the host.

use std::sync::Arc;

use parking_lot::Mutex;

use ride::NodeId;
use ride::edit::ChangeCellValue;
use ride::events::topics;
use ride::hir::DocumentForest;
use ride::ide::ProjectHost;
use ride::project::{NullLoadObserver, SaveError, SerializationError};

use super::fixtures::{parse, project_dir};
use crate::helpers::recorder::Recorder;

/// Serializer that records what it wrote and fails for resources.
fn serializer(
    written: Arc<Mutex<Vec<String>>>,
) -> impl Fn(&DocumentForest, NodeId) -> Result<(), SerializationError> {
    move |forest: &DocumentForest, document: NodeId| {
        let name = forest.name(document).to_string();
        if name.ends_with(".robot") {
            return Err(SerializationError::new(document, name, "read-only file system"));
        }
        written.lock().push(name);
        Ok(())
    }
}

/// The loaded project with a cell changed in the suite and the resource.
fn edited() -> (ProjectHost, NodeId, NodeId) {
    let project = project_dir(false);
    let mut host = ProjectHost::new();
    host.load(&project.root, &parse, &mut NullLoadObserver).unwrap();
    let (suite, common, test, keyword) = {
        let analysis = host.analysis();
        let forest = analysis.forest();
        let suite = forest.find_document("Login Tests").unwrap();
        let common = forest.find_document("common.robot").unwrap();
        let test = forest.find_child(suite, "Valid Login").unwrap();
        let keyword = forest.find_child(common, "Log In").unwrap();
        (suite, common, test, keyword)
    };
    host.execute(&mut ChangeCellValue::new(test, 0, 1, "admin")).unwrap();
    host.execute(&mut ChangeCellValue::new(keyword, 0, 1, "quietly")).unwrap();
    (host, suite, common)
}

#[test]
fn test_save_all_continues_past_failures() {
    let (host, suite, common) = edited();
    let written = Arc::new(Mutex::new(Vec::new()));
    let recorder = Recorder::attach(host.bus());

    let result = host.save(&serializer(Arc::clone(&written)), None);

    let failures = match result {
        Err(SaveError::Serialization(failures)) => failures,
        other => panic!("expected a serialization failure, got {other:?}"),
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].document, common);
    assert_eq!(*written.lock(), ["Login Tests"]);
    assert!(!host.is_dirty(suite));
    assert!(host.is_dirty(common));
    assert_eq!(recorder.count(topics::SAVED), 1);
    assert_eq!(recorder.count(topics::LOG), 1);
    assert_eq!(recorder.count(topics::SAVE_ALL), 1);
}

#[test]
fn test_save_one_document() {
    let (host, suite, common) = edited();
    let written = Arc::new(Mutex::new(Vec::new()));
    let recorder = Recorder::attach(host.bus());

    let saved = host.save(&serializer(Arc::clone(&written)), Some(suite)).unwrap();

    assert_eq!(saved, [suite]);
    assert!(host.is_dirty(common));
    assert_eq!(recorder.topics(), [topics::SAVING, topics::SAVED]);
}

#[test]
fn test_nothing_dirty_saves_nothing() {
    let project = project_dir(false);
    let mut host = ProjectHost::new();
    host.load(&project.root, &parse, &mut NullLoadObserver).unwrap();
    let written = Arc::new(Mutex::new(Vec::new()));

    let saved = host.save(&serializer(Arc::clone(&written)), None).unwrap();

    assert!(saved.is_empty());
    assert!(written.lock().is_empty());
}
