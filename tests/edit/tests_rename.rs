//! Rename through the host: edits, notifications, undo.

use rstest::rstest;

use ride::edit::{CommandError, RenameKeywordOccurrences, RenameObserver};
use ride::events::topics;
use ride::ide::Occurrence;
use ride::syntax::SettingKind;

use crate::helpers::forest_builders::{
    setting, setup_scenario, shadowing_project, step_cells, test_named,
};
use crate::helpers::recorder::Recorder;

#[test]
fn test_rename_setup_fires_one_settings_notification() {
    let (mut host, _, test) = setup_scenario();
    let recorder = Recorder::attach(host.bus());

    host.execute(&mut RenameKeywordOccurrences::new(Some(test), "SetupKw", "Foo"))
        .unwrap();

    assert_eq!(setting(&host, test, SettingKind::Setup), Some(vec!["Foo".to_string()]));
    assert_eq!(recorder.count(topics::ITEM_SETTINGS_CHANGED), 1);
    assert_eq!(recorder.count(topics::ITEM_STEPS_CHANGED), 0);

    host.undo().unwrap();
    assert_eq!(
        setting(&host, test, SettingKind::Setup),
        Some(vec!["SetupKw".to_string()])
    );
    assert_eq!(recorder.count(topics::ITEM_SETTINGS_CHANGED), 2);
    assert_eq!(recorder.count(topics::ITEM_STEPS_CHANGED), 0);
}

#[test]
fn test_rename_follows_resolution() {
    let (mut host, p) = shadowing_project();

    host.execute(&mut RenameKeywordOccurrences::new(Some(p.test), "Login", "Sign In"))
        .unwrap();

    assert_eq!(
        step_cells(&host, p.test),
        [
            vec!["Sign In"],
            vec!["Given Sign In"],
            vec!["Run Keyword If", "${ok}", "Sign In", "ELSE", "Log", "no"],
            vec!["first.Sign In"],
            vec!["second.Login"],
        ]
    );
    let analysis = host.analysis();
    let forest = analysis.forest();
    assert!(forest.find_child(p.first, "Sign In").is_some());
    assert!(forest.find_child(p.second, "Login").is_some());
    drop(analysis);

    let u = test_named(&host, p.other, "U");
    assert_eq!(step_cells(&host, u), [vec!["Login"]]);
}

#[test]
fn test_rename_undo_and_redo_restore_exactly() {
    let (mut host, p) = shadowing_project();
    let before = step_cells(&host, p.test);

    host.execute(&mut RenameKeywordOccurrences::new(Some(p.test), "Login", "Sign In"))
        .unwrap();
    let after = step_cells(&host, p.test);
    assert!(host.can_undo());

    host.undo().unwrap();
    assert_eq!(step_cells(&host, p.test), before);
    assert!(host.analysis().forest().find_child(p.first, "Login").is_some());

    host.redo().unwrap();
    assert_eq!(step_cells(&host, p.test), after);
    assert!(!host.can_redo());
}

#[test]
fn test_rename_there_and_back_is_identity() {
    let (mut host, p) = shadowing_project();
    let before = step_cells(&host, p.test);

    host.execute(&mut RenameKeywordOccurrences::new(Some(p.test), "Login", "Sign In"))
        .unwrap();
    host.execute(&mut RenameKeywordOccurrences::new(Some(p.test), "Sign In", "Login"))
        .unwrap();

    assert_eq!(step_cells(&host, p.test), before);
    assert_eq!(host.history().undo_len(), 2);
}

#[rstest]
#[case("")]
#[case("   ")]
fn test_rename_to_empty_name_is_rejected(#[case] new: &str) {
    let (mut host, p) = shadowing_project();
    let before = step_cells(&host, p.test);

    let result = host.execute(&mut RenameKeywordOccurrences::new(Some(p.test), "Login", new));

    assert!(matches!(result, Err(CommandError::InvalidEdit(_))));
    assert_eq!(step_cells(&host, p.test), before);
    assert!(!host.can_undo());
}

#[test]
fn test_rename_of_unused_name_records_nothing() {
    let (mut host, p) = shadowing_project();
    let recorder = Recorder::attach(host.bus());

    host.execute(&mut RenameKeywordOccurrences::new(Some(p.test), "Nowhere", "Somewhere"))
        .unwrap();

    assert!(!host.can_undo());
    assert!(recorder.topics().is_empty());
}

#[derive(Default)]
struct Collect {
    seen: Vec<String>,
    finished: Option<usize>,
}

impl RenameObserver for Collect {
    fn notify(&mut self, occurrence: &Occurrence) {
        self.seen.push(occurrence.value.clone());
    }

    fn finish(&mut self, count: usize) {
        self.finished = Some(count);
    }
}

#[test]
fn test_rename_reports_each_change_to_observer() {
    let (mut host, p) = shadowing_project();
    let mut observer = Collect::default();

    host.execute(
        &mut RenameKeywordOccurrences::new(Some(p.test), "Login", "Sign In")
            .with_observer(&mut observer),
    )
    .unwrap();

    assert_eq!(observer.finished, Some(observer.seen.len()));
    assert!(observer.seen.contains(&"Given login".to_string()));
    assert!(!observer.seen.contains(&"second.Login".to_string()));
}
