//! Undo and redo stacks as seen through the host.

use rstest::rstest;

use ride::edit::{ChangeCellValue, ChangeField, CommandError};
use ride::hir::Field;
use ride::ide::ProjectHost;
use ride::project::ProjectOptions;
use ride::syntax::{ParsedDocument, ParsedMacro};

use crate::helpers::forest_builders::{grid_project, step_cells, test_named};

fn limited_host(limit: Option<usize>) -> (ProjectHost, ride::NodeId) {
    let options = ProjectOptions::default().with_undo_limit(limit);
    let mut host = ProjectHost::with_options(options);
    let suite = host
        .install(
            None,
            ParsedDocument::suite("S").with_test(ParsedMacro::new("T").with_step(["Log", "0"])),
        )
        .unwrap();
    let test = test_named(&host, suite, "T");
    (host, test)
}

#[rstest]
#[case::undo(true)]
#[case::redo(false)]
fn test_empty_stack_is_a_no_op(#[case] undo: bool) {
    let (mut host, test) = grid_project();
    let before = step_cells(&host, test);

    let result = if undo { host.undo() } else { host.redo() };

    assert!(matches!(result, Err(CommandError::NoOp(_))));
    assert_eq!(step_cells(&host, test), before);
}

#[rstest]
#[case(Some(2), 2)]
#[case(Some(5), 4)]
#[case(None, 4)]
fn test_undo_limit_drops_oldest(#[case] limit: Option<usize>, #[case] kept: usize) {
    let (mut host, test) = limited_host(limit);

    for i in 1..=4 {
        host.execute(&mut ChangeCellValue::new(test, 0, 1, i.to_string())).unwrap();
    }

    assert_eq!(host.history().undo_len(), kept);
    while host.can_undo() {
        host.undo().unwrap();
    }
    let expected = (4 - kept).to_string();
    assert_eq!(step_cells(&host, test), [vec!["Log", expected.as_str()]]);
}

#[test]
fn test_new_command_discards_redo() {
    let (mut host, test) = grid_project();

    host.execute(&mut ChangeCellValue::new(test, 0, 0, "a")).unwrap();
    host.undo().unwrap();
    assert!(host.can_redo());

    host.execute(&mut ChangeCellValue::new(test, 0, 0, "b")).unwrap();
    assert!(!host.can_redo());
    assert!(matches!(host.redo(), Err(CommandError::NoOp("redo"))));
}

#[test]
fn test_change_field_renames_test_case() {
    let (mut host, test) = grid_project();

    host.execute(&mut ChangeField::new(test, Field::Name, "Renamed")).unwrap();
    assert_eq!(host.analysis().forest().name(test), "Renamed");
    assert_eq!(host.history().undo_label(), Some("Change field"));

    host.undo().unwrap();
    assert_eq!(host.analysis().forest().name(test), "Grid");
}
