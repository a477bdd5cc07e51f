//! Grid editing through the host.

use ride::base::{Area, CellPos};
use ride::edit::{ChangeCellValue, ClearArea, CommandError, InsertRows, PasteArea, copy_area};
use ride::events::{Payload, topics};

use crate::helpers::forest_builders::{grid_project, step_cells};
use crate::helpers::recorder::Recorder;

fn full_grid() -> Vec<Vec<String>> {
    (1..=3)
        .map(|row| (1..=3).map(|col| format!("r{row}c{col}")).collect())
        .collect()
}

#[test]
fn test_cut_whole_grid_and_undo() {
    let (mut host, test) = grid_project();

    host.execute(&mut ClearArea::new(test, Area::new(0, 0, 2, 2))).unwrap();
    assert!(step_cells(&host, test).is_empty());

    host.undo().unwrap();
    assert_eq!(step_cells(&host, test), full_grid());
}

#[test]
fn test_two_cuts_undo_one_at_a_time() {
    let (mut host, test) = grid_project();

    host.execute(&mut ClearArea::new(test, Area::new(0, 1, 2, 2))).unwrap();
    let after_first = step_cells(&host, test);
    assert_eq!(after_first, [vec!["r1c1"], vec!["r2c1"], vec!["r3c1"]]);

    host.execute(&mut ClearArea::new(test, Area::new(1, 0, 2, 0))).unwrap();
    assert_eq!(step_cells(&host, test), [vec!["r1c1"]]);

    host.undo().unwrap();
    assert_eq!(step_cells(&host, test), after_first);
    host.undo().unwrap();
    assert_eq!(step_cells(&host, test), full_grid());
    assert!(!host.can_undo());
    assert_eq!(host.history().redo_len(), 2);
}

#[test]
fn test_copy_then_paste_is_one_undo_entry() {
    let (mut host, test) = grid_project();
    let block = {
        let analysis = host.analysis();
        copy_area(analysis.forest(), test, Area::new(0, 0, 1, 1)).unwrap()
    };

    host.execute(&mut PasteArea::new(test, CellPos::new(3, 1), block)).unwrap();
    let rows = step_cells(&host, test);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[3], ["", "r1c1", "r1c2"]);
    assert_eq!(rows[4], ["", "r2c1", "r2c2"]);
    assert_eq!(host.history().undo_len(), 1);

    host.undo().unwrap();
    assert_eq!(step_cells(&host, test), full_grid());
}

#[test]
fn test_cell_change_notifications() {
    let (mut host, test) = grid_project();
    let recorder = Recorder::attach(host.bus());

    host.execute(&mut ChangeCellValue::new(test, 1, 1, "new")).unwrap();
    host.undo().unwrap();

    let cells: Vec<(String, String)> = recorder
        .messages()
        .iter()
        .filter_map(|m| match m.payload() {
            Payload::GridCellChanged { value, previous, .. } => Some((value.clone(), previous.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        cells,
        [
            ("new".to_string(), "r2c2".to_string()),
            ("r2c2".to_string(), "new".to_string()),
        ]
    );
    assert_eq!(recorder.count(topics::ITEM_STEPS_CHANGED), 2);
}

#[test]
fn test_unchanged_cell_is_not_recorded() {
    let (mut host, test) = grid_project();

    host.execute(&mut ChangeCellValue::new(test, 0, 0, "r1c1")).unwrap();

    assert!(!host.can_undo());
}

#[test]
fn test_out_of_range_cell_is_rejected() {
    let (mut host, test) = grid_project();
    let recorder = Recorder::attach(host.bus());

    let result = host.execute(&mut ChangeCellValue::new(test, usize::MAX, 0, "x"));

    assert!(matches!(result, Err(CommandError::InvalidEdit(_))));
    assert_eq!(step_cells(&host, test), full_grid());
    assert!(!host.can_undo());
    assert!(recorder.messages().is_empty());
}

#[test]
fn test_insert_rows_marks_document_dirty() {
    let (mut host, test) = grid_project();
    let suite = host.analysis().forest().document_of(test).unwrap();
    assert!(!host.is_dirty(suite));

    host.execute(&mut InsertRows::new(test, 0, 1)).unwrap();

    assert!(host.is_dirty(suite));
    assert!(step_cells(&host, test)[0].is_empty());
}
