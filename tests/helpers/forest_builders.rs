//! Small projects built in memory, without a parser.

use ride::NodeId;
use ride::ide::ProjectHost;
use ride::syntax::{Import, ParsedDocument, ParsedMacro, SettingKind};

/// Install `documents` at the top level of a fresh host.
pub fn host_with(documents: impl IntoIterator<Item = ParsedDocument>) -> (ProjectHost, Vec<NodeId>) {
    let mut host = ProjectHost::new();
    let ids = documents
        .into_iter()
        .map(|doc| host.install(None, doc).expect("install"))
        .collect();
    (host, ids)
}

/// The test case called `name` in `document`.
pub fn test_named(host: &ProjectHost, document: NodeId, name: &str) -> NodeId {
    let analysis = host.analysis();
    analysis
        .forest()
        .find_child(document, name)
        .unwrap_or_else(|| panic!("no test '{name}'"))
}

/// Cells of every step of `item`.
pub fn step_cells(host: &ProjectHost, item: NodeId) -> Vec<Vec<String>> {
    let analysis = host.analysis();
    analysis
        .forest()
        .get(item)
        .expect("node")
        .steps()
        .iter()
        .map(|s| s.cells().to_vec())
        .collect()
}

pub fn setting(host: &ProjectHost, item: NodeId, kind: SettingKind) -> Option<Vec<String>> {
    let analysis = host.analysis();
    analysis
        .forest()
        .get(item)
        .and_then(|n| n.settings().get(kind).map(<[String]>::to_vec))
}

/// Suite `Suite` with test `T`: steps `[Log, Hello]`, `[Run Keyword,
/// NoOperation]` and setup `SetupKw`.
pub fn setup_scenario() -> (ProjectHost, NodeId, NodeId) {
    let suite = ParsedDocument::suite("Suite").with_test(
        ParsedMacro::new("T")
            .with_setting(SettingKind::Setup, ["SetupKw"])
            .with_step(["Log", "Hello"])
            .with_step(["Run Keyword", "NoOperation"]),
    );
    let (host, ids) = host_with([suite]);
    let test = test_named(&host, ids[0], "T");
    (host, ids[0], test)
}

/// Ids of [`shadowing_project`].
pub struct Shadowing {
    pub suite: NodeId,
    pub other: NodeId,
    pub first: NodeId,
    pub second: NodeId,
    pub test: NodeId,
}

/// Two resources both define `Login`.
///
/// `Suite` imports `first.robot` then `second.robot`, so its calls mean the
/// first definition. `Other` imports only `second.robot`.
pub fn shadowing_project() -> (ProjectHost, Shadowing) {
    let first = ParsedDocument::resource("first.robot")
        .with_keyword(ParsedMacro::new("Login").with_step(["Log", "first"]));
    let second = ParsedDocument::resource("second.robot")
        .with_keyword(ParsedMacro::new("Login").with_step(["Log", "second"]));
    let suite = ParsedDocument::suite("Suite")
        .with_import(Import::resource("first.robot"))
        .with_import(Import::resource("second.robot"))
        .with_test(
            ParsedMacro::new("T")
                .with_step(["Login"])
                .with_step(["Given login"])
                .with_step(["Run Keyword If", "${ok}", "Login", "ELSE", "Log", "no"])
                .with_step(["first.Login"])
                .with_step(["second.Login"]),
        );
    let other = ParsedDocument::suite("Other")
        .with_import(Import::resource("second.robot"))
        .with_test(ParsedMacro::new("U").with_step(["Login"]));
    let (host, ids) = host_with([first, second, suite, other]);
    let test = test_named(&host, ids[2], "T");
    let project = Shadowing {
        first: ids[0],
        second: ids[1],
        suite: ids[2],
        other: ids[3],
        test,
    };
    (host, project)
}

/// A test whose steps form a 3x3 grid `r{row}c{col}`.
pub fn grid_project() -> (ProjectHost, NodeId) {
    let mut test = ParsedMacro::new("Grid");
    for row in 1..=3 {
        test = test.with_step((1..=3).map(|col| format!("r{row}c{col}")));
    }
    let (host, ids) = host_with([ParsedDocument::suite("Suite").with_test(test)]);
    let test = test_named(&host, ids[0], "Grid");
    (host, test)
}
