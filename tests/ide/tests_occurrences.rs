//! Find usages through an analysis snapshot.

use ride::hir::{DocumentForest, Field};
use ride::ide::{ProjectHost, Usage};
use ride::project::ProjectOptions;
use ride::syntax::{Import, ParsedDocument, ParsedMacro, SettingKind};

use crate::helpers::forest_builders::{host_with, shadowing_project, test_named};

#[test]
fn test_usages_of_the_resolved_definition_only() {
    let (host, p) = shadowing_project();
    let analysis = host.analysis();

    let found: Vec<_> = analysis.find_occurrences(Some(p.test), "Login").collect();
    let summary: Vec<_> = found
        .iter()
        .map(|o| (o.document, o.usage, o.field.clone()))
        .collect();

    assert_eq!(
        summary,
        [
            (p.suite, Usage::Steps, Field::Step { row: 0, col: 0 }),
            (p.suite, Usage::Steps, Field::Step { row: 1, col: 0 }),
            (p.suite, Usage::Steps, Field::Step { row: 2, col: 2 }),
            (p.suite, Usage::Steps, Field::Step { row: 3, col: 0 }),
            (p.first, Usage::KeywordName, Field::Name),
        ]
    );
}

#[test]
fn test_search_without_context_is_textual() {
    let (host, p) = shadowing_project();
    let analysis = host.analysis();

    let documents: Vec<_> = analysis
        .find_occurrences(None, "Login")
        .map(|o| o.document)
        .collect();

    for document in [p.suite, p.other, p.first, p.second] {
        assert!(documents.contains(&document), "{document} missing");
    }
}

#[test]
fn test_search_reflects_latest_tree() {
    let (mut host, p) = shadowing_project();
    let before = host.analysis().find_occurrences(Some(p.test), "Login").count();

    host.execute(&mut ride::edit::RenameKeywordOccurrences::new(
        Some(p.test),
        "Login",
        "Sign In",
    ))
    .unwrap();

    let analysis = host.analysis();
    assert_eq!(analysis.find_occurrences(Some(p.test), "Sign In").count(), before);
}

#[test]
fn test_variable_usages_skip_shadowing_locals() {
    let suite = ParsedDocument::suite("Suite")
        .with_variable("${HOST}", ["example.org"])
        .with_test(ParsedMacro::new("T").with_step(["Log", "Host is ${host}"]))
        .with_keyword(
            ParsedMacro::new("Connect")
                .with_setting(SettingKind::Arguments, ["${host}"])
                .with_step(["Log", "${HOST}"]),
        );
    let (host, ids) = host_with([suite]);
    let keyword = test_named(&host, ids[0], "Connect");
    let analysis = host.analysis();

    let global: Vec<_> = analysis
        .find_variable_occurrences(Some(ids[0]), "${HOST}")
        .map(|o| (o.location, o.usage, o.range))
        .collect();
    assert_eq!(
        global,
        [
            ("Suite".to_string(), Usage::VariableTable, 0..7),
            ("T".to_string(), Usage::Steps, 8..15),
        ]
    );

    let local: Vec<_> = analysis
        .find_variable_occurrences(Some(keyword), "host")
        .map(|o| o.usage)
        .collect();
    assert_eq!(local, [Usage::Arguments, Usage::Steps]);
}

#[test]
fn test_variable_scope_follows_step_rows() {
    let suite = ParsedDocument::suite("Suite")
        .with_variable("${x}", ["1"])
        .with_test(
            ParsedMacro::new("T")
                .with_step(["Log", "${x}"])
                .with_step(["${x}=", "Evaluate", "${x} + 1"])
                .with_step(["Log", "${X}"]),
        );
    let (host, ids) = host_with([suite]);
    let test = test_named(&host, ids[0], "T");
    let analysis = host.analysis();

    let global: Vec<_> = analysis
        .find_variable_occurrences(Some(ids[0]), "${x}")
        .map(|o| (o.usage, o.field))
        .collect();
    assert_eq!(
        global,
        [
            (Usage::VariableTable, Field::Variable { index: 0, cell: 0 }),
            (Usage::Steps, Field::Step { row: 0, col: 1 }),
            (Usage::Steps, Field::Step { row: 1, col: 2 }),
        ]
    );

    let local: Vec<_> = analysis
        .find_variable_occurrences(Some(test), "${x}")
        .map(|o| o.field)
        .collect();
    assert_eq!(local, [Field::Step { row: 1, col: 0 }, Field::Step { row: 2, col: 1 }]);
}

#[test]
fn test_documentation_reports_every_reference() {
    let suite = ParsedDocument::suite("Suite")
        .with_variable("${x}", ["1"])
        .with_test(ParsedMacro::new("T").with_setting(SettingKind::Documentation, ["${x} and ${X} and ${x}"]));
    let (host, ids) = host_with([suite]);
    let analysis = host.analysis();

    let documented: Vec<_> = analysis
        .find_variable_occurrences(Some(ids[0]), "${x}")
        .filter(|o| o.usage == Usage::Documentation)
        .map(|o| (o.location, o.range))
        .collect();
    assert_eq!(
        documented,
        [
            ("T".to_string(), 0..4),
            ("T".to_string(), 9..13),
            ("T".to_string(), 18..22),
        ]
    );
}

#[test]
fn test_variable_file_usages() {
    let mut forest = DocumentForest::new();
    forest.libraries_mut().add_variable_file("vars.py", ["${HOST}"]);
    let with_file = forest
        .install(
            None,
            ParsedDocument::suite("With File")
                .with_import(Import::variables("vars.py"))
                .with_test(ParsedMacro::new("T").with_step(["Connect", "${host}"])),
        )
        .unwrap();
    forest
        .install(
            None,
            ParsedDocument::suite("Without File")
                .with_test(ParsedMacro::new("U").with_step(["Connect", "${HOST}"])),
        )
        .unwrap();
    let host = ProjectHost::from_forest(forest, ProjectOptions::default());
    let test = test_named(&host, with_file, "T");
    let analysis = host.analysis();

    let found: Vec<_> = analysis
        .find_variable_occurrences(Some(test), "${HOST}")
        .map(|o| (o.document, o.location, o.field))
        .collect();
    assert_eq!(found, [(with_file, "T".to_string(), Field::Step { row: 0, col: 1 })]);
}

#[test]
fn test_keyword_arguments_of_prefixed_and_qualified_runners() {
    let suite = ParsedDocument::suite("Suite")
        .with_test(
            ParsedMacro::new("T")
                .with_step(["BuiltIn.Run Keyword", "My Kw"])
                .with_step(["Given Run Keyword", "My Kw"]),
        )
        .with_keyword(ParsedMacro::new("My Kw").with_step(["No Operation"]));
    let (host, ids) = host_with([suite]);
    let test = test_named(&host, ids[0], "T");
    let analysis = host.analysis();

    let fields: Vec<_> = analysis
        .find_occurrences(Some(test), "My Kw")
        .map(|o| o.field)
        .collect();
    assert_eq!(
        fields,
        [
            Field::Step { row: 0, col: 1 },
            Field::Step { row: 1, col: 1 },
            Field::Name,
        ]
    );
}

#[test]
fn test_user_keyword_runner_takes_plain_arguments() {
    let suite = ParsedDocument::suite("Suite")
        .with_import(Import::resource("helpers.txt"))
        .with_test(
            ParsedMacro::new("T")
                .with_step(["Given BuiltIn.Run Keyword", "My Kw"])
                .with_step(["helpers.Run Keyword", "My Kw"])
                .with_step(["Run Keyword", "My Kw"])
                .with_step(["Missing.Run Keyword", "My Kw"]),
        )
        .with_keyword(ParsedMacro::new("My Kw").with_step(["No Operation"]));
    let helpers = ParsedDocument::resource("helpers.txt")
        .with_keyword(ParsedMacro::new("Run Keyword").with_setting(SettingKind::Arguments, ["${text}"]));
    let (host, ids) = host_with([helpers, suite]);
    let test = test_named(&host, ids[1], "T");
    let analysis = host.analysis();

    let fields: Vec<_> = analysis
        .find_occurrences(Some(test), "My Kw")
        .map(|o| o.field)
        .collect();
    assert_eq!(fields, [Field::Step { row: 0, col: 1 }, Field::Name]);
}
