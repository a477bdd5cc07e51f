//! Resolution through an analysis snapshot.

use rstest::rstest;

use ride::hir::{DocumentForest, Library, Resolution};
use ride::ide::ProjectHost;
use ride::project::ProjectOptions;
use ride::syntax::{Import, ParsedDocument, ParsedMacro};

use crate::helpers::forest_builders::{shadowing_project, test_named};

#[test]
fn test_first_import_wins() {
    let (host, p) = shadowing_project();
    let u = test_named(&host, p.other, "U");
    let analysis = host.analysis();

    let resolution = analysis.resolve_keyword(p.test, "Login");
    let first_login = analysis.forest().find_child(p.first, "Login").unwrap();
    assert_eq!(resolution.definition(), Some(first_login));

    let second_login = analysis.forest().find_child(p.second, "Login").unwrap();
    assert_eq!(analysis.resolve_keyword(u, "Login").definition(), Some(second_login));
}

#[rstest]
#[case("Login")]
#[case("login")]
#[case("LOG IN")]
#[case("Given Login")]
#[case("and login")]
#[case("first.Login")]
fn test_spellings_resolve_to_same_keyword(#[case] call: &str) {
    let (host, p) = shadowing_project();
    let analysis = host.analysis();
    let first_login = analysis.forest().find_child(p.first, "Login").unwrap();

    assert_eq!(analysis.resolve_keyword(p.test, call).definition(), Some(first_login));
    assert!(analysis.is_user_keyword(p.test, call));
}

#[test]
fn test_library_and_builtin_keywords() {
    let mut forest = DocumentForest::new();
    forest
        .libraries_mut()
        .add_library(Library::new("OperatingSystem").with_keywords(["Create File"]));
    let suite = forest
        .install(
            None,
            ParsedDocument::suite("S")
                .with_import(Import::library("OperatingSystem").with_alias("OS"))
                .with_test(ParsedMacro::new("T").with_step(["Create File", "x"])),
        )
        .unwrap();
    let host = ProjectHost::from_forest(forest, ProjectOptions::default());
    let analysis = host.analysis();

    assert!(matches!(
        analysis.resolve_keyword(suite, "create file"),
        Resolution::LibraryKeyword { .. }
    ));
    assert!(analysis.resolve_keyword(suite, "OS.Create File").is_resolved());
    assert!(matches!(
        analysis.resolve_keyword(suite, "Log"),
        Resolution::BuiltIn { .. }
    ));
    assert_eq!(analysis.resolve_keyword(suite, "Nope"), Resolution::Unresolved);
}

#[test]
fn test_visible_keywords_put_local_first() {
    let (host, p) = shadowing_project();
    let analysis = host.analysis();

    let visible = analysis.visible_keywords(p.test);
    let logins: Vec<&str> = visible
        .iter()
        .filter(|k| k.name.as_str() == "Login")
        .map(|k| k.source.as_str())
        .collect();
    assert_eq!(logins, ["first.robot"]);

    let info = analysis.keyword_info(p.test, "Login").unwrap();
    assert!(info.is_user_keyword());
    assert_eq!(info.source.as_str(), "first.robot");
}

#[test]
fn test_import_closure_lists_each_resource_once() {
    let (host, p) = shadowing_project();
    let analysis = host.analysis();

    assert_eq!(analysis.import_closure(p.suite), [p.first, p.second]);
    assert_eq!(analysis.import_closure(p.other), [p.second]);
}
