//! A small test data tree on disk and a parser that understands it.

use std::fs;
use std::path::{Path, PathBuf};

use ride::project::DataError;
use ride::syntax::{Import, ParsedDocument, ParsedMacro, SettingKind};
use tempfile::TempDir;

/// ```text
/// project/
///   __init__.robot          Suite Setup  Log In
///   login_tests.robot       Valid Login: Log In  demo
///   broken.robot            fails to parse
///   resources/common.robot  keyword Log In
/// ```
pub struct ProjectDir {
    _dir: TempDir,
    pub root: PathBuf,
}

pub fn project_dir(with_broken: bool) -> ProjectDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("project");
    let mut files = vec!["__init__.robot", "login_tests.robot", "resources/common.robot"];
    if with_broken {
        files.push("broken.robot");
    }
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, file).expect("write");
    }
    ProjectDir { _dir: dir, root }
}

/// Parser for [`project_dir`], keyed by file name.
pub fn parse(path: &Path) -> Result<ParsedDocument, DataError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let common = Import::resource("resources/common.robot");
    let doc = match name.as_str() {
        "__init__.robot" => ParsedDocument::directory("ignored")
            .with_import(common)
            .with_setting(SettingKind::SuiteSetup, ["Log In"]),
        "login_tests.robot" => ParsedDocument::suite("ignored")
            .with_import(common)
            .with_test(ParsedMacro::new("Valid Login").with_step(["Log In", "demo"])),
        "common.robot" => ParsedDocument::resource("ignored")
            .with_keyword(ParsedMacro::new("Log In").with_step(["Log", "logging in"])),
        _ => return Err(DataError::new(path, "unrecognized table")),
    };
    // Names come from the file path once loaded.
    Ok(ParsedDocument { name: None, ..doc })
}
