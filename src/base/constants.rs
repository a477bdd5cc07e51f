//! Domain constants for the keyword-driven test DSL.

/// Words that may lead a step keyword in behavior-driven style.
pub const BDD_PREFIXES: &[&str] = &["Given", "When", "Then", "And", "But"];

/// First cells that open a for loop (old and new syntax).
pub const FOR_LOOP_MARKERS: &[&str] = &[":FOR", "FOR"];

/// First cell that closes a new-style for loop.
pub const FOR_LOOP_END: &str = "END";

/// Cells that continue a row or mark an old-style loop body.
pub const CONTINUATION_MARKERS: &[&str] = &["\\", "..."];

/// Platform-neutral file separator variable accepted in import paths.
pub const PATH_SEPARATOR_VARIABLE: &str = "${/}";

/// Library whose keywords are always in scope.
pub const BUILTIN_LIBRARY: &str = "BuiltIn";

/// Keywords of the always-imported built-in library.
pub const BUILTIN_KEYWORDS: &[&str] = &[
    "Call Method",
    "Catenate",
    "Comment",
    "Continue For Loop",
    "Continue For Loop If",
    "Convert To Binary",
    "Convert To Boolean",
    "Convert To Bytes",
    "Convert To Hex",
    "Convert To Integer",
    "Convert To Number",
    "Convert To Octal",
    "Convert To String",
    "Create Dictionary",
    "Create List",
    "Evaluate",
    "Exit For Loop",
    "Exit For Loop If",
    "Fail",
    "Fatal Error",
    "Get Count",
    "Get Length",
    "Get Library Instance",
    "Get Time",
    "Get Variable Value",
    "Get Variables",
    "Import Library",
    "Import Resource",
    "Import Variables",
    "Keyword Should Exist",
    "Length Should Be",
    "Log",
    "Log Many",
    "Log To Console",
    "Log Variables",
    "No Operation",
    "Pass Execution",
    "Pass Execution If",
    "Regexp Escape",
    "Reload Library",
    "Remove Tags",
    "Repeat Keyword",
    "Replace Variables",
    "Return From Keyword",
    "Return From Keyword If",
    "Run Keyword",
    "Run Keyword And Continue On Failure",
    "Run Keyword And Expect Error",
    "Run Keyword And Ignore Error",
    "Run Keyword And Return",
    "Run Keyword And Return If",
    "Run Keyword And Return Status",
    "Run Keyword If",
    "Run Keyword If All Critical Tests Passed",
    "Run Keyword If All Tests Passed",
    "Run Keyword If Any Critical Tests Failed",
    "Run Keyword If Any Tests Failed",
    "Run Keyword If Test Failed",
    "Run Keyword If Test Passed",
    "Run Keyword If Timeout Occurred",
    "Run Keyword Unless",
    "Run Keywords",
    "Set Global Variable",
    "Set Library Search Order",
    "Set Log Level",
    "Set Suite Documentation",
    "Set Suite Metadata",
    "Set Suite Variable",
    "Set Tags",
    "Set Test Documentation",
    "Set Test Message",
    "Set Test Variable",
    "Set Variable",
    "Set Variable If",
    "Should Be Empty",
    "Should Be Equal",
    "Should Be Equal As Integers",
    "Should Be Equal As Numbers",
    "Should Be Equal As Strings",
    "Should Be True",
    "Should Contain",
    "Should Contain X Times",
    "Should End With",
    "Should Match",
    "Should Match Regexp",
    "Should Not Be Empty",
    "Should Not Be Equal",
    "Should Not Be Equal As Integers",
    "Should Not Be Equal As Numbers",
    "Should Not Be Equal As Strings",
    "Should Not Be True",
    "Should Not Contain",
    "Should Not End With",
    "Should Not Match",
    "Should Not Match Regexp",
    "Should Not Start With",
    "Should Start With",
    "Sleep",
    "Variable Should Exist",
    "Variable Should Not Exist",
    "Wait Until Keyword Succeeds",
];

/// Variables defined by the runtime, by bare name.
pub const BUILTIN_VARIABLES: &[&str] = &[
    "True",
    "False",
    "None",
    "null",
    "EMPTY",
    "SPACE",
    "/",
    ":",
    "\\n",
    "CURDIR",
    "TEMPDIR",
    "EXECDIR",
    "TEST NAME",
    "TEST DOCUMENTATION",
    "TEST TAGS",
    "TEST STATUS",
    "TEST MESSAGE",
    "PREV TEST NAME",
    "PREV TEST STATUS",
    "PREV TEST MESSAGE",
    "SUITE NAME",
    "SUITE SOURCE",
    "SUITE DOCUMENTATION",
    "SUITE METADATA",
    "SUITE STATUS",
    "SUITE MESSAGE",
    "KEYWORD STATUS",
    "KEYWORD MESSAGE",
    "LOG LEVEL",
    "OUTPUT FILE",
    "LOG FILE",
    "REPORT FILE",
    "DEBUG FILE",
    "OUTPUT DIR",
];

/// File extensions recognized as test data by default.
pub const DATA_EXTENSIONS: &[&str] = &["txt", "robot", "tsv", "resource"];

/// Base name of the file that carries directory-suite settings.
pub const INIT_FILE_STEM: &str = "__init__";
