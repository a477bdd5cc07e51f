//! Which keyword arguments name other keywords.
//!
//! Keywords such as `Run Keyword` take another keyword's name as an
//! argument. Those argument cells are keyword usages; ordinary argument
//! cells are free text. The rules are an explicit, extensible table.

use rustc_hash::FxHashMap;

use crate::base::{NormalizedName, eq_names, split_bdd_prefix, split_qualified};

const AND: &str = "AND";
const ELSE: &str = "ELSE";
const ELSE_IF: &str = "ELSE IF";

/// How a keyword's arguments embed keyword names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeywordArgument {
    /// The argument at this index names a keyword; the arguments after it
    /// are that keyword's arguments.
    At(usize),
    /// Every argument names a keyword, unless `AND` separators are used,
    /// in which case each `AND`-separated group starts with one.
    Sequence,
    /// `condition  keyword  args...  ELSE IF  condition  keyword  ...  ELSE  keyword  ...`
    Conditional,
}

/// Table of keywords that accept keyword names as arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordArgumentRules {
    rules: FxHashMap<NormalizedName, KeywordArgument>,
}

impl Default for KeywordArgumentRules {
    fn default() -> Self {
        let mut rules = Self::empty();
        for name in [
            "Run Keyword",
            "Run Keyword And Continue On Failure",
            "Run Keyword And Ignore Error",
            "Run Keyword And Return",
            "Run Keyword And Return Status",
            "Run Keyword If All Critical Tests Passed",
            "Run Keyword If All Tests Passed",
            "Run Keyword If Any Critical Tests Failed",
            "Run Keyword If Any Tests Failed",
            "Run Keyword If Test Failed",
            "Run Keyword If Test Passed",
            "Run Keyword If Timeout Occurred",
        ] {
            rules.insert(name, KeywordArgument::At(0));
        }
        for name in [
            "Run Keyword And Expect Error",
            "Run Keyword And Return If",
            "Run Keyword Unless",
            "Repeat Keyword",
        ] {
            rules.insert(name, KeywordArgument::At(1));
        }
        rules.insert("Wait Until Keyword Succeeds", KeywordArgument::At(2));
        rules.insert("Run Keyword If", KeywordArgument::Conditional);
        rules.insert("Run Keywords", KeywordArgument::Sequence);
        rules
    }
}

impl KeywordArgumentRules {
    /// No keyword takes keyword arguments.
    pub fn empty() -> Self {
        Self {
            rules: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, keyword: &str, rule: KeywordArgument) {
        self.rules.insert(NormalizedName::new(keyword), rule);
    }

    pub fn remove(&mut self, keyword: &str) -> Option<KeywordArgument> {
        self.rules.remove(&NormalizedName::new(keyword))
    }

    pub fn get(&self, keyword: &str) -> Option<KeywordArgument> {
        self.rules.get(&NormalizedName::new(keyword)).copied()
    }

    /// The rule for a keyword cell as written in a call: tried as is, then
    /// without a BDD prefix, then by the keyword part of `Owner.Keyword`.
    pub fn rule_for(&self, cell: &str) -> Option<KeywordArgument> {
        let call = split_bdd_prefix(cell).map_or(cell, |(_, rest)| rest);
        self.get(cell)
            .or_else(|| self.get(call))
            .or_else(|| split_qualified(call).and_then(|(_, keyword)| self.get(keyword)))
    }

    /// Indexes into `args` of the cells that name keywords when `keyword`
    /// is called with `args`. Nested calls (`Run Keyword  Run Keyword  X`)
    /// are followed.
    pub fn keyword_positions(&self, keyword: &str, args: &[String]) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_positions(keyword, args, 0, &mut out);
        out
    }

    fn collect_positions(&self, keyword: &str, args: &[String], offset: usize, out: &mut Vec<usize>) {
        let Some(rule) = self.rule_for(keyword) else {
            return;
        };
        match rule {
            KeywordArgument::At(index) => {
                if let Some(inner) = args.get(index) {
                    out.push(offset + index);
                    self.collect_positions(inner, &args[index + 1..], offset + index + 1, out);
                }
            }
            KeywordArgument::Sequence => {
                if args.iter().any(|a| a.trim() == AND) {
                    let mut group_start = true;
                    for (i, arg) in args.iter().enumerate() {
                        if arg.trim() == AND {
                            group_start = true;
                        } else if group_start {
                            out.push(offset + i);
                            group_start = false;
                        }
                    }
                } else {
                    out.extend((0..args.len()).map(|i| offset + i));
                }
            }
            KeywordArgument::Conditional => {
                let mut expect = Some(1);
                for (i, arg) in args.iter().enumerate() {
                    if eq_names(arg, ELSE_IF) {
                        expect = Some(i + 2);
                    } else if arg.trim() == ELSE {
                        expect = Some(i + 1);
                    } else if expect == Some(i) {
                        out.push(offset + i);
                        expect = None;
                    }
                }
            }
        }
    }
}
