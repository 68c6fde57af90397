//! The expression rewriter.

use crate::{Condition, FAILURE_MARKER, Translated, tables};
use configen_mappings::{find_library_mapping, platform_predicate, symbol_name};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Translates condition expressions into CMake boolean syntax.
///
/// Construction compiles the fixed rewrite patterns and installs the
/// built-in override tables; [`with_tables`](Self::with_tables) substitutes
/// fixtures. The set of compile tests registered so far is per-run state and
/// is passed into [`translate`](Self::translate) by the caller instead of
/// living here.
pub struct ConditionTranslator {
    feature_symbols: BTreeMap<&'static str, &'static str>,
    test_symbols: BTreeMap<&'static str, &'static str>,
    not_equal: Regex,
    sdk_empty: Regex,
    reference: Regex,
    spaces: Regex,
}

impl ConditionTranslator {
    /// Translator with the built-in override tables.
    pub fn new() -> Self {
        Self::with_tables(
            tables::builtin_feature_symbols(),
            tables::builtin_test_symbols(),
        )
    }

    /// Translator with caller-supplied override tables (test fixtures).
    pub fn with_tables(
        feature_symbols: BTreeMap<&'static str, &'static str>,
        test_symbols: BTreeMap<&'static str, &'static str>,
    ) -> Self {
        Self {
            feature_symbols,
            test_symbols,
            // Rewrites `X != Y` into a negated equality before the generic
            // `!` rewrite runs, so the negation is not transformed twice.
            // The right-hand side is a quoted literal or a bare symbol.
            not_equal: Regex::new(r"(.+)\s*!=\s*('[^']*'|[^\s()]+)").unwrap(),
            sdk_empty: Regex::new(r"input\.sdk\s*==\s*''").unwrap(),
            reference: Regex::new(r"([a-zA-Z0-9_]+)\.([a-zA-Z0-9_+-]+)").unwrap(),
            spaces: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Translate one condition. Never fails; unresolved references are
    /// reported in the result and leave the original token in place, with
    /// the whole expression marked by a trailing ` OR FIXME`.
    pub fn translate(&self, condition: &Condition, known_tests: &BTreeSet<String>) -> Translated {
        match condition {
            Condition::Bool(true) => Translated {
                text: "ON".into(),
                unresolved: Vec::new(),
            },
            Condition::Bool(false) => Translated {
                text: "OFF".into(),
                unresolved: Vec::new(),
            },
            Condition::Expr(expr) => self.translate_expr(expr, known_tests),
            Condition::All(parts) => {
                let joined = format!("({})", parts.join(") AND ("));
                self.translate_expr(&joined, known_tests)
            }
        }
    }

    fn translate_expr(&self, expr: &str, known_tests: &BTreeSet<String>) -> Translated {
        if expr.trim().is_empty() {
            return Translated::default();
        }

        // Fixed textual rewrites. The SDK empty-string equality must be
        // rewritten while `==` is still present.
        let cond = self.not_equal.replace_all(expr, "(! $1 == $2)");
        let cond = self.sdk_empty.replace_all(&cond, "NOT INPUT_SDK");
        let cond = cond
            .replace('!', "NOT ")
            .replace("&&", " AND ")
            .replace("||", " OR ")
            .replace("==", " STREQUAL ");

        // Substitute namespace-qualified references positionally over the
        // rewritten string. Match spans never overlap; the assert guards the
        // invariant the splice below depends on.
        let mut out = String::with_capacity(cond.len());
        let mut unresolved = Vec::new();
        let mut last_pos = 0;
        for caps in self.reference.captures_iter(&cond) {
            let span = caps.get(0).unwrap();
            assert!(span.start() >= last_pos, "overlapping reference spans");
            let namespace = &caps[1];
            let name = &caps[2];

            match self.resolve(namespace, name, known_tests) {
                Some(substitution) => {
                    out.push_str(&cond[last_pos..span.start()]);
                    out.push_str(&substitution);
                    last_pos = span.end();
                }
                // Leave the token in place so the output stays readable
                // next to the FIXME marker.
                None => unresolved.push(format!("{namespace}.{name}")),
            }
        }
        out.push_str(&cond[last_pos..]);

        // Space out parentheses, then collapse runs of whitespace.
        let out = out.replace('(', " ( ").replace(')', " ) ");
        let mut text = self.spaces.replace_all(&out, " ").trim().to_string();

        if !unresolved.is_empty() {
            text.push_str(" OR ");
            text.push_str(FAILURE_MARKER);
        }

        Translated { text, unresolved }
    }

    fn resolve(
        &self,
        namespace: &str,
        name: &str,
        known_tests: &BTreeSet<String>,
    ) -> Option<String> {
        match namespace {
            "libs" => find_library_mapping(name).and_then(|mapping| mapping.found_flag()),
            "features" => Some(match self.feature_symbols.get(name) {
                Some(symbol) => (*symbol).to_string(),
                None => format!("FEATURE_{}", symbol_name(name)),
            }),
            "tests" => match self.test_symbols.get(name) {
                Some(symbol) => Some((*symbol).to_string()),
                None if known_tests.contains(name) => {
                    Some(format!("TEST_{}", symbol_name(name)))
                }
                None => None,
            },
            "input" => Some(format!("INPUT_{}", symbol_name(name))),
            "config" => platform_predicate(name).map(str::to_string),
            "subarch" => Some(format!(
                "TEST_arch_${{TEST_architecture_arch}}_subarch_{name}"
            )),
            "arch" => match name {
                "i386" | "x86_64" | "arm" | "arm64" | "mips" => {
                    Some(format!("(TEST_architecture_arch STREQUAL {name})"))
                }
                _ => None,
            },
            "call" if name == "crossCompile" => Some("CMAKE_CROSSCOMPILING".to_string()),
            _ => None,
        }
    }
}

impl Default for ConditionTranslator {
    fn default() -> Self {
        Self::new()
    }
}
