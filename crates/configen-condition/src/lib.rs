//! Condition micro-language → CMake boolean expression translation.
//!
//! Configuration documents guard features, tests, and library lookups with a
//! small expression language: namespace-qualified references (`libs.zlib`,
//! `features.thread`, `tests.cxx11_future`, `input.opengl`, `config.win32`,
//! `arch.x86_64`, `subarch.avx2`, `call.crossCompile`) combined with `!`,
//! `&&`, `||`, `==`, `!=` and parentheses. A condition may also be a literal
//! boolean or a list of expressions (implicit AND).
//!
//! [`ConditionTranslator`] rewrites such a condition into a CMake boolean
//! expression. Translation never fails: references that cannot be resolved
//! are reported through [`Translated::unresolved`] and the output gains a
//! trailing ` OR FIXME` marker, keeping the generated script syntactically
//! usable while making every gap auditable.
//!
//! ```
//! use configen_condition::{Condition, ConditionTranslator};
//! use std::collections::BTreeSet;
//!
//! let translator = ConditionTranslator::new();
//! let known = BTreeSet::new();
//!
//! let out = translator.translate(
//!     &Condition::Expr("config.win32 && !features.shared".into()),
//!     &known,
//! );
//! assert_eq!(out.text, "WIN32 AND NOT FEATURE_shared");
//! assert!(out.unresolved.is_empty());
//! ```

mod tables;
mod translate;

pub use tables::{builtin_feature_symbols, builtin_test_symbols};
pub use translate::ConditionTranslator;

use serde_json::Value;

/// Marker appended (as ` OR FIXME`) to expressions with unresolved
/// references.
pub const FAILURE_MARKER: &str = "FIXME";

/// A condition as it appears in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Literal boolean, translated to the `ON`/`OFF` sentinel.
    Bool(bool),
    /// A single expression string.
    Expr(String),
    /// A list of expression strings, combined with an implicit AND.
    All(Vec<String>),
}

impl Condition {
    /// Build a condition from the raw JSON value of a descriptor key.
    ///
    /// Non-string list elements and entirely unexpected shapes degrade to
    /// their JSON rendering; they will fail reference resolution downstream
    /// rather than aborting the run here.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Condition::Bool(*b),
            Value::String(s) => Condition::Expr(s.clone()),
            Value::Array(items) => Condition::All(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => Condition::Expr(other.to_string()),
        }
    }
}

/// Result of translating one condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translated {
    /// CMake boolean expression (empty for an empty condition).
    pub text: String,
    /// Namespace-qualified tokens that could not be resolved.
    pub unresolved: Vec<String>,
}

impl Translated {
    /// True when at least one reference failed to resolve.
    pub fn has_failures(&self) -> bool {
        !self.unresolved.is_empty()
    }
}
