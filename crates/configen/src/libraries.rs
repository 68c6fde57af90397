//! Library Requirement Emitter: library ids → guarded package lookups.

use crate::document::ConfigDocument;
use crate::script::ScriptWriter;
use configen_condition::{Condition, ConditionTranslator};
use configen_mappings::find_library_mapping;
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Emit the Libraries section for one document.
///
/// Each referenced library id resolves through the package table; the
/// per-document `emitted` set (keyed by target symbol) keeps a library that
/// several features reference from being declared twice.
pub fn process<W: Write>(
    doc: &ConfigDocument,
    translator: &ConditionTranslator,
    known_tests: &BTreeSet<String>,
    writer: &mut ScriptWriter<W>,
) -> io::Result<()> {
    let mut emitted: BTreeSet<&str> = BTreeSet::new();
    for id in doc.libraries().keys() {
        emit_library(id, doc, translator, known_tests, &mut emitted, writer)?;
    }
    Ok(())
}

fn emit_library<W: Write>(
    id: &str,
    doc: &ConfigDocument,
    translator: &ConditionTranslator,
    known_tests: &BTreeSet<String>,
    emitted: &mut BTreeSet<&'static str>,
    writer: &mut ScriptWriter<W>,
) -> io::Result<()> {
    let Some(mapping) = find_library_mapping(id) else {
        warn!("unknown library {id}");
        return Ok(());
    };
    let Some(package) = mapping.package else {
        debug!("skipping library {id}: masked");
        return Ok(());
    };
    let target = mapping.target_name().unwrap_or(package);
    debug!("mapped library {id} to {target}");

    if !emitted.insert(target) {
        return Ok(());
    }

    // A library used by a feature that is only emitted on some platforms
    // should hide its package lookup behind the same platform guard.
    let guard = mapping
        .emit_if
        .map(str::to_string)
        .or_else(|| adopt_feature_guard(id, doc));

    writer.raw(&format!("# {id}\n"))?;
    match guard {
        Some(expr) => {
            let translated =
                translator.translate(&Condition::Expr(expr), known_tests);
            for token in &translated.unresolved {
                warn!("unresolved reference `{token}` in guard of library {id}");
            }
            writer.raw(&format!(
                "if({})\n    config_find_package({package})\nendif()\n\n",
                translated.text
            ))?;
        }
        None => writer.raw(&format!("config_find_package({package})\n\n"))?,
    }
    Ok(())
}

/// First feature whose condition references `libs.<id>` and whose emit
/// guard is a plain platform predicate.
fn adopt_feature_guard(id: &str, doc: &ConfigDocument) -> Option<String> {
    let reference = format!("libs.{id}");
    for feature in doc.features().values() {
        if let Some(condition) = feature.get("condition").and_then(Value::as_str)
            && condition.contains(&reference)
            && let Some(emit_if) = feature.get("emitIf").and_then(Value::as_str)
            && emit_if.contains("config.")
        {
            return Some(emit_if.to_string());
        }
    }
    None
}
