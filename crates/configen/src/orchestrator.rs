//! Driving one run: documents, sections, recursion.

use crate::document::{ConfigDocument, OUTPUT_NAME};
use crate::features::FeatureResolver;
use crate::script::ScriptWriter;
use crate::{Error, inputs, libraries, probes};
use configen_condition::ConditionTranslator;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Processes a directory tree of configuration documents, one generated
/// script per directory.
///
/// The orchestrator owns the run's only piece of cross-document state, the
/// set of test names registered so far, and hands it explicitly to the
/// section processors, so subconfiguration ordering stays deterministic and
/// a single document remains independently processable.
pub struct Orchestrator {
    translator: ConditionTranslator,
    features: FeatureResolver,
    known_tests: BTreeSet<String>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            translator: ConditionTranslator::new(),
            features: FeatureResolver::new(),
            known_tests: BTreeSet::new(),
        }
    }

    /// Tests registered so far in this run.
    pub fn known_tests(&self) -> &BTreeSet<String> {
        &self.known_tests
    }

    /// Process `dir` and, depth-first, every subconfiguration it lists.
    pub fn run(&mut self, dir: &Path) -> Result<(), Error> {
        let doc = ConfigDocument::read_from_dir(dir)?;
        info!("processing {} (module {})", dir.display(), doc.module());

        for (role, file) in doc.files() {
            debug!("file role {role}: {file}");
        }

        // The output handle lives exactly as long as this document's
        // processing; it is closed before any recursion below.
        let out_path = dir.join(OUTPUT_NAME);
        {
            let file = File::create(&out_path).map_err(|e| Error::Write(out_path.clone(), e))?;
            let mut writer = ScriptWriter::new(BufWriter::new(file));
            self.process_document(&doc, &mut writer)
                .and_then(|()| writer.flush())
                .map_err(|e| Error::Write(out_path.clone(), e))?;
        }

        for sub in doc.subconfigs() {
            self.run(&dir.join(sub))?;
        }
        Ok(())
    }

    /// Write the four labeled sections (plus the root's version trailer) to
    /// an already-open writer. Exposed separately so tests can process a
    /// document against an in-memory buffer.
    pub fn process_document<W: Write>(
        &mut self,
        doc: &ConfigDocument,
        writer: &mut ScriptWriter<W>,
    ) -> io::Result<()> {
        writer.section("Inputs")?;
        inputs::process(doc, writer)?;

        writer.section("Libraries")?;
        libraries::process(doc, &self.translator, &self.known_tests, writer)?;

        writer.section("Tests")?;
        probes::process(doc, &mut self.known_tests, writer)?;

        writer.section("Features")?;
        self.features
            .process(doc, &self.translator, &self.known_tests, writer)?;

        if doc.is_root() {
            writer.raw("\nconfig_extra_definition(\"VERSION_STR\" \"\\\"${PROJECT_VERSION}\\\"\" PUBLIC)\n")?;
            writer.raw("config_extra_definition(\"VERSION_MAJOR\" ${PROJECT_VERSION_MAJOR} PUBLIC)\n")?;
            writer.raw("config_extra_definition(\"VERSION_MINOR\" ${PROJECT_VERSION_MINOR} PUBLIC)\n")?;
            writer.raw("config_extra_definition(\"VERSION_PATCH\" ${PROJECT_VERSION_PATCH} PUBLIC)\n")?;
        }
        Ok(())
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn process(doc: serde_json::Value) -> String {
        let doc = ConfigDocument::from_value("test", doc);
        let mut orchestrator = Orchestrator::new();
        let mut writer = ScriptWriter::new(Vec::new());
        orchestrator.process_document(&doc, &mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let out = process(json!({ "module": "network" }));
        let inputs = out.find("#### Inputs").unwrap();
        let libraries = out.find("#### Libraries").unwrap();
        let tests = out.find("#### Tests").unwrap();
        let features = out.find("#### Features").unwrap();
        assert!(inputs < libraries && libraries < tests && tests < features);
    }

    #[test]
    fn root_document_gets_version_trailer() {
        let out = process(json!({}));
        assert!(out.contains(
            "config_extra_definition(\"VERSION_STR\" \"\\\"${PROJECT_VERSION}\\\"\" PUBLIC)"
        ));
        assert_eq!(out.matches("config_extra_definition").count(), 4);
    }

    #[test]
    fn non_root_document_has_no_version_trailer() {
        let out = process(json!({ "module": "network" }));
        assert!(!out.contains("config_extra_definition"));
    }

    #[test]
    fn known_tests_survive_across_documents() {
        let mut orchestrator = Orchestrator::new();

        let first = ConfigDocument::from_value(
            "first",
            json!({
                "module": "core",
                "tests": {
                    "cxx11_future": { "label": "C++11 <future>", "type": "compile",
                                      "test": { "include": "future", "main": "" } }
                }
            }),
        );
        let mut writer = ScriptWriter::new(Vec::new());
        orchestrator.process_document(&first, &mut writer).unwrap();

        // A later document's feature can reference the earlier test.
        let second = ConfigDocument::from_value(
            "second",
            json!({
                "module": "network",
                "features": {
                    "future": { "label": "std::future",
                                "condition": "tests.cxx11_future",
                                "output": ["publicFeature"] }
                }
            }),
        );
        let mut writer = ScriptWriter::new(Vec::new());
        orchestrator.process_document(&second, &mut writer).unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert!(out.contains("    CONDITION TEST_cxx11_future\n"));
        assert!(!out.contains("FIXME"));
    }
}
