//! Feature Resolver: feature descriptors → declarations and definitions.

use crate::document::ConfigDocument;
use crate::script::{ScriptWriter, lineify};
use configen_condition::{Condition, ConditionTranslator};
use configen_mappings::symbol_name;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use tracing::{debug, info, warn};

/// Descriptor keys the resolver understands; anything else is reported.
const HANDLED_KEYS: &[&str] = &[
    "autoDetect", "comment", "condition", "description", "disable", "emitIf",
    "enable", "label", "output", "purpose", "section",
];

/// Output tags that feed other parts of the legacy build and produce no
/// generated code here.
const PASSTHROUGH_OUTPUTS: &[&str] = &[
    "varAssign", "varAppend", "varRemove", "publicConfig", "privateConfig",
];

/// Per-feature override. Any key that is `Some` takes precedence over the
/// corresponding descriptor value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureOverride {
    pub label: Option<&'static str>,
    pub purpose: Option<&'static str>,
    pub auto_detect: Option<&'static str>,
    pub condition: Option<&'static str>,
    pub enable: Option<&'static str>,
    pub disable: Option<&'static str>,
    pub emit_if: Option<&'static str>,
    pub section: Option<&'static str>,
    pub comment: Option<&'static str>,
    /// Replacement output list (bare tags only).
    pub outputs: Option<&'static [&'static str]>,
}

/// Interprets feature descriptors and emits `config_feature()` /
/// `config_feature_definition()` calls.
///
/// The override table is installed at construction so tests can substitute
/// fixtures; a `None` entry masks the feature entirely.
pub struct FeatureResolver {
    overrides: BTreeMap<&'static str, Option<FeatureOverride>>,
}

impl FeatureResolver {
    pub fn new() -> Self {
        Self::with_overrides(builtin_feature_overrides())
    }

    pub fn with_overrides(overrides: BTreeMap<&'static str, Option<FeatureOverride>>) -> Self {
        Self { overrides }
    }

    /// Emit the Features section for one document.
    pub fn process<W: Write>(
        &self,
        doc: &ConfigDocument,
        translator: &ConditionTranslator,
        known_tests: &BTreeSet<String>,
        writer: &mut ScriptWriter<W>,
    ) -> io::Result<()> {
        for (name, data) in doc.features() {
            self.emit_feature(name, data, translator, known_tests, writer)?;
        }
        Ok(())
    }

    fn emit_feature<W: Write>(
        &self,
        name: &str,
        data: &Value,
        translator: &ConditionTranslator,
        known_tests: &BTreeSet<String>,
        writer: &mut ScriptWriter<W>,
    ) -> io::Result<()> {
        let overrides = match self.overrides.get(name) {
            Some(None) => {
                debug!("skipping feature {name}: masked");
                return Ok(());
            }
            Some(Some(entry)) => *entry,
            None => FeatureOverride::default(),
        };

        if let Some(record) = data.as_object() {
            for key in record.keys() {
                if !HANDLED_KEYS.contains(&key.as_str()) {
                    warn!("unhandled key {key} in feature {name}");
                }
            }
        }

        let doc_str = |key: &str| -> Option<String> {
            data.get(key).and_then(Value::as_str).map(str::to_string)
        };
        let text_of = |field: Option<&'static str>, key: &str| -> String {
            field.map(str::to_string).or_else(|| doc_str(key)).unwrap_or_default()
        };
        let cond_of = |field: Option<&'static str>, key: &str| -> Condition {
            match field {
                Some(expr) => Condition::Expr(expr.to_string()),
                None => data
                    .get(key)
                    .map(Condition::from_value)
                    .unwrap_or_else(|| Condition::Expr(String::new())),
            }
        };
        let translate = |condition: Condition, what: &str| -> String {
            let translated = translator.translate(&condition, known_tests);
            for token in &translated.unresolved {
                warn!("unresolved reference `{token}` in {what} of feature {name}");
            }
            translated.text
        };

        let label = text_of(overrides.label, "label");
        let purpose = overrides
            .purpose
            .map(str::to_string)
            .or_else(|| doc_str("purpose"))
            .or_else(|| doc_str("description"))
            .unwrap_or_else(|| label.clone());
        let section = text_of(overrides.section, "section");
        let comment = text_of(overrides.comment, "comment");

        let auto_detect = translate(cond_of(overrides.auto_detect, "autoDetect"), "autoDetect");
        let condition = translate(cond_of(overrides.condition, "condition"), "condition");
        let enable = translate(cond_of(overrides.enable, "enable"), "enable");
        let disable = translate(cond_of(overrides.disable, "disable"), "disable");
        let emit_if = translate(cond_of(overrides.emit_if, "emitIf"), "emitIf");

        let outputs = self.effective_outputs(&overrides, data);

        // Classify the requested outputs.
        let mut has_define = false;
        let mut has_negative = false;
        let mut has_public = false;
        let mut has_private = false;
        let mut has_internal = false;
        for output in &outputs {
            match output_type(output) {
                Some(tag) if PASSTHROUGH_OUTPUTS.contains(&tag) => {}
                Some("define") => has_define = true,
                Some("feature") => has_negative = true,
                Some("publicFeature") => has_public = true,
                Some("privateFeature") => has_private = true,
                Some("internalFeature") => has_internal = true,
                Some(other) => warn!("unhandled output type {other} in feature {name}"),
                None => warn!("output entry without type in feature {name}"),
            }
        }
        if !(has_define || has_negative || has_public || has_private || has_internal) {
            info!("skipping feature {name}: not relevant for the generated build");
            return Ok(());
        }

        let symbol = symbol_name(name);

        // One declaration per distinct emitted name, flags merged, in
        // first-seen order. The base name is always declared.
        struct Call {
            name: String,
            label_append: String,
            public: bool,
            private: bool,
        }
        let mut calls = vec![Call {
            name: symbol.clone(),
            label_append: String::new(),
            public: false,
            private: false,
        }];
        for output in &outputs {
            let Some(tag) = output_type(output) else { continue };
            if !matches!(tag, "feature" | "publicFeature" | "privateFeature") {
                continue;
            }
            let (call_name, label_append) = match output.get("name").and_then(Value::as_str) {
                Some(explicit) => (explicit.to_string(), format!(": {explicit}")),
                None => (symbol.clone(), String::new()),
            };
            let index = match calls.iter().position(|call| call.name == call_name) {
                Some(index) => index,
                None => {
                    calls.push(Call {
                        name: call_name,
                        label_append,
                        public: false,
                        private: false,
                    });
                    calls.len() - 1
                }
            };
            if matches!(tag, "feature" | "publicFeature") {
                calls[index].public = true;
            }
            if tag == "privateFeature" {
                calls[index].private = true;
            }
        }

        // Declarations come before any definition calls.
        for call in &calls {
            if !comment.is_empty() {
                writer.raw(&format!("# {comment}\n"))?;
            }
            writer.raw(&format!("config_feature(\"{}\"", call.name))?;
            if call.public {
                writer.raw(" PUBLIC")?;
            }
            if call.private {
                writer.raw(" PRIVATE")?;
            }
            writer.raw("\n")?;
            writer.raw(&lineify("SECTION", &section, true))?;
            writer.raw(&lineify(
                "LABEL",
                &format!("{label}{}", call.label_append),
                true,
            ))?;
            if purpose != label {
                writer.raw(&lineify("PURPOSE", &purpose, true))?;
            }
            writer.raw(&lineify("AUTODETECT", &auto_detect, false))?;
            writer.raw(&lineify("CONDITION", &condition, false))?;
            writer.raw(&lineify("ENABLE", &enable, false))?;
            writer.raw(&lineify("DISABLE", &disable, false))?;
            writer.raw(&lineify("EMIT_IF", &emit_if, false))?;
            writer.raw(")\n")?;
        }

        for output in &outputs {
            let (define_name, negative, value) = match output_type(output) {
                // The bare feature tag means the flag's absence is testable
                // downstream through a synthesized negative define.
                Some("feature") => (
                    Some(format!("NO_{}", symbol.to_uppercase())),
                    true,
                    Some("1".to_string()),
                ),
                Some("define") => (
                    output.get("name").and_then(Value::as_str).map(str::to_string),
                    output
                        .get("negative")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                    output.get("value").map(render_value),
                ),
                _ => continue,
            };
            let Some(define_name) = define_name else {
                warn!("define output without name in feature {name}");
                continue;
            };
            writer.raw(&format!(
                "config_feature_definition(\"{symbol}\" \"{define_name}\""
            ))?;
            if negative {
                writer.raw(" NEGATE")?;
            }
            if let Some(value) = value {
                writer.raw(&format!(" VALUE \"{value}\""))?;
            }
            writer.raw(")\n")?;
        }
        Ok(())
    }

    /// The override's output list, the descriptor's, or the synthesized
    /// internal flavor for features only referenced by other conditions.
    fn effective_outputs(&self, overrides: &FeatureOverride, data: &Value) -> Vec<Value> {
        let outputs: Vec<Value> = match overrides.outputs {
            Some(tags) => tags
                .iter()
                .map(|tag| Value::String((*tag).to_string()))
                .collect(),
            None => data
                .get("output")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        };
        if outputs.is_empty() {
            vec![Value::String("internalFeature".to_string())]
        } else {
            outputs
        }
    }
}

impl Default for FeatureResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// An output entry is a bare tag or a record with a `type` key.
fn output_type(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(tag) => Some(tag),
        Value::Object(record) => record.get("type").and_then(Value::as_str),
        _ => None,
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Built-in special cases, keyed by feature id before name normalization.
///
/// Masked entries (`None`) are build-machinery toggles the generated build
/// expresses natively; the remainder pin conditions the documents state in
/// legacy terms that no longer hold.
fn builtin_feature_overrides() -> BTreeMap<&'static str, Option<FeatureOverride>> {
    let masked: &[&'static str] = &[
        // Allocator and language-standard probes
        "alloc_h", "alloc_malloc_h", "alloc_stdlib_h",
        "c++11", "c++14", "c++1y", "c++1z", "c11", "c89", "c99", "stl",
        // Build-variant toggles
        "build_all", "debug", "debug_and_release", "release", "release_tools",
        "shared", "static", "static_runtime", "framework_build",
        // Compiler and linker machinery
        "ccache", "compiler-flags", "cross_compile", "enable_gdb_index",
        "enable_new_dtags", "force_debug_info", "gc_binaries", "gcc-sysroot",
        "gcov", "GNUmake", "incredibuild_xge", "ltcg", "msvc_mp",
        "optimize_debug", "optimize_size", "precompile_header", "profile",
        "reduce_relocations", "rpath", "rpath_dir", "separate_debug_info",
        "silent", "stack-protector-strong", "strip", "use_gold_linker",
        "warnings_are_errors",
        // Sanitizers
        "sanitize_address", "sanitize_memory", "sanitize_thread",
        "sanitize_undefined", "sanitizer",
        // Bundled copies that are always system copies now
        "doubleconversion", "system-doubleconversion", "system-freetype",
        "system-harfbuzz", "system-jpeg", "system-pcre2", "system-png",
        "system-sqlite", "system-xcb", "system-zlib", "xkbcommon-system",
        // Misc legacy machinery
        "host-dbus", "pkg-config", "posix_fallocate",
    ];

    let mut table: BTreeMap<&'static str, Option<FeatureOverride>> =
        masked.iter().map(|id| (*id, None)).collect();

    table.insert(
        "dlopen",
        Some(FeatureOverride {
            condition: Some("UNIX"),
            ..Default::default()
        }),
    );
    table.insert(
        "framework",
        Some(FeatureOverride {
            condition: Some("APPLE AND BUILD_SHARED_LIBS"),
            ..Default::default()
        }),
    );
    table.insert(
        "harfbuzz",
        Some(FeatureOverride {
            condition: Some("HARFBUZZ_FOUND"),
            ..Default::default()
        }),
    );
    table.insert(
        "jpeg",
        Some(FeatureOverride {
            condition: Some("FEATURE_imageformatplugin AND JPEG_FOUND"),
            ..Default::default()
        }),
    );
    table.insert(
        "iconv",
        Some(FeatureOverride {
            condition: Some(
                "NOT FEATURE_icu AND FEATURE_textcodec AND ( TEST_posix_iconv OR TEST_sun_iconv )",
            ),
            ..Default::default()
        }),
    );
    table.insert(
        "gnu-libiconv",
        Some(FeatureOverride {
            condition: Some(
                "NOT WIN32 AND NOT QNX AND NOT ANDROID AND NOT APPLE \
                 AND TEST_posix_iconv AND NOT TEST_iconv_needlib",
            ),
            enable: Some("TEST_posix_iconv AND NOT TEST_iconv_needlib"),
            disable: Some("NOT TEST_posix_iconv OR TEST_iconv_needlib"),
            ..Default::default()
        }),
    );
    table.insert(
        "posix-libiconv",
        Some(FeatureOverride {
            condition: Some(
                "NOT WIN32 AND NOT QNX AND NOT ANDROID AND NOT APPLE \
                 AND TEST_posix_iconv AND TEST_iconv_needlib",
            ),
            enable: Some("TEST_posix_iconv AND TEST_iconv_needlib"),
            disable: Some("NOT TEST_posix_iconv OR NOT TEST_iconv_needlib"),
            ..Default::default()
        }),
    );
    table.insert(
        "sun-libiconv",
        Some(FeatureOverride {
            condition: Some(
                "NOT WIN32 AND NOT QNX AND NOT ANDROID AND NOT APPLE AND TEST_sun_iconv",
            ),
            enable: Some("TEST_sun_iconv"),
            disable: Some("NOT TEST_sun_iconv"),
            ..Default::default()
        }),
    );
    // Desktop GL is an implicit feature on Windows until the dynamic-GL
    // backend is ported; its counterpart is force-disabled there.
    table.insert(
        "opengl-desktop",
        Some(FeatureOverride {
            auto_detect: Some(""),
            ..Default::default()
        }),
    );
    table.insert(
        "opengl-dynamic",
        Some(FeatureOverride {
            auto_detect: Some("OFF"),
            ..Default::default()
        }),
    );
    table.insert(
        "opengles2",
        Some(FeatureOverride {
            condition: Some(
                "NOT WIN32 AND NOT WATCHOS AND NOT FEATURE_opengl_desktop AND GLESv2_FOUND",
            ),
            ..Default::default()
        }),
    );
    table.insert(
        "sql-sqlite",
        Some(FeatureOverride {
            condition: Some("FEATURE_datestring AND SQLite3_FOUND"),
            ..Default::default()
        }),
    );
    table
}
