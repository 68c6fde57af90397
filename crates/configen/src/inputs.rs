//! Input Declaration Emitter: `commandline.options` → cache variables.

use crate::document::ConfigDocument;
use crate::script::ScriptWriter;
use configen_mappings::symbol_name;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Inputs the build-system generator manages itself: install layout,
/// toolchain and build-variant selection, per-instruction-set switches, and
/// libraries that became features. Declaring cache variables for these would
/// fight the generator, so they are skipped up front.
const SKIP_INPUTS: &[&str] = &[
    // Install layout
    "prefix", "hostprefix", "extprefix",
    "archdatadir", "bindir", "datadir", "docdir", "examplesdir",
    "external-hostbindir", "headerdir", "hostbindir", "hostdatadir",
    "hostlibdir", "importdir", "libdir", "libexecdir", "plugindir",
    "settingsdir", "sysconfdir", "testsdir", "translationdir",
    // Cross-compilation toolchains
    "android-arch", "android-ndk", "android-ndk-host", "android-ndk-platform",
    "android-sdk", "android-toolchain-version", "android-style-assets",
    "device", "device-option", "gcc-sysroot", "sdk", "sysroot", "platform",
    // Build variants and compiler behavior
    "appstore-compliant", "ccache", "commercial", "compile-examples",
    "confirm-license", "debug", "debug-and-release", "developer-build",
    "force-asserts", "force-debug-info", "force-pkg-config", "framework",
    "gc-binaries", "gdb-index", "gcov", "gnumake", "headersclean",
    "incredibuild-xge", "ltcg", "make", "make-tool", "mp", "nomake",
    "opensource", "optimize-debug", "optimize-size", "optimized-tools",
    "pch", "pkg-config", "plugin-manifests", "profile", "reduce-exports",
    "reduce-relocations", "release", "rpath", "sanitize",
    "separate-debug-info", "shared", "silent", "static", "static-runtime",
    "strip", "use-gold-linker", "warnings-are-errors", "Werror",
    // Instruction-set switches (covered by architecture tests)
    "avx", "avx2", "avx512", "c++std", "f16c", "mips_dsp", "mips_dspr2",
    "sse2", "sse3", "sse4.1", "sse4.2", "ssse3",
    // Libraries that are features now
    "dbus", "dbus-runtime", "doubleconversion", "eventfd", "glib", "icu",
    "inotify", "journald", "libudev", "pcre", "posix-ipc", "pps", "slog2",
    "sqlite", "syslog", "zlib",
];

/// Emit the Inputs section for one document.
pub fn process<W: Write>(doc: &ConfigDocument, writer: &mut ScriptWriter<W>) -> io::Result<()> {
    for (name, data) in doc.inputs() {
        emit_input(name, data, writer)?;
    }
    Ok(())
}

fn emit_input<W: Write>(
    name: &str,
    data: &Value,
    writer: &mut ScriptWriter<W>,
) -> io::Result<()> {
    if SKIP_INPUTS.contains(&name) {
        debug!("skipping input {name}: masked");
        return Ok(());
    }

    // A descriptor is either a bare type tag or a record with a type key.
    let input_type = match data {
        Value::String(tag) => Some(tag.as_str()),
        Value::Object(record) => record.get("type").and_then(Value::as_str),
        _ => None,
    };

    match input_type {
        // Boolean inputs are expressed through features downstream.
        Some("boolean") => debug!("skipping boolean input {name}: masked"),
        Some("enum") => {
            let symbol = symbol_name(name);
            let values: Vec<&str> = data
                .get("values")
                .and_then(Value::as_array)
                .map(|v| v.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            writer.raw(&format!("# input {name}\n"))?;
            writer.raw(&format!(
                "set(INPUT_{symbol} \"undefined\" CACHE STRING \"\")\n"
            ))?;
            writer.raw(&format!(
                "set_property(CACHE INPUT_{symbol} PROPERTY STRINGS undefined {})\n\n",
                values.join(" ")
            ))?;
        }
        Some(other) => warn!("unhandled input type {other} in input {name}"),
        None => warn!("unhandled input descriptor shape in input {name}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(doc: serde_json::Value) -> String {
        let doc = ConfigDocument::from_value("test", doc);
        let mut writer = ScriptWriter::new(Vec::new());
        process(&doc, &mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn enum_input_declares_cache_variable_and_values() {
        let out = run(json!({
            "commandline": { "options": {
                "opengl": { "type": "enum", "values": ["no", "yes", "desktop", "es2"] }
            } }
        }));
        assert!(out.contains("set(INPUT_opengl \"undefined\" CACHE STRING \"\")"));
        assert!(out.contains(
            "set_property(CACHE INPUT_opengl PROPERTY STRINGS undefined no yes desktop es2)"
        ));
    }

    #[test]
    fn boolean_inputs_are_skipped() {
        let out = run(json!({
            "commandline": { "options": { "accessibility": "boolean" } }
        }));
        assert_eq!(out, "");
    }

    #[test]
    fn masked_inputs_are_skipped() {
        let out = run(json!({
            "commandline": { "options": {
                "prefix": { "type": "enum", "values": ["a"] },
                "sse4.1": "boolean"
            } }
        }));
        assert_eq!(out, "");
    }

    #[test]
    fn enum_symbol_is_normalized() {
        let out = run(json!({
            "commandline": { "options": {
                "xcb-native-painting": { "type": "enum", "values": ["yes", "no"] }
            } }
        }));
        assert!(out.contains("INPUT_xcb_native_painting"));
    }
}
