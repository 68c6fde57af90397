//! Test Descriptor Compiler: compile/SIMD probes → test declarations.

use crate::document::ConfigDocument;
use crate::script::{ScriptWriter, lineify};
use configen_mappings::symbol_name;
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Probes the generated build handles through other means (language
/// standards, linker behavior, iconv flavors). Masked up front.
const SKIP_TESTS: &[&str] = &[
    "c++11", "c++14", "c++1y", "c++1z", "c11", "c99",
    "gc_binaries",
    "posix-iconv", "sun-iconv",
    "precompile_header",
    "reduce_exports",
    "separate_debug_info",
    "libinput_axis_api",
    "xlib",
];

/// Emit the Tests section for one document, registering every compiled test
/// in `known_tests` so later condition translation can resolve it.
pub fn process<W: Write>(
    doc: &ConfigDocument,
    known_tests: &mut BTreeSet<String>,
    writer: &mut ScriptWriter<W>,
) -> io::Result<()> {
    for (name, data) in doc.tests() {
        emit_test(name, data, known_tests, writer)?;
    }
    Ok(())
}

fn emit_test<W: Write>(
    name: &str,
    data: &Value,
    known_tests: &mut BTreeSet<String>,
    writer: &mut ScriptWriter<W>,
) -> io::Result<()> {
    if SKIP_TESTS.contains(&name) {
        debug!("skipping test {name}: masked");
        return Ok(());
    }

    match data.get("type").and_then(Value::as_str) {
        Some("compile") => {
            known_tests.insert(name.to_string());
            emit_compile_test(name, data, writer)
        }
        Some("x86Simd") => {
            known_tests.insert(name.to_string());
            let label = data.get("label").and_then(Value::as_str).unwrap_or("");
            writer.raw(&format!("# {name}\n"))?;
            writer.raw(&format!(
                "config_compile_test_x86simd({name} \"{label}\")\n\n"
            ))
        }
        Some(other) => {
            warn!("unhandled test type {other} in test {name}");
            Ok(())
        }
        None => {
            warn!("test {name} has no type");
            Ok(())
        }
    }
}

fn emit_compile_test<W: Write>(
    name: &str,
    data: &Value,
    writer: &mut ScriptWriter<W>,
) -> io::Result<()> {
    let Some(details) = data.get("test") else {
        warn!("compile test {name} has no test snippet");
        return Ok(());
    };
    if details.is_string() {
        warn!("unhandled test sub-type {} in test {name}", details);
        return Ok(());
    }

    let source = assemble_probe_source(details);
    let symbol = symbol_name(name);

    writer.raw(&format!("# {name}\n"))?;

    let mut libraries_var = String::new();
    let mut fixme = String::new();

    // Legacy linkage hints. Only the handful of shapes the documents
    // actually use are recognized; anything else surfaces as a marker
    // instead of being dropped.
    if let Some(hint) = details.get("link").and_then(Value::as_str) {
        match hint {
            "unix:LIBS += -lpthread" => {
                libraries_var = format!("{symbol}_TEST_LIBRARIES");
                writer.raw(&format!(
                    "if (UNIX)\n    set({libraries_var} pthread)\nendif()\n"
                ))?;
            }
            "linux: LIBS += -lpthread -lrt" => {
                libraries_var = format!("{symbol}_TEST_LIBRARIES");
                writer.raw(&format!(
                    "if (LINUX)\n    set({libraries_var} pthread rt)\nendif()\n"
                ))?;
            }
            // Probes always build in C++11 mode.
            "CONFIG += c++11" => {}
            other => fixme.push_str(&format!("# FIXME: link: {other}\n")),
        }
    }

    if let Some(used) = data.get("use").and_then(Value::as_str) {
        match used {
            "egl xcb_xlib" => {
                libraries_var = format!("{symbol}_TEST_LIBRARIES");
                writer.raw(&format!(
                    "if (EGL_FOUND AND X11_XCB_FOUND AND X11_FOUND)\n    \
                     set({libraries_var} EGL::EGL X11::X11 X11::XCB)\nendif()\n"
                ))?;
            }
            other => fixme.push_str(&format!("# FIXME: use: {other}\n")),
        }
    }

    writer.raw(&format!("config_compile_test({symbol}\n"))?;
    writer.raw(&lineify(
        "LABEL",
        data.get("label").and_then(Value::as_str).unwrap_or(""),
        true,
    ))?;
    if !libraries_var.is_empty() {
        writer.raw(&lineify("LIBRARIES", &format!("${{{libraries_var}}}"), true))?;
        writer.raw("    CODE\n")?;
    }
    writer.raw(&format!("\"{source}\""))?;
    writer.raw(&fixme)?;
    writer.raw(")\n\n")
}

/// Build the minimal probe program from the snippet template.
///
/// Fragment order is head text, include directives, tail text, then the
/// fixed main skeleton carrying the body between its BEGIN/END markers.
/// Double quotes are escaped so the whole program embeds as one string
/// argument.
fn assemble_probe_source(details: &Value) -> String {
    let mut source = join_fragment(details.get("head"));
    source.push('\n');

    source.push_str(&render_includes(details.get("include")));
    source.push('\n');

    source.push_str(&join_fragment(details.get("tail")));
    source.push('\n');

    source.push_str("int main(int argc, char **argv)\n");
    source.push_str("{\n");
    source.push_str("    (void)argc; (void)argv;\n");
    source.push_str("    /* BEGIN TEST: */\n");
    source.push_str(&join_fragment(details.get("main")));
    source.push('\n');
    source.push_str("    /* END TEST: */\n");
    source.push_str("    return 0;\n");
    source.push_str("}\n");

    source.replace('"', "\\\"")
}

/// A snippet fragment is a string or a list of lines.
fn join_fragment(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(lines)) => lines
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

/// One system-include directive per listed header.
fn render_includes(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(header)) if !header.is_empty() => format!("#include <{header}>"),
        Some(Value::Array(headers)) => headers
            .iter()
            .filter_map(Value::as_str)
            .map(|header| format!("#include <{header}>"))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(doc: serde_json::Value) -> (String, BTreeSet<String>) {
        let doc = ConfigDocument::from_value("test", doc);
        let mut known = BTreeSet::new();
        let mut writer = ScriptWriter::new(Vec::new());
        process(&doc, &mut known, &mut writer).unwrap();
        (String::from_utf8(writer.into_inner()).unwrap(), known)
    }

    #[test]
    fn includes_render_in_order_inside_the_skeleton() {
        let (out, _) = run(json!({
            "tests": {
                "getifaddrs": {
                    "label": "getifaddrs()",
                    "type": "compile",
                    "test": {
                        "include": ["sys/types.h", "ifaddrs.h"],
                        "main": ["ifaddrs *list;", "getifaddrs(&list);", "freeifaddrs(list);"]
                    }
                }
            }
        }));
        let types = out.find("#include <sys/types.h>").unwrap();
        let ifaddrs = out.find("#include <ifaddrs.h>").unwrap();
        assert!(types < ifaddrs);
        assert!(out.contains("/* BEGIN TEST: */"));
        assert!(out.contains("/* END TEST: */"));
        assert!(out.contains("    return 0;\n}"));
        assert!(out.contains("config_compile_test(getifaddrs\n"));
    }

    #[test]
    fn compile_tests_are_registered_as_known() {
        let (_, known) = run(json!({
            "tests": {
                "cxx11_future": { "label": "C++11 <future>", "type": "compile",
                                  "test": { "include": "future", "main": "" } }
            }
        }));
        assert!(known.contains("cxx11_future"));
    }

    #[test]
    fn quotes_in_snippets_are_escaped() {
        let (out, _) = run(json!({
            "tests": {
                "printf": { "label": "printf", "type": "compile",
                            "test": { "main": "printf(\"hello\");" } }
            }
        }));
        assert!(out.contains("printf(\\\"hello\\\");"));
    }

    #[test]
    fn pthread_hint_becomes_guarded_library_list() {
        let (out, _) = run(json!({
            "tests": {
                "cxx11_future": {
                    "label": "C++11 <future>",
                    "type": "compile",
                    "test": {
                        "include": "future",
                        "main": ["std::future<int> f = std::async([]() { return 42; });"],
                        "link": "unix:LIBS += -lpthread"
                    }
                }
            }
        }));
        assert!(out.contains("if (UNIX)\n    set(cxx11_future_TEST_LIBRARIES pthread)\nendif()"));
        assert!(out.contains("    LIBRARIES \"${cxx11_future_TEST_LIBRARIES}\"\n    CODE\n"));
    }

    #[test]
    fn unknown_hint_becomes_inline_marker() {
        let (out, _) = run(json!({
            "tests": {
                "weird": { "label": "weird", "type": "compile",
                           "test": { "main": "", "link": "win32:LIBS += -lws2_32" } }
            }
        }));
        assert!(out.contains("# FIXME: link: win32:LIBS += -lws2_32"));
    }

    #[test]
    fn x86simd_tests_use_the_raw_name() {
        let (out, known) = run(json!({
            "tests": {
                "avx512vbmi2": { "label": "AVX512 VBMI2", "type": "x86Simd" }
            }
        }));
        assert!(out.contains("config_compile_test_x86simd(avx512vbmi2 \"AVX512 VBMI2\")"));
        assert!(known.contains("avx512vbmi2"));
    }

    #[test]
    fn masked_and_unknown_types_emit_nothing() {
        let (out, known) = run(json!({
            "tests": {
                "c++11": { "label": "C++11", "type": "compile", "test": { "main": "" } },
                "detect": { "label": "detect", "type": "linkerSupportsFlag" }
            }
        }));
        assert_eq!(out, "");
        assert!(known.is_empty());
    }
}
