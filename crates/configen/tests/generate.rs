//! End-to-end runs over on-disk configuration trees.

use configen::{Error, Orchestrator};
use serde_json::json;
use std::fs;
use std::path::Path;

fn write_doc(dir: &Path, doc: &serde_json::Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("configure.json"), serde_json::to_string_pretty(doc).unwrap()).unwrap();
}

fn read_output(dir: &Path) -> String {
    fs::read_to_string(dir.join("configure.cmake")).unwrap()
}

#[test]
fn generates_one_script_per_directory() {
    let root = tempfile::tempdir().unwrap();
    write_doc(
        root.path(),
        &json!({
            "subconfigs": ["x", "y"]
        }),
    );
    write_doc(&root.path().join("x"), &json!({ "module": "x" }));
    write_doc(&root.path().join("y"), &json!({ "module": "y" }));

    Orchestrator::new().run(root.path()).unwrap();

    assert!(root.path().join("configure.cmake").is_file());
    assert!(root.path().join("x/configure.cmake").is_file());
    assert!(root.path().join("y/configure.cmake").is_file());
}

#[test]
fn parent_output_is_complete_before_recursion() {
    // The parent's own sections land in the parent's script even though a
    // subconfig follows; the subconfig's content lands in its own script.
    let root = tempfile::tempdir().unwrap();
    write_doc(
        root.path(),
        &json!({
            "commandline": { "options": {
                "opengl": { "type": "enum", "values": ["no", "desktop"] }
            } },
            "subconfigs": ["child"]
        }),
    );
    write_doc(
        &root.path().join("child"),
        &json!({
            "module": "child",
            "libraries": { "zlib": {} }
        }),
    );

    Orchestrator::new().run(root.path()).unwrap();

    let parent = read_output(root.path());
    assert!(parent.contains("set(INPUT_opengl \"undefined\" CACHE STRING \"\")"));
    assert!(!parent.contains("config_find_package"));

    let child = read_output(&root.path().join("child"));
    assert!(child.contains("config_find_package(ZLIB)"));
    assert!(!child.contains("INPUT_opengl"));
}

#[test]
fn root_trailer_only_at_the_root() {
    let root = tempfile::tempdir().unwrap();
    write_doc(root.path(), &json!({ "subconfigs": ["net"] }));
    write_doc(&root.path().join("net"), &json!({ "module": "network" }));

    Orchestrator::new().run(root.path()).unwrap();

    assert_eq!(read_output(root.path()).matches("config_extra_definition").count(), 4);
    assert_eq!(
        read_output(&root.path().join("net")).matches("config_extra_definition").count(),
        0
    );
}

#[test]
fn tests_registered_in_parent_resolve_in_subconfig() {
    let root = tempfile::tempdir().unwrap();
    write_doc(
        root.path(),
        &json!({
            "tests": {
                "getauxval": { "label": "getauxval()", "type": "compile",
                               "test": { "include": "sys/auxv.h",
                                         "main": "(void) getauxval(AT_HWCAP);" } }
            },
            "subconfigs": ["net"]
        }),
    );
    write_doc(
        &root.path().join("net"),
        &json!({
            "module": "network",
            "features": {
                "hwcap": { "label": "Hardware capabilities",
                           "condition": "tests.getauxval",
                           "output": ["privateFeature"] }
            }
        }),
    );

    Orchestrator::new().run(root.path()).unwrap();

    let net = read_output(&root.path().join("net"));
    assert!(net.contains("    CONDITION TEST_getauxval\n"));
    assert!(!net.contains("FIXME"));
}

#[test]
fn unresolved_references_degrade_but_do_not_abort() {
    let root = tempfile::tempdir().unwrap();
    write_doc(
        root.path(),
        &json!({
            "features": {
                "mystery": { "label": "Mystery",
                             "condition": "libs.unobtainium",
                             "output": ["publicFeature"] },
                "sane": { "label": "Sane", "output": ["privateFeature"] }
            }
        }),
    );

    Orchestrator::new().run(root.path()).unwrap();

    let out = read_output(root.path());
    assert!(out.contains("libs.unobtainium OR FIXME"));
    // Processing continued past the degraded feature.
    assert!(out.contains("config_feature(\"sane\" PRIVATE"));
}

#[test]
fn four_sections_in_order_with_all_processors_running() {
    let root = tempfile::tempdir().unwrap();
    write_doc(
        root.path(),
        &json!({
            "commandline": { "options": {
                "opengl": { "type": "enum", "values": ["no", "yes", "desktop", "es2"] }
            } },
            "libraries": { "libpng": {} },
            "tests": {
                "cxx11_future": { "label": "C++11 <future>", "type": "compile",
                                  "test": { "include": "future",
                                            "main": ["std::future<int> f = std::async([]() { return 42; });",
                                                     "(void)f.get();"],
                                            "link": "unix:LIBS += -lpthread" } }
            },
            "features": {
                "future": { "label": "std::future",
                            "condition": "tests.cxx11_future",
                            "output": ["publicFeature"] }
            }
        }),
    );

    Orchestrator::new().run(root.path()).unwrap();

    let out = read_output(root.path());
    let inputs = out.find("#### Inputs").unwrap();
    let libraries = out.find("#### Libraries").unwrap();
    let tests = out.find("#### Tests").unwrap();
    let features = out.find("#### Features").unwrap();
    assert!(inputs < libraries && libraries < tests && tests < features);

    let input_decl = out.find("set(INPUT_opengl").unwrap();
    let lib_decl = out.find("config_find_package(PNG)").unwrap();
    let test_decl = out.find("config_compile_test(cxx11_future").unwrap();
    let feature_decl = out.find("config_feature(\"future\"").unwrap();
    assert!(inputs < input_decl && input_decl < libraries);
    assert!(libraries < lib_decl && lib_decl < tests);
    assert!(tests < test_decl && test_decl < features);
    assert!(features < feature_decl);

    // The compile test registered itself before the feature translated.
    assert!(out.contains("    CONDITION TEST_cxx11_future\n"));
}

#[test]
fn missing_document_in_subconfig_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    write_doc(root.path(), &json!({ "subconfigs": ["absent"] }));

    let err = Orchestrator::new().run(root.path()).unwrap_err();
    match err {
        Error::MissingDocument(path) => {
            assert!(path.ends_with("absent/configure.json"));
        }
        other => panic!("expected MissingDocument, got {other:?}"),
    }

    // The parent's own script was still written before the failure.
    assert!(root.path().join("configure.cmake").is_file());
}

#[test]
fn missing_root_document_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let err = Orchestrator::new().run(root.path()).unwrap_err();
    assert!(matches!(err, Error::MissingDocument(_)));
}
