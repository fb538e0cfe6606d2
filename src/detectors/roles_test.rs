use super::*;
use crate::parse::parse_source;
use crate::registry::Registries;
use std::path::PathBuf;

fn source(path: &str, content: &str) -> SourceFile {
    let path = PathBuf::from(path);
    let tree = parse_source(&path, content).ok();
    SourceFile {
        hash: crate::util::fnv1a(content.as_bytes()),
        size: content.len(),
        content: content.to_string(),
        path,
        tree,
    }
}

const FRAMEWORK_ENGINE: &str = "\
class FooFrameworkDetectionEngine:
    def detect_frameworks(self, source):
        return []

    def calculate_confidence(self, hits):
        return 0.5
";

#[test]
fn declared_types_with_methods() {
    let file = source("widget.py", "class Widget:\n    def render(self):\n        pass\n    def hide(self):\n        pass\n");
    let types = declared_types(&file);
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].name, "Widget");
    assert_eq!(types[0].methods, vec!["render", "hide"]);
}

#[test]
fn rust_struct_and_impl_are_merged() {
    let src = "\
struct Cache {
    entries: usize,
}

impl Cache {
    fn get(&self) -> usize {
        self.entries
    }

    fn put(&mut self) {
        self.entries += 1;
    }
}
";
    let file = source("cache.rs", src);
    let types = declared_types(&file);
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].name, "Cache");
    assert_eq!(types[0].methods.len(), 2);
}

#[test]
fn unparsed_file_declares_nothing() {
    let mut file = source("a.py", "class A:\n    pass\n");
    file.tree = None;
    assert!(declared_types(&file).is_empty());
}

#[test]
fn new_framework_engine_is_critical_reimplementation() {
    // scenario: a type matching the framework-detection role indicators in a
    // file that is not on the role's known-implementer list
    let registries = Registries::builtin();
    let file = source("features/foo_engine.py", FRAMEWORK_ENGINE);

    let findings = detect_role_reimplementations(&[file], &registries.roles);
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.kind, ViolationKind::ArchitecturalReimplementation);
    assert_eq!(finding.severity, Severity::Critical);
    assert!(finding.description.contains("FooFrameworkDetectionEngine"));
    assert!(finding.description.contains("framework detection and analysis"));
    assert!(
        finding
            .existing_implementations
            .iter()
            .any(|e| e.contains("FrameworkDetector"))
    );
}

#[test]
fn known_implementer_is_not_flagged() {
    let registries = Registries::builtin();
    let file = source(
        "/proj/analysis/framework_detector.py",
        "class FrameworkDetector:\n    def detect_frameworks(self):\n        pass\n",
    );

    let findings = detect_role_reimplementations(&[file], &registries.roles);
    assert!(findings.is_empty());
}

#[test]
fn method_indicators_alone_can_match() {
    let registries = Registries::builtin();
    // type name carries no indicator, but two role methods do
    let file = source(
        "features/scanner.py",
        "class SourceScanner:\n    def detect_frameworks(self):\n        pass\n    def calculate_confidence(self):\n        pass\n",
    );

    let findings = detect_role_reimplementations(&[file], &registries.roles);
    assert_eq!(findings.len(), 1);
}

#[test]
fn one_method_indicator_is_not_enough() {
    let registries = Registries::builtin();
    let file = source(
        "features/scanner.py",
        "class SourceScanner:\n    def calculate_confidence(self):\n        pass\n",
    );

    let findings = detect_role_reimplementations(&[file], &registries.roles);
    assert!(findings.is_empty());
}

#[test]
fn unrelated_type_is_not_flagged() {
    let registries = Registries::builtin();
    let file = source(
        "features/cart.py",
        "class ShoppingCart:\n    def add_item(self):\n        pass\n",
    );

    let findings = detect_role_reimplementations(&[file], &registries.roles);
    assert!(findings.is_empty());
}

#[test]
fn idiom_outside_implementers_is_flagged() {
    let registries = Registries::builtin();
    let file = source(
        "features/exporter.py",
        "import json\n\ndef export(data, fh):\n    json.dump(data, fh)\n",
    );

    let findings = detect_idioms(&[file], &registries.idioms);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, ViolationKind::FunctionalDuplication);
    assert_eq!(findings[0].severity, Severity::High);
    assert!(
        findings[0]
            .existing_implementations
            .iter()
            .any(|p| p.contains("json_store"))
    );
}

#[test]
fn idiom_in_known_implementer_is_allowed() {
    let registries = Registries::builtin();
    let file = source(
        "/proj/storage/json_store.py",
        "import json\n\ndef save(data, fh):\n    json.dump(data, fh)\n",
    );

    let findings = detect_idioms(&[file], &registries.idioms);
    assert!(findings.is_empty());
}
