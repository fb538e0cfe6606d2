use super::*;
use std::fs;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "x = 1\n").unwrap();
}

#[test]
fn scans_whole_root_without_targets() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a.py"));
    touch(&dir.path().join("sub/b.py"));

    let found = discover(dir.path(), &[], &[]).unwrap();
    assert_eq!(found.files.len(), 2);
}

#[test]
fn missing_root_is_fatal() {
    let err = discover(Path::new("/no/such/root"), &[], &[]).unwrap_err();
    assert!(matches!(err, AnalyzerError::FatalConfig { .. }));
}

#[test]
fn excludes_baseline_directories() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("keep.py"));
    touch(&dir.path().join("tests/skipped.py"));
    touch(&dir.path().join("node_modules/dep.js"));
    touch(&dir.path().join("__pycache__/cached.py"));

    let found = discover(dir.path(), &[], &[]).unwrap();
    assert_eq!(found.files.len(), 1);
    assert!(found.files[0].ends_with("keep.py"));
}

#[test]
fn excludes_test_named_files() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("module.py"));
    touch(&dir.path().join("test_module.py"));
    touch(&dir.path().join("module_test.go"));

    let found = discover(dir.path(), &[], &[]).unwrap();
    assert_eq!(found.files.len(), 1);
}

#[test]
fn user_exclusions_are_merged() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("keep.py"));
    touch(&dir.path().join("generated.py"));

    let found = discover(dir.path(), &[], &["**/generated.py".to_string()]).unwrap();
    assert_eq!(found.files.len(), 1);
    assert!(found.files[0].ends_with("keep.py"));
}

#[test]
fn invalid_user_pattern_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("keep.py"));

    let found = discover(dir.path(), &[], &["a{".to_string()]).unwrap();
    assert_eq!(found.files.len(), 1);
    assert!(found.skipped.iter().any(|s| s.kind == "exclusion_pattern"));
}

#[test]
fn explicit_file_targets_resolve_directly() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a.py"));
    touch(&dir.path().join("b.py"));

    let found = discover(dir.path(), &[PathBuf::from("a.py")], &[]).unwrap();
    assert_eq!(found.files.len(), 1);
    assert!(found.files[0].ends_with("a.py"));
}

#[test]
fn explicit_directory_targets_expand_recursively() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("pkg/a.py"));
    touch(&dir.path().join("pkg/inner/b.py"));
    touch(&dir.path().join("other/c.py"));

    let found = discover(dir.path(), &[PathBuf::from("pkg")], &[]).unwrap();
    assert_eq!(found.files.len(), 2);
}

#[test]
fn missing_target_is_warned_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a.py"));

    let found = discover(dir.path(), &[PathBuf::from("nope.py")], &[]).unwrap();
    assert!(found.files.is_empty());
    assert!(found.skipped.iter().any(|s| s.kind == "file_access"));
}

#[test]
fn overlapping_targets_are_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("pkg/a.py"));

    let targets = vec![PathBuf::from("pkg"), PathBuf::from("pkg/a.py")];
    let found = discover(dir.path(), &targets, &[]).unwrap();
    assert_eq!(found.files.len(), 1);
}

#[test]
fn non_source_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a.py"));
    fs::write(dir.path().join("README.md"), "# readme\n").unwrap();
    fs::write(dir.path().join("data.json"), "{}\n").unwrap();

    let found = discover(dir.path(), &[], &[]).unwrap();
    assert_eq!(found.files.len(), 1);
}

#[test]
fn output_is_lexically_ordered() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("z.py"));
    touch(&dir.path().join("a.py"));
    touch(&dir.path().join("m.py"));

    let found = discover(dir.path(), &[], &[]).unwrap();
    let names: Vec<_> = found
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.py", "m.py", "z.py"]);
}

#[cfg(unix)]
#[test]
fn cyclic_symlinks_do_not_loop() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("pkg/a.py"));
    std::os::unix::fs::symlink(dir.path(), dir.path().join("pkg/loop")).unwrap();

    let found = discover(dir.path(), &[], &[]).unwrap();
    assert_eq!(found.files.len(), 1);
}
