use crate::{RecorderError, recorder::RecordTarget};

use std::path::PathBuf;

/// WHAT: Empty pid sets are rejected before anything is spawned
/// WHY: Attaching perf to nothing would record the whole system by accident
#[test]
fn given_empty_pid_set_when_resolving_then_no_target_processes_error() {
    // Given: An attach target with no process ids
    let target = RecordTarget::Attach { pids: vec![] };

    // When: Resolving the target
    let result = target.resolve();

    // Then: Returns NoTargetProcesses
    assert!(matches!(
        result,
        Err(RecorderError::NoTargetProcesses { .. })
    ));
}

/// WHAT: Attach targets render as a single comma-joined --pid option
/// WHY: perf record expects one comma separated pid list
#[test]
#[allow(clippy::unwrap_used)]
fn given_pid_set_when_resolving_then_comma_joined_pid_option() {
    // Given: An attach target with two pids
    let target = RecordTarget::Attach {
        pids: vec![12, 3456],
    };

    // When: Resolving the target
    let args = target.resolve().unwrap();

    // Then: Renders as --pid 12,3456
    assert_eq!(args, vec!["--pid".to_string(), "12,3456".to_string()]);
}

/// WHAT: Unresolvable executables are rejected
/// WHY: Spawning perf against a missing binary wastes a recording session
#[test]
fn given_missing_executable_when_resolving_then_executable_not_found_error() {
    // Given: A launch target that exists neither literally nor on PATH
    let target = RecordTarget::Launch {
        exe: PathBuf::from("/definitely/not/here/frobnicate"),
        args: vec![],
    };

    // When: Resolving the target
    let result = target.resolve();

    // Then: Returns ExecutableNotFound
    assert!(matches!(
        result,
        Err(RecorderError::ExecutableNotFound { .. })
    ));
}

/// WHAT: Directories are rejected as launch targets
/// WHY: A directory path passes the existence check but cannot be executed
#[test]
#[allow(clippy::unwrap_used)]
fn given_directory_as_executable_when_resolving_then_not_a_file_error() {
    // Given: A launch target pointing at an existing directory
    let dir = tempfile::tempdir().unwrap();
    let target = RecordTarget::Launch {
        exe: dir.path().to_path_buf(),
        args: vec![],
    };

    // When: Resolving the target
    let result = target.resolve();

    // Then: Returns NotAFile
    assert!(matches!(result, Err(RecorderError::NotAFile { .. })));
}

/// WHAT: Regular but non-executable files are rejected
/// WHY: exec would fail with a less helpful OS error after the spawn
#[test]
#[allow(clippy::unwrap_used)]
fn given_non_executable_file_when_resolving_then_not_executable_error() {
    use std::os::unix::fs::PermissionsExt;

    // Root bypasses permission checks, making the file "executable".
    if nix::unistd::Uid::effective().is_root() {
        return;
    }

    // Given: An existing regular file without execute permission
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-program");
    std::fs::write(&file, b"data").unwrap();
    std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

    let target = RecordTarget::Launch {
        exe: file,
        args: vec![],
    };

    // When: Resolving the target
    let result = target.resolve();

    // Then: Returns NotExecutable
    assert!(matches!(result, Err(RecorderError::NotExecutable { .. })));
}

/// WHAT: Bare names fall back to the process search path
/// WHY: Users type `sleep`, not `/usr/bin/sleep`
#[test]
#[allow(clippy::unwrap_used)]
fn given_bare_name_when_resolving_then_search_path_lookup_succeeds() {
    // Given: A launch target named after a binary every unix system has
    let target = RecordTarget::Launch {
        exe: PathBuf::from("sh"),
        args: vec!["-c".to_string(), "true".to_string()],
    };

    // When: Resolving the target
    let args = target.resolve().unwrap();

    // Then: First argument is the absolute resolved path, rest preserved
    assert!(args[0].starts_with('/'), "expected absolute path: {args:?}");
    assert!(args[0].ends_with("sh"));
    assert_eq!(&args[1..], &["-c".to_string(), "true".to_string()]);
}
