use crate::recorder::RecordCommand;

use std::path::Path;

/// WHAT: Direct assembly is `record -o <output> <perfOptions> <targetArgs>`
/// WHY: perf is strict about option ordering relative to the target
#[test]
fn given_direct_recording_when_assembling_then_perf_argument_order_preserved() {
    // Given: perf options and a resolved launch target
    let perf_options = vec!["--call-graph".to_string(), "dwarf".to_string()];
    let target_args = vec!["/usr/bin/sleep".to_string(), "5".to_string()];

    // When: Assembling the direct command
    let command = RecordCommand::direct(
        Path::new("perf"),
        &perf_options,
        Path::new("/tmp/perf.data"),
        &target_args,
    );

    // Then: perf runs record with the output first, then options, then target
    assert_eq!(command.program, Path::new("perf"));
    assert_eq!(
        command.args,
        vec![
            "record",
            "-o",
            "/tmp/perf.data",
            "--call-graph",
            "dwarf",
            "/usr/bin/sleep",
            "5",
        ]
    );
}

/// WHAT: Elevated assembly keeps helper flags ahead of the first `--`
/// WHY: Options after the separator belong to perf, not the helper
#[test]
#[allow(clippy::unwrap_used)]
fn given_elevated_recording_when_assembling_then_helper_flags_precede_separator() {
    // Given: The interactive helper and a launch target
    let command = RecordCommand::elevated(
        Path::new("/usr/bin/kdesu"),
        None,
        Path::new("perf"),
        &[],
        Path::new("/tmp/perf.data"),
        "alice",
        &["/usr/bin/sleep".to_string(), "5".to_string()],
    );

    // Then: The helper is the program and owns everything before `--`
    assert_eq!(command.program, Path::new("/usr/bin/kdesu"));
    let separator = command.args.iter().position(|a| a == "--").unwrap();
    assert_eq!(&command.args[..separator], &["-u", "root", "-t"]);

    // And: perf record follows the separator with the output path
    assert_eq!(
        &command.args[separator + 1..separator + 5],
        &["perf", "record", "-o", "/tmp/perf.data"]
    );
}

/// WHAT: The profiled target is re-wrapped with runuser as the invoking user
/// WHY: perf runs as root under the helper; the workload must not
#[test]
#[allow(clippy::unwrap_used)]
fn given_elevated_recording_when_assembling_then_target_rewrapped_with_runuser() {
    // Given: An elevated command for user alice
    let command = RecordCommand::elevated(
        Path::new("/usr/bin/kdesu"),
        None,
        Path::new("perf"),
        &["-z".to_string()],
        Path::new("/tmp/perf.data"),
        "alice",
        &["/usr/bin/sleep".to_string(), "5".to_string()],
    );

    // Then: runuser -u alice -- immediately precedes the target command
    let args = &command.args;
    let runuser = args.iter().position(|a| a == "runuser").unwrap();
    assert_eq!(
        &args[runuser..],
        &["runuser", "-u", "alice", "--", "/usr/bin/sleep", "5"]
    );
    // And: The perf options sit between the output path and the runuser block
    assert_eq!(&args[runuser - 2..runuser], &["-z", "--"]);
}

/// WHAT: The window id is attached only for the interactive helper
/// WHY: gksu does not understand kdesu's dialog-transiency flags
#[test]
fn given_helper_variants_when_assembling_then_attach_flags_only_for_kdesu() {
    // Given/When: kdesu with a window id
    let kdesu = RecordCommand::elevated(
        Path::new("/usr/bin/kdesu"),
        Some(0x1c0_0007),
        Path::new("perf"),
        &[],
        Path::new("/tmp/perf.data"),
        "alice",
        &[],
    );
    // Then: -t and --attach <id> are present
    assert!(kdesu.args.starts_with(&[
        "-u".to_string(),
        "root".to_string(),
        "-t".to_string(),
        "--attach".to_string(),
        29360135.to_string(),
    ]));

    // Given/When: gksu, which has no transiency support
    let gksu = RecordCommand::elevated(
        Path::new("/usr/bin/gksu"),
        Some(0x1c0_0007),
        Path::new("perf"),
        &[],
        Path::new("/tmp/perf.data"),
        "alice",
        &[],
    );
    // Then: Only the user switch remains
    assert!(gksu.args.starts_with(&["-u".to_string(), "root".to_string()]));
    assert!(!gksu.args.contains(&"-t".to_string()));
    assert!(!gksu.args.contains(&"--attach".to_string()));
}

/// WHAT: Display rendering shell-quotes arguments
/// WHY: The audit line must be copy-pasteable into a shell
#[test]
fn given_argument_with_spaces_when_rendering_then_quoted() {
    // Given: A target argument containing whitespace
    let command = RecordCommand::direct(
        Path::new("perf"),
        &[],
        Path::new("/tmp/perf.data"),
        &["/usr/bin/echo".to_string(), "hello world".to_string()],
    );

    // When: Rendering for display
    let rendered = command.display_string();

    // Then: The whitespace argument is quoted, the rest left bare
    assert!(rendered.starts_with("perf record -o /tmp/perf.data"));
    assert!(rendered.contains("'hello world'") || rendered.contains("\"hello world\""));
}
