use crate::recorder::elevation;

use std::path::{Path, PathBuf};

/// A fully assembled recording command line: the program to execute and
/// its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordCommand {
    /// perf itself, or the escalation helper when recording elevated.
    pub(crate) program: PathBuf,
    pub(crate) args: Vec<String>,
}

impl RecordCommand {
    /// Assemble `perf record -o <output> <perfOptions> <targetArgs>`.
    pub(crate) fn direct(
        perf_binary: &Path,
        perf_options: &[String],
        output_path: &Path,
        target_args: &[String],
    ) -> Self {
        let mut args = vec![
            "record".to_string(),
            "-o".to_string(),
            output_path.display().to_string(),
        ];
        args.extend(perf_options.iter().cloned());
        args.extend(target_args.iter().cloned());

        Self {
            program: perf_binary.to_path_buf(),
            args,
        }
    }

    /// Assemble the escalated form: the helper runs perf as root, and the
    /// recorded target is re-wrapped with `runuser` so it executes as the
    /// invoking user rather than root.
    pub(crate) fn elevated(
        helper: &Path,
        attach_window: Option<u64>,
        perf_binary: &Path,
        perf_options: &[String],
        output_path: &Path,
        username: &str,
        target_args: &[String],
    ) -> Self {
        // Helper's own flags come first, then `--` hands off to perf.
        let mut args = elevation::helper_options(helper, attach_window);
        args.extend([
            "--".to_string(),
            perf_binary.display().to_string(),
            "record".to_string(),
            "-o".to_string(),
            output_path.display().to_string(),
        ]);
        args.extend(perf_options.iter().cloned());

        // Drop back to the invoking user for the profiled target.
        args.extend([
            "--".to_string(),
            "runuser".to_string(),
            "-u".to_string(),
            username.to_string(),
            "--".to_string(),
        ]);
        args.extend(target_args.iter().cloned());

        Self {
            program: helper.to_path_buf(),
            args,
        }
    }

    /// Shell-quoted rendering of the command, for display and audit.
    pub(crate) fn display_string(&self) -> String {
        let mut words = vec![self.program.display().to_string()];
        words.extend(self.args.iter().cloned());
        shlex::try_join(words.iter().map(String::as_str))
            .unwrap_or_else(|_| words.join(" "))
    }
}
