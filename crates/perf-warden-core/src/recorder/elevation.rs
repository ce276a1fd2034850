//! Privilege escalation helper resolution and artifact ownership repair.
//!
//! Recording as root leaves the data file owned by root. The helpers here
//! locate a graphical sudo utility, build its option list, and run a
//! blocking `chown` through it so the invoking user can read the file.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use nix::unistd::{AccessFlags, Gid, Group, Uid, User, access};
use tracing::{debug, instrument, warn};

/// Known graphical sudo utilities, in preference order.
pub(crate) const HELPER_CANDIDATES: [&str; 2] = ["kdesu", "gksu"];

/// Resolve the privilege escalation helper from the search path.
///
/// Returns the first candidate found, or `None` when the system has no
/// graphical sudo utility installed.
pub(crate) fn escalation_helper() -> Option<PathBuf> {
    HELPER_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Login name of the invoking user, if resolvable.
pub(crate) fn current_username() -> Option<String> {
    User::from_uid(Uid::current()).ok().flatten().map(|u| u.name)
}

/// Name of the invoking user's primary group, if resolvable.
fn primary_group_name() -> Option<String> {
    Group::from_gid(Gid::current()).ok().flatten().map(|g| g.name)
}

/// Options passed to the escalation helper itself, before the `--` that
/// introduces the wrapped command.
pub(crate) fn helper_options(helper: &Path, attach_window: Option<u64>) -> Vec<String> {
    let mut options = vec!["-u".to_string(), "root".to_string()];
    if is_interactive_helper(helper) {
        // enable command line output
        options.push("-t".to_string());
        if let Some(window) = attach_window {
            // make the credential dialog transient for the caller's window
            options.push("--attach".to_string());
            options.push(window.to_string());
        }
    }
    options
}

/// kdesu is the interactive variant that understands `-t`/`--attach`.
fn is_interactive_helper(helper: &Path) -> bool {
    helper.file_name().is_some_and(|name| name == "kdesu")
}

/// Make `path` readable by the invoking user, escalating if necessary.
///
/// Returns `true` immediately when the file is already readable — no
/// helper process is spawned in that case. Otherwise requires both a
/// resolvable escalation helper and username; the helper then runs
/// `chown <user>:<primaryGroup> <path>` and readability is re-checked.
///
/// This is the one place a subprocess runs synchronously: callers on an
/// async runtime must wrap it in `spawn_blocking`.
#[instrument]
pub(crate) fn ensure_file_readable(path: &Path, attach_window: Option<u64>) -> bool {
    if access(path, AccessFlags::R_OK).is_ok() {
        return true;
    }

    let Some(helper) = escalation_helper() else {
        warn!(path = %path.display(), "File unreadable and no escalation helper available");
        return false;
    };
    let Some(username) = current_username() else {
        warn!(path = %path.display(), "File unreadable and current user unresolvable");
        return false;
    };
    let group = primary_group_name().unwrap_or_else(|| username.clone());

    let mut args = helper_options(&helper, attach_window);
    args.push("--".to_string());
    args.push("chown".to_string());
    args.push(format!("{username}:{group}"));
    args.push(path.display().to_string());

    debug!(helper = %helper.display(), owner = %format!("{username}:{group}"), "Fixing data file ownership");

    match Command::new(&helper).args(&args).status() {
        Ok(status) => {
            if !status.success() {
                warn!(status = %status, "Ownership fix helper exited unsuccessfully");
            }
        }
        Err(e) => {
            warn!(error = %e, "Failed to run ownership fix helper");
        }
    }

    // Fresh check, not the helper's exit status, decides the outcome.
    access(path, AccessFlags::R_OK).is_ok()
}
