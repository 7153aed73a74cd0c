// Licensed under the Apache-2.0 license

//! Provenance banner placed at the top of every generated file.
//!
//! Source-control information comes from a [`RevisionProvider`] rather than
//! from the process environment, so generation never fails because git is
//! missing: the provenance line is simply left out.

use crate::model::RegisterList;
use log::warn;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Marks the one banner line that changes between otherwise identical runs.
pub const PROVENANCE_PREFIX: &str = "Generated at ";

/// Source-control state of the tree being generated from.
pub trait RevisionProvider {
    /// Short hash of the checked out revision, or `None` if unavailable.
    fn current_revision(&self) -> Option<String>;

    /// True if the working tree differs from the checked out revision.
    fn has_local_changes(&self) -> bool;
}

/// Reads revision information by running `git` in a directory.
#[derive(Clone, Debug)]
pub struct GitRevision {
    directory: PathBuf,
}

impl GitRevision {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }
}

impl RevisionProvider for GitRevision {
    fn current_revision(&self) -> Option<String> {
        match run_cmd_stdout(
            Command::new("git")
                .current_dir(&self.directory)
                .args(["rev-parse", "--short", "HEAD"]),
        ) {
            Ok(hash) => Some(hash.trim().to_string()).filter(|hash| !hash.is_empty()),
            Err(err) => {
                warn!(
                    "No git revision available in {:?}, omitting provenance: {err}",
                    self.directory
                );
                None
            }
        }
    }

    fn has_local_changes(&self) -> bool {
        run_cmd_stdout(
            Command::new("git")
                .current_dir(&self.directory)
                .args(["status", "--porcelain"]),
        )
        .map(|status| !status.trim().is_empty())
        .unwrap_or(false)
    }
}

/// Provider for trees without source control.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRevision;

impl RevisionProvider for NoRevision {
    fn current_revision(&self) -> Option<String> {
        None
    }

    fn has_local_changes(&self) -> bool {
        false
    }
}

/// Run a command and return its stdout as a string.
fn run_cmd_stdout(cmd: &mut Command) -> std::io::Result<String> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let out = cmd.output()?;
    if out.status.success() {
        Ok(String::from_utf8_lossy(&out.stdout).into())
    } else {
        Err(std::io::Error::other(format!(
            "process {:?} {:?} exited with status code {:?} stderr {}",
            cmd.get_program(),
            cmd.get_args(),
            out.status.code(),
            String::from_utf8_lossy(&out.stderr).trim()
        )))
    }
}

/// "Automatically generated, do not edit" banner with optional provenance.
///
/// Computed once per generation run and rendered by each generator in its
/// own comment syntax.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Banner {
    source_file: Option<String>,
    provenance: Option<String>,
}

impl Banner {
    /// Build the banner for `register_list`, stamped with the current time and
    /// the revision reported by `provider`.
    pub fn new(register_list: &RegisterList, provider: &dyn RevisionProvider) -> Self {
        let source_file = register_list
            .source_definition_file()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned());

        let provenance = provider.current_revision().map(|revision| {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let mut line = format!("{PROVENANCE_PREFIX}{timestamp} from commit {revision}");
            if provider.has_local_changes() {
                line.push_str(" (local changes present)");
            }
            line.push('.');
            line
        });

        Self {
            source_file,
            provenance,
        }
    }

    /// The provenance line, if revision information was available.
    pub fn provenance(&self) -> Option<&str> {
        self.provenance.as_deref()
    }

    /// Banner text, one entry per line, without comment markers.
    pub fn lines(&self) -> Vec<String> {
        let mut lines =
            vec!["This file is automatically generated by fpga-registers. Do not edit.".to_string()];
        if let Some(source_file) = &self.source_file {
            lines.push(format!("Based on register definition file {source_file}."));
        }
        if let Some(provenance) = &self.provenance {
            lines.push(provenance.clone());
        }
        lines
    }

    /// Banner as line comments using `prefix` (e.g. `"--"` or `"//"`),
    /// followed by an empty line.
    pub fn commented(&self, prefix: &str) -> String {
        let mut output = String::new();
        for line in self.lines() {
            writeln!(output, "{prefix} {line}").unwrap();
        }
        writeln!(output).unwrap();
        output
    }
}
