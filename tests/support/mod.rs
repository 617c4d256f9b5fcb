//! Test harness utilities for dtbackup integration tests.
//!
//! Provides an isolated test environment and helper commands driving the
//! real binary.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Test environment with an isolated temp directory.
///
/// Config, key, and secrets paths all point into the temp directory via the
/// binary's global flags, so tests never touch the real filesystem layout.
pub struct TestEnv {
    /// Temporary directory backing the whole environment
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn key_path(&self) -> PathBuf {
        self.path().join("secrets").join("key.key")
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.path().join("secrets").join("secrets.toml")
    }

    /// Create a dtbackup command pointed at this environment's files.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("dtbackup").expect("failed to find dtbackup binary");
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("DTBACKUP_LOG");
        cmd.arg("--config").arg(self.config_path());
        cmd.arg("--key-file").arg(self.key_path());
        cmd.arg("--secrets-file").arg(self.secrets_path());
        cmd
    }

    /// Shortcut for `dtbackup init-key`.
    pub fn init_key(&self) -> Output {
        self.cmd()
            .arg("init-key")
            .output()
            .expect("failed to run dtbackup init-key")
    }

    /// Shortcut for `dtbackup secret set NAME --value VALUE`.
    pub fn set_secret(&self, name: &str, value: &str) -> Output {
        self.cmd()
            .args(["secret", "set", name, "--value", value])
            .output()
            .expect("failed to run dtbackup secret set")
    }

    /// Shortcut for `dtbackup run [NAMES..]`.
    pub fn run(&self, names: &[&str]) -> Output {
        self.cmd()
            .arg("run")
            .args(names)
            .output()
            .expect("failed to run dtbackup run")
    }
}

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("Command failed:\n{}", stderr);
    }
}

/// Assert that a command output failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "Expected command to fail but it succeeded"
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write a fake export tool script honoring the `/DumpIB` flag.
#[cfg(unix)]
pub fn write_fake_tool(path: &Path, succeed: bool) {
    use std::os::unix::fs::PermissionsExt;

    let script = if succeed {
        concat!(
            "#!/bin/sh\n",
            "while [ $# -gt 0 ]; do\n",
            "  if [ \"$1\" = \"/DumpIB\" ]; then\n",
            "    printf 'dump' > \"$2\"\n",
            "    exit 0\n",
            "  fi\n",
            "  shift\n",
            "done\n",
            "exit 2\n"
        )
    } else {
        "#!/bin/sh\necho 'infobase is locked' >&2\nexit 1\n"
    };

    std::fs::write(path, script).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Set a file's mtime `age_days` into the past.
pub fn age_file(path: &Path, age_days: u64) {
    use std::fs::{File, FileTimes};
    use std::time::{Duration, SystemTime};

    let mtime = SystemTime::now() - Duration::from_secs(age_days * 24 * 3600);
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_times(FileTimes::new().set_modified(mtime))
        .unwrap();
}
