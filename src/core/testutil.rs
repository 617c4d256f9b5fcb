//! Shared helpers for unit tests.

use std::path::Path;

/// Write a fake export tool script that mimics `1cv8 DESIGNER /DumpIB`.
///
/// When `succeed` is true the script touches the file named after the
/// `/DumpIB` flag and exits 0; otherwise it exits 1 without producing
/// anything.
#[cfg(unix)]
pub(crate) fn write_fake_tool(path: &Path, succeed: bool) {
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

/// Write a fake export tool that exits 0 without producing an artifact.
#[cfg(unix)]
pub(crate) fn write_lying_tool(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
