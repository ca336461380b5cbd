//! Shell-script stand-ins for the extraction tool, shared by unit tests.
//!
//! All scripts are written once, before any test spawns one of them. Writing
//! an executable while another thread forks can leave the fork holding the
//! write descriptor, which makes `exec` fail with ETXTBSY. Tests that download
//! a tool and then run it take the exec lock exclusively for the same reason.

use crate::config::{binary_file_name, AssetLocations};
use std::path::Path;
use std::sync::OnceLock;
use tempfile::TempDir;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Behaviours of the fake tool.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Stub {
    /// Prints its arguments as a JSON document.
    EchoArgs,
    /// Prints valid JSON and a warning on stderr, exits 0.
    StderrWarning,
    /// Prints plain text.
    NotJson,
    /// Prints an error on stderr and exits 1.
    Fails,
    /// Sleeps before answering.
    Slow,
}

impl Stub {
    const ALL: [Stub; 5] = [
        Stub::EchoArgs,
        Stub::StderrWarning,
        Stub::NotJson,
        Stub::Fails,
        Stub::Slow,
    ];

    fn dir_name(self) -> &'static str {
        match self {
            Stub::EchoArgs => "echo-args",
            Stub::StderrWarning => "stderr-warning",
            Stub::NotJson => "not-json",
            Stub::Fails => "fails",
            Stub::Slow => "slow",
        }
    }

    fn script(self) -> &'static str {
        match self {
            Stub::EchoArgs => concat!(
                "#!/bin/sh\n",
                "if [ \"$1\" = \"--version\" ]; then echo 2024.12.13; exit 0; fi\n",
                "printf '{\"title\":\"stub\",\"args\":[\"%s\",\"%s\",\"%s\",\"%s\",\"%s\"]}\\n' ",
                "\"$1\" \"$2\" \"$3\" \"$4\" \"$5\"\n",
            ),
            Stub::StderrWarning => concat!(
                "#!/bin/sh\n",
                "echo '{\"title\":\"stub\"}'\n",
                "echo 'WARNING: unable to extract uploader' >&2\n",
                "exit 0\n",
            ),
            Stub::NotJson => "#!/bin/sh\necho 'this is not json'\n",
            Stub::Fails => concat!(
                "#!/bin/sh\n",
                "echo 'ERROR: Unsupported URL' >&2\n",
                "exit 1\n",
            ),
            Stub::Slow => "#!/bin/sh\nsleep 5\necho '{}'\n",
        }
    }
}

fn stub_root() -> &'static Path {
    static ROOT: OnceLock<TempDir> = OnceLock::new();
    ROOT.get_or_init(|| {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().expect("stub tempdir");
        for stub in Stub::ALL {
            let dir = root.path().join(stub.dir_name());
            std::fs::create_dir_all(&dir).expect("stub dir");
            let path = dir.join(binary_file_name());
            std::fs::write(&path, stub.script()).expect("stub script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("stub permissions");
        }
        root
    })
    .path()
}

/// Asset locations whose tool is already present, so provisioning is a
/// no-op. The cookie jar is left absent and unconfigured.
pub(crate) fn stub_locations(stub: Stub) -> AssetLocations {
    let dir = stub_root().join(stub.dir_name());
    AssetLocations::in_dir(&dir, "http://127.0.0.1:9/unreachable", None)
}

fn exec_lock() -> &'static RwLock<()> {
    static LOCK: OnceLock<RwLock<()>> = OnceLock::new();
    LOCK.get_or_init(|| RwLock::new(()))
}

/// Held by every test that spawns a process without writing an executable.
/// The stubs are guaranteed to be on disk once this returns.
pub(crate) async fn shared_exec() -> RwLockReadGuard<'static, ()> {
    stub_root();
    exec_lock().read().await
}

/// Held by tests that write an executable and then run it, so no other test
/// forks while the file is still open for writing.
pub(crate) async fn exclusive_exec() -> RwLockWriteGuard<'static, ()> {
    exec_lock().write().await
}
