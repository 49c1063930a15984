#![allow(dead_code)]

use remote_trigger::{create_app, ProcessRunner, TriggerDefinition, TriggerRegistry};
use std::{
    io::Write,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};
use tempfile::TempDir;

/// Executable shell scripts shared by every test in a binary
///
/// All scripts are written once, before any test spawns a process, so no
/// child can inherit a still-open write handle (ETXTBSY on exec).
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn script(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

const SCRIPTS: &[(&str, &str)] = &[
    ("five_lines.sh", "for i in 1 2 3 4 5; do echo \"line $i\"; done\n"),
    (
        "many_lines.sh",
        "i=0\nwhile [ $i -lt 20000 ]; do echo \"row $i\"; i=$((i+1)); done\n",
    ),
    ("fail.sh", "echo before failure\nexit 3\n"),
    ("slow.sh", "exec sleep 30\n"),
    ("crlf.sh", "printf 'first\\r\\nsecond\\nno newline'\n"),
    ("pause.sh", "sleep 1\necho paused\n"),
    ("stderr_only.sh", "echo hidden >&2\n"),
    ("lingering.sh", "echo early\nsleep 5 &\n"),
];

pub fn fixtures() -> &'static Fixtures {
    static FIXTURES: OnceLock<Fixtures> = OnceLock::new();
    FIXTURES.get_or_init(|| {
        let dir = tempfile::tempdir().expect("create fixture dir");
        for (name, body) in SCRIPTS {
            let path: PathBuf = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}", body)).expect("write script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("chmod script");
        }
        Fixtures { dir }
    })
}

/// Serve the trigger router on an ephemeral local port, returning its base URL
pub async fn serve(triggers: Vec<TriggerDefinition>, runner: ProcessRunner) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let app = create_app(Arc::new(TriggerRegistry::new(triggers)), runner);

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .expect("test server");
    });

    format!("http://{}", addr)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().expect("client")
}

/// GET a URL, returning the status code and body text
pub async fn get(url: &str) -> (u16, String) {
    let response = client().get(url).send().await.expect("request");
    let status = response.status().as_u16();
    let body = response.text().await.expect("body");
    (status, body)
}

/// In-memory log sink for asserting on emitted events
///
/// `install` sets a plain-text fmt subscriber as the default for the current
/// thread. `#[tokio::test]` runs everything (server, handler, runner tasks) on
/// that one thread, so every event of the test lands here.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Index of the first log line containing `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.lines().iter().position(|line| line.contains(needle))
    }

    /// First log line containing `needle`
    pub fn find(&self, needle: &str) -> Option<String> {
        self.lines().into_iter().find(|line| line.contains(needle))
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
