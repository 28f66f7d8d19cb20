// Common test utilities shared across acceptance tests
//
// Every test works inside its own temporary directory holding the
// configuration document, any file sources, the tool config and the host
// state file. URL sources are served by an axum server bound to a random
// local port on its own tokio runtime thread, so the blocking fetch in the
// code under test never runs inside an async context.

#![allow(dead_code)]

use axum::{http::StatusCode, routing::get, Router};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

/// Isolated directory for one acceptance test
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file relative to the workspace, creating parent directories
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.temp_dir.path().join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&file_path, content).unwrap();
        file_path
    }

    pub fn state_path(&self) -> PathBuf {
        self.temp_dir.path().join("state/host.json")
    }

    /// Tool config that only uses inline secret values
    pub fn create_config(&self, secrets: &[(&str, &str)]) -> PathBuf {
        let mut content = String::from("[secrets]\nenv = false\n\n[secrets.values]\n");
        for (name, value) in secrets {
            content.push_str(&format!("{} = \"{}\"\n", name, value));
        }
        self.create_file("casc-script.toml", &content)
    }
}

/// Serve fixed script bodies over HTTP; returns the base URL
///
/// Paths not listed answer 404.
pub fn serve_scripts(scripts: &[(&str, &str)]) -> String {
    let mut router = Router::new();
    for (path, body) in scripts {
        let body = body.to_string();
        router = router.route(path, get(move || {
            let body = body.clone();
            async move { body }
        }));
    }
    let router = router.fallback(|| async { (StatusCode::NOT_FOUND, "not found") });

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind script server");
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });

    let addr = rx.recv().expect("Script server did not start");
    format!("http://{}", addr)
}
