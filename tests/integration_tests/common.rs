// shared utilities for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::io::Write;

use serde_json::Value;
use tempfile::TempDir;

/// path to the built thingif binary
pub fn thingif_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_thingif"))
}

/// run thingif with an isolated config location
pub fn run_thingif(args: &[&str], config_path: &Path) -> Output {
    Command::new(thingif_binary_path())
        .args(args)
        .env("THINGIF_CONFIG", config_path)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run thingif")
}

/// run thingif feeding `stdin`
#[allow(dead_code)]
pub fn run_thingif_with_stdin(args: &[&str], config_path: &Path, stdin: &str) -> Output {
    let mut child = Command::new(thingif_binary_path())
        .args(args)
        .env("THINGIF_CONFIG", config_path)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn thingif");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for thingif")
}

/// a temp dir holding input files and a config path
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    /// write a JSON document and return its path as a string
    pub fn write_json(&self, name: &str, value: &Value) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(value).unwrap())
            .expect("Failed to write test file");
        path.to_str().unwrap().to_string()
    }

    #[allow(dead_code)]
    pub fn write_raw(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path.to_str().unwrap().to_string()
    }

    /// write a config with app, owner and target filled in
    #[allow(dead_code)]
    pub fn write_complete_config(&self) {
        let config = serde_json::json!({
            "app": { "app_id": "app-1", "app_key": "key-1", "site": "JP" },
            "defaults": { "owner": "user:owner-1", "target": "thing:th.1" }
        });
        fs::write(self.config_path(), serde_json::to_string_pretty(&config).unwrap())
            .expect("Failed to write test config");
    }

    pub fn run(&self, args: &[&str]) -> Output {
        run_thingif(args, &self.config_path())
    }
}

/// parse stdout as a JSON-RPC response
pub fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}\nstderr: {}",
            e,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
