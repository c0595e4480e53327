#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Isolated home directory and store file for one CLI test.
pub struct TestEnv {
    pub home: PathBuf,
    pub db: String,
}

impl TestEnv {
    /// Fresh directory under the system temp dir; any previous run is wiped.
    pub fn new(name: &str) -> Self {
        Self::with_store(name, "sitebook.sqlite")
    }

    pub fn with_store(name: &str, file: &str) -> Self {
        let mut home = env::temp_dir();
        home.push(format!("sitebook_test_{}", name));
        fs::remove_dir_all(&home).ok();
        fs::create_dir_all(&home).expect("create test home");

        let db = home.join(file).to_string_lossy().to_string();
        Self { home, db }
    }

    /// The binary with HOME, store path and user pinned to this test.
    pub fn cmd(&self) -> Command {
        self.cmd_as("tester")
    }

    pub fn cmd_as(&self, user: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("sitebook");
        cmd.env("HOME", &self.home)
            .env("APPDATA", &self.home)
            .env_remove("SITEBOOK_LOG")
            .args(["--db", &self.db, "--user", user]);
        cmd
    }

    pub fn out_file(&self, name: &str) -> String {
        self.home.join(name).to_string_lossy().to_string()
    }

    /// Create "Block A" with rates 1000 / 600.
    pub fn with_block_a(self) -> Self {
        self.cmd()
            .args([
                "site",
                "add",
                "Block A",
                "--worker-rate",
                "1000",
                "--labourer-rate",
                "600",
            ])
            .assert()
            .success();
        self
    }

    pub fn add(&self, date: &str, workers: &str, labourers: &str, costs: &[&str]) {
        let mut args = vec![
            "add",
            "Block A",
            "--date",
            date,
            "--workers",
            workers,
            "--labourers",
            labourers,
        ];
        for c in costs {
            args.push("--cost");
            args.push(c);
        }
        self.cmd().args(&args).assert().success();
    }
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.output().expect("run sitebook");
    assert!(
        out.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).to_string()
}
