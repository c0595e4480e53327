use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;

mod common;
use common::{TestEnv, stdout_of};

#[test]
fn test_init_creates_database() {
    let env = TestEnv::new("init");

    env.cmd()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(Path::new(&env.db).exists());
}

#[test]
fn test_add_creates_then_updates_same_day() {
    let env = TestEnv::new("add_update").with_block_a();

    env.cmd()
        .args([
            "add",
            "Block A",
            "--date",
            "2025-09-01",
            "--workers",
            "10",
            "--labourers",
            "15",
            "--cost",
            "Cement bags=500",
        ])
        .assert()
        .success()
        .stdout(contains("Record created"))
        .stdout(contains("Rs: 19500.00"));

    env.cmd()
        .args([
            "add",
            "Block A",
            "--date",
            "2025-09-01",
            "--workers",
            "12",
            "--labourers",
            "15",
        ])
        .assert()
        .success()
        .stdout(contains("Record updated"))
        .stdout(contains("Rs: 21000.00"));

    let history = stdout_of(env.cmd().args(["history", "Block A"]));
    assert!(history.contains("2025-W36"));
    assert!(history.contains("Rs: 21000.00"));
}

#[test]
fn test_history_separator_matches_table_width() {
    let env = TestEnv::new("history_width").with_block_a();
    env.add("2025-09-01", "10", "15", &[]);
    env.add("2025-09-09", "1", "0", &[]);

    let out = stdout_of(env.cmd().args(["history", "Block A"]));
    let table_header = out
        .lines()
        .find(|l| l.starts_with("Week  "))
        .expect("history table header");
    let rule = out
        .lines()
        .find(|l| !l.is_empty() && l.chars().all(|c| c == '-'))
        .expect("separator line");

    assert_eq!(rule.chars().count(), table_header.chars().count());
    assert!(out.contains("Rs: 20000.00"));
}

#[test]
fn test_week_total_sums_days_of_one_week() {
    let env = TestEnv::new("week_total").with_block_a();
    env.add("2025-09-01", "10", "15", &["Cement bags=500"]);
    env.add("2025-09-03", "12", "15", &[]);
    env.add("2025-09-08", "1", "0", &[]);

    env.cmd()
        .args(["week", "Block A", "--date", "2025-09-04"])
        .assert()
        .success()
        .stdout(contains("Week of Sep 1 - Sep 7, 2025"))
        .stdout(contains("Rs: 40500.00"))
        .stdout(contains("2025-09-08").not());
}

#[test]
fn test_week_excludes_boundary_days() {
    let env = TestEnv::new("week_bounds").with_block_a();
    env.add("2025-08-31", "1", "0", &[]);
    env.add("2025-09-08", "1", "0", &[]);

    env.cmd()
        .args(["week", "Block A", "--date", "2025-09-03"])
        .assert()
        .success()
        .stdout(contains("No records in this week"))
        .stdout(contains("Rs: 0.00"));
}

#[test]
fn test_list_period_filters_records() {
    let env = TestEnv::new("list_period").with_block_a();
    env.add("2025-08-29", "1", "0", &[]);
    env.add("2025-09-02", "2", "0", &[]);

    env.cmd()
        .args(["list", "Block A", "--period", "2025-09"])
        .assert()
        .success()
        .stdout(contains("2025-09-02"))
        .stdout(contains("2025-08-29").not())
        .stdout(contains("Rs: 2000.00"));

    env.cmd()
        .args(["list", "Block A", "--period", "2025-08:2025-09"])
        .assert()
        .success()
        .stdout(contains("2025-08-29"))
        .stdout(contains("Rs: 3000.00"));
}

#[test]
fn test_zero_and_blank_costs_are_dropped() {
    let env = TestEnv::new("costs_dropped").with_block_a();

    env.cmd()
        .args([
            "add",
            "Block A",
            "--date",
            "2025-09-01",
            "--workers",
            "1",
            "--cost",
            "Sand=0",
            "--cost",
            " =200",
            "--cost",
            "Tea=40",
        ])
        .assert()
        .success()
        .stdout(contains("Ignored 2 cost item(s)"))
        .stdout(contains("Rs: 1040.00"));
}

#[test]
fn test_del_record_by_date() {
    let env = TestEnv::new("del_record").with_block_a();
    env.add("2025-09-01", "1", "0", &[]);
    env.add("2025-09-02", "2", "0", &[]);

    env.cmd()
        .args(["del", "Block A", "2025-09-01", "--yes"])
        .assert()
        .success()
        .stdout(contains("has been deleted"));

    env.cmd()
        .args(["week", "Block A", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("Rs: 2000.00"));

    // Deleting again is a no-op, not an error.
    env.cmd()
        .args(["del", "Block A", "2025-09-01", "--yes"])
        .assert()
        .success()
        .stdout(contains("No record"));
}

#[test]
fn test_site_delete_cascades() {
    let env = TestEnv::new("site_cascade").with_block_a();
    env.add("2025-09-01", "1", "0", &[]);

    env.cmd()
        .args(["site", "add", "Block B", "--worker-rate", "900"])
        .assert()
        .success();

    env.cmd()
        .args(["site", "del", "block a", "--yes"])
        .assert()
        .success()
        .stdout(contains("1 record(s) deleted"));

    env.cmd()
        .args(["site", "list"])
        .assert()
        .success()
        .stdout(contains("Block B"))
        .stdout(contains("Block A").not());
}

#[test]
fn test_site_validation_errors() {
    let env = TestEnv::new("site_validation");

    env.cmd()
        .args(["site", "add", "A"])
        .assert()
        .failure()
        .stderr(contains("at least 2 characters"));

    env.cmd()
        .args(["site", "add", "Block C", "--worker-rate", "-10"])
        .assert()
        .failure()
        .stderr(contains("worker rate"));

    env.cmd()
        .args(["site", "list"])
        .assert()
        .success()
        .stdout(contains("No sites yet"));
}

#[test]
fn test_rates_are_coerced_and_applied_retroactively() {
    let env = TestEnv::new("rates").with_block_a();
    env.add("2025-09-01", "10", "15", &[]);

    env.cmd()
        .args(["rates", "Block A", "--worker", "abc", "--labourer", "700"])
        .assert()
        .success()
        .stdout(contains("using 0"))
        .stdout(contains("labourer Rs: 700.00"));

    env.cmd()
        .args(["week", "Block A", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("Rs: 10500.00"));
}

#[test]
fn test_unknown_site_and_bad_date_fail() {
    let env = TestEnv::new("errors").with_block_a();

    env.cmd()
        .args(["week", "Nowhere"])
        .assert()
        .failure()
        .stderr(contains("Site not found"));

    env.cmd()
        .args(["add", "Block A", "--date", "01/09/2025", "--workers", "1"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));

    env.cmd()
        .args(["add", "Block A", "--cost", "Cement"])
        .assert()
        .failure()
        .stderr(contains("Invalid additional cost"));
}

#[test]
fn test_export_csv_and_json() {
    let env = TestEnv::new("export").with_block_a();
    env.add("2025-09-01", "10", "15", &["Cement bags=500"]);
    env.add("2025-09-09", "1", "0", &[]);

    let csv_path = env.out_file("report.csv");
    env.cmd()
        .args(["export", "Block A", "--format", "csv", "--file", &csv_path])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("site,week,date,workers"));
    assert_eq!(lines.count(), 2);
    assert!(csv.contains("Cement bags=500"));
    assert!(csv.contains("19500"));

    let json_path = env.out_file("report.json");
    env.cmd()
        .args(["export", "Block A", "--format", "json", "--file", &json_path])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(report["grand_total"], 20500.0);
    assert_eq!(report["weeks"][0]["key"], "2025-W37");
    assert_eq!(report["weeks"].as_array().unwrap().len(), 2);

    // Existing file without --force and no "yes" on stdin is refused.
    env.cmd()
        .args(["export", "Block A", "--format", "json", "--file", &json_path])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("not overwritten"));

    env.cmd()
        .args([
            "export", "Block A", "--format", "json", "--file", &json_path, "--force",
        ])
        .assert()
        .success();
}

#[test]
fn test_clear_removes_everything() {
    let env = TestEnv::new("clear").with_block_a();
    env.add("2025-09-01", "1", "0", &[]);

    env.cmd()
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(contains("has been deleted"));

    env.cmd()
        .args(["site", "list"])
        .assert()
        .success()
        .stdout(contains("No sites yet"));
}

#[test]
fn test_users_do_not_see_each_other() {
    let env = TestEnv::new("users").with_block_a();

    env.cmd_as("someone-else")
        .args(["site", "list"])
        .assert()
        .success()
        .stdout(contains("No sites yet"));
}

#[test]
fn test_json_backend_roundtrip() {
    let env = TestEnv::with_store("json_backend", "ledger.json");
    let run = |args: &[&str]| {
        let mut cmd = env.cmd();
        cmd.args(["--backend", "json"]).args(args);
        cmd
    };

    run(&["site", "add", "Block A", "--worker-rate", "1000", "--labourer-rate", "600"])
        .assert()
        .success();
    run(&["add", "Block A", "--date", "2025-09-01", "--workers", "10", "--labourers", "15", "--cost", "Cement bags=500"])
        .assert()
        .success();

    run(&["history", "Block A"])
        .assert()
        .success()
        .stdout(contains("Rs: 19500.00"));

    let raw = fs::read_to_string(&env.db).unwrap();
    assert!(raw.contains("\"tester\""));
    assert!(raw.contains("Cement bags"));
}

#[test]
fn test_log_and_db_info() {
    let env = TestEnv::new("log_info").with_block_a();
    env.add("2025-09-01", "1", "0", &[]);

    env.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("site"))
        .stdout(contains("add"));

    env.cmd()
        .args(["db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Sites:"))
        .stdout(contains("Integrity check passed"));

    env.cmd()
        .args(["db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("already up to date"));
}

#[test]
fn test_config_print_uses_overrides() {
    let env = TestEnv::new("config_print");

    env.cmd()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("user: tester"))
        .stdout(contains("rate_policy: live"));
}
