//! CLI integration tests
//!
//! Runs the binary against snapshot files and a temporary rule store.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

#[cfg(test)]
mod tests {
    use super::*;

    const FRONT_MATTER_SNAPSHOT: &str = r#"{
        "document_page_count": 10,
        "rules": [
            {"id": "front", "document_page_start": 1, "document_page_end": 2,
             "rule_type": "positive", "numeral_type": "roman", "starting_canonical_page": "i"},
            {"id": "blank", "document_page_start": 3, "document_page_end": 3,
             "rule_type": "negative"}
        ]
    }"#;

    const OVERLAP_SNAPSHOT: &str = r#"{
        "document_page_count": 10,
        "rules": [
            {"id": "a", "document_page_start": 1, "document_page_end": 5,
             "rule_type": "positive", "numeral_type": "arabic", "starting_canonical_page": "1"},
            {"id": "b", "document_page_start": 4, "document_page_end": 6,
             "rule_type": "negative"}
        ]
    }"#;

    fn write_snapshot(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cli(dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("canonical-pages").unwrap();
        // Keep the user's config file out of the run
        cmd.current_dir(dir)
            .arg("--config")
            .arg(dir.join("missing-config.toml"));
        cmd
    }

    // TC-CLI-001: Text output for a resolved snapshot
    #[test]
    fn test_compute_text() {
        let dir = tempdir().unwrap();
        let snapshot = write_snapshot(&dir, FRONT_MATTER_SNAPSHOT);

        cli(dir.path())
            .arg("compute")
            .arg(&snapshot)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "i-ii [blue]  3 [gray] (ignored)  4-10 [red]",
            ))
            .stdout(predicate::str::contains("Unaccounted:          7"));
    }

    // TC-CLI-002: JSON output carries labels and statistics
    #[test]
    fn test_compute_json() {
        let dir = tempdir().unwrap();
        let snapshot = write_snapshot(&dir, FRONT_MATTER_SNAPSHOT);

        let output = cli(dir.path())
            .args(["--format", "json", "compute"])
            .arg(&snapshot)
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["status"], "resolved");
        assert_eq!(value["pages"]["2"], "ii");
        assert_eq!(value["pages"]["3"], "excluded");
        assert_eq!(value["statistics"]["user_defined_negative_pages"], 1);
    }

    // TC-CLI-003: Overlapping rules exit with the unresolved code
    #[test]
    fn test_compute_conflict_exit_code() {
        let dir = tempdir().unwrap();
        let snapshot = write_snapshot(&dir, OVERLAP_SNAPSHOT);

        cli(dir.path())
            .arg("compute")
            .arg(&snapshot)
            .assert()
            .code(4)
            .stdout(predicate::str::contains("a and b share pages 4, 5"));
    }

    // TC-CLI-004: Missing snapshot
    #[test]
    fn test_missing_snapshot() {
        let dir = tempdir().unwrap();
        cli(dir.path())
            .args(["compute", "nope.json"])
            .assert()
            .code(3);
    }

    // TC-CLI-005: Range validation
    #[test]
    fn test_validate_range() {
        let dir = tempdir().unwrap();
        cli(dir.path())
            .args(["validate-range", "1-2,5-6,8", "--max-page", "10"])
            .assert()
            .success()
            .stdout("valid\n");

        cli(dir.path())
            .args(["validate-range", "9-3", "--max-page", "10"])
            .assert()
            .code(2)
            .stdout(predicate::str::starts_with("invalid:"));
    }

    // TC-CLI-006: Sequence generation
    #[test]
    fn test_sequence() {
        let dir = tempdir().unwrap();
        cli(dir.path())
            .args(["sequence", "roman", "--start", "vii", "--count", "3"])
            .assert()
            .success()
            .stdout("vii\nviii\nix\n");

        cli(dir.path())
            .args(["sequence", "arabic", "--start", "1", "--count", "-1"])
            .assert()
            .code(2);

        cli(dir.path())
            .args(["sequence", "arabic", "--start", "1", "--count", "9223372036854775807"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Count too large"));
    }

    // TC-CLI-007: Rule store add, conflict, list
    #[test]
    fn test_rules_workflow() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("rules.json");

        cli(dir.path())
            .arg("rules")
            .arg("--store")
            .arg(&store)
            .args(["add", "--start", "1", "--end", "4", "--roman", "i"])
            .assert()
            .success();

        cli(dir.path())
            .arg("rules")
            .arg("--store")
            .arg(&store)
            .args(["add", "--start", "3", "--end", "6", "--negative"])
            .assert()
            .code(4)
            .stderr(predicate::str::contains("pages 3, 4"));

        cli(dir.path())
            .arg("rules")
            .arg("--store")
            .arg(&store)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("pages 1-4  positive i-iv"));

        assert!(store.exists());
    }
}
