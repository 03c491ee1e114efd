//! End-to-end tests for the appmeta CLI
//!
//! These tests verify:
//! - Exit codes of `validate` for passing, failing and unreadable input
//! - Release queries and their text/JSON output
//! - Dry-run modes leave files unchanged

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/org.gpodder.gpodder.appdata.xml");
const FIXTURE_NAME: &str = "org.gpodder.gpodder.appdata.xml";

/// Command for the compiled binary, run inside `dir`
fn appmeta(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_appmeta"));
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

/// Create a project directory holding the gPodder record under data/
fn create_test_project() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let data = temp_dir.path().join("data");
    fs::create_dir(&data).unwrap();
    let path = data.join(FIXTURE_NAME);
    fs::write(&path, FIXTURE).unwrap();
    (temp_dir, path)
}

mod exit_code_tests {
    use super::*;

    #[test]
    fn test_validate_passing_project() {
        let (temp_dir, _) = create_test_project();
        appmeta(&temp_dir)
            .arg("validate")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("(org.gpodder.gpodder): passed"))
            .stdout(predicate::str::contains(
                "1 file(s) checked, 0 failed, 0 error(s), 0 warning(s)",
            ));
    }

    #[test]
    fn test_validate_failing_record() {
        let (temp_dir, path) = create_test_project();
        fs::write(
            &path,
            FIXTURE.replace("<summary>Media and podcast aggregator</summary>\n", ""),
        )
        .unwrap();

        appmeta(&temp_dir)
            .args(["validate", "data"])
            .assert()
            .code(3)
            .stdout(predicate::str::contains("failed"))
            .stdout(predicate::str::contains("E missing-field"));
    }

    #[test]
    fn test_validate_strict_promotes_warnings() {
        let (temp_dir, path) = create_test_project();
        fs::write(
            &path,
            FIXTURE.replace("<content_rating type=\"oars-1.1\"/>\n", ""),
        )
        .unwrap();

        appmeta(&temp_dir).arg("validate").assert().code(0);
        appmeta(&temp_dir)
            .args(["validate", "--strict"])
            .assert()
            .code(3);
    }

    #[test]
    fn test_validate_ignore_from_config_file() {
        let (temp_dir, path) = create_test_project();
        fs::write(
            &path,
            FIXTURE.replace("<content_rating type=\"oars-1.1\"/>\n", ""),
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("appmeta.toml"),
            "strict = true\nignore = [\"content-rating-missing\"]\n",
        )
        .unwrap();

        appmeta(&temp_dir).arg("validate").assert().code(0);
    }

    #[test]
    fn test_validate_schema_problem_is_a_validation_failure() {
        let (temp_dir, path) = create_test_project();
        fs::write(
            &path,
            FIXTURE.replace(
                "<p>This release only updates dependencies.</p>",
                "<p>This release only updates <b>dependencies</b>.</p>",
            ),
        )
        .unwrap();

        appmeta(&temp_dir)
            .arg("validate")
            .assert()
            .code(3)
            .stdout(predicate::str::contains("E description-markup-invalid"))
            .stdout(predicate::str::contains("parse-failed").not());
    }

    #[test]
    fn test_validate_unparseable_file() {
        let (temp_dir, path) = create_test_project();
        fs::write(&path, "<component><id>x</component>").unwrap();

        appmeta(&temp_dir)
            .arg("validate")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("parse-failed"));
    }

    #[test]
    fn test_validate_nonexistent_path() {
        let (temp_dir, _) = create_test_project();
        appmeta(&temp_dir)
            .args(["validate", "does-not-exist"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("path not found"));
    }

    #[test]
    fn test_validate_empty_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        appmeta(&temp_dir)
            .arg("validate")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("no metainfo files found"));
    }

    #[test]
    fn test_invalid_config_file() {
        let (temp_dir, _) = create_test_project();
        fs::write(temp_dir.path().join("appmeta.toml"), "colour = true\n").unwrap();

        appmeta(&temp_dir)
            .arg("validate")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("appmeta.toml"));
    }

    #[test]
    fn test_exit_code_help() {
        let temp_dir = tempfile::tempdir().unwrap();
        appmeta(&temp_dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("add-release"));
    }
}

mod json_output_tests {
    use super::*;

    #[test]
    fn test_validate_json_schema() {
        let (temp_dir, _) = create_test_project();
        let output = appmeta(&temp_dir)
            .args(["validate", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["passed"], true);
        assert_eq!(json["summary"]["files"], 1);
        assert_eq!(json["summary"]["failed"], 0);
        assert_eq!(json["files"][0]["id"], "org.gpodder.gpodder");
        assert!(json["files"][0]["issues"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_latest_json() {
        let (temp_dir, path) = create_test_project();
        let output = appmeta(&temp_dir)
            .arg("latest")
            .arg(&path)
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["version"], "3.11.5");
        assert_eq!(json["released"], "2024-12-17");
        assert!(json["notes"]
            .as_str()
            .unwrap()
            .contains("Bug fixes and translation updates."));
    }

    #[test]
    fn test_show_json() {
        let (temp_dir, path) = create_test_project();
        let output = appmeta(&temp_dir)
            .arg("show")
            .arg(&path)
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["id"], "org.gpodder.gpodder");
        assert_eq!(json["type"], "desktop-application");
        assert_eq!(json["releases"].as_array().unwrap().len(), 12);
    }
}

mod release_query_tests {
    use super::*;

    #[test]
    fn test_latest_text() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("latest")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("3.11.5 (2024-12-17)\n"))
            .stdout(predicate::str::contains(
                "Fix YouTube channel feeds that no longer list episodes",
            ));
    }

    #[test]
    fn test_release_by_version() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("release")
            .arg(&path)
            .arg("3.11.4")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("3.11.4 (2023-10-11)\n"))
            .stdout(predicate::str::contains(
                "This release only updates dependencies.",
            ));
    }

    #[test]
    fn test_release_unknown_version() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("release")
            .arg(&path)
            .arg("9.9.9")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("no release with version 9.9.9"));
    }

    #[test]
    fn test_releases_with_limit() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("releases")
            .arg(&path)
            .args(["--limit", "2"])
            .assert()
            .success()
            .stdout("3.11.5 (2024-12-17)\n3.11.4 (2023-10-11)\n");
    }

    #[test]
    fn test_latest_without_releases() {
        let (temp_dir, path) = create_test_project();
        let start = FIXTURE.find("  <releases>").unwrap();
        let end = FIXTURE.find("</component>").unwrap();
        let stripped = format!("{}{}", &FIXTURE[..start], &FIXTURE[end..]);
        fs::write(&path, stripped).unwrap();

        appmeta(&temp_dir)
            .arg("latest")
            .arg(&path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("no releases"));
    }
}

mod dry_run_tests {
    use super::*;

    #[test]
    fn test_add_release_dry_run_leaves_file_unchanged() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("add-release")
            .arg(&path)
            .args(["--version", "3.12.0", "--date", "2025-02-01", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "<release version=\"3.12.0\" date=\"2025-02-01\"/>",
            ));

        assert_eq!(fs::read_to_string(&path).unwrap(), FIXTURE);
    }

    #[test]
    fn test_add_release_diff() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("add-release")
            .arg(&path)
            .args(["--version", "3.12.0", "--date", "2025-02-01"])
            .args(["--type", "development", "--item", "New episode list"])
            .args(["--diff", "-n"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(dry-run) --- a/"))
            .stdout(predicate::str::contains(
                "+    <release version=\"3.12.0\" date=\"2025-02-01\" type=\"development\">",
            ))
            .stdout(predicate::str::contains("+          <li>New episode list</li>"));

        assert_eq!(fs::read_to_string(&path).unwrap(), FIXTURE);
    }

    #[test]
    fn test_add_release_writes_file() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("add-release")
            .arg(&path)
            .args(["--version", "3.12.0", "--date", "2025-02-01"])
            .args(["--note", "Faster feed updates."])
            .assert()
            .success()
            .stdout(predicate::str::contains("Added release 3.12.0 to"));

        appmeta(&temp_dir)
            .arg("latest")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("3.12.0 (2025-02-01)\n"))
            .stdout(predicate::str::contains("Faster feed updates."));
    }

    #[test]
    fn test_add_release_duplicate_version() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("add-release")
            .arg(&path)
            .args(["--version", "3.11.5"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("release 3.11.5 already exists"));

        assert_eq!(fs::read_to_string(&path).unwrap(), FIXTURE);
    }

    #[test]
    fn test_add_release_bad_date() {
        let (temp_dir, path) = create_test_project();
        appmeta(&temp_dir)
            .arg("add-release")
            .arg(&path)
            .args(["--version", "3.12.0", "--date", "01/02/2025"])
            .assert()
            .failure();

        assert_eq!(fs::read_to_string(&path).unwrap(), FIXTURE);
    }

    #[test]
    fn test_format_check_and_rewrite() {
        let (temp_dir, path) = create_test_project();

        appmeta(&temp_dir)
            .arg("format")
            .arg(&path)
            .arg("--check")
            .assert()
            .code(3)
            .stdout(predicate::str::contains("is not in canonical form"));
        assert_eq!(fs::read_to_string(&path).unwrap(), FIXTURE);

        appmeta(&temp_dir)
            .arg("format")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Formatted"));

        appmeta(&temp_dir)
            .arg("format")
            .arg(&path)
            .arg("--check")
            .assert()
            .code(0);
    }
}
