use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn journal(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("journal").unwrap();
    cmd.arg("--root").arg(root.path());
    cmd
}

#[test]
fn test_register_save_list_flow() {
    let root = TempDir::new().unwrap();

    journal(&root)
        .args(["register", "melina", "--password", "Sicher1!x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("registered"));

    journal(&root)
        .args(["login", "melina", "--password", "Sicher1!x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in"));

    journal(&root)
        .args([
            "save",
            "--subject",
            "chemie",
            "--user",
            "melina",
            "--title",
            "Titration",
            "--date",
            "2025-01-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry saved"));

    journal(&root)
        .args(["list", "--subject", "chemie", "--user", "melina"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Titration"));
}

#[test]
fn test_login_with_wrong_password_fails() {
    let root = TempDir::new().unwrap();

    journal(&root)
        .args(["register", "melina", "--password", "Sicher1!x"])
        .assert()
        .success();

    journal(&root)
        .args(["login", "melina", "--password", "Falsch1!x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect"));
}

#[test]
fn test_doctor_on_clean_store() {
    let root = TempDir::new().unwrap();

    journal(&root)
        .args(["doctor", "--user", "melina"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No inconsistencies"));
}

#[test]
fn test_list_empty_subject_is_informational() {
    let root = TempDir::new().unwrap();

    journal(&root)
        .args(["list", "--subject", "haematologie", "--user", "melina"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries"));
}

#[test]
fn test_unknown_subject_is_an_error() {
    let root = TempDir::new().unwrap();

    journal(&root)
        .args(["list", "--subject", "physik", "--user", "melina"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown subject"));
}
