use crate::common::command::{repository_dir, run_savit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn init_repository_successfully(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();

    run_savit_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty savit repository in .+$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    let control = repository_dir.path().join(".savit");
    assert_eq!(std::fs::read_to_string(control.join("HEAD.txt"))?, "null");
    assert_eq!(std::fs::read_to_string(control.join("BRANCH.txt"))?, "main");
    assert_eq!(
        std::fs::read_to_string(control.join("refs").join("heads").join("main.txt"))?,
        "null"
    );
    assert!(control.join("objects").is_dir());
    assert!(control.join("commits").is_dir());

    Ok(())
}

#[rstest]
fn init_twice_reinitializes(repository_dir: TempDir) {
    run_savit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_savit_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Reinitialized existing"));
}

#[rstest]
fn init_honors_the_default_branch_variable(repository_dir: TempDir) {
    run_savit_command(repository_dir.path(), &["init"])
        .env("SAVIT_DEFAULT_BRANCH", "trunk")
        .assert()
        .success();

    let control = repository_dir.path().join(".savit");
    assert_eq!(
        std::fs::read_to_string(control.join("BRANCH.txt")).unwrap(),
        "trunk"
    );
    assert!(control.join("refs").join("heads").join("trunk.txt").is_file());
}

#[rstest]
fn commands_outside_a_repository_fail(repository_dir: TempDir) {
    run_savit_command(repository_dir.path(), &["log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a savit repository"));
}

#[rstest]
fn a_missing_directory_is_only_created_by_init(repository_dir: TempDir) {
    let target = repository_dir.path().join("typo");

    run_savit_command(repository_dir.path(), &["-C", "typo", "log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a savit repository"));
    assert!(!target.exists());

    run_savit_command(repository_dir.path(), &["-C", "typo", "init"])
        .assert()
        .success();
    assert!(target.join(".savit").join("HEAD.txt").is_file());
}
