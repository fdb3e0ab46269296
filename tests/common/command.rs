use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_savit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    run_savit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    savit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_savit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("savit").expect("Failed to find savit binary");
    cmd.envs(vec![("NO_COLOR", "1"), ("SAVIT_LOG", "off")]);
    cmd.env_remove("SAVIT_DEFAULT_BRANCH");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn savit_commit(dir: &Path, message: &str) -> Command {
    run_savit_command(dir, &["commit", "-m", message])
}

pub fn get_head_commit_id(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".savit").join("HEAD.txt"))
        .expect("Failed to read HEAD")
        .trim()
        .to_string()
}

pub fn get_log(dir: &Path) -> Vec<String> {
    let output = run_savit_command(dir, &["log"])
        .output()
        .expect("Failed to run log");
    assert!(output.status.success(), "log failed: {:?}", output);

    String::from_utf8(output.stdout)
        .expect("log output is not UTF-8")
        .lines()
        .map(str::to_string)
        .collect()
}
