// tests/cli_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use git_release::git::{Author, Git2Repository, Repository};
use tempfile::TempDir;

fn git_release(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-release"))
        .args(args)
        .env_remove("GITHUB_OUTPUT")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute git-release")
}

fn repository_with(dir: &Path, version: &str, message: &str) {
    let repo = Git2Repository::from_git2(git2::Repository::init(dir).unwrap());
    fs::write(
        dir.join("package.json"),
        format!("{{\"version\":\"{}\"}}\n", version),
    )
    .unwrap();
    let author = Author {
        name: "Dev".to_string(),
        email: "dev@example.com".to_string(),
    };
    repo.commit_paths(&[dir.join("package.json")], message, &author)
        .unwrap();
}

#[test]
fn test_help() {
    let output = git_release(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-release"));
    assert!(stdout.contains("get-version"));
    assert!(stdout.contains("--skip-on-empty"));
}

#[test]
fn test_version_flag() {
    let output = git_release(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_get_version_prints_next_version() {
    let dir = TempDir::new().unwrap();
    repository_with(dir.path(), "1.4.0", "feat: first feature");

    let output = git_release(&[
        "get-version",
        "-C",
        dir.path().to_str().unwrap(),
        "--version-file",
        "package.json",
    ]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "1.5.0");
    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        "{\"version\":\"1.4.0\"}\n"
    );
}

#[test]
fn test_skip_on_empty_exits_successfully() {
    let dir = TempDir::new().unwrap();
    repository_with(dir.path(), "1.4.0", "docs: readme");

    let output = git_release(&[
        "-C",
        dir.path().to_str().unwrap(),
        "--skip-on-empty",
        "--version-file",
        "package.json",
    ]);

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("skipped=true"));
}

#[test]
fn test_unsupported_version_file_fails() {
    let dir = TempDir::new().unwrap();
    repository_with(dir.path(), "1.4.0", "fix: bug");

    let output = git_release(&[
        "get-version",
        "-C",
        dir.path().to_str().unwrap(),
        "--version-file",
        "VERSION.xyz",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("File extension \"xyz\" from file \"VERSION.xyz\" is not supported"));
}
