// tests/strategy_test.rs
use std::fs;
use std::path::Path;
use std::sync::Arc;

use git_release::bump::BumpContext;
use git_release::cli::{ReleaseWorkflow, VersionMode};
use git_release::config::ReleaseConfig;
use git_release::domain::ReleaseType;
use git_release::git::MockRepository;
use git_release::hooks::NoHooks;
use git_release::strategy::{extension_of, resolve_strategy, StrategyDeps};
use git_release::ReleaseError;
use tempfile::TempDir;

fn deps(repo: MockRepository) -> StrategyDeps {
    StrategyDeps::new(Arc::new(repo), "v")
}

fn workflow(config: ReleaseConfig, dir: &Path) -> ReleaseWorkflow {
    ReleaseWorkflow::new(config, Arc::new(MockRepository::new()), Arc::new(NoHooks), dir)
}

#[tokio::test]
async fn test_json_manifest_minor_bump() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("package.json");
    fs::write(&file, r#"{"version":"1.2.3"}"#).unwrap();

    let mut strategy = resolve_strategy(extension_of("package.json"), &deps(MockRepository::new()))
        .expect("json is supported");
    strategy.init(&file, "version");
    strategy
        .bump(&ReleaseType::Minor, &BumpContext::default())
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(&file).unwrap(), r#"{"version":"1.3.0"}"#);
    assert_eq!(strategy.resolved_version(), Some("1.3.0"));
}

#[tokio::test]
async fn test_toml_manifest_bump_keeps_comments() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Cargo.toml");
    fs::write(
        &file,
        "[package]\nname = \"app\"\nversion = \"0.9.9\" # managed by git-release\n",
    )
    .unwrap();

    let mut strategy = resolve_strategy("toml", &deps(MockRepository::new())).unwrap();
    strategy.init(&file, "package.version");
    strategy
        .bump(&ReleaseType::Patch, &BumpContext::default())
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "[package]\nname = \"app\"\nversion = \"0.9.10\" # managed by git-release\n"
    );
}

#[tokio::test]
async fn test_two_files_bumped_concurrently_first_wins() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), r#"{"version":"1.0.0"}"#).unwrap();
    fs::write(dir.path().join("b.json"), r#"{"version":"5.0.0"}"#).unwrap();

    let config = ReleaseConfig {
        version_file: "a.json, b.json".to_string(),
        ..Default::default()
    };
    let resolved = workflow(config, dir.path())
        .resolve_version(&ReleaseType::Patch, VersionMode::Write)
        .await
        .unwrap();

    assert_eq!(resolved.version, "1.0.1");
    assert_eq!(resolved.files.len(), 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("a.json")).unwrap(),
        r#"{"version":"1.0.1"}"#
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("b.json")).unwrap(),
        r#"{"version":"5.0.1"}"#
    );
}

#[tokio::test]
async fn test_unsupported_file_in_list_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), r#"{"version":"1.0.0"}"#).unwrap();

    let config = ReleaseConfig {
        version_file: "a.json,notes.xyz".to_string(),
        ..Default::default()
    };
    let err = workflow(config, dir.path())
        .resolve_version(&ReleaseType::Patch, VersionMode::Write)
        .await
        .unwrap_err();

    match err {
        ReleaseError::UnsupportedTarget { file, extension } => {
            assert_eq!(file, "notes.xyz");
            assert_eq!(extension, "xyz");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_failing_file_aborts_the_bump() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), r#"{"version":"1.0.0"}"#).unwrap();
    fs::write(dir.path().join("b.json"), r#"{"version":"not-a-version"}"#).unwrap();

    let config = ReleaseConfig {
        version_file: "a.json,b.json".to_string(),
        ..Default::default()
    };
    let err = workflow(config, dir.path())
        .resolve_version(&ReleaseType::Patch, VersionMode::Write)
        .await
        .unwrap_err();

    assert!(matches!(err, ReleaseError::InvalidVersionFormat { .. }));
}

#[test]
fn test_dispatcher_tokens() {
    let deps = deps(MockRepository::new());
    assert!(resolve_strategy(extension_of("notes.xyz"), &deps).is_none());
    assert_eq!(resolve_strategy("git", &deps).unwrap().name(), "git");
}

#[tokio::test]
async fn test_tag_strategy_without_tags_uses_fallback() {
    let mut strategy = resolve_strategy("git", &deps(MockRepository::new())).unwrap();
    strategy.init(Path::new("git"), "version");

    let context = BumpContext::new("2.3.4", Arc::new(NoHooks));
    strategy.bump(&ReleaseType::Major, &context).await.unwrap();
    assert_eq!(strategy.resolved_version(), Some("2.3.4"));
}

#[tokio::test]
async fn test_tag_strategy_trusts_reported_order() {
    let mut repo = MockRepository::new();
    repo.add_tag("v1.0.0");
    repo.add_tag("v3.0.0");

    let mut strategy = resolve_strategy("git", &deps(repo)).unwrap();
    strategy.init(Path::new("git"), "version");
    strategy
        .get_version(&ReleaseType::Minor, &BumpContext::default())
        .await
        .unwrap();
    assert_eq!(strategy.resolved_version(), Some("1.1.0"));
}
