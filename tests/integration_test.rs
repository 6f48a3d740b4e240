// tests/integration_test.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use git_release::cli::{ReleaseWorkflow, WorkflowOptions};
use git_release::config::ReleaseConfig;
use git_release::git::{Author, Git2Repository, Repository};
use git_release::hooks::NoHooks;
use tempfile::TempDir;

fn author() -> Author {
    Author {
        name: "Dev".to_string(),
        email: "dev@example.com".to_string(),
    }
}

fn commit(repo: &Git2Repository, dir: &Path, file: &str, body: &str, message: &str) {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, body).unwrap();
    repo.commit_paths(&[PathBuf::from(file)], message, &author())
        .unwrap();
}

fn open(dir: &TempDir) -> Git2Repository {
    git2::Repository::init(dir.path()).unwrap();
    Git2Repository::open(dir.path()).unwrap()
}

#[tokio::test]
async fn test_release_on_real_repository() {
    let dir = TempDir::new().unwrap();
    let repo = open(&dir);
    commit(
        &repo,
        dir.path(),
        "package.json",
        "{\n  \"name\": \"app\",\n  \"version\": \"0.4.2\"\n}\n",
        "chore: init",
    );
    repo.create_annotated_tag("v0.4.2", "initial", &author())
        .unwrap();
    commit(&repo, dir.path(), "src/a.txt", "a", "feat(api): add endpoint");
    commit(&repo, dir.path(), "src/b.txt", "b", "fix: null check");

    let repo = Arc::new(repo);
    let config = ReleaseConfig {
        skip_push: true,
        ..Default::default()
    };
    let workflow = ReleaseWorkflow::new(config, repo.clone(), Arc::new(NoHooks), dir.path());

    let result = workflow.run(WorkflowOptions::default()).await.unwrap();

    assert_eq!(result.version, "0.5.0");
    assert_eq!(result.tag, "v0.5.0");
    assert!(result.committed);
    assert!(!result.pushed);

    // the new tag is now the newest release
    assert_eq!(repo.semver_tags("v").unwrap()[0], "v0.5.0");
    assert!(repo.commits_since(Some("v0.5.0"), None).unwrap().is_empty());

    // the release commit carries the bumped manifest and the changelog
    let git = git2::Repository::open(dir.path()).unwrap();
    let head = git.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("chore(release): v0.5.0"));
    let tree = head.tree().unwrap();
    let blob = tree
        .get_path(Path::new("package.json"))
        .unwrap()
        .to_object(&git)
        .unwrap()
        .peel_to_blob()
        .unwrap();
    assert!(std::str::from_utf8(blob.content())
        .unwrap()
        .contains("\"version\": \"0.5.0\""));
    assert!(tree.get_path(Path::new("CHANGELOG.md")).is_ok());

    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(changelog.starts_with("## v0.5.0\n\n\n### Features\n\n* **api:** add endpoint"));
}

#[tokio::test]
async fn test_commit_path_scopes_the_recommendation() {
    let dir = TempDir::new().unwrap();
    let repo = open(&dir);
    commit(&repo, dir.path(), "packages/core/x.txt", "1", "fix(core): tweak");
    commit(&repo, dir.path(), "packages/web/y.txt", "1", "feat(web): new page");

    let config = ReleaseConfig {
        skip_version_file: true,
        commit_path: "packages/core".to_string(),
        tag_prefix: "core@".to_string(),
        ..Default::default()
    };
    let workflow = ReleaseWorkflow::new(config, Arc::new(repo), Arc::new(NoHooks), dir.path());

    let (recommendation, version) = workflow.get_version().await.unwrap();
    assert_eq!(recommendation.features, 0);
    assert_eq!(version, "0.1.0");
}
