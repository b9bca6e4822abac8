//! End-to-end runs writing to workflow files

mod helper;

use mockito::{Matcher, Server};

use helper::{MockTagSource, StepFiles};
use semver_match::config::parse_repositories;
use semver_match::error::RunError;
use semver_match::output::download::DEFAULT_SERVER_URL;
use semver_match::runner::{FailurePolicy, run};
use semver_match::version::registries::GitHubTagRegistry;

fn got_source() -> MockTagSource {
    MockTagSource::new()
        .with_tags("gotray/got", vec!["v0.2.0", "v0.1.1", "v0.1.0"])
        .with_tags("cli/cli", vec!["v2.40.1", "v2.40.0", "v2.39.2"])
}

#[tokio::test]
async fn run_writes_outputs_and_environment_files() {
    let requests = parse_repositories(
        r#"
- repo: gotray/got
  version: ">= v0.1.0"
  var_name: GOT_VERSION
- repo: cli/cli
  version: v2.39
  downloadFile: "gh_${version}_linux_amd64.tar.gz"
  env:
    version: GH_VERSION
    downloadURL: GH_URL
"#,
    )
    .unwrap();
    let files = StepFiles::new();
    let mut publisher = files.publisher(DEFAULT_SERVER_URL);

    let summary = run(
        &got_source(),
        &requests,
        &mut publisher,
        FailurePolicy::default(),
    )
    .await
    .unwrap();
    drop(publisher);

    assert_eq!(summary.resolved["gotray/got"], "v0.2.0");
    assert_eq!(summary.resolved["cli/cli"], "v2.39.2");
    assert_eq!(
        files.outputs(),
        "gotray_got_version=v0.2.0\n\
         gotray_got_download_url=https://github.com/gotray/got/releases/download/v0.2.0/got-v0.2.0.tar.gz\n\
         cli_cli_version=v2.39.2\n\
         cli_cli_download_url=https://github.com/cli/cli/releases/download/v2.39.2/gh_v2.39.2_linux_amd64.tar.gz\n\
         matched_versions={\"gotray/got\":\"v0.2.0\",\"cli/cli\":\"v2.39.2\"}\n"
    );
    assert_eq!(
        files.env(),
        "GOT_VERSION=v0.2.0\n\
         GH_VERSION=v2.39.2\n\
         GH_URL=https://github.com/cli/cli/releases/download/v2.39.2/gh_v2.39.2_linux_amd64.tar.gz\n"
    );
}

#[tokio::test]
async fn run_accepts_json_lines_input() {
    let requests = parse_repositories(
        "{\"repo\": \"gotray/got\", \"version\": \"v0.1\"}\n\
         {\"repo\": \"cli/cli\", \"version\": \"latest\", \"varName\": \"GH\"}\n",
    )
    .unwrap();
    let files = StepFiles::new();
    let mut publisher = files.publisher("https://github.example.com/");

    run(
        &got_source(),
        &requests,
        &mut publisher,
        FailurePolicy::default(),
    )
    .await
    .unwrap();
    drop(publisher);

    let outputs = files.outputs();
    assert!(outputs.contains("gotray_got_version=v0.1.1\n"));
    assert!(outputs.contains(
        "cli_cli_download_url=https://github.example.com/cli/cli/releases/download/v2.40.1/cli-v2.40.1.tar.gz\n"
    ));
    assert_eq!(files.env(), "GH=v2.40.1\n");
}

#[tokio::test]
async fn run_reports_every_failing_repository() {
    let source = got_source().with_failure("broken/api", "API Error");
    let requests = parse_repositories(
        r#"
- repo: broken/api
  version: latest
- repo: gotray/got
  version: v999.0.0
- repo: cli/cli
  version: "~2.40.0"
"#,
    )
    .unwrap();
    let files = StepFiles::new();
    let mut publisher = files.publisher(DEFAULT_SERVER_URL);

    let error = run(&source, &requests, &mut publisher, FailurePolicy::default())
        .await
        .unwrap_err();
    drop(publisher);

    let RunError::Failed(failures) = &error else {
        panic!("unexpected error: {error}");
    };
    let repos: Vec<&str> = failures.iter().map(|f| f.repo()).collect();
    assert_eq!(repos, vec!["broken/api", "gotray/got"]);
    assert_eq!(
        error.to_string(),
        "Failed to fetch tags from broken/api: Invalid response: API Error; \
         No matching version found for gotray/got with constraint v999.0.0"
    );

    let outputs = files.outputs();
    assert!(!outputs.contains("gotray_got_version"));
    assert!(outputs.contains("cli_cli_version=v2.40.1\n"));
    assert!(outputs.ends_with("matched_versions={\"cli/cli\":\"v2.40.1\"}\n"));
}

#[tokio::test]
async fn fail_fast_writes_nothing_after_the_first_failure() {
    let requests = parse_repositories(
        r#"
- repo: unknown/repo
  version: latest
- repo: gotray/got
  version: latest
"#,
    )
    .unwrap();
    let files = StepFiles::new();
    let mut publisher = files.publisher(DEFAULT_SERVER_URL);

    let error = run(
        &got_source(),
        &requests,
        &mut publisher,
        FailurePolicy::FailFast,
    )
    .await
    .unwrap_err();
    drop(publisher);

    assert_eq!(
        error.to_string(),
        "Failed to fetch tags from unknown/repo: Repository not found: unknown/repo"
    );
    assert_eq!(files.outputs(), "");
    assert_eq!(files.env(), "");
}

#[tokio::test]
async fn run_against_github_api() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/gotray/got/tags")
        .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name": "v0.2.0"}, {"name": "v0.1.1"}, {"name": "v0.1.0"}]"#)
        .create_async()
        .await;

    let registry = GitHubTagRegistry::new(&server.url(), Some("test-token".to_string())).unwrap();
    let requests = parse_repositories("- repo: gotray/got\n  version: v0.1\n").unwrap();
    let files = StepFiles::new();
    let mut publisher = files.publisher(DEFAULT_SERVER_URL);

    let summary = run(
        &registry,
        &requests,
        &mut publisher,
        FailurePolicy::default(),
    )
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(summary.resolved["gotray/got"], "v0.1.1");
}
