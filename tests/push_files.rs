use mcp_github_ops::client::{ClientConfig, GitHubClient};
use mcp_github_ops::error::{ApiErrorKind, McpGithubError, PushStep};
use mcp_github_ops::ops::files::{push_files, PushFileEntry, PushFilesParams};
use serde_json::{json, Value};
use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REF_PATH: &str = "/repos/octocat/hello-world/git/refs/heads/main";

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(ClientConfig::new("test-token").with_base_url(server.uri())).unwrap()
}

fn params() -> PushFilesParams {
    PushFilesParams {
        owner: "octocat".to_string(),
        repo: "hello-world".to_string(),
        branch: "main".to_string(),
        message: "Update docs".to_string(),
        files: vec![
            PushFileEntry {
                path: "docs/guide.md".to_string(),
                content: "# Guide".to_string(),
                delete: false,
            },
            PushFileEntry {
                path: "docs/old.md".to_string(),
                content: String::new(),
                delete: true,
            },
        ],
        base_sha: None,
    }
}

async fn mount_ref_lookup(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path(REF_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/main",
            "object": {"sha": "base123", "type": "commit"}
        })))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_base_commit(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/git/commits/base123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "base123",
            "message": "Previous commit",
            "tree": {"sha": "tree0"}
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_commit_and_ref_update(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/repos/octocat/hello-world/git/commits"))
        .and(body_partial_json(json!({
            "message": "Update docs",
            "tree": "tree1",
            "parents": ["base123"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sha": "commit1",
            "message": "Update docs",
            "tree": {"sha": "tree1"},
            "parents": [{"sha": "base123"}]
        })))
        .expect(expected)
        .mount(server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(REF_PATH))
        .and(body_partial_json(json!({"sha": "commit1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/main",
            "object": {"sha": "commit1", "type": "commit"}
        })))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_push_files_runs_all_steps() {
    let server = MockServer::start().await;
    mount_ref_lookup(&server, 1).await;
    mount_base_commit(&server).await;
    Mock::given(method("POST"))
        .and(path("/repos/octocat/hello-world/git/trees"))
        .and(body_partial_json(json!({"base_tree": "tree0"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "tree1"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_commit_and_ref_update(&server, 1).await;

    let commit = push_files(&client(&server), &params()).await.unwrap();
    assert_eq!(commit.sha, "commit1");
    assert_eq!(commit.tree.sha, "tree1");
    assert_eq!(commit.parents[0].sha, "base123");
}

#[tokio::test]
async fn test_push_files_tree_entries() {
    let server = MockServer::start().await;
    mount_ref_lookup(&server, 1).await;
    mount_base_commit(&server).await;
    Mock::given(method("POST"))
        .and(path("/repos/octocat/hello-world/git/trees"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "tree1"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_commit_and_ref_update(&server, 1).await;

    push_files(&client(&server), &params()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let tree_request = requests
        .iter()
        .find(|r| r.url.path().ends_with("/git/trees"))
        .unwrap();
    let body: Value = serde_json::from_slice(&tree_request.body).unwrap();
    let entries = body["tree"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["path"], "docs/guide.md");
    assert_eq!(entries[0]["mode"], "100644");
    assert_eq!(entries[0]["type"], "blob");
    assert_eq!(entries[0]["content"], "# Guide");

    assert_eq!(entries[1]["path"], "docs/old.md");
    assert!(entries[1]["sha"].is_null());
    assert!(entries[1].get("content").is_none());
}

#[tokio::test]
async fn test_push_files_stops_at_failed_tree() {
    let server = MockServer::start().await;
    mount_ref_lookup(&server, 1).await;
    mount_base_commit(&server).await;
    Mock::given(method("POST"))
        .and(path("/repos/octocat/hello-world/git/trees"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Invalid tree info"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_commit_and_ref_update(&server, 0).await;

    let err = push_files(&client(&server), &params()).await.unwrap_err();
    assert!(matches!(
        err,
        McpGithubError::PushStep {
            step: PushStep::CreateTree,
            ..
        }
    ));
    assert_eq!(err.api_error().unwrap().kind, ApiErrorKind::Validation);
    assert!(err
        .to_string()
        .starts_with("error creating tree: Validation Error: Invalid tree info"));
}

#[tokio::test]
async fn test_push_files_missing_branch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REF_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = push_files(&client(&server), &params()).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "error getting branch reference: Not Found: Not Found"
    );
}

#[tokio::test]
async fn test_push_files_with_base_sha_skips_ref_lookup() {
    let server = MockServer::start().await;
    mount_ref_lookup(&server, 0).await;
    mount_base_commit(&server).await;
    Mock::given(method("POST"))
        .and(path("/repos/octocat/hello-world/git/trees"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "tree1"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_commit_and_ref_update(&server, 1).await;

    let params = PushFilesParams {
        base_sha: Some("base123".to_string()),
        ..params()
    };
    let commit = push_files(&client(&server), &params).await.unwrap();
    assert_eq!(commit.sha, "commit1");
}

#[tokio::test]
async fn test_push_files_without_files_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let params = PushFilesParams {
        files: vec![],
        ..params()
    };
    let err = push_files(&client(&server), &params).await.unwrap_err();
    assert!(matches!(err, McpGithubError::Validation(_)));
    assert_eq!(err.to_string(), "at least one file is required");
}
