#![allow(clippy::unwrap_used)]

use release_recap::github::{FetchError, GitHubClient, parse_repo_spec};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::with_api_url(server.uri(), "test-token").unwrap()
}

#[tokio::test]
async fn test_list_releases_success() {
    let mock_server = MockServer::start().await;

    let response_body = r###"[
        {
            "tag_name": "v1.2.3",
            "name": "Release 1.2.3",
            "body": "## Features\n- New feature A",
            "published_at": "2024-01-15T10:30:00Z",
            "prerelease": false,
            "draft": false
        },
        {
            "tag_name": "v1.2.2",
            "name": null,
            "body": null,
            "published_at": "2024-01-10T10:30:00Z",
            "prerelease": false,
            "draft": false
        }
    ]"###;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(response_body))
        .mount(&mock_server)
        .await;

    let releases = client(&mock_server)
        .list_releases("owner", "repo")
        .await
        .unwrap();

    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].tag_name, "v1.2.3");
    assert_eq!(releases[0].name.as_deref(), Some("Release 1.2.3"));
    assert_eq!(releases[1].tag_name, "v1.2.2");
    assert!(releases[1].body.is_none());
}

#[tokio::test]
async fn test_list_releases_follows_next_page_links() {
    let mock_server = MockServer::start().await;

    let page_one = r#"[{"tag_name": "v2.0.0", "name": null, "body": null, "published_at": null, "draft": false}]"#;
    let page_two = r#"[{"tag_name": "v1.0.0", "name": null, "body": null, "published_at": null, "draft": false}]"#;

    let next_url = format!("{}/repos/owner/repo/releases?page=2", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .and(query_param("per_page", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", format!("<{next_url}>; rel=\"next\"").as_str())
                .set_body_string(page_one),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_two))
        .mount(&mock_server)
        .await;

    let releases = client(&mock_server)
        .list_releases("owner", "repo")
        .await
        .unwrap();

    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].tag_name, "v2.0.0");
    assert_eq!(releases[1].tag_name, "v1.0.0");
}

#[tokio::test]
async fn test_list_releases_skips_drafts() {
    let mock_server = MockServer::start().await;

    let response_body = r#"[
        {"tag_name": "v1.1.0", "name": null, "body": null, "published_at": null, "draft": true},
        {"tag_name": "v1.0.0", "name": null, "body": null, "published_at": null, "draft": false}
    ]"#;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_string(response_body))
        .mount(&mock_server)
        .await;

    let releases = client(&mock_server)
        .list_releases("owner", "repo")
        .await
        .unwrap();

    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].tag_name, "v1.0.0");
}

#[tokio::test]
async fn test_list_releases_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/missing/repo/releases"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).list_releases("missing", "repo").await;

    match result.unwrap_err() {
        FetchError::NotFound(repo) => assert_eq!(repo, "missing/repo"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_releases_unauthorized() {
    for status in [401, 403] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/releases"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).list_releases("owner", "repo").await;

        match result.unwrap_err() {
            FetchError::Unauthorized(code) => assert_eq!(code, status),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_list_releases_other_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server on fire"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).list_releases("owner", "repo").await;

    match result.unwrap_err() {
        FetchError::Http { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("server on fire"));
        }
        other => panic!("expected Http, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_releases_unexpected_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message": "not a list"}"#))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).list_releases("owner", "repo").await;

    assert!(matches!(
        result.unwrap_err(),
        FetchError::UnexpectedPayload(_)
    ));
}

#[test]
fn test_parse_repo_spec_roundtrip() {
    let (owner, repo) = parse_repo_spec("rust-lang/rust").unwrap();
    assert_eq!(owner, "rust-lang");
    assert_eq!(repo, "rust");

    assert!(parse_repo_spec("rust-lang").is_none());
    assert!(parse_repo_spec("rust-lang/rust/extra").is_none());
}
