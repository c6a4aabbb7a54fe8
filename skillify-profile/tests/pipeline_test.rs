//! Profile update against a mocked GitHub API

use chrono::{Duration, Utc};
use skillify_core::{EmptyResultPolicy, SkillifyConfig, SkillifyError};
use skillify_profile::{update_profile, DocumentRegion, SectionMarkers};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo_json(
    server: &MockServer,
    name: &str,
    description: Option<&str>,
    days_ago: i64,
) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": description,
        "languages_url": format!("{}/repos/octocat/{}/languages", server.uri(), name),
        "updated_at": (Utc::now() - Duration::days(days_ago)).to_rfc3339(),
    })
}

async fn mount_languages(server: &MockServer, name: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octocat/{}/languages", name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer, dir: &TempDir) -> SkillifyConfig {
    let mut config = SkillifyConfig::default();
    config.github.account = "octocat".to_string();
    config.github.base_url = server.uri();
    config.profile.readme_path = dir.path().join("README.md");
    config
}

#[tokio::test]
async fn test_update_profile_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            repo_json(&server, "dashboard", Some("My reactive dashboard"), 2),
            repo_json(&server, "scripts", None, 1),
            repo_json(&server, "thesis", Some("Old django project"), 400),
            repo_json(&server, "broken", None, 1),
        ])))
        .mount(&server)
        .await;

    mount_languages(&server, "dashboard", serde_json::json!({"JavaScript": 100})).await;
    mount_languages(
        &server,
        "scripts",
        serde_json::json!({"Python": 50, "JavaScript": 20}),
    )
    .await;
    mount_languages(&server, "thesis", serde_json::json!({"Java": 7000})).await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/broken/languages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let readme = dir.path().join("README.md");
    std::fs::write(&readme, "# Octocat\n\nWelcome to my profile.\n").unwrap();

    let config = config_for(&server, &dir);
    let report = update_profile(&config, false).await.unwrap();

    assert_eq!(report.repositories, 4);
    assert_eq!(report.recent_repositories, 3);
    assert_eq!(
        report.top_languages,
        vec![("JavaScript".to_string(), 120), ("Python".to_string(), 50)]
    );
    assert_eq!(report.frameworks, vec!["django", "react"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "broken");
    assert!(report.written);

    let written = std::fs::read_to_string(&readme).unwrap();
    assert!(written.starts_with("# Octocat\n\nWelcome to my profile.\n\n"));
    assert!(written.ends_with("<!-- SKILLS-SECTION-END -->\n"));

    let region = DocumentRegion::parse(&written, &SectionMarkers::default());
    let block = region.marked_block().unwrap();
    let (top, all) = block.split_once("## 🧰 All Technologies").unwrap();
    assert!(top.contains("alt=\"JavaScript\""));
    assert!(top.contains("alt=\"react\""));
    assert!(!top.contains("alt=\"Java\""));
    assert!(all.contains("alt=\"Java\""));
    assert!(all.contains("alt=\"django\""));

    // a second run with the same data is a no-op
    let again = update_profile(&config, false).await.unwrap();
    assert!(!again.changed);
    assert_eq!(std::fs::read_to_string(&readme).unwrap(), written);
}

#[tokio::test]
async fn test_transport_failure_leaves_document_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Bad credentials"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let readme = dir.path().join("README.md");
    std::fs::write(&readme, "original\n").unwrap();

    let err = update_profile(&config_for(&server, &dir), false)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Bad credentials"));
    assert_eq!(std::fs::read_to_string(&readme).unwrap(), "original\n");
}

#[tokio::test]
async fn test_empty_account_policy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = config_for(&server, &dir);

    let err = update_profile(&config, false).await.unwrap_err();
    assert!(matches!(err, SkillifyError::EmptyResult { .. }));
    assert!(!config.profile.readme_path.exists());

    config.ranking.empty_result_policy = EmptyResultPolicy::RenderEmpty;
    let report = update_profile(&config, false).await.unwrap();
    assert!(report.created_document);
    assert_eq!(
        report.document.matches("<p align=\"left\">\n</p>").count(),
        2
    );
    assert_eq!(
        std::fs::read_to_string(&config.profile.readme_path).unwrap(),
        report.document
    );
}
