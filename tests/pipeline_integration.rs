//! End-to-end pipeline tests against a mock article API and mock source pages.

use std::time::Duration;

use citeset_core::{
    ApiResponseError, ArticleSummary, CitationPipeline, ContentFetcher, HttpClient, RobotsChecker,
    ScraperConfig, SkipReason, WikiClient, write_summaries,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/w/api.php";

fn pipeline(server: &MockServer) -> CitationPipeline<WikiClient, ContentFetcher> {
    let config = ScraperConfig {
        timeout: Duration::from_secs(5),
        api_url: format!("{}{API_PATH}", server.uri()),
        ..ScraperConfig::default()
    };
    let client = HttpClient::new(&config).expect("client should build");
    let robots = RobotsChecker::new(client.clone(), config.robots_agent.clone());
    CitationPipeline::new(
        WikiClient::with_base_url(client.clone(), config.api_url.clone()),
        ContentFetcher::new(client, robots),
    )
}

async fn mount_article(server: &MockServer, title: &str, markup: &str) {
    let body = json!({
        "batchcomplete": true,
        "query": {
            "pages": [{
                "pageid": 1,
                "title": title,
                "revisions": [{
                    "slots": { "main": { "contentmodel": "wikitext", "content": markup } }
                }]
            }]
        }
    });
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("action", "query"))
        .and(query_param("titles", title))
        .and(query_param("formatversion", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pipeline_summarizes_readable_citations_in_order() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let markup = format!(
        "Kid A was released in [[2000 in music|2000]].<ref>{{{{cite web|url={base}/kid-a|title=Kid A}}}}</ref>\n\
         Amnesiac followed in 2001.<ref>{{{{cite web|url={base}/private/amnesiac}}}}</ref>\n\
         Hail to the Thief was recorded in [[Los Angeles]].<ref>{{{{cite web|url={base}/missing}}}}</ref>\n\
         In Rainbows was self-released.<ref>{{{{cite web|url={base}/in-rainbows}}}}</ref>"
    );
    mount_article(&mock_server, "Radiohead", &markup).await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/\n"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/kid-a", "<p>A landmark album.</p>").await;
    mount_page(&mock_server, "/in-rainbows", "<p>Pay what you want.</p><p>Big news!</p>").await;
    Mock::given(method("GET"))
        .and(path("/private/amnesiac"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hidden</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = pipeline(&mock_server)
        .run("Radiohead")
        .await
        .expect("pipeline should succeed");

    assert_eq!(report.title, "Radiohead");
    assert_eq!(report.citations, 4);
    assert_eq!(
        report.summaries,
        vec![
            ArticleSummary {
                sentence: "kid a was released in 2000".to_string(),
                source: "a landmark album".to_string(),
            },
            ArticleSummary {
                sentence: "in rainbows was selfreleased".to_string(),
                source: "pay what you want big news".to_string(),
            },
        ]
    );
    assert_eq!(report.skipped_count(SkipReason::Disallowed), 1);
    assert_eq!(report.skipped_count(SkipReason::FetchFailed), 1);
    assert_eq!(
        report.skipped[0].citation.url,
        format!("{base}/private/amnesiac")
    );
}

#[tokio::test]
async fn test_pipeline_article_without_citations_is_empty() {
    let mock_server = MockServer::start().await;
    mount_article(&mock_server, "Stub", "A stub article with no references.").await;

    let report = pipeline(&mock_server).run("Stub").await.expect("should succeed");

    assert_eq!(report.citations, 0);
    assert!(report.summaries.is_empty());
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn test_pipeline_missing_query_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "batchcomplete": true })))
        .mount(&mock_server)
        .await;

    let result = pipeline(&mock_server).run("Radiohead").await;

    assert!(
        matches!(
            result,
            Err(ApiResponseError::MissingField { field: "query", .. })
        ),
        "expected missing query error, got {result:?}"
    );
}

#[tokio::test]
async fn test_pipeline_missing_page_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "pages": [{ "title": "Nope", "missing": true }] }
        })))
        .mount(&mock_server)
        .await;

    let result = pipeline(&mock_server).run("Nope").await;
    assert!(matches!(result, Err(ApiResponseError::PageMissing { .. })));
}

#[tokio::test]
async fn test_pipeline_non_json_response_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let result = pipeline(&mock_server).run("Radiohead").await;
    assert!(matches!(result, Err(ApiResponseError::InvalidJson { .. })));
}

#[tokio::test]
async fn test_pipeline_api_server_error_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = pipeline(&mock_server).run("Radiohead").await;
    assert!(matches!(
        result,
        Err(ApiResponseError::HttpStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_pipeline_output_written_as_json_array() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let markup = format!("OK Computer was acclaimed.<ref>{{{{cite web|url={base}/okc}}}}</ref>");
    mount_article(&mock_server, "OK Computer", &markup).await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/okc", "<p>Five stars.</p>").await;

    let report = pipeline(&mock_server).run("OK Computer").await.expect("should succeed");
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let written = write_summaries(temp_dir.path(), &report.title, &report.summaries)
        .await
        .expect("write should succeed");

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(written).expect("should read file"))
            .expect("valid json");
    assert_eq!(
        value,
        json!([{ "sentence": "ok computer was acclaimed", "source": "five stars" }])
    );
}
