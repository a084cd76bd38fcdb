//! Unit tests for JiraClient and JiraIssueReader using wiremock

#[cfg(test)]
mod tests {
    use crate::client::JiraClient;
    use crate::error::JiraError;
    use crate::models::*;
    use crate::reader::{JiraIssueReader, ReaderOptions};
    use migrate_core::{IssueSource, MigrateError, RetryConfig, StatusCategory};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUTH: &str = "Basic dGVzdEB0ZXN0LmNvbTp0ZXN0LXRva2Vu";

    /// Helper to create a mock Jira issue response
    fn mock_jira_issue(key: &str, summary: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "10001",
            "key": key,
            "self": format!("https://test.atlassian.net/rest/api/3/issue/{}", key),
            "fields": {
                "summary": summary,
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": [
                        {
                            "type": "paragraph",
                            "content": [{"type": "text", "text": "Test description"}]
                        }
                    ]
                },
                "status": {
                    "id": "1",
                    "name": "Open",
                    "statusCategory": {"key": "new", "name": "To Do"}
                },
                "issuetype": {"id": "10001", "name": "Task", "subtask": false},
                "project": {"id": "10000", "key": "TEST", "name": "Test Project"},
                "assignee": null,
                "reporter": {
                    "accountId": "123456",
                    "displayName": "Test User",
                    "emailAddress": "test@example.com",
                    "active": true
                },
                "labels": ["bug", "urgent"],
                "created": "2024-01-15T10:30:00.000+0000",
                "updated": "2024-01-15T12:00:00.000+0000",
                "comment": {"comments": [], "startAt": 0, "maxResults": 0, "total": 0},
                "customfield_10020": [{"id": 4, "name": "Sprint 4", "state": "active"}]
            }
        })
    }

    fn client(server: &MockServer) -> JiraClient {
        JiraClient::new(&server.uri(), "test@test.com", "test-token")
    }

    fn reader(server: &MockServer, page_size: usize) -> JiraIssueReader {
        JiraIssueReader::new(
            client(server),
            ReaderOptions {
                page_size,
                retry: RetryConfig::immediate(2),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_myself() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/myself"))
            .and(header("Authorization", AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "accountId": "abc",
                "displayName": "Migrator",
                "active": true
            })))
            .mount(&mock_server)
            .await;

        let user = client(&mock_server).myself().unwrap();

        assert_eq!(user.identifier(), Some("abc"));
        assert_eq!(user.display_name.as_deref(), Some("Migrator"));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/myself"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).myself();

        assert!(matches!(result, Err(JiraError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_search_page_sends_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .and(header("Authorization", AUTH))
            .and(query_param("jql", "project = TEST"))
            .and(query_param("maxResults", "25"))
            .and(query_param("startAt", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "startAt": 50,
                "maxResults": 25,
                "total": 51,
                "issues": [mock_jira_issue("TEST-51", "Last issue")]
            })))
            .mount(&mock_server)
            .await;

        let fields = vec!["summary".to_string()];
        let page = client(&mock_server)
            .search_page("project = TEST", &fields, 25, &PageCursor::Offset(50))
            .unwrap();

        assert_eq!(page.total, Some(51));
        assert_eq!(page.issues.len(), 1);
    }

    #[tokio::test]
    async fn test_api_error_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "errorMessages": ["Error in the JQL Query"],
                "errors": {}
            })))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).search_page("bogus ==", &[], 10, &PageCursor::Start);

        match result {
            Err(JiraError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Error in the JQL Query");
            }
            other => panic!("expected API error, got {:?}", other.map(|p| p.issues.len())),
        }
    }

    #[tokio::test]
    async fn test_reader_follows_page_tokens() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .and(query_param("nextPageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "isLast": true,
                "issues": [mock_jira_issue("TEST-3", "Third")]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .and(query_param("fields", "summary,description,status,issuetype,project,assignee,reporter,labels,created,updated,comment,customfield_10020"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nextPageToken": "page-2",
                "isLast": false,
                "issues": [
                    mock_jira_issue("TEST-1", "First"),
                    mock_jira_issue("TEST-2", "Second")
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reader = reader(&mock_server, 2);
        let issues: Vec<_> = reader
            .issues("project = TEST")
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["TEST-1", "TEST-2", "TEST-3"]);

        let first = &issues[0];
        assert_eq!(first.description.as_deref(), Some("Test description"));
        assert_eq!(first.status.category, StatusCategory::New);
        assert_eq!(first.reporter.as_ref().unwrap().id, "123456");
        assert_eq!(first.sprint.as_ref().unwrap().name, "Sprint 4");
    }

    #[tokio::test]
    async fn test_reader_offset_pagination_uses_total() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .and(query_param("startAt", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "startAt": 2,
                "maxResults": 2,
                "total": 3,
                "issues": [mock_jira_issue("TEST-3", "Third")]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "startAt": 0,
                "maxResults": 2,
                "total": 3,
                "issues": [
                    mock_jira_issue("TEST-1", "First"),
                    mock_jira_issue("TEST-2", "Second")
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reader = reader(&mock_server, 2);
        let count = reader.search("").filter(Result::is_ok).count();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_reader_skips_malformed_issue() {
        let mock_server = MockServer::start().await;

        let mut broken = mock_jira_issue("TEST-2", "Broken");
        broken["fields"]["status"] = serde_json::json!(42);

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "isLast": true,
                "issues": [
                    mock_jira_issue("TEST-1", "First"),
                    broken,
                    mock_jira_issue("TEST-3", "Third")
                ]
            })))
            .mount(&mock_server)
            .await;

        let reader = reader(&mock_server, 50);
        let results: Vec<_> = reader.search("project = TEST").collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().key, "TEST-1");
        match &results[1] {
            Err(err @ MigrateError::InvalidIssue { .. }) => {
                assert_eq!(err.issue_key(), Some("TEST-2"))
            }
            other => panic!("expected malformed issue, got {:?}", other),
        }
        assert_eq!(results[2].as_ref().unwrap().key, "TEST-3");
    }

    #[tokio::test]
    async fn test_reader_retries_rate_limited_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "isLast": true,
                "issues": [mock_jira_issue("TEST-1", "First")]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reader = reader(&mock_server, 50);
        let issues: Vec<_> = reader.search("project = TEST").collect();

        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_ok());
    }

    #[tokio::test]
    async fn test_reader_stops_after_failed_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reader = reader(&mock_server, 50);
        let results: Vec<_> = reader.search("project = TEST").collect();

        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], Err(e) if e.is_fatal()));
    }

    #[tokio::test]
    async fn test_reader_fetches_truncated_comments() {
        let mock_server = MockServer::start().await;

        let mut issue = mock_jira_issue("TEST-1", "Chatty");
        issue["fields"]["comment"] = serde_json::json!({
            "comments": [{"id": "1", "body": "first", "created": "2024-01-15T11:00:00.000+0000"}],
            "startAt": 0,
            "maxResults": 1,
            "total": 2
        });

        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "isLast": true,
                "issues": [issue]
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/TEST-1/comment"))
            .and(query_param("startAt", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "comments": [
                    {"id": "1", "body": "first", "author": {"accountId": "a1", "displayName": "Ann"}},
                    {"id": "2", "body": "second", "author": {"accountId": "b2", "displayName": "Ben"}}
                ],
                "startAt": 0,
                "maxResults": 100,
                "total": 2
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reader = reader(&mock_server, 50);
        let issue = reader.search("key = TEST-1").next().unwrap().unwrap();

        let bodies: Vec<&str> = issue.comments.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(issue.comments[1].author.as_ref().unwrap().name(), "Ben");
    }
}
