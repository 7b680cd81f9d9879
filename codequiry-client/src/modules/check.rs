use std::sync::Arc;

use serde::Serialize;

use crate::connection::{Connection, Body, convert_api_output_obj};
use crate::models::check::{Check as CheckModel, CheckStatusInfo};
use crate::models::results::SubmissionResults;
use crate::models::submission::Overview;
use crate::types::Result;

use super::{api_path, CheckParams};

const CHECK_PATH: &str = "check";
const CHECK_LIST_PATH: &str = "checks";

#[derive(Serialize)]
struct CreateParams<'a> {
    name: &'a str,
    language: &'a str,
}

#[derive(Serialize)]
struct ResultParams {
    check_id: String,
    submission_id: String,
}

/// Check API endpoints
pub struct Check {
    connection: Arc<Connection>,
}

impl Check {
    pub (crate) fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    /// List every check on the account
    pub async fn list(&self) -> Result<Vec<CheckModel>> {
        let path = api_path!(CHECK_LIST_PATH);
        self.connection.post(&path, Body::<()>::None, convert_api_output_obj).await
    }

    /// Create a new check.
    ///
    /// Required:
    /// name:     Name of the check (string)
    /// language: Language of the submissions, as named by the service (string)
    pub async fn create(&self, name: &str, language: &str) -> Result<Vec<CheckModel>> {
        let path = api_path!(CHECK_PATH, "create");
        let body = CreateParams { name, language };
        self.connection.post(&path, Body::Json(body), convert_api_output_obj).await
    }

    /// Start running a check once its files are uploaded
    pub async fn start(&self, check_id: u64) -> Result<CheckStatusInfo> {
        let path = api_path!(CHECK_PATH, "start");
        self.connection.post(&path, Body::Json(CheckParams::new(check_id)), convert_api_output_obj).await
    }

    /// Get the details of a check
    pub async fn get(&self, check_id: u64) -> Result<CheckModel> {
        let path = api_path!(CHECK_PATH, "get");
        self.connection.post(&path, Body::Json(CheckParams::new(check_id)), convert_api_output_obj).await
    }

    /// Get the submissions and chart data of a check
    pub async fn overview(&self, check_id: u64) -> Result<Overview> {
        let path = api_path!(CHECK_PATH, "overview");
        self.connection.post(&path, Body::Json(CheckParams::new(check_id)), convert_api_output_obj).await
    }

    /// Get the detailed report for one submission of a check
    pub async fn results(&self, check_id: u64, submission_id: u64) -> Result<SubmissionResults> {
        let path = api_path!(CHECK_PATH, "results");
        let body = ResultParams {
            check_id: check_id.to_string(),
            submission_id: submission_id.to_string(),
        };
        self.connection.post(&path, Body::Json(body), convert_api_output_obj).await
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::tests::{prepare_client, TEST_KEY};
    use crate::Error;

    #[tokio::test]
    async fn create_check() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/check/create"))
            .and(header("apikey", TEST_KEY))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "midterm1", "language": "python"})))
            .respond_with(ResponseTemplate::new(200)
                .set_body_string(r#"[{"id":7,"name":"midterm1","status_id":0,"job_id":99}]"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = prepare_client(&server);
        let checks = client.check.create("midterm1", "python").await.unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].id, 7);
        assert_eq!(checks[0].job_id, 99);
    }

    #[tokio::test]
    async fn list_checks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/checks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "a", "created_at": "2019-01-01 09:00:00", "updated_at": "2019-01-02 09:00:00", "status_id": 4, "job_id": 10},
                {"id": 2, "name": "b", "created_at": "2019-02-01 09:00:00", "updated_at": "2019-02-02 09:00:00", "status_id": 1, "job_id": 11}
            ])))
            .mount(&server)
            .await;

        let client = prepare_client(&server);
        let checks = client.check.list().await.unwrap();
        assert_eq!(checks.iter().map(|check| check.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(checks[1].created_at.unwrap().to_string(), "2019-02-01 09:00:00");
    }

    #[tokio::test]
    async fn start_check() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/check/start"))
            .and(body_json(json!({"check_id": "7"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "check": {"id": 7, "name": "midterm1", "status_id": 2, "job_id": 99},
                "status": "Running",
                "dbcheck": false,
                "webcheck": true,
                "submission_count": 2,
                "dashURL": "https://dashboard.codequiry.com/check/7"
            })))
            .mount(&server)
            .await;

        let client = prepare_client(&server);
        let info = client.check.start(7).await.unwrap();
        assert_eq!(info.check.job_id, 99);
        assert!(info.webcheck);
        assert_eq!(info.submission_count, 2);
    }

    #[tokio::test]
    async fn error_wins_over_expected_shape() {
        let server = MockServer::start().await;
        for endpoint in ["get", "overview", "start"] {
            Mock::given(method("POST"))
                .and(path(format!("/api/v1/check/{endpoint}")))
                .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error" : "Check not found"}"#))
                .mount(&server)
                .await;
        }

        let client = prepare_client(&server);
        assert!(matches!(client.check.get(404).await, Err(Error::Server(ref error)) if error.message == "Check not found"));
        assert!(matches!(client.check.overview(404).await, Err(Error::Server(ref error)) if error.message == "Check not found"));
        assert!(matches!(client.check.start(404).await, Err(Error::Server(ref error)) if error.message == "Check not found"));
    }

    #[tokio::test]
    async fn get_overview_and_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/check/overview"))
            .and(body_json(json!({"check_id": "7"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "overviewURL": "https://dashboard.codequiry.com/check/7/overview",
                "submissions": [{"id": 501, "filename": "alice.py", "total_result": 62.0}],
                "bardata": {"labels": ["0-10"], "values": [1]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/check/results"))
            .and(body_json(json!({"check_id": "7", "submission_id": "501"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "submission": {"id": 501, "filename": "alice.py"},
                "avg": 31.0,
                "max": "62.00",
                "min": "0.00",
                "peer_matches": [{"id": 1, "submission_id": 501, "submission_id_matched": 502, "line_start": 3, "line_end": 9, "match_type": 1}],
                "other_matches": [],
                "related_submissions": [],
                "related_files": []
            })))
            .mount(&server)
            .await;

        let client = prepare_client(&server);
        let overview = client.check.overview(7).await.unwrap();
        assert_eq!(overview.submissions[0].total_result, 62.0);
        assert_eq!(overview.bardata["values"][0], 1);

        let results = client.check.results(7, 501).await.unwrap();
        assert_eq!(results.peer_matches[0].line_end, 9);
        assert_eq!(results.matches_with(502).count(), 1);
    }

    #[tokio::test]
    async fn wrong_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/check/get"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1, 2, 3]"))
            .mount(&server)
            .await;

        let client = prepare_client(&server);
        assert!(matches!(client.check.get(7).await, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_service() {
        let client = crate::tests::unreachable_client().await;
        assert!(matches!(client.check.list().await, Err(Error::Transport(_))));
        assert!(matches!(client.check.get(1).await, Err(Error::Transport(_))));
    }
}
