use pretty_assertions::assert_eq;
use seqconsole_client::{
    AnalysisService, ApiClient, ApiFailure, ApiSettings, ArtifactService, HealthService,
    JobQuery, JobService, JobState,
};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    ApiClient::new(settings).expect("api client")
}

#[tokio::test]
async fn jobs_page_sends_filter_params_and_decodes_the_page() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "items": [{
            "id": "j1",
            "fileId": "a1",
            "fileName": "reads.fasta",
            "tool": "mafft",
            "status": "RUNNING",
            "createdAt": "2026-08-01T10:00:00Z",
            "updatedAt": "2026-08-01T10:05:00Z"
        }],
        "page": 2,
        "pageSize": 25,
        "total": 57
    });
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "25"))
        .and(query_param("tool", "mafft"))
        .and(query_param("status", "RUNNING"))
        .and(query_param("dateFrom", "2026-08-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let service = JobService::new(client_for(&server));
    let query = JobQuery {
        tool: Some("mafft".to_string()),
        status: Some(JobState::Running),
        date_from: Some("2026-08-01".to_string()),
        ..JobQuery::default()
    };
    let page = service.page(2, &query).await.expect("page");

    assert_eq!(page.total, 57);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "j1");
    assert_eq!(page.items[0].status, JobState::Running);
    assert_eq!(
        page.items[0].updated_at.as_deref(),
        Some("2026-08-01T10:05:00Z")
    );
}

#[tokio::test]
async fn submit_posts_the_analysis_request_and_returns_the_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyses"))
        .and(body_json(serde_json::json!({
            "fileId": "a1",
            "tool": "minimap2"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "j7",
            "fileId": "a1",
            "fileName": "reads.fasta",
            "tool": "minimap2",
            "status": "PENDING",
            "createdAt": "2026-08-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let service = AnalysisService::new(client_for(&server));
    let job = service.submit("a1", "minimap2").await.expect("job");
    assert_eq!(job.id, "j7");
    assert_eq!(job.status, JobState::Pending);
    assert_eq!(job.updated_at, None);
}

#[tokio::test]
async fn upload_posts_multipart_and_decodes_the_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/artifacts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "a9",
            "name": "genome.fasta",
            "size": 12,
            "kind": "INPUT",
            "uploadedAt": "2026-08-01T09:00:00Z"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("genome.fasta");
    std::fs::write(&file_path, b">seq1\nACGTACGT").expect("write fixture");

    let service = ArtifactService::new(client_for(&server));
    let artifact = service.upload(&file_path).await.expect("artifact");
    assert_eq!(artifact.id, "a9");
    assert_eq!(artifact.name, "genome.fasta");
}

#[tokio::test]
async fn cancel_and_delete_hit_their_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs/j1/cancel"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/artifacts/a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    JobService::new(client.clone())
        .cancel("j1")
        .await
        .expect("cancel");
    ArtifactService::new(client)
        .delete("a1")
        .await
        .expect("delete");
}

#[tokio::test]
async fn download_writes_the_artifact_content_to_disk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/artifacts/a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "a2",
            "name": "alignment.bam",
            "size": 4,
            "kind": "OUTPUT",
            "uploadedAt": "2026-08-01T09:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/artifacts/a2/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"BAM\x01".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let service = ArtifactService::new(client_for(&server));
    let saved = service.download("a2", dir.path()).await.expect("download");

    assert_eq!(saved, dir.path().join("alignment.bam"));
    assert_eq!(std::fs::read(&saved).expect("read back"), b"BAM\x01");
}

#[tokio::test]
async fn backend_error_bodies_become_the_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyses"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(serde_json::json!({"message": "unknown tool"})),
        )
        .mount(&server)
        .await;

    let service = AnalysisService::new(client_for(&server));
    let err = service.submit("a1", "nosuch").await.unwrap_err();
    assert_eq!(err.kind, ApiFailure::HttpStatus(422));
    assert_eq!(err.message, "unknown tool");
}

#[tokio::test]
async fn plain_error_bodies_fall_back_to_the_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/artifacts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = ArtifactService::new(client_for(&server));
    let err = service.list().await.unwrap_err();
    assert_eq!(err.kind, ApiFailure::HttpStatus(503));
}

#[tokio::test]
async fn health_probe_collapses_errors_to_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .mount(&server)
        .await;

    let service = HealthService::new(client_for(&server));
    assert!(service.is_healthy().await);

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    assert!(!service.is_healthy().await);
}
