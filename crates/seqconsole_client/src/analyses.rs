use serde::Serialize;

use crate::http::ApiClient;
use crate::types::{ApiError, JobDto, ToolDto};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    file_id: &'a str,
    tool: &'a str,
}

#[derive(Debug, Clone)]
pub struct AnalysisService {
    client: ApiClient,
}

impl AnalysisService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Alignment tools the backend currently offers.
    pub async fn tools(&self) -> Result<Vec<ToolDto>, ApiError> {
        self.client.get_json("api/tools", &[]).await
    }

    /// Submit an analysis of `file_id` with `tool`; the backend answers with
    /// the job it created.
    pub async fn submit(&self, file_id: &str, tool: &str) -> Result<JobDto, ApiError> {
        self.client
            .post_json("api/analyses", &AnalysisRequest { file_id, tool })
            .await
    }
}
