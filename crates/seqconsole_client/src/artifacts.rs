use std::path::{Path, PathBuf};

use crate::http::ApiClient;
use crate::persist::AtomicFileWriter;
use crate::types::{ApiError, ApiFailure, ArtifactDto};

#[derive(Debug, Clone)]
pub struct ArtifactService {
    client: ApiClient,
}

impl ArtifactService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<ArtifactDto>, ApiError> {
        self.client.get_json("api/artifacts", &[]).await
    }

    pub async fn get(&self, id: &str) -> Result<ArtifactDto, ApiError> {
        self.client
            .get_json(&format!("api/artifacts/{id}"), &[])
            .await
    }

    /// Upload a local sequence file. The backend answers with the tracked
    /// artifact record.
    pub async fn upload(&self, path: &Path) -> Result<ArtifactDto, ApiError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ApiError::new(ApiFailure::Io, "path has no usable file name"))?
            .to_string();
        let content = tokio::fs::read(path)
            .await
            .map_err(|err| ApiError::new(ApiFailure::Io, err.to_string()))?;
        self.client
            .post_multipart("api/artifacts", &file_name, content)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("api/artifacts/{id}")).await
    }

    /// Download an artifact's content into `dir`, named after the artifact.
    /// The write is atomic; the final path is returned.
    pub async fn download(&self, id: &str, dir: &Path) -> Result<PathBuf, ApiError> {
        let artifact = self.get(id).await?;
        let content = self
            .client
            .get_bytes(&format!("api/artifacts/{id}/content"))
            .await?;

        let writer = AtomicFileWriter::new(dir.to_path_buf());
        writer
            .write(&artifact.name, &content)
            .map_err(|err| ApiError::new(ApiFailure::Io, err.to_string()))
    }
}
