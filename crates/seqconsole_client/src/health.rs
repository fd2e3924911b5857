use console_logging::console_debug;

use crate::http::ApiClient;
use crate::types::{ApiError, HealthDto};

#[derive(Debug, Clone)]
pub struct HealthService {
    client: ApiClient,
}

impl HealthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn probe(&self) -> Result<HealthDto, ApiError> {
        self.client.get_json("api/health", &[]).await
    }

    /// Collapse the probe into a boolean; any transport error means down.
    pub async fn is_healthy(&self) -> bool {
        match self.probe().await {
            Ok(health) => health.status == "ok",
            Err(err) => {
                console_debug!("Health probe failed: {err}");
                false
            }
        }
    }
}
