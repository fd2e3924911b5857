use async_trait::async_trait;

use crate::http::ApiClient;
use crate::pager::{Page, PageFetcher};
use crate::types::{ApiError, JobDto, JobPageDto, JobState};

/// Rows requested per page of the jobs feed.
pub const JOBS_PAGE_SIZE: u32 = 25;

/// Server-side filter parameters for the jobs listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobQuery {
    pub file_id: Option<String>,
    pub tool: Option<String>,
    pub status: Option<JobState>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl JobQuery {
    fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", page.to_string()),
            ("pageSize", JOBS_PAGE_SIZE.to_string()),
        ];
        if let Some(file_id) = &self.file_id {
            params.push(("fileId", file_id.clone()));
        }
        if let Some(tool) = &self.tool {
            params.push(("tool", tool.clone()));
        }
        if let Some(status) = self.status {
            let label = match status {
                JobState::Pending => "PENDING",
                JobState::Running => "RUNNING",
                JobState::Success => "SUCCESS",
                JobState::Error => "ERROR",
            };
            params.push(("status", label.to_string()));
        }
        if let Some(date_from) = &self.date_from {
            params.push(("dateFrom", date_from.clone()));
        }
        if let Some(date_to) = &self.date_to {
            params.push(("dateTo", date_to.clone()));
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct JobService {
    client: ApiClient,
}

impl JobService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn page(&self, page: u32, query: &JobQuery) -> Result<JobPageDto, ApiError> {
        self.client.get_json("api/jobs", &query.params(page)).await
    }

    pub async fn get(&self, id: &str) -> Result<JobDto, ApiError> {
        self.client.get_json(&format!("api/jobs/{id}"), &[]).await
    }

    pub async fn cancel(&self, id: &str) -> Result<(), ApiError> {
        self.client.post_empty(&format!("api/jobs/{id}/cancel")).await
    }
}

/// [`PageFetcher`] over the jobs listing, carrying the active filter.
#[derive(Debug, Clone)]
pub struct JobPageFetcher {
    service: JobService,
    query: JobQuery,
}

impl JobPageFetcher {
    pub fn new(service: JobService, query: JobQuery) -> Self {
        Self { service, query }
    }

    pub fn set_query(&mut self, query: JobQuery) {
        self.query = query;
    }
}

#[async_trait]
impl PageFetcher for JobPageFetcher {
    type Item = JobDto;

    async fn fetch_page(&self, page: u32) -> Result<Page<JobDto>, ApiError> {
        let dto = self.service.page(page, &self.query).await?;
        Ok(Page {
            items: dto.items,
            total: Some(dto.total),
        })
    }

    fn key(item: &JobDto) -> String {
        item.id.clone()
    }

    fn page_size(&self) -> u32 {
        JOBS_PAGE_SIZE
    }
}
