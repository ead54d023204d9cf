//! Job Model

use serde::{Deserialize, Serialize};

/// Lifecycle status of a job posting.
///
/// Archiving never renumbers the list: archived jobs keep their `order`
/// slot and stay interleaved with active ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Archived,
}

/// Job entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Zero-based position in the job list. Dense and unique at rest.
    pub order: i32,
    /// Unix millis
    pub created_at: i64,
}

impl Job {
    pub fn is_archived(&self) -> bool {
        self.status == JobStatus::Archived
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &JobUpdate) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(slug) = &patch.slug {
            self.slug = slug.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Create job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreate {
    pub title: String,
    /// Derived from the title when absent
    pub slug: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update job payload
///
/// On the API, an `order` target moves the job with the same shift as a
/// drag-and-drop reorder. Store-level bulk updates may set it directly as
/// long as the orders stay dense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<JobStatus>,
    pub tags: Option<Vec<String>>,
    pub order: Option<i32>,
}

impl JobUpdate {
    /// Patch that only moves a job to a new slot
    pub fn order(order: i32) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }
}

/// One entry of a transactional bulk update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub id: String,
    pub patch: JobUpdate,
}

impl JobPatch {
    pub fn new(id: impl Into<String>, patch: JobUpdate) -> Self {
        Self {
            id: id.into(),
            patch,
        }
    }
}

/// Field a bulk scan is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSortField {
    #[default]
    Order,
    CreatedAt,
    Title,
}

impl JobSortField {
    /// Sort jobs in place; ties fall back to `order`, then id.
    pub fn sort(&self, jobs: &mut [Job]) {
        match self {
            Self::Order => jobs.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id))),
            Self::CreatedAt => jobs.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.order.cmp(&b.order))
                    .then_with(|| a.id.cmp(&b.id))
            }),
            Self::Title => jobs.sort_by(|a, b| {
                a.title
                    .cmp(&b.title)
                    .then_with(|| a.order.cmp(&b.order))
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }
    }
}
