use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job posting joined with its company. `tags` is filled in by the
/// repository after the row is fetched.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub company_owner_id: i64,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub tags: Vec<String>,
}

impl Job {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.company_owner_id == user_id
    }
}

/// A job with how many candidates applied to it.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    #[serde(flatten)]
    pub job: Job,
    pub applications_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagCount {
    pub name: String,
    pub job_count: i64,
}
