use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub bio: String,
    pub city: String,
    pub contact_info: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub skills: String,
    pub is_portfolio_public: bool,
    pub is_published: bool,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfessionalExperience {
    pub id: i64,
    pub profile_id: i64,
    pub company: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EducationStatus {
    #[default]
    InProgress,
    Completed,
    Dropped,
    OnHold,
}

impl EducationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(EducationStatus::InProgress),
            "completed" => Some(EducationStatus::Completed),
            "dropped" => Some(EducationStatus::Dropped),
            "on_hold" => Some(EducationStatus::OnHold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: i64,
    pub profile_id: i64,
    pub institution: String,
    pub course: String,
    pub status: EducationStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    OpenSource,
    Community,
    Event,
    Lecture,
}

impl ProjectType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open_source" => Some(ProjectType::OpenSource),
            "community" => Some(ProjectType::Community),
            "event" => Some(ProjectType::Event),
            "lecture" => Some(ProjectType::Lecture),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TechProject {
    pub id: i64,
    pub profile_id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub project_type: ProjectType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
