use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interviewing,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Unknown values yield `None`; list filters ignore them.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RejectionReason {
    NotQualified,
    PositionFilled,
    SalaryMismatch,
    CultureFit,
    ExperienceLevel,
    Other,
}

impl RejectionReason {
    pub const ALL: [RejectionReason; 6] = [
        RejectionReason::NotQualified,
        RejectionReason::PositionFilled,
        RejectionReason::SalaryMismatch,
        RejectionReason::CultureFit,
        RejectionReason::ExperienceLevel,
        RejectionReason::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RejectionReason::NotQualified => "not_qualified",
            RejectionReason::PositionFilled => "position_filled",
            RejectionReason::SalaryMismatch => "salary_mismatch",
            RejectionReason::CultureFit => "culture_fit",
            RejectionReason::ExperienceLevel => "experience_level",
            RejectionReason::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub status: ApplicationStatus,
    pub rejection_reason: Option<RejectionReason>,
    pub feedback_text: String,
    pub cover_letter: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A candidate's application with the job it targets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationWithJob {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
    pub company_name: String,
}

/// An application as seen by the recruiter who owns the job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Applicant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub applicant_email: String,
    pub applicant_first_name: String,
    pub applicant_last_name: String,
    pub applicant_profile_slug: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_round_trips_known_values() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("withdrawn"), None);
        for reason in RejectionReason::ALL {
            assert_eq!(RejectionReason::parse(reason.as_str()), Some(reason));
        }
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Applied);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&RejectionReason::PositionFilled).unwrap();
        assert_eq!(json, "\"position_filled\"");
    }
}
