use serde::{Deserialize, Serialize};

use crate::forms::{clean_optional, clean_required, FieldErrors};
use crate::models::application::{ApplicationStatus, RejectionReason};
use crate::models::job::Job;

const TITLE_MAX: usize = 200;
const SALARY_MAX: usize = 100;
const TAG_MAX: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Job form
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub company: Option<i64>,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: String,
    pub is_active: bool,
    /// Comma-separated technologies, e.g. `"Python, Django"`.
    pub tags_input: String,
}

impl Default for JobForm {
    fn default() -> Self {
        JobForm {
            company: None,
            title: String::new(),
            description: String::new(),
            requirements: String::new(),
            salary_range: String::new(),
            is_active: true,
            tags_input: String::new(),
        }
    }
}

impl From<&Job> for JobForm {
    fn from(job: &Job) -> Self {
        JobForm {
            company: Some(job.company_id),
            title: job.title.clone(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            salary_range: job.salary_range.clone(),
            is_active: job.is_active,
            tags_input: job.tags.join(", "),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobInput {
    pub company_id: i64,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: String,
    pub is_active: bool,
    pub tags: Vec<String>,
}

impl JobForm {
    /// `company` must be one of `owned_company_ids`.
    pub fn clean(&self, errors: &mut FieldErrors, owned_company_ids: &[i64]) -> JobInput {
        let company_id = match self.company {
            None => {
                errors.add("company", "This field is required.");
                0
            }
            Some(id) if !owned_company_ids.contains(&id) => {
                errors.add(
                    "company",
                    "Select a valid choice. That choice is not one of the available choices.",
                );
                id
            }
            Some(id) => id,
        };

        let tags = parse_tags(&self.tags_input);
        for tag in &tags {
            let len = tag.chars().count();
            if len > TAG_MAX {
                errors.add(
                    "tags_input",
                    format!("Ensure each tag has at most {TAG_MAX} characters (\"{tag}\" has {len})."),
                );
            }
        }

        JobInput {
            company_id,
            title: clean_required(errors, "title", &self.title, TITLE_MAX),
            description: clean_required(errors, "description", &self.description, usize::MAX),
            requirements: self.requirements.trim().to_string(),
            salary_range: clean_optional(errors, "salary_range", &self.salary_range, SALARY_MAX),
            is_active: self.is_active,
            tags,
        }
    }
}

/// Splits on commas, trims and drops empty or repeated names.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

// ────────────────────────────────────────────────────────────────────────────
// Apply / status update
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplyForm {
    pub cover_letter: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub status: Option<String>,
    pub rejection_reason: Option<String>,
    pub feedback_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    pub rejection_reason: Option<RejectionReason>,
    pub feedback_text: String,
}

impl StatusForm {
    /// A rejection reason only survives alongside the `rejected` status.
    pub fn clean(&self, errors: &mut FieldErrors) -> StatusUpdate {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("status", "This field is required.");
                ApplicationStatus::default()
            }
            Some(value) => ApplicationStatus::parse(value).unwrap_or_else(|| {
                errors.add("status", invalid_choice(value));
                ApplicationStatus::default()
            }),
        };

        let rejection_reason = match self.rejection_reason.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => {
                let reason = RejectionReason::parse(value);
                if reason.is_none() {
                    errors.add("rejection_reason", invalid_choice(value));
                }
                reason
            }
        };

        StatusUpdate {
            status,
            rejection_reason: rejection_reason.filter(|_| status == ApplicationStatus::Rejected),
            feedback_text: self.feedback_text.trim().to_string(),
        }
    }
}

fn invalid_choice(value: &str) -> String {
    format!("Select a valid choice. {value} is not one of the available choices.")
}
